//! Storyboard text parsing.
//!
//! Generated storyboards arrive either as a labelled Markdown list
//! (`**Scene 1:**` followed by `**Visual:**`, `**Audio:**` and
//! `**On-Screen Text:**` lines) or, when the model drifts from the requested
//! format, as a pipe table. Both shapes produce the same document.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use adsnap_models::{SceneScript, StoryboardDocument, FALLBACK_TITLE};

/// Raw text that yielded no scenes.
#[derive(Debug, Clone, Error)]
#[error("Could not get a valid storyboard from the AI's response. It may have been in an unexpected format.")]
pub struct ParseFailure {
    pub raw: String,
}

static TABLE_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)panel|scene|visual").expect("valid regex"));

static SCENE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\*{0,2}(?:scene|panel)\s*(\d+):?\s*\*{0,2}").expect("valid regex")
});

static VISUAL_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[-*]\s+)?\*{0,2}(?:visual|description)\*{0,2}:\*{0,2}")
        .expect("valid regex")
});

static AUDIO_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[-*]\s+)?\*{0,2}(?:audio|voiceover)\*{0,2}:\*{0,2}")
        .expect("valid regex")
});

static TEXT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[-*]\s+)?\*{0,2}(?:on[- ]?screen text|text overlay)\*{0,2}:\*{0,2}")
        .expect("valid regex")
});

static TITLE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\*{0,2}title\*{0,2}:\*{0,2}").expect("valid regex"));

/// Parse generated storyboard text into an ordered document.
pub fn parse_storyboard(raw: &str) -> Result<StoryboardDocument, ParseFailure> {
    let lines: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();

    let is_table = lines
        .iter()
        .any(|l| l.contains('|') && TABLE_HINT.is_match(l));

    let scenes = if is_table {
        parse_table(&lines)
    } else {
        parse_list(&lines)
    };

    let scenes: Vec<SceneScript> = scenes.into_iter().map(clean_scene).collect();
    if scenes.is_empty() {
        return Err(ParseFailure {
            raw: raw.to_string(),
        });
    }

    Ok(StoryboardDocument {
        title: extract_title(&lines),
        scenes,
    })
}

fn is_table_row(line: &str) -> bool {
    line.contains('|') && !line.contains("---")
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn find_column(header: &[String], keys: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| keys.iter().any(|k| h.contains(k)))
}

fn parse_table(lines: &[&str]) -> Vec<SceneScript> {
    let Some(header_idx) = lines.iter().position(|l| is_table_row(l)) else {
        return Vec::new();
    };

    let header: Vec<String> = split_cells(lines[header_idx])
        .into_iter()
        .map(|c| c.to_lowercase())
        .collect();

    let Some(visual_idx) = find_column(&header, &["visual", "description"]) else {
        return Vec::new();
    };
    let audio_idx = find_column(&header, &["audio", "voiceover"]);
    let text_idx = find_column(&header, &["text"]);

    let mut scenes = Vec::new();
    for line in &lines[header_idx + 1..] {
        if !is_table_row(line) {
            continue;
        }
        let cells = split_cells(line);
        if cells.len() < header.len() {
            continue;
        }

        let cell = |idx: Option<usize>| {
            idx.and_then(|i| cells.get(i))
                .cloned()
                .unwrap_or_default()
        };

        scenes.push(SceneScript {
            scene_number: scenes.len() as u32 + 1,
            visual_description: cell(Some(visual_idx)),
            voiceover_script: cell(audio_idx),
            on_screen_text: cell(text_idx),
        });
    }
    scenes
}

fn parse_list(lines: &[&str]) -> Vec<SceneScript> {
    let mut scenes: Vec<SceneScript> = Vec::new();
    let mut current: Option<SceneScript> = None;

    for line in lines {
        let line = line.trim();

        if let Some(caps) = SCENE_MARKER.captures(line) {
            if let Some(done) = current.take() {
                scenes.push(done);
            }
            let position = scenes.len() as u32 + 1;
            let number = caps[1]
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(position);
            current = Some(SceneScript::new(number));
            continue;
        }

        let Some(scene) = current.as_mut() else {
            continue;
        };

        if let Some(rest) = label_remainder(&VISUAL_LABEL, line) {
            append(&mut scene.visual_description, rest);
        } else if let Some(rest) = label_remainder(&AUDIO_LABEL, line) {
            append(&mut scene.voiceover_script, rest);
        } else if let Some(rest) = label_remainder(&TEXT_LABEL, line) {
            append(&mut scene.on_screen_text, rest);
        }
    }

    if let Some(done) = current {
        scenes.push(done);
    }
    scenes
}

fn label_remainder<'a>(label: &Regex, line: &'a str) -> Option<&'a str> {
    label.find(line).map(|m| line[m.end()..].trim())
}

fn append(field: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(text);
}

fn strip_quotes(text: &str) -> String {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}

fn clean_scene(scene: SceneScript) -> SceneScript {
    SceneScript {
        scene_number: scene.scene_number,
        visual_description: strip_quotes(&scene.visual_description),
        voiceover_script: strip_quotes(&scene.voiceover_script),
        on_screen_text: strip_quotes(&scene.on_screen_text),
    }
}

fn extract_title(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .find(|l| l.starts_with('#'))
        .map(|l| {
            let heading = l.trim_start_matches('#').trim();
            TITLE_LABEL.replace(heading, "").trim().to_string()
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = r#"## Title: Morning Brew

**Scene 1:**
**Visual:** "A steaming cup of coffee on a wooden table"
**Audio:** Start your day right.
**On-Screen Text:** None

**Scene 2:**
**Visual:** A barista pouring latte art
**Audio:** Crafted with care,
**Audio:** every single time.
**On-Screen Text:** Visit us today
"#;

    const TABLE: &str = r#"## Title: Morning Brew

| Scene | Visual | Audio | On-Screen Text |
|-------|--------|-------|----------------|
| 1 | "A steaming cup of coffee on a wooden table" | Start your day right. | None |
| 2 | A barista pouring latte art | Crafted with care, every single time. | Visit us today |
"#;

    #[test]
    fn test_parse_labelled_list() {
        let doc = parse_storyboard(LIST).unwrap();

        assert_eq!(doc.title, "Morning Brew");
        assert_eq!(doc.scene_count(), 2);
        assert_eq!(doc.scenes[0].scene_number, 1);
        assert_eq!(
            doc.scenes[0].visual_description,
            "A steaming cup of coffee on a wooden table"
        );
        assert_eq!(doc.scenes[0].on_screen_text, "None");
        assert!(!doc.scenes[0].has_overlay());
        assert_eq!(
            doc.scenes[1].voiceover_script,
            "Crafted with care, every single time."
        );
    }

    #[test]
    fn test_list_keeps_declared_numbers() {
        let raw = "**Scene 3:**\n**Visual:** a\n**Scene 7:**\n**Visual:** b";
        let doc = parse_storyboard(raw).unwrap();
        let numbers: Vec<u32> = doc.scenes.iter().map(|s| s.scene_number).collect();
        assert_eq!(numbers, vec![3, 7]);
    }

    #[test]
    fn test_list_accepts_plain_markers_and_labels() {
        let raw = "Intro text that is ignored\nScene 1:\nVisual: city skyline\nVoiceover: The city never sleeps.\nText Overlay: NYC";
        let doc = parse_storyboard(raw).unwrap();

        assert_eq!(doc.scene_count(), 1);
        let scene = &doc.scenes[0];
        assert_eq!(scene.visual_description, "city skyline");
        assert_eq!(scene.voiceover_script, "The city never sleeps.");
        assert_eq!(scene.on_screen_text, "NYC");
        assert_eq!(doc.title, FALLBACK_TITLE);
    }

    #[test]
    fn test_list_bulleted_labels() {
        let raw = "**Panel 1:**\n- **Description:** surfer at dawn\n- **Audio:** Ride the wave.";
        let doc = parse_storyboard(raw).unwrap();
        assert_eq!(doc.scenes[0].visual_description, "surfer at dawn");
        assert_eq!(doc.scenes[0].voiceover_script, "Ride the wave.");
    }

    #[test]
    fn test_label_words_inside_text_stay_in_their_field() {
        let raw = "**Scene 1:**\n**Visual:** coffee beans\n**Audio:** Read the description: bold and smooth.\n**On-Screen Text:** Visual: none of it";
        let doc = parse_storyboard(raw).unwrap();
        let scene = &doc.scenes[0];

        assert_eq!(scene.visual_description, "coffee beans");
        assert_eq!(scene.voiceover_script, "Read the description: bold and smooth.");
        assert_eq!(scene.on_screen_text, "Visual: none of it");
    }

    #[test]
    fn test_scene_zero_uses_position() {
        let raw = "Scene 0:\nVisual: a\nScene 0:\nVisual: b";
        let doc = parse_storyboard(raw).unwrap();
        let numbers: Vec<u32> = doc.scenes.iter().map(|s| s.scene_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_parse_table() {
        let doc = parse_storyboard(TABLE).unwrap();
        assert_eq!(doc.scene_count(), 2);
        assert_eq!(doc.scenes[1].visual_description, "A barista pouring latte art");
        assert_eq!(doc.scenes[1].on_screen_text, "Visit us today");
    }

    #[test]
    fn test_table_and_list_agree() {
        let from_list = parse_storyboard(LIST).unwrap();
        let from_table = parse_storyboard(TABLE).unwrap();
        assert_eq!(from_list, from_table);
    }

    #[test]
    fn test_table_numbers_by_parsed_position() {
        let raw = "Panel | Description\n--- | ---\n9 | beach\nshort|\n4 | forest";
        let doc = parse_storyboard(raw).unwrap();

        let numbers: Vec<u32> = doc.scenes.iter().map(|s| s.scene_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(doc.scenes[1].visual_description, "forest");
        assert!(doc.scenes[0].voiceover_script.is_empty());
    }

    #[test]
    fn test_table_without_visual_column_fails() {
        let raw = "| Scene | Audio |\n|---|---|\n| 1 | hello |";
        let err = parse_storyboard(raw).unwrap_err();
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn test_no_scenes_fails() {
        assert!(parse_storyboard("Sorry, I can't help with that.").is_err());
        assert!(parse_storyboard("").is_err());
    }

    #[test]
    fn test_title_variants() {
        let doc = parse_storyboard("# Summer Sale\n**Scene 1:**\n**Visual:** sun").unwrap();
        assert_eq!(doc.title, "Summer Sale");

        let doc = parse_storyboard("## **Title:** Go Fast\n**Scene 1:**\n**Visual:** car").unwrap();
        assert_eq!(doc.title, "Go Fast");

        let doc = parse_storyboard("## Title: Plain Label\n**Scene 1:**\n**Visual:** car").unwrap();
        assert_eq!(doc.title, "Plain Label");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"quoted\""), "quoted");
        assert_eq!(strip_quotes("\"half"), "\"half");
        assert_eq!(strip_quotes("\""), "\"");
    }
}
