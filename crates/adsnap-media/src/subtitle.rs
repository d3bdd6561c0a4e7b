//! ASS subtitle generation for on-screen text overlays.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use adsnap_models::{is_overlay_text, CANVAS_HEIGHT, CANVAS_WIDTH};

use crate::error::MediaResult;

/// Overlay start offset in seconds.
const OVERLAY_START_SECS: f64 = 0.1;
/// Overlay ends this long before the clip does.
const OVERLAY_END_MARGIN_SECS: f64 = 0.1;
const FONT_SIZE: u32 = 72;

/// Font available on the host platform.
pub fn default_font() -> &'static str {
    if cfg!(windows) {
        "Arial"
    } else {
        "DejaVu Sans"
    }
}

/// Format seconds as an ASS timestamp (`H:MM:SS.cc`).
pub fn format_ass_time(secs: f64) -> String {
    let secs = secs.max(0.0);
    let minutes = (secs / 60.0).floor() as u64;
    let rest = secs - (minutes as f64) * 60.0;
    format!("0:{:02}:{:05.2}", minutes, rest)
}

/// Escape override-block characters so the text renders literally.
pub fn escape_ass_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace('\n', " ")
}

/// A rendered subtitle document and the workspace file it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub file_name: String,
    pub content: String,
}

impl SubtitleTrack {
    /// Write the track into `dir` and return its path.
    pub async fn write_to(&self, dir: &Path) -> MediaResult<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content).await?;
        debug!("Created ASS subtitle file: {}", path.display());
        Ok(path)
    }
}

/// Builder for a single-event ASS document.
#[derive(Debug, Clone)]
pub struct SubtitleBuilder {
    font: String,
    font_size: u32,
    play_res_x: u32,
    play_res_y: u32,
}

impl Default for SubtitleBuilder {
    fn default() -> Self {
        Self {
            font: default_font().to_string(),
            font_size: FONT_SIZE,
            play_res_x: CANVAS_WIDTH,
            play_res_y: CANVAS_HEIGHT,
        }
    }
}

impl SubtitleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the font family.
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Subtitle track for a scene, or `None` when the text is empty or
    /// "none".
    pub fn build(&self, text: &str, duration_secs: f64, scene_index: usize) -> Option<SubtitleTrack> {
        if !is_overlay_text(text) {
            return None;
        }
        Some(SubtitleTrack {
            file_name: subtitle_file_name(scene_index),
            content: self.render_document(text, duration_secs),
        })
    }

    /// Render the document: white bold text, bottom-center, semi-opaque box.
    pub fn render_document(&self, text: &str, duration_secs: f64) -> String {
        let end = format_ass_time(duration_secs - OVERLAY_END_MARGIN_SECS);
        let start = format_ass_time(OVERLAY_START_SECS);

        format!(
            "[Script Info]\n\
             PlayResX: {x}\n\
             PlayResY: {y}\n\
             \n\
             [V4+ Styles]\n\
             Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n\
             Style: Default,{font},{size},&H00FFFFFF,&H000000FF,&H00000000,&H99000000,-1,0,0,0,100,100,0,0,1,2,2,2,10,10,80,1\n\
             \n\
             [Events]\n\
             Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
             Dialogue: 0,{start},{end},Default,,0,0,0,,{{\\an2}}{text}\n",
            x = self.play_res_x,
            y = self.play_res_y,
            font = self.font,
            size = self.font_size,
            start = start,
            end = end,
            text = escape_ass_text(text.trim()),
        )
    }
}

/// File name of a scene's subtitle file, relative to the run workspace.
pub fn subtitle_file_name(scene_index: usize) -> String {
    format!("scene_{}.ass", scene_index)
}
