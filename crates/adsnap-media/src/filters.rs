//! FFmpeg filter graphs for scene normalization.
//!
//! Every scene clip is trimmed, letterboxed to the canonical canvas and
//! paired with exactly one audio stream so that clips can later be joined
//! with stream copy.

use adsnap_models::encoding::SILENCE_SAMPLE_RATE;

/// Output label of the video chain.
pub const VIDEO_OUT: &str = "[vout]";
/// Output label of the audio chain.
pub const AUDIO_OUT: &str = "[aout]";

/// Format seconds for filter arguments.
pub fn format_seconds(secs: f64) -> String {
    let s = format!("{:.3}", secs);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape a path for use inside a quoted filter argument.
pub fn escape_filter_path(path: &str) -> String {
    path.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

/// Video chain: trim, fit inside the canvas, pad, square pixels and an
/// optional ASS overlay.
pub fn scene_video_chain(
    duration_secs: f64,
    width: u32,
    height: u32,
    subtitle_file: Option<&str>,
) -> String {
    let mut chain = format!(
        "[0:v]trim=duration={d},scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1",
        d = format_seconds(duration_secs),
        w = width,
        h = height,
    );

    if let Some(file) = subtitle_file {
        chain.push_str(&format!(",ass='{}'", escape_filter_path(file)));
    }

    chain.push_str(VIDEO_OUT);
    chain
}

/// Audio chain for narrated scenes: pad with silence, then cut to length.
pub fn narration_audio_chain(duration_secs: f64) -> String {
    format!(
        "[1:a]apad,atrim=0:{}{}",
        format_seconds(duration_secs),
        AUDIO_OUT
    )
}

/// Audio chain for silent scenes: generated stereo silence.
pub fn silent_audio_chain(duration_secs: f64) -> String {
    format!(
        "anullsrc=r={}:cl=stereo,atrim=0:{}{}",
        SILENCE_SAMPLE_RATE,
        format_seconds(duration_secs),
        AUDIO_OUT
    )
}

/// Full filter graph for one scene.
pub fn scene_filter_graph(
    duration_secs: f64,
    width: u32,
    height: u32,
    subtitle_file: Option<&str>,
    has_narration: bool,
) -> String {
    let video = scene_video_chain(duration_secs, width, height, subtitle_file);
    let audio = if has_narration {
        narration_audio_chain(duration_secs)
    } else {
        silent_audio_chain(duration_secs)
    };
    format!("{};{}", video, audio)
}
