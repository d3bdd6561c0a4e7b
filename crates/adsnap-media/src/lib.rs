//! FFmpeg CLI wrapper for ad assembly.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with stderr capture
//! - Scene normalization filter graphs and ASS overlays
//! - Footage download, scene rendering and clip concatenation

pub mod command;
pub mod concat;
pub mod download;
pub mod error;
pub mod filters;
pub mod fs_utils;
pub mod render;
pub mod subtitle;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use concat::{ClipConcatenator, FfmpegConcatenator};
pub use download::download_to_file;
pub use error::{MediaError, MediaResult};
pub use fs_utils::move_file;
pub use render::{FfmpegSceneRenderer, SceneRenderJob, SceneRenderer};
pub use subtitle::{SubtitleBuilder, SubtitleTrack};
