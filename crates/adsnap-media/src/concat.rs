//! Lossless concatenation of normalized scene clips.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Name of the concat demuxer list inside the workspace.
pub const FILE_LIST_NAME: &str = "filelist.txt";

/// Joins clips, in order, into one file.
#[async_trait]
pub trait ClipConcatenator: Send + Sync {
    /// Concatenate `clips` into `work_dir/output_name` and return its path.
    async fn concat(
        &self,
        clips: &[PathBuf],
        work_dir: &Path,
        output_name: &str,
    ) -> MediaResult<PathBuf>;
}

/// Render the concat demuxer list. Entries are file names relative to the
/// workspace.
pub fn build_file_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| {
            let name = clip
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| clip.to_string_lossy().to_string());
            format!("file '{}'", name.replace('\'', "'\\''"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Stream-copy concatenation via the FFmpeg concat demuxer.
///
/// Inputs must share codec, resolution and audio layout.
#[derive(Debug, Clone, Default)]
pub struct FfmpegConcatenator {
    runner: FfmpegRunner,
}

impl FfmpegConcatenator {
    pub fn new(runner: FfmpegRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ClipConcatenator for FfmpegConcatenator {
    async fn concat(
        &self,
        clips: &[PathBuf],
        work_dir: &Path,
        output_name: &str,
    ) -> MediaResult<PathBuf> {
        if clips.is_empty() {
            return Err(MediaError::NothingToConcat);
        }

        fs::write(work_dir.join(FILE_LIST_NAME), build_file_list(clips)).await?;

        let cmd = FfmpegCommand::new(output_name)
            .current_dir(work_dir)
            .input_with_args(["-f", "concat", "-safe", "0"], FILE_LIST_NAME)
            .stream_copy();
        self.runner.run(&cmd).await?;

        info!("Concatenated {} clips into {}", clips.len(), output_name);
        Ok(work_dir.join(output_name))
    }
}
