//! Scene rendering: footage download, overlay and normalization.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use adsnap_models::{EncodingConfig, RenderedScene};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::download::download_to_file;
use crate::error::MediaResult;
use crate::filters::{scene_filter_graph, AUDIO_OUT, VIDEO_OUT};
use crate::subtitle::SubtitleBuilder;

/// Everything needed to render one renderable scene.
#[derive(Debug, Clone)]
pub struct SceneRenderJob {
    /// 1-based position in the storyboard; names the scene's files
    pub scene_index: usize,
    /// Scene number as written in the storyboard
    pub scene_number: u32,
    pub video_url: String,
    pub narration_path: Option<PathBuf>,
    /// Raw on-screen text; empty or "none" means no overlay
    pub overlay_text: String,
    pub duration_secs: f64,
    /// Run workspace; all intermediate files live here
    pub work_dir: PathBuf,
}

impl SceneRenderJob {
    pub fn raw_file_name(&self) -> String {
        format!("scene_{}_raw.mp4", self.scene_index)
    }

    pub fn processed_file_name(&self) -> String {
        format!("scene_{}_processed.mp4", self.scene_index)
    }
}

/// Turns a scene's assets into a normalized clip.
#[async_trait]
pub trait SceneRenderer: Send + Sync {
    async fn render(&self, job: &SceneRenderJob) -> MediaResult<RenderedScene>;
}

/// Build the normalization command for a scene whose footage is already
/// at `job.raw_file_name()` inside the workspace.
pub fn build_scene_command(
    job: &SceneRenderJob,
    encoding: &EncodingConfig,
    subtitle_file: Option<&str>,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new(job.processed_file_name())
        .current_dir(&job.work_dir)
        .input(job.raw_file_name());

    if let Some(audio) = job.narration_path.as_deref() {
        // The process runs inside the workspace, so only the file name resolves.
        cmd = cmd.input(audio.file_name().map(Path::new).unwrap_or(audio));
    }

    cmd.filter_complex(scene_filter_graph(
        job.duration_secs,
        encoding.width,
        encoding.height,
        subtitle_file,
        job.narration_path.is_some(),
    ))
    .map(VIDEO_OUT)
    .map(AUDIO_OUT)
    .output_args(encoding.to_ffmpeg_args())
    .shortest()
}

/// FFmpeg-backed renderer.
#[derive(Debug, Clone)]
pub struct FfmpegSceneRenderer {
    http: reqwest::Client,
    runner: FfmpegRunner,
    encoding: EncodingConfig,
    subtitles: SubtitleBuilder,
}

impl FfmpegSceneRenderer {
    pub fn new(http: reqwest::Client, runner: FfmpegRunner, encoding: EncodingConfig) -> Self {
        Self {
            http,
            runner,
            encoding,
            subtitles: SubtitleBuilder::new(),
        }
    }
}

#[async_trait]
impl SceneRenderer for FfmpegSceneRenderer {
    async fn render(&self, job: &SceneRenderJob) -> MediaResult<RenderedScene> {
        let started = Instant::now();
        let raw_path = job.work_dir.join(job.raw_file_name());

        download_to_file(&self.http, &job.video_url, &raw_path).await?;

        let subtitle_file = match self.subtitles.build(
            &job.overlay_text,
            job.duration_secs,
            job.scene_index,
        ) {
            Some(track) => {
                track.write_to(&job.work_dir).await?;
                Some(track.file_name)
            }
            None => None,
        };

        let cmd = build_scene_command(job, &self.encoding, subtitle_file.as_deref());
        debug!(scene = job.scene_number, "Normalizing scene clip");
        self.runner.run(&cmd).await?;

        let elapsed = started.elapsed().as_secs_f64();
        metrics::histogram!("adsnap_scene_render_duration_seconds").record(elapsed);
        info!(
            scene = job.scene_number,
            elapsed_secs = elapsed,
            "Scene clip rendered: {}",
            job.processed_file_name()
        );

        Ok(RenderedScene {
            scene_number: job.scene_number,
            clip_path: job.work_dir.join(job.processed_file_name()),
            duration_seconds: job.duration_secs,
        })
    }
}
