//! Ad generation orchestrator.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use adsnap_media::{move_file, ClipConcatenator, SceneRenderJob, SceneRenderer};
use adsnap_models::{
    clamp_duration, GenerateAdRequest, GenerateAdResponse, RenderedScene, RunId, RunState,
    SceneAssets, StoryboardDocument,
};
use adsnap_services::{FootageSearch, SpeechSynthesizer, TextGenerator};

use crate::assets::AssetResolver;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::metrics;
use crate::parser::parse_storyboard;
use crate::prompt::{storyboard_request, SYSTEM_INSTRUCTION};
use crate::workspace::Workspace;

/// External collaborators, built once at start-up.
#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn TextGenerator>,
    pub footage: Arc<dyn FootageSearch>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub renderer: Arc<dyn SceneRenderer>,
    pub concatenator: Arc<dyn ClipConcatenator>,
}

/// Tracks the lifecycle state of one run.
struct RunTracker {
    state: RunState,
    logger: RunLogger,
}

impl RunTracker {
    fn new(logger: RunLogger) -> Self {
        Self {
            state: RunState::Initialized,
            logger,
        }
    }

    fn advance(&mut self, next: RunState) {
        match self.state.transition(next) {
            Ok(state) => {
                self.state = state;
                self.logger.log_progress(&format!("state -> {}", state));
            }
            Err(e) => self.logger.log_error(&e.to_string()),
        }
    }
}

/// Drives one ad generation from prompt to published file.
///
/// Stages run strictly in sequence: storyboard, assets for every scene,
/// rendering of every renderable scene, concatenation, publish. The run
/// workspace is removed before `generate` returns, whatever the outcome.
pub struct AdPipeline {
    config: PipelineConfig,
    generator: Arc<dyn TextGenerator>,
    assets: AssetResolver,
    renderer: Arc<dyn SceneRenderer>,
    concatenator: Arc<dyn ClipConcatenator>,
}

impl AdPipeline {
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            generator: collaborators.generator,
            assets: AssetResolver::new(collaborators.footage, collaborators.speech),
            renderer: collaborators.renderer,
            concatenator: collaborators.concatenator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generate and publish one ad.
    pub async fn generate(&self, request: &GenerateAdRequest) -> PipelineResult<GenerateAdResponse> {
        request.validate().map_err(PipelineError::InvalidRequest)?;

        let total_secs = clamp_duration(
            request.options.requested_duration(),
            self.config.default_ad_duration,
            self.config.max_ad_duration,
        );

        let run_id = RunId::new();
        let logger = RunLogger::new(&run_id, "generate_ad");
        let span = logger.create_span();
        let started = Instant::now();

        let mut tracker = RunTracker::new(logger.clone());
        logger.log_start(&format!("total duration {:.1}s", total_secs));

        let result = self
            .run(&run_id, &request.prompt, total_secs, &mut tracker)
            .instrument(span)
            .await;

        let outcome = match &result {
            Ok(response) => {
                logger.log_completion(&format!("published {}", response.video_url));
                "published"
            }
            Err(e) => {
                tracker.advance(RunState::Failed);
                logger.log_error(&e.to_string());
                e.kind()
            }
        };
        tracker.advance(RunState::CleanedUp);
        if !tracker.state.is_terminal() {
            logger.log_warning(&format!("run ended in state {}", tracker.state));
        }
        metrics::record_run(outcome, started.elapsed().as_secs_f64());

        result
    }

    async fn run(
        &self,
        run_id: &RunId,
        prompt: &str,
        total_secs: f64,
        tracker: &mut RunTracker,
    ) -> PipelineResult<GenerateAdResponse> {
        let storyboard = self.storyboard(prompt, &tracker.logger).await?;
        tracker.advance(RunState::StoryboardReady);
        tracker.logger.log_progress(&format!(
            "storyboard \"{}\" with {} scenes",
            storyboard.title,
            storyboard.scene_count()
        ));

        let workspace = Workspace::acquire(&self.config.work_dir, run_id)
            .await
            .map_err(PipelineError::Workspace)?;

        let result = self
            .assemble(run_id, &storyboard, total_secs, &workspace, tracker)
            .await;

        if let Err(e) = workspace.release().await {
            tracker
                .logger
                .log_warning(&format!("workspace cleanup failed: {}", e));
        }

        result
    }

    async fn storyboard(&self, prompt: &str, logger: &RunLogger) -> PipelineResult<StoryboardDocument> {
        let started = Instant::now();
        let timeout = self.config.storyboard_timeout;

        let request = storyboard_request(prompt);
        let generation = self.generator.generate(SYSTEM_INSTRUCTION, &request);
        let text = match tokio::time::timeout(timeout, generation).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(PipelineError::upstream_failed(e.to_string())),
            Err(_) => return Err(PipelineError::UpstreamTimeout(timeout.as_secs())),
        };
        metrics::record_stage("storyboard", started.elapsed().as_secs_f64());

        parse_storyboard(&text).map_err(|failure| {
            logger.log_error(&format!(
                "failed to parse storyboard, raw response:\n{}",
                failure.raw
            ));
            PipelineError::from(failure)
        })
    }

    async fn assemble(
        &self,
        run_id: &RunId,
        storyboard: &StoryboardDocument,
        total_secs: f64,
        workspace: &Workspace,
        tracker: &mut RunTracker,
    ) -> PipelineResult<GenerateAdResponse> {
        let dir = workspace.path();
        let per_scene_secs = storyboard.per_scene_duration(total_secs);

        let started = Instant::now();
        let assets = self.assets.resolve_all(&storyboard.scenes, dir).await;
        metrics::record_stage("assets", started.elapsed().as_secs_f64());
        tracker.advance(RunState::AssetsResolved);

        let jobs = render_jobs(storyboard, &assets, per_scene_secs, dir, &tracker.logger);
        if jobs.is_empty() {
            return Err(PipelineError::NoRenderableScenes);
        }

        let started = Instant::now();
        let mut rendered: Vec<RenderedScene> = Vec::with_capacity(jobs.len());
        for job in &jobs {
            let scene = self.renderer.render(job).await.map_err(|e| {
                if let Some(stderr) = e.stderr() {
                    tracker.logger.log_error(&format!(
                        "ffmpeg stderr for scene {}:\n{}",
                        job.scene_number, stderr
                    ));
                }
                PipelineError::render_failed(job.scene_number, e)
            })?;
            rendered.push(scene);
        }
        metrics::record_stage("render", started.elapsed().as_secs_f64());
        tracker.advance(RunState::ScenesRendered);

        let output_name = format!("ad_{}.mp4", run_id);
        let clips: Vec<PathBuf> = rendered.iter().map(|r| r.clip_path.clone()).collect();

        let started = Instant::now();
        let output = self
            .concatenator
            .concat(&clips, dir, &output_name)
            .await
            .map_err(PipelineError::ConcatFailed)?;
        metrics::record_stage("concat", started.elapsed().as_secs_f64());
        tracker.advance(RunState::Concatenated);

        let destination = self.config.public_video_dir.join(&output_name);
        move_file(&output, &destination)
            .await
            .map_err(PipelineError::Publish)?;
        tracker.advance(RunState::Published);

        Ok(GenerateAdResponse {
            title: storyboard.title.clone(),
            video_url: self.config.video_url(&output_name),
        })
    }
}

/// Render jobs for scenes with footage, in storyboard order. Scenes without
/// footage are dropped.
fn render_jobs(
    storyboard: &StoryboardDocument,
    assets: &[SceneAssets],
    per_scene_secs: f64,
    dir: &std::path::Path,
    logger: &RunLogger,
) -> Vec<SceneRenderJob> {
    storyboard
        .scenes
        .iter()
        .zip(assets)
        .enumerate()
        .filter_map(|(index, (scene, asset))| {
            let Some(video_url) = asset.video_source_url.clone() else {
                logger.log_warning(&format!(
                    "scene {} dropped: no stock video",
                    scene.scene_number
                ));
                metrics::record_scene_dropped();
                return None;
            };
            Some(SceneRenderJob {
                scene_index: index + 1,
                scene_number: scene.scene_number,
                video_url,
                narration_path: asset.narration_audio_path.clone(),
                overlay_text: scene.on_screen_text.clone(),
                duration_secs: per_scene_secs,
                work_dir: dir.to_path_buf(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adsnap_models::SceneScript;

    fn storyboard() -> StoryboardDocument {
        StoryboardDocument {
            title: "Ad".to_string(),
            scenes: (1..=3)
                .map(|n| SceneScript {
                    visual_description: format!("visual {n}"),
                    on_screen_text: "none".to_string(),
                    ..SceneScript::new(n)
                })
                .collect(),
        }
    }

    #[test]
    fn test_render_jobs_drop_scenes_without_footage() {
        let assets = vec![
            SceneAssets {
                video_source_url: Some("https://cdn/1.mp4".to_string()),
                narration_audio_path: None,
            },
            SceneAssets::default(),
            SceneAssets {
                video_source_url: Some("https://cdn/3.mp4".to_string()),
                narration_audio_path: Some(PathBuf::from("/w/scene_3_audio.mp3")),
            },
        ];
        let logger = RunLogger::new(&RunId::from_string("run_test"), "test");

        let jobs = render_jobs(&storyboard(), &assets, 5.0, std::path::Path::new("/w"), &logger);

        let numbers: Vec<u32> = jobs.iter().map(|j| j.scene_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(jobs[1].scene_index, 3);
        assert_eq!(jobs[1].raw_file_name(), "scene_3_raw.mp4");
        assert!(jobs.iter().all(|j| (j.duration_secs - 5.0).abs() < f64::EPSILON));
    }
}
