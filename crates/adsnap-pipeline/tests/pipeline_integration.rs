//! End-to-end pipeline runs against in-process fakes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use adsnap_media::{ClipConcatenator, MediaError, MediaResult, SceneRenderJob, SceneRenderer};
use adsnap_models::{AdOptions, GenerateAdRequest, RenderedScene};
use adsnap_pipeline::{AdPipeline, Collaborators, PipelineConfig, PipelineError};
use adsnap_services::{
    FootageSearch, ServiceError, ServiceResult, SpeechSynthesizer, TextGenerator,
};

const STORYBOARD: &str = r#"## Title: Fresh Roast

**Scene 1:**
**Visual:** coffee beans
**Audio:** It starts with the bean.
**On-Screen Text:** Fresh Roast

**Scene 2:**
**Visual:** empty street
**Audio:** Roasted every morning.
**On-Screen Text:** None

**Scene 3:**
**Visual:** smiling customer
**Audio:** Taste the difference.
**On-Screen Text:** Order now
"#;

struct ScriptedGenerator {
    reply: Result<String, String>,
    delay: Duration,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _system: &str, _prompt: &str) -> ServiceResult<String> {
        tokio::time::sleep(self.delay).await;
        self.reply
            .clone()
            .map_err(ServiceError::invalid_response)
    }
}

/// Finds footage for every query except those listed as missing.
struct StockLibrary {
    missing: Vec<&'static str>,
}

#[async_trait]
impl FootageSearch for StockLibrary {
    async fn search_video(&self, query: &str) -> ServiceResult<Option<String>> {
        if self.missing.contains(&query) {
            return Ok(None);
        }
        Ok(Some(format!("https://stock.test/{}.mp4", query.replace(' ', "_"))))
    }
}

struct SilentVoice;

#[async_trait]
impl SpeechSynthesizer for SilentVoice {
    async fn synthesize(&self, _text: &str) -> ServiceResult<Vec<u8>> {
        Ok(vec![0xFF, 0xFB])
    }
}

/// Writes a placeholder clip and records each job.
#[derive(Default)]
struct RecordingRenderer {
    jobs: Mutex<Vec<SceneRenderJob>>,
    fail_scene: Option<u32>,
}

#[async_trait]
impl SceneRenderer for RecordingRenderer {
    async fn render(&self, job: &SceneRenderJob) -> MediaResult<RenderedScene> {
        self.jobs.lock().unwrap().push(job.clone());
        if self.fail_scene == Some(job.scene_number) {
            return Err(MediaError::ffmpeg_failed(
                "ffmpeg exited with status 1",
                Some("Invalid data found when processing input".to_string()),
                Some(1),
            ));
        }
        let clip_path = job.work_dir.join(job.processed_file_name());
        tokio::fs::write(&clip_path, job.scene_number.to_string()).await?;
        Ok(RenderedScene {
            scene_number: job.scene_number,
            clip_path,
            duration_seconds: job.duration_secs,
        })
    }
}

/// Joins clip contents into the output file.
#[derive(Default)]
struct RecordingConcatenator {
    calls: Mutex<Vec<Vec<PathBuf>>>,
    fail: bool,
}

#[async_trait]
impl ClipConcatenator for RecordingConcatenator {
    async fn concat(&self, clips: &[PathBuf], work_dir: &Path, output_name: &str) -> MediaResult<PathBuf> {
        self.calls.lock().unwrap().push(clips.to_vec());
        if clips.is_empty() {
            return Err(MediaError::NothingToConcat);
        }
        if self.fail {
            return Err(MediaError::ffmpeg_failed(
                "ffmpeg exited with status 1",
                Some("filelist.txt: Invalid data found when processing input".to_string()),
                Some(1),
            ));
        }
        let mut joined = String::new();
        for clip in clips {
            joined.push_str(&tokio::fs::read_to_string(clip).await?);
        }
        let output = work_dir.join(output_name);
        tokio::fs::write(&output, joined).await?;
        Ok(output)
    }
}

struct Harness {
    pipeline: AdPipeline,
    renderer: Arc<RecordingRenderer>,
    concatenator: Arc<RecordingConcatenator>,
    work_dir: PathBuf,
    public_dir: PathBuf,
    _root: TempDir,
}

struct Setup {
    reply: Result<String, String>,
    delay: Duration,
    missing: Vec<&'static str>,
    fail_scene: Option<u32>,
    fail_concat: bool,
    timeout: Duration,
    /// Occupy the workspace parent with a regular file
    work_dir_is_file: bool,
    /// Occupy the publish directory with a regular file
    public_dir_is_file: bool,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            reply: Ok(STORYBOARD.to_string()),
            delay: Duration::ZERO,
            missing: Vec::new(),
            fail_scene: None,
            fail_concat: false,
            timeout: Duration::from_secs(5),
            work_dir_is_file: false,
            public_dir_is_file: false,
        }
    }
}

fn harness(setup: Setup) -> Harness {
    let root = TempDir::new().unwrap();
    let work_dir = root.path().join("work");
    let public_dir = root.path().join("public").join("videos");

    if setup.work_dir_is_file {
        std::fs::write(&work_dir, b"not a directory").unwrap();
    }
    if setup.public_dir_is_file {
        std::fs::create_dir_all(root.path().join("public")).unwrap();
        std::fs::write(&public_dir, b"not a directory").unwrap();
    }

    let config = PipelineConfig {
        work_dir: work_dir.clone(),
        public_video_dir: public_dir.clone(),
        storyboard_timeout: setup.timeout,
        ..PipelineConfig::default()
    };

    let renderer = Arc::new(RecordingRenderer {
        fail_scene: setup.fail_scene,
        ..RecordingRenderer::default()
    });
    let concatenator = Arc::new(RecordingConcatenator {
        fail: setup.fail_concat,
        ..RecordingConcatenator::default()
    });

    let pipeline = AdPipeline::new(
        config,
        Collaborators {
            generator: Arc::new(ScriptedGenerator {
                reply: setup.reply,
                delay: setup.delay,
            }),
            footage: Arc::new(StockLibrary {
                missing: setup.missing,
            }),
            speech: Arc::new(SilentVoice),
            renderer: renderer.clone(),
            concatenator: concatenator.clone(),
        },
    );

    Harness {
        pipeline,
        renderer,
        concatenator,
        work_dir,
        public_dir,
        _root: root,
    }
}

fn request(duration: Option<f64>) -> GenerateAdRequest {
    let options = duration.map(AdOptions::with_duration).unwrap_or_default();
    GenerateAdRequest {
        prompt: "An ad for a neighbourhood coffee roaster".to_string(),
        options,
    }
}

fn workspace_is_empty(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

#[tokio::test]
async fn test_happy_path_publishes_ad() {
    let h = harness(Setup::default());

    let response = h.pipeline.generate(&request(Some(30.0))).await.unwrap();

    assert_eq!(response.title, "Fresh Roast");
    assert!(response.video_url.starts_with("/videos/ad_run_"));
    assert!(response.video_url.ends_with(".mp4"));

    let file_name = response.video_url.trim_start_matches("/videos/");
    let published = h.public_dir.join(file_name);
    assert_eq!(std::fs::read_to_string(published).unwrap(), "123");

    let jobs = h.renderer.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 3);
    assert!(jobs.iter().all(|j| (j.duration_secs - 10.0).abs() < 1e-9));
    assert!(jobs.iter().all(|j| j.narration_path.is_some()));
    assert_eq!(jobs[0].overlay_text, "Fresh Roast");

    assert!(workspace_is_empty(&h.work_dir));
}

#[tokio::test]
async fn test_scene_without_footage_is_dropped() {
    let h = harness(Setup {
        missing: vec!["empty street"],
        ..Setup::default()
    });

    let response = h.pipeline.generate(&request(Some(30.0))).await.unwrap();

    let file_name = response.video_url.trim_start_matches("/videos/");
    assert_eq!(
        std::fs::read_to_string(h.public_dir.join(file_name)).unwrap(),
        "13"
    );

    let jobs = h.renderer.jobs.lock().unwrap();
    let numbers: Vec<u32> = jobs.iter().map(|j| j.scene_number).collect();
    assert_eq!(numbers, vec![1, 3]);
    assert_eq!(jobs[1].scene_index, 3);

    // Duration is split across the full storyboard, not the survivors.
    assert!(jobs.iter().all(|j| (j.duration_secs - 10.0).abs() < 1e-9));

    let calls = h.concatenator.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 2);
}

#[tokio::test]
async fn test_no_footage_at_all_fails_before_concat() {
    let h = harness(Setup {
        missing: vec!["coffee beans", "empty street", "smiling customer"],
        ..Setup::default()
    });

    let err = h.pipeline.generate(&request(None)).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoRenderableScenes));
    assert!(h.renderer.jobs.lock().unwrap().is_empty());
    assert!(h.concatenator.calls.lock().unwrap().is_empty());
    assert!(workspace_is_empty(&h.work_dir));
}

#[tokio::test]
async fn test_storyboard_timeout() {
    let h = harness(Setup {
        delay: Duration::from_millis(500),
        timeout: Duration::from_millis(20),
        ..Setup::default()
    });

    let err = h.pipeline.generate(&request(None)).await.unwrap_err();

    assert!(matches!(err, PipelineError::UpstreamTimeout(_)));
    assert!(!err.is_client_error());
    assert!(h.renderer.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_storyboard_service_error() {
    let h = harness(Setup {
        reply: Err("quota exhausted".to_string()),
        ..Setup::default()
    });

    let err = h.pipeline.generate(&request(None)).await.unwrap_err();
    assert!(matches!(err, PipelineError::UpstreamFailed(_)));
}

#[tokio::test]
async fn test_unparseable_storyboard() {
    let h = harness(Setup {
        reply: Ok("I'm sorry, I can only help with coffee.".to_string()),
        ..Setup::default()
    });

    let err = h.pipeline.generate(&request(None)).await.unwrap_err();

    assert!(matches!(err, PipelineError::Parse(_)));
    assert_eq!(
        err.to_string(),
        "Could not get a valid storyboard from the AI's response. It may have been in an unexpected format."
    );
    assert!(workspace_is_empty(&h.work_dir));
}

#[tokio::test]
async fn test_render_failure_is_fatal() {
    let h = harness(Setup {
        fail_scene: Some(2),
        ..Setup::default()
    });

    let err = h.pipeline.generate(&request(None)).await.unwrap_err();

    match &err {
        PipelineError::RenderFailed { scene, .. } => assert_eq!(*scene, 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.ffmpeg_stderr(),
        Some("Invalid data found when processing input")
    );
    assert_eq!(h.renderer.jobs.lock().unwrap().len(), 2);
    assert!(h.concatenator.calls.lock().unwrap().is_empty());
    assert!(workspace_is_empty(&h.work_dir));
    assert!(workspace_is_empty(&h.public_dir));
}

#[tokio::test]
async fn test_blank_prompt_rejected() {
    let h = harness(Setup::default());
    let request = GenerateAdRequest {
        prompt: "   ".to_string(),
        options: AdOptions::default(),
    };

    let err = h.pipeline.generate(&request).await.unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(err.to_string(), "Request body must contain a 'prompt' field.");
}

#[tokio::test]
async fn test_duration_is_clamped() {
    let h = harness(Setup::default());

    h.pipeline.generate(&request(Some(600.0))).await.unwrap();

    let jobs = h.renderer.jobs.lock().unwrap();
    assert!(jobs.iter().all(|j| (j.duration_secs - 20.0).abs() < 1e-9));
}

#[tokio::test]
async fn test_default_duration() {
    let h = harness(Setup::default());

    h.pipeline.generate(&request(None)).await.unwrap();

    let jobs = h.renderer.jobs.lock().unwrap();
    assert!(jobs.iter().all(|j| (j.duration_secs - 5.0).abs() < 1e-9));
}

#[tokio::test]
async fn test_concat_failure_cleans_workspace() {
    let h = harness(Setup {
        fail_concat: true,
        ..Setup::default()
    });

    let err = h.pipeline.generate(&request(None)).await.unwrap_err();

    assert!(matches!(err, PipelineError::ConcatFailed(_)));
    assert_eq!(
        err.ffmpeg_stderr(),
        Some("filelist.txt: Invalid data found when processing input")
    );
    assert_eq!(h.renderer.jobs.lock().unwrap().len(), 3);
    assert_eq!(h.concatenator.calls.lock().unwrap().len(), 1);
    assert!(workspace_is_empty(&h.work_dir));
    assert!(workspace_is_empty(&h.public_dir));
}

#[tokio::test]
async fn test_publish_failure_cleans_workspace() {
    let h = harness(Setup {
        public_dir_is_file: true,
        ..Setup::default()
    });

    let err = h.pipeline.generate(&request(None)).await.unwrap_err();

    assert!(matches!(err, PipelineError::Publish(_)));
    assert!(!err.is_client_error());
    assert_eq!(h.concatenator.calls.lock().unwrap().len(), 1);
    assert!(workspace_is_empty(&h.work_dir));
    assert!(h.public_dir.is_file());
}

#[tokio::test]
async fn test_workspace_failure_stops_before_assets() {
    let h = harness(Setup {
        work_dir_is_file: true,
        ..Setup::default()
    });

    let err = h.pipeline.generate(&request(None)).await.unwrap_err();

    assert!(matches!(err, PipelineError::Workspace(_)));
    assert!(h.renderer.jobs.lock().unwrap().is_empty());
    assert!(h.concatenator.calls.lock().unwrap().is_empty());
    assert_eq!(std::fs::read(&h.work_dir).unwrap(), b"not a directory");
}
