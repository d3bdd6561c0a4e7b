//! Pipeline error types.

use thiserror::Error;

use adsnap_media::MediaError;

use crate::parser::ParseFailure;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Storyboard generation timed out after {0} seconds.")]
    UpstreamTimeout(u64),

    #[error("Storyboard generation failed: {0}")]
    UpstreamFailed(String),

    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("Could not create the run workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("No scenes could be rendered: stock footage was unavailable for every scene.")]
    NoRenderableScenes,

    #[error("Failed to render scene {scene}: {source}")]
    RenderFailed {
        scene: u32,
        #[source]
        source: MediaError,
    },

    #[error("Failed to assemble the final video: {0}")]
    ConcatFailed(#[source] MediaError),

    #[error("Failed to publish the final video: {0}")]
    Publish(#[source] MediaError),
}

impl PipelineError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn upstream_failed(msg: impl Into<String>) -> Self {
        Self::UpstreamFailed(msg.into())
    }

    pub fn render_failed(scene: u32, source: MediaError) -> Self {
        Self::RenderFailed { scene, source }
    }

    /// Short failure class, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidRequest(_) => "invalid_request",
            PipelineError::UpstreamTimeout(_) => "upstream_timeout",
            PipelineError::UpstreamFailed(_) => "upstream_failed",
            PipelineError::Parse(_) => "parse_failure",
            PipelineError::Workspace(_) => "workspace",
            PipelineError::NoRenderableScenes => "no_renderable_scenes",
            PipelineError::RenderFailed { .. } => "render_failed",
            PipelineError::ConcatFailed(_) => "concat_failed",
            PipelineError::Publish(_) => "publish_failed",
        }
    }

    /// Whether the caller, not the pipeline, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::InvalidRequest(_))
    }

    /// FFmpeg stderr attached to render and concat failures.
    pub fn ffmpeg_stderr(&self) -> Option<&str> {
        match self {
            PipelineError::RenderFailed { source, .. }
            | PipelineError::ConcatFailed(source)
            | PipelineError::Publish(source) => source.stderr(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(
            PipelineError::UpstreamTimeout(30).to_string(),
            "Storyboard generation timed out after 30 seconds."
        );
        let parse = PipelineError::from(ParseFailure {
            raw: "garbage".to_string(),
        });
        assert!(parse.to_string().starts_with("Could not get a valid storyboard"));
        assert!(!parse.to_string().contains("garbage"));
    }

    #[test]
    fn test_render_failure_exposes_stderr() {
        let err = PipelineError::render_failed(
            2,
            MediaError::ffmpeg_failed("exit 1", Some("No such filter: 'ass'".to_string()), Some(1)),
        );
        assert_eq!(err.kind(), "render_failed");
        assert_eq!(err.ffmpeg_stderr(), Some("No such filter: 'ass'"));
        assert!(err.to_string().starts_with("Failed to render scene 2"));
    }
}
