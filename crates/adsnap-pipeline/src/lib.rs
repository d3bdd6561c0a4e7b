//! Ad generation pipeline.
//!
//! This crate provides:
//! - Storyboard prompting and parsing
//! - Per-scene asset resolution (stock footage, narration)
//! - Sequential scene rendering and concatenation
//! - Run-scoped workspaces, logging and metrics

pub mod assets;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod workspace;

pub use assets::AssetResolver;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use parser::{parse_storyboard, ParseFailure};
pub use pipeline::{AdPipeline, Collaborators};
pub use workspace::Workspace;
