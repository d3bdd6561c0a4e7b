//! Clients for the external services behind ad generation.
//!
//! Each service sits behind a trait so the pipeline can be driven by fakes:
//! - [`TextGenerator`]: storyboard text (Gemini)
//! - [`FootageSearch`]: stock video lookup (Pexels)
//! - [`SpeechSynthesizer`]: narration audio (ElevenLabs)

pub mod config;
pub mod elevenlabs;
pub mod error;
pub mod gemini;
pub mod pexels;

pub use config::ServicesConfig;
pub use elevenlabs::{ElevenLabsClient, SpeechSynthesizer};
pub use error::{decode_error_body, ServiceError, ServiceResult};
pub use gemini::{GeminiClient, TextGenerator};
pub use pexels::{pick_video_file, FootageSearch, PexelsClient, VideoFile};
