//! Pipeline run identity and lifecycle.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique, time-derived identifier for one pipeline run.
///
/// Format: `run_<unix millis>_<8 hex chars>`. The random suffix keeps two
/// runs started in the same millisecond apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("run_{}_{}", millis, &suffix[..8]))
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Initialized,
    StoryboardReady,
    AssetsResolved,
    ScenesRendered,
    Concatenated,
    Published,
    Failed,
    CleanedUp,
}

/// Rejected state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid run state transition: {from} -> {to}")]
pub struct RunStateError {
    pub from: RunState,
    pub to: RunState,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Initialized => "initialized",
            RunState::StoryboardReady => "storyboard_ready",
            RunState::AssetsResolved => "assets_resolved",
            RunState::ScenesRendered => "scenes_rendered",
            RunState::Concatenated => "concatenated",
            RunState::Published => "published",
            RunState::Failed => "failed",
            RunState::CleanedUp => "cleaned_up",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::CleanedUp)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (*self, next),
            (Initialized, StoryboardReady)
                | (StoryboardReady, AssetsResolved)
                | (AssetsResolved, ScenesRendered)
                | (ScenesRendered, Concatenated)
                | (Concatenated, Published)
                | (Published | Failed, CleanedUp)
                | (
                    Initialized | StoryboardReady | AssetsResolved | ScenesRendered | Concatenated,
                    Failed
                )
        )
    }

    /// Move to `next`, rejecting illegal transitions.
    pub fn transition(self, next: RunState) -> Result<RunState, RunStateError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(RunStateError { from: self, to: next })
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
