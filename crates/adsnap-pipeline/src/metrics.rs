//! Pipeline metrics.

use metrics::{counter, histogram};

/// Metric names.
pub mod names {
    pub const RUNS_TOTAL: &str = "adsnap_pipeline_runs_total";
    pub const RUN_DURATION: &str = "adsnap_pipeline_run_duration_seconds";
    pub const STAGE_DURATION: &str = "adsnap_pipeline_stage_duration_seconds";
    pub const SCENES_DROPPED: &str = "adsnap_scenes_dropped_total";
    pub const ASSETS_UNAVAILABLE: &str = "adsnap_assets_unavailable_total";
}

/// Record a finished run. `outcome` is "published" or a failure class.
pub fn record_run(outcome: &'static str, duration_secs: f64) {
    counter!(names::RUNS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(names::RUN_DURATION, "outcome" => outcome).record(duration_secs);
}

pub fn record_stage(stage: &'static str, duration_secs: f64) {
    histogram!(names::STAGE_DURATION, "stage" => stage).record(duration_secs);
}

pub fn record_scene_dropped() {
    counter!(names::SCENES_DROPPED).increment(1);
}

/// `asset` is "video" or "narration".
pub fn record_asset_unavailable(asset: &'static str) {
    counter!(names::ASSETS_UNAVAILABLE, "asset" => asset).increment(1);
}
