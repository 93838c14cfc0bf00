//! Efficiency scoring for the Agent Farm simulation.
//!
//! Agent task completions arrive as loosely-typed payloads from the host.
//! This crate normalizes them into a [`TaskResult`] with defaults applied,
//! and grades them against the farm's own rolling task history.
//!
//! # Modules
//!
//! - [`task`] -- Raw payload, normalization defaults, manual presets.
//! - [`scorer`] -- [`EfficiencyScorer`]: percentile grading and the
//!   rolling efficiency figure.

pub mod scorer;
pub mod task;

pub use scorer::{
    COLD_START_RECORDS, EFFICIENCY_WINDOW, EfficiencyScorer, NEUTRAL_EFFICIENCY, current_efficiency,
    grade_for_percentile, output_density, score,
};
pub use task::{RawTaskResult, TaskResult};
