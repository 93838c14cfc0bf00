//! Task result payloads and their normalization.
//!
//! The host forwards whatever its process tracker observed; any field may be
//! missing. [`RawTaskResult::normalize`] is the one place defaults are
//! applied, so nothing downstream deals with optional task data.

use agentfarm_types::Complexity;
use serde::{Deserialize, Serialize};

/// Duration assumed when the host did not measure one.
pub const DEFAULT_DURATION_MS: u64 = 5_000;

/// Output length assumed when the host did not capture one.
pub const DEFAULT_OUTPUT_LENGTH: u64 = 100;

/// Task completion as reported by the host, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTaskResult {
    /// Wall-clock duration in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,
    /// Process exit code.
    #[serde(default)]
    pub exit_code: Option<i32>,
    /// Characters of output produced.
    #[serde(default)]
    pub output_length: Option<u64>,
    /// Explicit success flag, overriding the exit code.
    #[serde(default)]
    pub success: Option<bool>,
    /// Set for completions triggered by hand rather than a live agent.
    #[serde(default)]
    pub manual: Option<bool>,
    /// Size preset for manual completions.
    #[serde(default)]
    pub complexity: Option<Complexity>,
}

/// A task completion with every default applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Characters of output produced.
    pub output_length: u64,
    /// Whether the task succeeded.
    pub success: bool,
    /// Process exit code, when one was reported.
    pub exit_code: Option<i32>,
    /// Manual completions bypass scoring.
    pub manual: bool,
    /// Size preset, for manual completions.
    pub complexity: Option<Complexity>,
}

impl TaskResult {
    /// A manual completion using the preset for `complexity`.
    pub const fn manual(complexity: Complexity) -> Self {
        let (duration_ms, output_length) = preset(complexity);
        Self {
            duration_ms,
            output_length,
            success: true,
            exit_code: None,
            manual: true,
            complexity: Some(complexity),
        }
    }
}

impl Default for TaskResult {
    fn default() -> Self {
        RawTaskResult::default().normalize()
    }
}

impl RawTaskResult {
    /// Apply defaults: complexity presets first, then the fixed fallbacks.
    /// Success follows the exit code unless explicitly given.
    pub fn normalize(&self) -> TaskResult {
        let preset = self.complexity.map(preset);
        let duration_ms = self
            .duration
            .or_else(|| preset.map(|(duration, _)| duration))
            .unwrap_or(DEFAULT_DURATION_MS);
        let output_length = self
            .output_length
            .or_else(|| preset.map(|(_, output)| output))
            .unwrap_or(DEFAULT_OUTPUT_LENGTH);
        let success = self
            .success
            .unwrap_or_else(|| self.exit_code.is_none_or(|code| code == 0));

        TaskResult {
            duration_ms,
            output_length,
            success,
            exit_code: self.exit_code,
            manual: self.manual.unwrap_or(false),
            complexity: self.complexity,
        }
    }
}

/// `(duration_ms, output_length)` preset for a manual completion size.
pub const fn preset(complexity: Complexity) -> (u64, u64) {
    match complexity {
        Complexity::Small => (30_000, 800),
        Complexity::Medium => (120_000, 3_000),
        Complexity::Large => (300_000, 8_000),
    }
}
