//! Percentile-based efficiency grading.
//!
//! There is no access to agent-internal metrics, so the scorer uses output
//! density (characters per second) and ranks each new task against the
//! farm's own recent history. Ranking rather than fixed thresholds keeps the
//! grade calibrated to each user's normal pace.
//!
//! # Grading
//!
//! | Percentile | Grade |
//! |------------|-------|
//! | >= 90      | S     |
//! | >= 60      | A     |
//! | >= 30      | B     |
//! | < 30       | C     |
//!
//! Manual completions and cold starts (fewer than
//! [`COLD_START_RECORDS`] records) always grade B.

use agentfarm_types::{Grade, TaskHistory, TaskRecord};

use crate::task::TaskResult;

/// Records required before percentile grading kicks in.
pub const COLD_START_RECORDS: usize = 10;

/// Number of recent grades averaged into the efficiency figure.
pub const EFFICIENCY_WINDOW: usize = 10;

/// Efficiency reported before any task has been recorded.
pub const NEUTRAL_EFFICIENCY: f64 = 50.0;

/// Grades tasks against a borrowed task history.
///
/// The history is the engine's own `stats.task_history`; records added
/// through the scorer are immediately visible in the farm state.
#[derive(Debug)]
pub struct EfficiencyScorer<'h> {
    history: &'h mut TaskHistory,
}

impl<'h> EfficiencyScorer<'h> {
    /// Wrap a task history.
    pub fn new(history: &'h mut TaskHistory) -> Self {
        Self { history }
    }

    /// Grade a task result against the current history.
    pub fn score(&self, result: &TaskResult) -> Grade {
        score(self.history, result)
    }

    /// Rolling efficiency percentile, 0-100.
    pub fn current_efficiency(&self) -> f64 {
        current_efficiency(self.history)
    }

    /// Append a record, evicting the oldest beyond the window.
    pub fn add_record(&mut self, record: TaskRecord) {
        self.history.push(record);
    }

    /// The underlying history.
    pub fn history(&self) -> &TaskHistory {
        self.history
    }
}

/// Characters of output per second, with durations under a second
/// treated as one second.
#[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
pub fn output_density(output_length: u64, duration_ms: u64) -> f64 {
    let seconds = (duration_ms as f64 / 1000.0).max(1.0);
    output_length as f64 / seconds
}

/// Map a percentile (0-100) to a grade.
pub fn grade_for_percentile(percentile: f64) -> Grade {
    if percentile >= 90.0 {
        Grade::S
    } else if percentile >= 60.0 {
        Grade::A
    } else if percentile >= 30.0 {
        Grade::B
    } else {
        Grade::C
    }
}

/// Grade a task result against a history.
pub fn score(history: &TaskHistory, result: &TaskResult) -> Grade {
    if result.manual {
        return Grade::B;
    }
    if history.len() < COLD_START_RECORDS {
        return Grade::B;
    }

    let density = output_density(result.output_length, result.duration_ms);

    let mut historical: Vec<f64> = history
        .records()
        .iter()
        .filter(|record| record.duration > 0)
        .map(|record| output_density(record.output_length, record.duration))
        .collect();
    if historical.is_empty() {
        return Grade::B;
    }
    historical.sort_by(f64::total_cmp);

    let below = historical.partition_point(|d| *d < density);
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    let percentile = below as f64 / historical.len() as f64 * 100.0;

    let grade = grade_for_percentile(percentile);
    tracing::debug!(density, percentile, grade = ?grade, "task scored");
    grade
}

/// Average grade of the last [`EFFICIENCY_WINDOW`] records, normalized so
/// all-C is 0 and all-S is 100. Returns 50 for an empty history.
///
/// The value is not rounded: five C and five A give 33.33.
#[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
pub fn current_efficiency(history: &TaskHistory) -> f64 {
    let recent = history.recent(EFFICIENCY_WINDOW);
    if recent.is_empty() {
        return NEUTRAL_EFFICIENCY;
    }
    let total: u32 = recent.iter().map(|r| u32::from(r.grade.value())).sum();
    let average = f64::from(total) / recent.len() as f64;
    (average - 1.0) / 3.0 * 100.0
}
