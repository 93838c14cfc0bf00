//! Deferred state transitions.
//!
//! Some engine effects land a few seconds after the event that caused them:
//! a pawn unbinds from its agent session after finishing a task, and an
//! auto-planting pawn returns to idle after its work animation. Each
//! deferred effect is queued here with the identity it was scheduled for.
//! The engine re-checks that identity when the task comes due and drops the
//! task if the pawn has moved on; there is no other cancellation.
//!
//! Tasks are ordered by `(due_at, seq)`. `seq` is a monotonically
//! increasing insertion counter, so tasks with the same deadline run in the
//! order they were scheduled.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use agentfarm_types::{PawnId, Position};
use chrono::{DateTime, Utc};

/// A state transition to apply later, with the identity it must still match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    /// Clear the pawn's session binding and return it to idle, but only if
    /// it is still bound to `session_id`.
    UnbindPawn {
        /// Pawn to release.
        pawn_id: PawnId,
        /// Session the pawn was bound to when the task was scheduled.
        session_id: String,
    },
    /// End an auto-planting work animation, but only if the pawn is still
    /// assigned to `plot` and unbound.
    FinishWork {
        /// Pawn doing the work.
        pawn_id: PawnId,
        /// Plot it was sent to.
        plot: Position,
    },
}

/// A queued deferred action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    /// When the action becomes due.
    pub due_at: DateTime<Utc>,
    /// Insertion order, for FIFO among equal deadlines.
    pub seq: u64,
    /// What to do.
    pub action: DeferredAction,
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_at
            .cmp(&other.due_at)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap of deferred actions.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    queue: BinaryHeap<Reverse<ScheduledTask>>,
    next_seq: u64,
}

impl TaskScheduler {
    /// An empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run at `due_at`.
    pub fn schedule(&mut self, due_at: DateTime<Utc>, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.push(Reverse(ScheduledTask {
            due_at,
            seq,
            action,
        }));
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Vec<ScheduledTask> {
        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|Reverse(task)| task.due_at <= now) {
            if let Some(Reverse(task)) = self.queue.pop() {
                due.push(task);
            }
        }
        due
    }

    /// Deadline of the earliest pending task.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.queue.peek().map(|Reverse(task)| task.due_at)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn unbind(session: &str) -> DeferredAction {
        DeferredAction::UnbindPawn {
            pawn_id: PawnId::new(),
            session_id: session.to_owned(),
        }
    }

    #[test]
    fn pops_only_due_tasks_in_deadline_order() {
        let now = Utc::now();
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(now + Duration::seconds(5), unbind("late"));
        scheduler.schedule(now + Duration::seconds(1), unbind("early"));
        scheduler.schedule(now + Duration::seconds(3), unbind("middle"));

        let due = scheduler.pop_due(now + Duration::seconds(3));
        let sessions: Vec<_> = due
            .iter()
            .filter_map(|t| match &t.action {
                DeferredAction::UnbindPawn { session_id, .. } => Some(session_id.as_str()),
                DeferredAction::FinishWork { .. } => None,
            })
            .collect();
        assert_eq!(sessions, vec!["early", "middle"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(now + Duration::seconds(5)));
    }

    #[test]
    fn equal_deadlines_run_fifo() {
        let now = Utc::now();
        let mut scheduler = TaskScheduler::new();
        for name in ["a", "b", "c"] {
            scheduler.schedule(now, unbind(name));
        }
        let seqs: Vec<u64> = scheduler.pop_due(now).iter().map(|t| t.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn nothing_due_before_deadline() {
        let now = Utc::now();
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(now + Duration::seconds(2), unbind("x"));
        assert!(scheduler.pop_due(now).is_empty());
        assert_eq!(scheduler.len(), 1);
    }
}
