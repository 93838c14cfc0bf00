//! The JSON-lines protocol spoken on stdin and stdout.
//!
//! Each inbound line is one [`HostCommand`], tagged by `type`. Each outbound
//! line is one [`HostMessage`], tagged by `kind`:
//!
//! ```text
//! {"type":"agent-started","id":"term-3","processName":"claude"}
//! {"kind":"event","event":{"type":"pawn-spawned","pawn":{...},"reactivated":false}}
//! {"kind":"state","state":{...}}
//! ```

use agentfarm_scoring::RawTaskResult;
use agentfarm_types::{Complexity, CropType, FarmEvent, FarmState, PawnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seed kinds handed out by `withdraw-seeds` when the request names none.
pub const DEFAULT_SEED_KINDS: usize = 2;

const fn default_seed_kinds() -> usize {
    DEFAULT_SEED_KINDS
}

/// One inbound request from the process tracker or the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum HostCommand {
    /// An agent process started.
    AgentStarted {
        /// Session id of the agent.
        id: String,
        /// Name of the detected process.
        #[serde(default)]
        process_name: Option<String>,
        /// When the process was first seen.
        #[serde(default)]
        start_time: Option<DateTime<Utc>>,
    },
    /// An agent process finished a task.
    AgentCompleted {
        /// Session id of the agent.
        id: String,
        /// Name of the detected process.
        #[serde(default)]
        process_name: Option<String>,
        /// Whatever the tracker measured.
        #[serde(flatten)]
        result: RawTaskResult,
    },
    /// A completion triggered by hand.
    ManualComplete {
        /// Size preset.
        complexity: Complexity,
        /// Session to credit, if any.
        #[serde(default)]
        agent_id: Option<String>,
    },
    /// The player planted a crop with seed currency.
    Plant {
        /// Plot column.
        x: u32,
        /// Plot row.
        y: u32,
        /// Crop to plant.
        crop_type: CropType,
    },
    /// A commit or similar repository event.
    GitEvent,
    /// Hand a pawn seeds from the storehouse.
    WithdrawSeeds {
        /// Receiving pawn.
        pawn_id: PawnId,
        /// Most seed kinds to hand out.
        #[serde(default = "default_seed_kinds")]
        max_types: usize,
    },
    /// A pawn plants one seed from its bag.
    PlantSeed {
        /// Planting pawn.
        pawn_id: PawnId,
        /// Plot column.
        x: u32,
        /// Plot row.
        y: u32,
        /// Seed to use, else the first in the bag.
        #[serde(default)]
        seed_item: Option<String>,
    },
    /// A pawn empties its bag into the storehouse.
    DepositAll {
        /// Depositing pawn.
        pawn_id: PawnId,
    },
    /// Ask for the current state without changing it.
    Snapshot,
}

impl HostCommand {
    /// Wire name of the command, for logs and rejection replies.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AgentStarted { .. } => "agent-started",
            Self::AgentCompleted { .. } => "agent-completed",
            Self::ManualComplete { .. } => "manual-complete",
            Self::Plant { .. } => "plant",
            Self::GitEvent => "git-event",
            Self::WithdrawSeeds { .. } => "withdraw-seeds",
            Self::PlantSeed { .. } => "plant-seed",
            Self::DepositAll { .. } => "deposit-all",
            Self::Snapshot => "snapshot",
        }
    }
}

/// One outbound line.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HostMessage<'a> {
    /// A discrete engine notification.
    Event {
        /// The notification.
        event: &'a FarmEvent,
    },
    /// The full state after a mutation or on request.
    State {
        /// The current state.
        state: &'a FarmState,
    },
    /// A request the engine turned down.
    Rejected {
        /// Wire name of the rejected command.
        command: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl HostMessage<'_> {
    /// Encode as a single JSON line without the trailing newline.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
