//! Outbound notifications emitted by the farm engine.
//!
//! The renderer receives a full [`FarmState`](crate::FarmState) snapshot
//! after every mutation; these events carry the discrete "what just
//! happened" signal it uses for animations and toasts. Each variant wraps a
//! `*Details` struct so the payload shape is a named, exported type.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CropType, Grade, Season};
use crate::ids::PawnId;
use crate::structs::{ItemStack, Pawn, Position, Storehouse};

/// A discrete engine notification, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum FarmEvent {
    /// A pawn was created or reactivated for an agent session.
    PawnSpawned(PawnSpawnedDetails),
    /// A crop was planted (by the player, a pawn, or auto-planting).
    CropPlanted(CropPlantedDetails),
    /// One or more plots were harvested.
    CropsHarvested(CropsHarvestedDetails),
    /// The season rotated.
    SeasonChanged(SeasonChangedDetails),
    /// The storehouse contents changed.
    StorehouseUpdate(StorehouseUpdateDetails),
    /// A pawn's bag contents changed.
    PawnInventoryUpdate(PawnInventoryUpdateDetails),
    /// An agent task was scored and applied.
    TaskCompleted(TaskCompletedDetails),
}

/// Payload of [`FarmEvent::PawnSpawned`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PawnSpawnedDetails {
    /// The pawn after binding.
    pub pawn: Pawn,
    /// `true` when an idle pawn was reused rather than created.
    pub reactivated: bool,
}

/// Payload of [`FarmEvent::CropPlanted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CropPlantedDetails {
    /// Plot that was planted.
    pub position: Position,
    /// Species planted.
    pub crop_type: CropType,
    /// Quality fixed at planting.
    pub quality: Grade,
    /// Pawn that did the planting, if any.
    pub pawn_id: Option<PawnId>,
    /// Seeds deducted from the economy (zero for free plantings).
    pub cost: u64,
}

/// A single plot's harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HarvestRecord {
    /// Plot harvested.
    pub position: Position,
    /// Species harvested.
    pub crop_type: CropType,
    /// Item deposited into the storehouse.
    pub item_id: String,
    /// Units produced.
    pub quantity: u32,
    /// Units that did not fit in the storehouse.
    pub overflow: u32,
    /// Seed value credited to the economy.
    pub seeds_earned: u64,
    /// Quality of the harvested crop.
    pub quality: Grade,
    /// Whether the crop was golden.
    pub is_golden: bool,
    /// Whether the crop stays planted to regrow.
    pub regrows: bool,
}

/// Payload of [`FarmEvent::CropsHarvested`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CropsHarvestedDetails {
    /// Per-plot results.
    pub harvests: Vec<HarvestRecord>,
    /// Sum of seeds earned across all harvests.
    pub total_seeds: u64,
}

/// Payload of [`FarmEvent::SeasonChanged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SeasonChangedDetails {
    /// Season that ended.
    pub previous: Season,
    /// Season that began.
    pub season: Season,
    /// Plots whose crops wilted in the rotation.
    pub wilted: Vec<Position>,
}

/// Payload of [`FarmEvent::StorehouseUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct StorehouseUpdateDetails {
    /// Storehouse after the change.
    pub storehouse: Storehouse,
}

/// Payload of [`FarmEvent::PawnInventoryUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PawnInventoryUpdateDetails {
    /// Pawn whose bag changed.
    pub pawn_id: PawnId,
    /// Bag after the change.
    pub inventory: Vec<ItemStack>,
}

/// Payload of [`FarmEvent::TaskCompleted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TaskCompletedDetails {
    /// Host session that finished.
    pub agent_id: String,
    /// Pawn bound to that session, if one was found.
    pub pawn_id: Option<PawnId>,
    /// Grade awarded.
    pub grade: Grade,
    /// Growth actions applied to crops.
    pub actions_earned: u32,
    /// Seeds earned from harvests triggered by this task.
    pub seeds_earned: u64,
}
