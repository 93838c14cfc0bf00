//! Core entity structs for the Agent Farm simulation.
//!
//! [`FarmState`] is the root aggregate. It is serialized wholesale to the
//! persistence file and to the renderer, so every struct here uses
//! `camelCase` field names on the wire. Fields introduced after the first
//! schema version carry `#[serde(default)]` so older documents still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    BuildingKind, CropType, FactionColor, Grade, Mood, PawnState, PlotType, Season,
};
use crate::ids::PawnId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Schema version written by this build.
pub const CURRENT_STATE_VERSION: u32 = 2;

/// Slot capacity of the shared storehouse.
pub const STOREHOUSE_MAX_SLOTS: usize = 256;

/// Slot capacity of a pawn's bag.
pub const PAWN_MAX_SLOTS: usize = 5;

/// Number of task records retained for scoring.
pub const MAX_TASK_HISTORY: usize = 50;

/// Soil health of freshly generated plots.
pub const DEFAULT_SOIL_HEALTH: u8 = 80;

/// Upper bound of soil health.
pub const MAX_SOIL_HEALTH: u8 = 100;

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A grid position in farm coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Position {
    /// Construct a position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A quantity of one item kind.
///
/// Invariant: `0 < quantity <= max_stack`. Stacks that reach zero are
/// removed from their container rather than left as placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ItemStack {
    /// Registry id of the item.
    pub item_id: String,
    /// Units held in this stack.
    pub quantity: u32,
    /// Stack limit copied from the item definition.
    pub max_stack: u32,
}

/// The shared farm inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Storehouse {
    /// Stacks in insertion order.
    #[serde(default)]
    pub items: Vec<ItemStack>,
    /// Slot capacity.
    #[serde(default = "default_storehouse_slots")]
    pub max_slots: usize,
}

impl Default for Storehouse {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            max_slots: STOREHOUSE_MAX_SLOTS,
        }
    }
}

const fn default_storehouse_slots() -> usize {
    STOREHOUSE_MAX_SLOTS
}

// ---------------------------------------------------------------------------
// Farm layout
// ---------------------------------------------------------------------------

/// A crop growing on a planted plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Crop {
    /// Species.
    #[serde(rename = "type")]
    pub crop_type: CropType,
    /// Current growth stage, `0..=max_stages`.
    pub stage: u32,
    /// Stage at which the crop is harvestable.
    pub max_stages: u32,
    /// Quality fixed at planting time.
    pub quality: Grade,
    /// Rare golden variant, only rolled for S quality at maturity.
    #[serde(default)]
    pub is_golden: bool,
    /// Countdown of task actions until the next stage.
    pub tasks_until_next_stage: i32,
}

impl Crop {
    /// Whether the crop has reached its final stage.
    pub const fn is_mature(&self) -> bool {
        self.stage >= self.max_stages
    }
}

/// One grid cell of the farm.
///
/// Invariant: `crop.is_some()` if and only if `plot_type == Planted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Plot {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// What occupies the cell.
    #[serde(rename = "type")]
    pub plot_type: PlotType,
    /// The crop, present only on planted plots.
    #[serde(default)]
    pub crop: Option<Crop>,
    /// Soil health, 0-100.
    #[serde(default = "default_soil_health")]
    pub soil_health: u8,
}

impl Plot {
    /// A fresh plot of the given type with default soil.
    pub const fn new(x: u32, y: u32, plot_type: PlotType) -> Self {
        Self {
            x,
            y,
            plot_type,
            crop: None,
            soil_health: DEFAULT_SOIL_HEALTH,
        }
    }

    /// Grid position of this plot.
    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

const fn default_soil_health() -> u8 {
    DEFAULT_SOIL_HEALTH
}

/// A building footprint on the farm grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Building {
    /// What the building is.
    pub kind: BuildingKind,
    /// Top-left corner.
    pub position: Position,
    /// Footprint width in cells.
    pub width: u32,
    /// Footprint height in cells.
    pub height: u32,
}

/// Grid dimensions, plots, and buildings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Farm {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Every cell, row-major.
    pub plots: Vec<Plot>,
    /// Building footprints.
    #[serde(default)]
    pub buildings: Vec<Building>,
}

impl Farm {
    /// Look up a plot by coordinates.
    pub fn plot(&self, x: u32, y: u32) -> Option<&Plot> {
        self.plots.iter().find(|p| p.x == x && p.y == y)
    }

    /// Mutable lookup of a plot by coordinates.
    pub fn plot_mut(&mut self, x: u32, y: u32) -> Option<&mut Plot> {
        self.plots.iter_mut().find(|p| p.x == x && p.y == y)
    }

    /// Position of the barn, if one exists.
    pub fn barn_position(&self) -> Option<Position> {
        self.buildings
            .iter()
            .find(|b| b.kind == BuildingKind::Barn)
            .map(|b| b.position)
    }
}

// ---------------------------------------------------------------------------
// Pawns and player
// ---------------------------------------------------------------------------

/// A farm worker representing one AI agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Pawn {
    /// Stable identity.
    pub id: PawnId,
    /// Unique display name.
    pub name: String,
    /// Team color.
    pub faction_color: FactionColor,
    /// Mood from the most recent grade.
    pub mood: Mood,
    /// Numeric mood score.
    pub mood_score: u8,
    /// Current activity.
    pub state: PawnState,
    /// Grid position.
    pub position: Position,
    /// Plot the pawn is working, if any.
    #[serde(default)]
    pub assigned_plot: Option<Position>,
    /// Host session this pawn is bound to while its agent runs.
    #[serde(default)]
    pub agent_session_id: Option<String>,
    /// Bag contents, at most [`PAWN_MAX_SLOTS`] stacks.
    #[serde(default)]
    pub inventory: Vec<ItemStack>,
    /// Tasks completed by this pawn.
    #[serde(default)]
    pub total_tasks: u64,
    /// Efficiency percentile shown on the pawn card.
    #[serde(default = "default_efficiency")]
    pub lifetime_efficiency: f64,
}

impl Pawn {
    /// Whether the pawn is free for reuse or auto-planting.
    pub const fn is_available(&self) -> bool {
        matches!(self.state, PawnState::Idle) && self.agent_session_id.is_none()
    }
}

/// The player avatar. Not simulated beyond its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Grid position.
    pub position: Position,
}

// ---------------------------------------------------------------------------
// Economy and statistics
// ---------------------------------------------------------------------------

/// Seed currency counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Economy {
    /// Spendable balance.
    pub seeds: u64,
    /// Lifetime income.
    pub total_earned: u64,
    /// Lifetime spending.
    pub total_spent: u64,
}

/// One completed task, as fed to the efficiency scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TaskRecord {
    /// When the task finished.
    pub timestamp: DateTime<Utc>,
    /// Task duration in milliseconds.
    pub duration: u64,
    /// Characters of output the agent produced.
    pub output_length: u64,
    /// Grade awarded.
    pub grade: Grade,
    /// Growth actions earned.
    pub actions_earned: u32,
}

/// Rolling window of the most recent [`MAX_TASK_HISTORY`] task records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct TaskHistory(Vec<TaskRecord>);

impl TaskHistory {
    /// An empty history.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a record, dropping the oldest entries beyond the window.
    pub fn push(&mut self, record: TaskRecord) {
        self.0.push(record);
        self.enforce_window();
    }

    /// Drop the oldest records until the window bound holds.
    pub fn enforce_window(&mut self) {
        let excess = self.0.len().saturating_sub(MAX_TASK_HISTORY);
        if excess > 0 {
            self.0.drain(..excess);
        }
    }

    /// Number of retained records.
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no records are retained.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Records from oldest to newest.
    pub fn records(&self) -> &[TaskRecord] {
        &self.0
    }

    /// The newest `count` records (fewer if the window is shorter).
    pub fn recent(&self, count: usize) -> &[TaskRecord] {
        let start = self.0.len().saturating_sub(count);
        self.0.get(start..).unwrap_or(&[])
    }
}

impl From<Vec<TaskRecord>> for TaskHistory {
    fn from(records: Vec<TaskRecord>) -> Self {
        let mut history = Self(records);
        history.enforce_window();
        history
    }
}

/// Task history, efficiency, and calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FarmStats {
    /// Rolling task window.
    #[serde(default)]
    pub task_history: TaskHistory,
    /// Lifetime task counter.
    #[serde(default)]
    pub total_tasks: u64,
    /// Rolling efficiency percentile, 0-100.
    #[serde(default = "default_efficiency")]
    pub lifetime_efficiency: f64,
    /// Active season.
    pub current_season: Season,
    /// When the active season began.
    pub season_start_date: DateTime<Utc>,
    /// Whole days elapsed in the active season.
    #[serde(default)]
    pub days_elapsed: u32,
}

const fn default_efficiency() -> f64 {
    50.0
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Settings {
    /// Days per season.
    #[serde(default = "default_season_length")]
    pub season_length_days: u32,
    /// Renderer day/night overlay toggle.
    #[serde(default = "default_true")]
    pub day_night_cycle: bool,
    /// Renderer particle effects toggle.
    #[serde(default = "default_true")]
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            season_length_days: default_season_length(),
            day_night_cycle: true,
            particles: true,
        }
    }
}

const fn default_season_length() -> u32 {
    7
}

const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// FarmState
// ---------------------------------------------------------------------------

/// The complete simulation state.
///
/// Owned exclusively by the farm engine; everything else sees snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FarmState {
    /// Schema version of the document.
    #[serde(default)]
    pub version: u32,
    /// Grid, plots, and buildings.
    pub farm: Farm,
    /// Every pawn ever created.
    #[serde(default)]
    pub pawns: Vec<Pawn>,
    /// Player avatar.
    pub player: Player,
    /// Seed currency.
    #[serde(default)]
    pub economy: Economy,
    /// History and calendar.
    pub stats: FarmStats,
    /// User settings.
    #[serde(default)]
    pub settings: Settings,
    /// Shared inventory.
    #[serde(default)]
    pub storehouse: Storehouse,
}

impl FarmState {
    /// Look up a pawn by id.
    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.pawns.iter().find(|p| p.id == id)
    }

    /// Mutable lookup of a pawn by id.
    pub fn pawn_mut(&mut self, id: PawnId) -> Option<&mut Pawn> {
        self.pawns.iter_mut().find(|p| p.id == id)
    }

    /// The pawn currently bound to an agent session.
    pub fn pawn_by_session(&self, session_id: &str) -> Option<&Pawn> {
        self.pawns
            .iter()
            .find(|p| p.agent_session_id.as_deref() == Some(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: u64) -> TaskRecord {
        TaskRecord {
            timestamp: Utc::now(),
            duration: n,
            output_length: 100,
            grade: Grade::B,
            actions_earned: 1,
        }
    }

    #[test]
    fn history_window_drops_oldest() {
        let mut history = TaskHistory::new();
        for n in 0..60 {
            history.push(record(n));
        }
        assert_eq!(history.len(), MAX_TASK_HISTORY);
        assert_eq!(history.records().first().map(|r| r.duration), Some(10));
        assert_eq!(history.records().last().map(|r| r.duration), Some(59));
    }

    #[test]
    fn recent_returns_newest() {
        let history = TaskHistory::from((0..5).map(record).collect::<Vec<_>>());
        let recent: Vec<u64> = history.recent(3).iter().map(|r| r.duration).collect();
        assert_eq!(recent, vec![2, 3, 4]);
        assert_eq!(history.recent(10).len(), 5);
    }

    #[test]
    fn from_vec_enforces_window() {
        let history = TaskHistory::from((0..80).map(record).collect::<Vec<_>>());
        assert_eq!(history.len(), MAX_TASK_HISTORY);
    }

    #[test]
    fn plot_serializes_type_field() {
        let plot = Plot::new(1, 2, PlotType::Tilled);
        let json = serde_json::to_value(&plot).unwrap_or_default();
        assert_eq!(json["type"], "tilled");
        assert_eq!(json["soilHealth"], 80);
        assert!(json["crop"].is_null());
    }

    #[test]
    fn storehouse_defaults_when_missing_fields() {
        let store: Storehouse = serde_json::from_str("{}").unwrap_or_default();
        assert_eq!(store.max_slots, STOREHOUSE_MAX_SLOTS);
        assert!(store.items.is_empty());
    }
}
