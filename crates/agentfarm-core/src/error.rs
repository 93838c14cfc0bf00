//! Error types for farm engine operations.
//!
//! Every rejected operation maps to one [`FarmError`] variant. The engine's
//! `try_*` methods return these; the boolean-returning wrappers log them at
//! debug level and report `false` instead.

use agentfarm_types::{CropType, PawnId, PlotType, Season};

/// Reasons a farm engine operation can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FarmError {
    /// No plot exists at the coordinates.
    #[error("no plot at ({x}, {y})")]
    PlotNotFound {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },

    /// The plot is not tilled soil.
    #[error("plot ({x}, {y}) is {actual:?}, not tilled")]
    PlotNotTilled {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
        /// What the plot currently is.
        actual: PlotType,
    },

    /// The crop cannot grow in the current season.
    #[error("{crop} cannot be planted in {season}")]
    OutOfSeason {
        /// Requested crop.
        crop: CropType,
        /// Active season.
        season: Season,
    },

    /// The seed balance does not cover the cost.
    #[error("insufficient seeds: need {required}, have {available}")]
    InsufficientSeeds {
        /// Cost of the planting.
        required: u64,
        /// Current balance.
        available: u64,
    },

    /// The item id is not in the registry.
    #[error("unknown item: {item_id}")]
    UnknownItem {
        /// The rejected id.
        item_id: String,
    },

    /// No pawn has the given id.
    #[error("unknown pawn: {pawn_id}")]
    UnknownPawn {
        /// The rejected id.
        pawn_id: PawnId,
    },

    /// The pawn's bag holds no matching seed.
    #[error("pawn {pawn_id} carries no usable seed")]
    NoSeedInBag {
        /// The pawn searched.
        pawn_id: PawnId,
    },

    /// The item is not a seed that maps to a crop.
    #[error("{item_id} is not a plantable seed")]
    UnknownSeedType {
        /// The rejected id.
        item_id: String,
    },

    /// The destination inventory cannot hold the items.
    #[error("no space for {quantity} x {item_id}")]
    NoSpace {
        /// Item that did not fit.
        item_id: String,
        /// Units requested.
        quantity: u32,
    },
}
