//! Shared type definitions for the Agent Farm simulation.
//!
//! This crate is the single source of truth for the farm's data model. The
//! persisted state document, the snapshots streamed to the browser renderer,
//! and the engine's event payloads are all defined here. Types flow to
//! `TypeScript` via `ts-rs` for the renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for pawn identities
//! - [`enums`] -- Seasons, grades, moods, plot and crop kinds
//! - [`structs`] -- `FarmState` and everything nested in it
//! - [`events`] -- Outbound engine notifications

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    BuildingKind, Complexity, CropType, FactionColor, Grade, ItemCategory, Mood, PawnState,
    PlotType, Season,
};
pub use events::{
    CropPlantedDetails, CropsHarvestedDetails, FarmEvent, HarvestRecord,
    PawnInventoryUpdateDetails, PawnSpawnedDetails, SeasonChangedDetails,
    StorehouseUpdateDetails, TaskCompletedDetails,
};
pub use ids::PawnId;
pub use structs::{
    Building, CURRENT_STATE_VERSION, Crop, DEFAULT_SOIL_HEALTH, Economy, Farm, FarmState,
    FarmStats, ItemStack, MAX_SOIL_HEALTH, MAX_TASK_HISTORY, PAWN_MAX_SLOTS, Pawn, Player, Plot,
    Position, STOREHOUSE_MAX_SLOTS, Settings, Storehouse, TaskHistory, TaskRecord,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the renderer.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::PawnId::export_all();

        let _ = crate::enums::Season::export_all();
        let _ = crate::enums::Grade::export_all();
        let _ = crate::enums::Mood::export_all();
        let _ = crate::enums::PawnState::export_all();
        let _ = crate::enums::FactionColor::export_all();
        let _ = crate::enums::PlotType::export_all();
        let _ = crate::enums::BuildingKind::export_all();
        let _ = crate::enums::CropType::export_all();
        let _ = crate::enums::ItemCategory::export_all();
        let _ = crate::enums::Complexity::export_all();

        let _ = crate::structs::FarmState::export_all();

        let _ = crate::events::FarmEvent::export_all();
    }
}
