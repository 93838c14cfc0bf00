//! Item registry and stack-based inventories for the Agent Farm simulation.
//!
//! # Modules
//!
//! - [`registry`] -- Static item definitions, crop to harvest item mapping,
//!   and seed to crop mapping.
//! - [`inventory`] -- Capacity-parameterized stack operations used by both
//!   the storehouse and pawn bags.

pub mod inventory;
pub mod registry;

pub use inventory::InventoryResult;
pub use registry::{
    ItemDefinition, create_item_stack, crop_to_harvest_item, get_item, get_items_by_category,
    is_seed, seed_item, seed_to_crop,
};
