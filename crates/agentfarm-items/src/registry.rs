//! Static item registry: every tradeable item kind, its stack limit, and
//! its sell value.
//!
//! The registry is immutable reference data. Lookups are side-effect free
//! and unknown ids simply return `None`; callers decide whether that is an
//! error. Crop species map to harvest item ids through a fixed table, with a
//! separate golden table that only covers some species.

use agentfarm_types::{CropType, ItemCategory, ItemStack};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Stack limit for seed packets.
pub const SEED_MAX_STACK: u32 = 99;

/// Stack limit for ordinary produce.
pub const CROP_MAX_STACK: u32 = 99;

/// Stack limit for golden produce.
pub const GOLDEN_MAX_STACK: u32 = 20;

/// Stack limit for tools.
pub const TOOL_MAX_STACK: u32 = 1;

/// Stack limit for farming supplies.
pub const RESOURCE_MAX_STACK: u32 = 50;

// ---------------------------------------------------------------------------
// ItemDefinition
// ---------------------------------------------------------------------------

/// Immutable definition of one item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    /// Registry key.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Broad category.
    pub category: ItemCategory,
    /// Maximum units per stack.
    pub max_stack: u32,
    /// Seed value when sold, if sellable.
    pub sell_value: Option<u32>,
    /// Flavor text.
    pub description: &'static str,
}

/// Every item known to the game, seeds first, then produce, golden produce,
/// tools, and supplies.
static ITEMS: &[ItemDefinition] = &[
    ItemDefinition {
        id: "turnip_seeds",
        name: "Turnip Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(2),
        description: "Plant on tilled soil to grow turnip.",
    },
    ItemDefinition {
        id: "potato_seeds",
        name: "Potato Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(3),
        description: "Plant on tilled soil to grow potato.",
    },
    ItemDefinition {
        id: "strawberry_seeds",
        name: "Strawberry Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(5),
        description: "Plant on tilled soil to grow strawberry.",
    },
    ItemDefinition {
        id: "cauliflower_seeds",
        name: "Cauliflower Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(7),
        description: "Plant on tilled soil to grow cauliflower.",
    },
    ItemDefinition {
        id: "tomato_seeds",
        name: "Tomato Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(4),
        description: "Plant on tilled soil to grow tomato.",
    },
    ItemDefinition {
        id: "corn_seeds",
        name: "Corn Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(3),
        description: "Plant on tilled soil to grow corn.",
    },
    ItemDefinition {
        id: "melon_seeds",
        name: "Melon Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(9),
        description: "Plant on tilled soil to grow melon.",
    },
    ItemDefinition {
        id: "blueberry_seeds",
        name: "Blueberry Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(5),
        description: "Plant on tilled soil to grow blueberry.",
    },
    ItemDefinition {
        id: "pumpkin_seeds",
        name: "Pumpkin Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(10),
        description: "Plant on tilled soil to grow pumpkin.",
    },
    ItemDefinition {
        id: "eggplant_seeds",
        name: "Eggplant Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(4),
        description: "Plant on tilled soil to grow eggplant.",
    },
    ItemDefinition {
        id: "cranberry_seeds",
        name: "Cranberry Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(5),
        description: "Plant on tilled soil to grow cranberry.",
    },
    ItemDefinition {
        id: "kale_seeds",
        name: "Kale Seeds",
        category: ItemCategory::Seed,
        max_stack: SEED_MAX_STACK,
        sell_value: Some(3),
        description: "Plant on tilled soil to grow kale.",
    },
    ItemDefinition {
        id: "turnip",
        name: "Turnip",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(5),
        description: "A crisp spring root that matures in a flash.",
    },
    ItemDefinition {
        id: "potato",
        name: "Potato",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(8),
        description: "A hearty tuber.",
    },
    ItemDefinition {
        id: "strawberry",
        name: "Strawberry",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(14),
        description: "Sweet berries that keep coming back.",
    },
    ItemDefinition {
        id: "cauliflower",
        name: "Cauliflower",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(22),
        description: "Slow to grow, prized at market.",
    },
    ItemDefinition {
        id: "tomato",
        name: "Tomato",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(12),
        description: "Summer fruit that regrows after picking.",
    },
    ItemDefinition {
        id: "corn",
        name: "Corn",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(10),
        description: "Tall stalks that last into fall.",
    },
    ItemDefinition {
        id: "melon",
        name: "Melon",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(28),
        description: "A juicy summer showpiece.",
    },
    ItemDefinition {
        id: "blueberry",
        name: "Blueberry",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(16),
        description: "Small summer berries that regrow.",
    },
    ItemDefinition {
        id: "pumpkin",
        name: "Pumpkin",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(32),
        description: "The pride of every fall harvest.",
    },
    ItemDefinition {
        id: "eggplant",
        name: "Eggplant",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(12),
        description: "A glossy fall vegetable that regrows.",
    },
    ItemDefinition {
        id: "cranberry",
        name: "Cranberry",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(15),
        description: "Tart fall berries that regrow.",
    },
    ItemDefinition {
        id: "kale",
        name: "Kale",
        category: ItemCategory::Crop,
        max_stack: CROP_MAX_STACK,
        sell_value: Some(7),
        description: "Hardy greens that shrug off the frost.",
    },
    ItemDefinition {
        id: "golden_turnip",
        name: "Golden Turnip",
        category: ItemCategory::GoldenCrop,
        max_stack: GOLDEN_MAX_STACK,
        sell_value: Some(15),
        description: "A shimmering turnip, grown only from perfect work.",
    },
    ItemDefinition {
        id: "golden_potato",
        name: "Golden Potato",
        category: ItemCategory::GoldenCrop,
        max_stack: GOLDEN_MAX_STACK,
        sell_value: Some(24),
        description: "A shimmering potato, grown only from perfect work.",
    },
    ItemDefinition {
        id: "golden_strawberry",
        name: "Golden Strawberry",
        category: ItemCategory::GoldenCrop,
        max_stack: GOLDEN_MAX_STACK,
        sell_value: Some(42),
        description: "A shimmering strawberry, grown only from perfect work.",
    },
    ItemDefinition {
        id: "golden_cauliflower",
        name: "Golden Cauliflower",
        category: ItemCategory::GoldenCrop,
        max_stack: GOLDEN_MAX_STACK,
        sell_value: Some(66),
        description: "A shimmering cauliflower, grown only from perfect work.",
    },
    ItemDefinition {
        id: "golden_melon",
        name: "Golden Melon",
        category: ItemCategory::GoldenCrop,
        max_stack: GOLDEN_MAX_STACK,
        sell_value: Some(84),
        description: "A shimmering melon, grown only from perfect work.",
    },
    ItemDefinition {
        id: "golden_pumpkin",
        name: "Golden Pumpkin",
        category: ItemCategory::GoldenCrop,
        max_stack: GOLDEN_MAX_STACK,
        sell_value: Some(96),
        description: "A shimmering pumpkin, grown only from perfect work.",
    },
    ItemDefinition {
        id: "hoe",
        name: "Hoe",
        category: ItemCategory::Tool,
        max_stack: TOOL_MAX_STACK,
        sell_value: None,
        description: "Turns empty ground into tilled soil.",
    },
    ItemDefinition {
        id: "watering_can",
        name: "Watering Can",
        category: ItemCategory::Tool,
        max_stack: TOOL_MAX_STACK,
        sell_value: None,
        description: "Keeps the seedlings happy.",
    },
    ItemDefinition {
        id: "fertilizer",
        name: "Fertilizer",
        category: ItemCategory::Resource,
        max_stack: RESOURCE_MAX_STACK,
        sell_value: Some(2),
        description: "Restores tired soil.",
    },
    ItemDefinition {
        id: "compost",
        name: "Compost",
        category: ItemCategory::Resource,
        max_stack: RESOURCE_MAX_STACK,
        sell_value: Some(1),
        description: "Rotting leftovers with a bright future.",
    },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Look up an item definition by id.
pub fn get_item(id: &str) -> Option<&'static ItemDefinition> {
    ITEMS.iter().find(|item| item.id == id)
}

/// Every definition in a category, in registry order.
pub fn get_items_by_category(category: ItemCategory) -> Vec<&'static ItemDefinition> {
    ITEMS.iter().filter(|item| item.category == category).collect()
}

/// Every registered definition.
pub fn all_items() -> &'static [ItemDefinition] {
    ITEMS
}

/// Harvest item id for a crop species.
///
/// Golden harvests use the golden variant when one is defined and fall back
/// to the plain crop id otherwise.
pub fn crop_to_harvest_item(crop: CropType, is_golden: bool) -> &'static str {
    if is_golden {
        golden_item(crop).unwrap_or_else(|| crop.id())
    } else {
        crop.id()
    }
}

/// Golden variant item id, for the species that have one.
pub const fn golden_item(crop: CropType) -> Option<&'static str> {
    match crop {
        CropType::Turnip => Some("golden_turnip"),
        CropType::Potato => Some("golden_potato"),
        CropType::Strawberry => Some("golden_strawberry"),
        CropType::Cauliflower => Some("golden_cauliflower"),
        CropType::Melon => Some("golden_melon"),
        CropType::Pumpkin => Some("golden_pumpkin"),
        CropType::Tomato
        | CropType::Corn
        | CropType::Blueberry
        | CropType::Eggplant
        | CropType::Cranberry
        | CropType::Kale => None,
    }
}

/// Seed item id for a crop species.
pub const fn seed_item(crop: CropType) -> &'static str {
    match crop {
        CropType::Turnip => "turnip_seeds",
        CropType::Potato => "potato_seeds",
        CropType::Strawberry => "strawberry_seeds",
        CropType::Cauliflower => "cauliflower_seeds",
        CropType::Tomato => "tomato_seeds",
        CropType::Corn => "corn_seeds",
        CropType::Melon => "melon_seeds",
        CropType::Blueberry => "blueberry_seeds",
        CropType::Pumpkin => "pumpkin_seeds",
        CropType::Eggplant => "eggplant_seeds",
        CropType::Cranberry => "cranberry_seeds",
        CropType::Kale => "kale_seeds",
    }
}

/// Crop species grown from a seed item, if the id is a seed.
pub fn seed_to_crop(seed_id: &str) -> Option<CropType> {
    CropType::ALL
        .into_iter()
        .find(|crop| seed_item(*crop) == seed_id)
}

/// Whether an item id names a seed packet.
pub fn is_seed(item_id: &str) -> bool {
    get_item(item_id).is_some_and(|item| item.category == ItemCategory::Seed)
}

/// Build a stack for a registered item.
///
/// Returns `None` for unknown ids. Negative quantities clamp to zero.
pub fn create_item_stack(id: &str, quantity: i64) -> Option<ItemStack> {
    let definition = get_item(id)?;
    let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
    Some(ItemStack {
        item_id: definition.id.to_owned(),
        quantity,
        max_stack: definition.max_stack,
    })
}
