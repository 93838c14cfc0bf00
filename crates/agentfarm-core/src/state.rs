//! Fresh farm generation and repair of loaded state.
//!
//! A loaded document may come from an older build (no storehouse, no pawn
//! bags) or may have been edited by hand. [`heal_state`] brings any
//! deserialized [`FarmState`] back inside the engine's invariants before
//! the engine touches it.

use agentfarm_items::inventory;
use agentfarm_types::{
    Building, BuildingKind, CURRENT_STATE_VERSION, Economy, Farm, FarmState, FarmStats, ItemStack,
    MAX_SOIL_HEALTH, PAWN_MAX_SLOTS, Pawn, Player, Plot, PlotType, Position, STOREHOUSE_MAX_SLOTS,
    Season, Settings, Storehouse, TaskHistory,
};
use chrono::{DateTime, Utc};

use crate::config::FarmConfig;
use crate::crops;

/// Top-left corner and side of the tilled starter block.
const TILLED_ORIGIN: u32 = 2;
const TILLED_SIZE: u32 = 4;

/// Side of the square barn footprint in the top-left corner.
const BARN_SIZE: u32 = 2;

/// Turnip seeds stocked in a fresh storehouse.
const STARTER_TURNIP_SEEDS: u32 = 5;

/// Generate the starting farm described by `config`.
pub fn default_farm_state(config: &FarmConfig, now: DateTime<Utc>) -> FarmState {
    let width = config.farm.width;
    let height = config.farm.height;
    let last_row = height.saturating_sub(1);
    let last_col = width.saturating_sub(1);

    let tilled = TILLED_ORIGIN..TILLED_ORIGIN.saturating_add(TILLED_SIZE);

    let mut plots = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let plot_type = if x < BARN_SIZE && y < BARN_SIZE {
                PlotType::Building
            } else if x == last_col && y == last_row {
                PlotType::Water
            } else if y == last_row {
                PlotType::Path
            } else if tilled.contains(&x) && tilled.contains(&y) {
                PlotType::Tilled
            } else {
                PlotType::Empty
            };
            plots.push(Plot::new(x, y, plot_type));
        }
    }

    let mut storehouse = Storehouse::default();
    inventory::add_item(
        &mut storehouse.items,
        agentfarm_items::seed_item(agentfarm_types::CropType::Turnip),
        STARTER_TURNIP_SEEDS,
        storehouse.max_slots,
    );

    FarmState {
        version: CURRENT_STATE_VERSION,
        farm: Farm {
            width,
            height,
            plots,
            buildings: vec![Building {
                kind: BuildingKind::Barn,
                position: Position::new(0, 0),
                width: BARN_SIZE,
                height: BARN_SIZE,
            }],
        },
        pawns: Vec::new(),
        player: Player {
            position: Position::new(width / 2, last_row),
        },
        economy: Economy {
            seeds: config.farm.starting_seeds,
            total_earned: 0,
            total_spent: 0,
        },
        stats: FarmStats {
            task_history: TaskHistory::new(),
            total_tasks: 0,
            lifetime_efficiency: 50.0,
            current_season: Season::Spring,
            season_start_date: now,
            days_elapsed: 0,
        },
        settings: Settings {
            season_length_days: config.farm.season_length_days,
            day_night_cycle: config.display.day_night_cycle,
            particles: config.display.particles,
        },
        storehouse,
    }
}

/// Bring a loaded state back inside the engine's invariants.
///
/// Returns the number of repairs made. Each repair is logged at warn level.
pub fn heal_state(state: &mut FarmState) -> usize {
    let mut repairs = 0_usize;

    if state.storehouse.max_slots != STOREHOUSE_MAX_SLOTS {
        tracing::warn!(
            found = state.storehouse.max_slots,
            "storehouse capacity reset"
        );
        state.storehouse.max_slots = STOREHOUSE_MAX_SLOTS;
        repairs = repairs.saturating_add(1);
    }
    repairs = repairs.saturating_add(heal_stacks(&mut state.storehouse.items));

    for pawn in &mut state.pawns {
        repairs = repairs.saturating_add(heal_stacks(&mut pawn.inventory));
        repairs = repairs.saturating_add(unload_excess(pawn, &mut state.storehouse));
    }

    for plot in &mut state.farm.plots {
        repairs = repairs.saturating_add(heal_plot(plot));
    }

    let before = state.stats.task_history.len();
    state.stats.task_history.enforce_window();
    if state.stats.task_history.len() != before {
        tracing::warn!(before, "task history truncated");
        repairs = repairs.saturating_add(1);
    }

    if state.settings.season_length_days == 0 {
        state.settings.season_length_days = Settings::default().season_length_days;
        repairs = repairs.saturating_add(1);
    }

    if state.version != CURRENT_STATE_VERSION {
        tracing::info!(
            from = state.version,
            to = CURRENT_STATE_VERSION,
            "state document migrated"
        );
        state.version = CURRENT_STATE_VERSION;
    }

    repairs
}

/// Drop empty and unknown stacks, refresh each stack's limit from the
/// registry, and re-split overfull stacks. Unit totals are kept.
fn heal_stacks(items: &mut Vec<ItemStack>) -> usize {
    let before = items.len();
    items.retain(|stack| {
        stack.quantity > 0 && agentfarm_items::get_item(&stack.item_id).is_some()
    });
    let mut repairs = before.saturating_sub(items.len());

    let mut overfull = 0_usize;
    for stack in items.iter_mut() {
        let Some(definition) = agentfarm_items::get_item(&stack.item_id) else {
            continue;
        };
        if stack.max_stack != definition.max_stack {
            stack.max_stack = definition.max_stack;
            repairs = repairs.saturating_add(1);
        }
        if stack.quantity > stack.max_stack {
            overfull = overfull.saturating_add(1);
        }
    }

    if overfull > 0 {
        tracing::warn!(overfull, "overfull stacks split");
        inventory::compact(items);
        repairs = repairs.saturating_add(overfull);
    }
    repairs
}

/// Fit a pawn's bag back into its slot limit. Merging stacks comes first;
/// whatever still does not fit moves to the storehouse.
fn unload_excess(pawn: &mut Pawn, storehouse: &mut Storehouse) -> usize {
    if pawn.inventory.len() <= PAWN_MAX_SLOTS {
        return 0;
    }
    inventory::compact(&mut pawn.inventory);
    if pawn.inventory.len() <= PAWN_MAX_SLOTS {
        tracing::warn!(pawn_id = %pawn.id, "pawn bag over capacity, stacks merged");
        return 1;
    }

    let excess = pawn.inventory.split_off(PAWN_MAX_SLOTS);
    let mut moved = 0_u32;
    let mut lost = 0_u32;
    for stack in &excess {
        let result = inventory::add_item(
            &mut storehouse.items,
            &stack.item_id,
            stack.quantity,
            storehouse.max_slots,
        );
        moved = moved.saturating_add(result.processed);
        lost = lost.saturating_add(result.overflow);
    }

    tracing::warn!(
        pawn_id = %pawn.id,
        stacks = excess.len(),
        moved,
        "pawn bag over capacity, excess moved to storehouse"
    );
    if lost > 0 {
        tracing::warn!(pawn_id = %pawn.id, lost, "storehouse full, excess items lost");
    }
    1
}

/// Reconcile a plot with its crop. Returns the number of fields fixed.
fn heal_plot(plot: &mut Plot) -> usize {
    let mut repairs = 0_usize;

    match (plot.plot_type, plot.crop.is_some()) {
        (PlotType::Planted, false) => {
            tracing::warn!(x = plot.x, y = plot.y, "planted plot without crop reset to tilled");
            plot.plot_type = PlotType::Tilled;
            repairs = repairs.saturating_add(1);
        }
        (other, true) if other != PlotType::Planted => {
            tracing::warn!(x = plot.x, y = plot.y, "plot with crop marked planted");
            plot.plot_type = PlotType::Planted;
            repairs = repairs.saturating_add(1);
        }
        _ => {}
    }

    if let Some(crop) = plot.crop.as_mut() {
        let max_stages = crops::crop_info(crop.crop_type).max_stages;
        if crop.max_stages != max_stages {
            crop.max_stages = max_stages;
            repairs = repairs.saturating_add(1);
        }
        if crop.stage > crop.max_stages {
            crop.stage = crop.max_stages;
            repairs = repairs.saturating_add(1);
        }
        if crop.is_mature() && crop.tasks_until_next_stage != 0 {
            crop.tasks_until_next_stage = 0;
            repairs = repairs.saturating_add(1);
        }
    }

    if plot.soil_health > MAX_SOIL_HEALTH {
        plot.soil_health = MAX_SOIL_HEALTH;
        repairs = repairs.saturating_add(1);
    }

    repairs
}
