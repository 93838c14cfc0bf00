//! Stack-based inventory operations shared by the storehouse and pawn bags.
//!
//! An inventory is a plain list of [`ItemStack`] values. Every operation is
//! parameterized by the container's slot capacity and consults the item
//! registry for per-item stack limits, so the same code serves a 5-slot
//! pawn bag and the 256-slot storehouse.
//!
//! Invariants maintained by every mutating function:
//!
//! - Each stack holds `0 < quantity <= max_stack` units.
//! - Empty stacks are removed immediately.
//! - No more than `max_slots` stacks are created by `add_item`.
//!
//! Operations report partial success through [`InventoryResult`] instead of
//! erroring; a short add or remove is data the caller acts on.

use std::collections::BTreeMap;

use agentfarm_types::ItemStack;
use serde::Serialize;

use crate::registry;

// ---------------------------------------------------------------------------
// InventoryResult
// ---------------------------------------------------------------------------

/// Outcome of an add, remove, or transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InventoryResult {
    /// `true` only if the full requested quantity was handled.
    pub success: bool,
    /// Units actually added, removed, or moved.
    pub processed: u32,
    /// Units that could not be handled.
    pub overflow: u32,
}

impl InventoryResult {
    /// Everything requested was handled.
    pub const fn complete(processed: u32) -> Self {
        Self {
            success: true,
            processed,
            overflow: 0,
        }
    }

    /// Nothing was handled.
    pub const fn rejected(requested: u32) -> Self {
        Self {
            success: false,
            processed: 0,
            overflow: requested,
        }
    }

    /// Whether any units were handled at all.
    pub const fn moved_any(&self) -> bool {
        self.processed > 0
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Add `quantity` units of `item_id`.
///
/// Tops up existing stacks of the same item first, in list order, then opens
/// new stacks (each at most the item's `max_stack`) while slots remain.
/// Unknown items add nothing. A zero quantity is a successful no-op.
pub fn add_item(
    inventory: &mut Vec<ItemStack>,
    item_id: &str,
    quantity: u32,
    max_slots: usize,
) -> InventoryResult {
    if quantity == 0 {
        return InventoryResult::complete(0);
    }
    let Some(definition) = registry::get_item(item_id) else {
        tracing::debug!(item_id, quantity, "add_item rejected: unknown item");
        return InventoryResult::rejected(quantity);
    };

    let mut remaining = quantity;

    for stack in inventory.iter_mut().filter(|s| s.item_id == item_id) {
        if remaining == 0 {
            break;
        }
        let room = stack.max_stack.saturating_sub(stack.quantity);
        let moved = room.min(remaining);
        stack.quantity = stack.quantity.saturating_add(moved);
        remaining = remaining.saturating_sub(moved);
    }

    while remaining > 0 && inventory.len() < max_slots {
        let size = remaining.min(definition.max_stack.max(1));
        inventory.push(ItemStack {
            item_id: definition.id.to_owned(),
            quantity: size,
            max_stack: definition.max_stack,
        });
        remaining = remaining.saturating_sub(size);
    }

    InventoryResult {
        success: remaining == 0,
        processed: quantity.saturating_sub(remaining),
        overflow: remaining,
    }
}

/// Remove up to `quantity` units of `item_id`.
///
/// Consumes from the last matching stack backwards, deleting stacks that
/// reach zero. A short remove is not rolled back: whatever could be removed
/// stays removed and `success` is `false`.
pub fn remove_item(
    inventory: &mut Vec<ItemStack>,
    item_id: &str,
    quantity: u32,
) -> InventoryResult {
    if quantity == 0 {
        return InventoryResult::complete(0);
    }

    let mut remaining = quantity;
    for index in (0..inventory.len()).rev() {
        if remaining == 0 {
            break;
        }
        let Some(stack) = inventory.get_mut(index) else {
            continue;
        };
        if stack.item_id != item_id {
            continue;
        }
        let taken = stack.quantity.min(remaining);
        stack.quantity = stack.quantity.saturating_sub(taken);
        remaining = remaining.saturating_sub(taken);
        if stack.quantity == 0 {
            inventory.remove(index);
        }
    }

    InventoryResult {
        success: remaining == 0,
        processed: quantity.saturating_sub(remaining),
        overflow: remaining,
    }
}

/// Move up to `quantity` units of `item_id` from one inventory to another.
///
/// The amount is clamped to what the source holds. Destination space is
/// checked before anything moves; if the add still comes up short, the
/// partial add is undone and the source is refilled, so a failed transfer
/// leaves both sides as they were. On success `processed` is the clamped
/// amount and `overflow` is whatever the source could not supply.
pub fn transfer(
    from: &mut Vec<ItemStack>,
    to: &mut Vec<ItemStack>,
    item_id: &str,
    quantity: u32,
    to_max_slots: usize,
) -> InventoryResult {
    if quantity == 0 {
        return InventoryResult::complete(0);
    }

    let amount = quantity.min(get_count(from, item_id));
    if amount == 0 {
        return InventoryResult::rejected(quantity);
    }
    if !has_space(to, item_id, amount, to_max_slots) {
        tracing::debug!(item_id, amount, "transfer rejected: destination full");
        return InventoryResult::rejected(quantity);
    }

    let removed = remove_item(from, item_id, amount);
    if !removed.success {
        add_item(from, item_id, removed.processed, usize::MAX);
        return InventoryResult::rejected(quantity);
    }

    let added = add_item(to, item_id, amount, to_max_slots);
    if !added.success {
        remove_item(to, item_id, added.processed);
        add_item(from, item_id, amount, usize::MAX);
        tracing::warn!(item_id, amount, "transfer rolled back after short add");
        return InventoryResult::rejected(quantity);
    }

    InventoryResult {
        success: true,
        processed: amount,
        overflow: quantity.saturating_sub(amount),
    }
}

/// Merge stacks of the same item into as few full stacks as possible.
///
/// Item order follows first appearance. Stacks of unknown items are dropped.
pub fn compact(inventory: &mut Vec<ItemStack>) {
    let mut order: Vec<&'static registry::ItemDefinition> = Vec::new();
    let mut totals: BTreeMap<&'static str, u64> = BTreeMap::new();

    for stack in inventory.iter() {
        let Some(definition) = registry::get_item(&stack.item_id) else {
            tracing::debug!(item_id = %stack.item_id, "compact dropped unknown item");
            continue;
        };
        let total = totals.entry(definition.id).or_insert_with(|| {
            order.push(definition);
            0
        });
        *total = total.saturating_add(u64::from(stack.quantity));
    }

    let mut rebuilt = Vec::with_capacity(inventory.len());
    for definition in order {
        let max_stack = u64::from(definition.max_stack.max(1));
        let mut remaining = totals.get(definition.id).copied().unwrap_or(0);
        while remaining > 0 {
            let size = remaining.min(max_stack);
            rebuilt.push(ItemStack {
                item_id: definition.id.to_owned(),
                quantity: u32::try_from(size).unwrap_or(definition.max_stack),
                max_stack: definition.max_stack,
            });
            remaining = remaining.saturating_sub(size);
        }
    }

    *inventory = rebuilt;
}

/// Remove every stack.
pub fn clear(inventory: &mut Vec<ItemStack>) {
    inventory.clear();
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Whether `quantity` more units of `item_id` would fit.
///
/// Counts free room in existing stacks of the item, then checks whether the
/// remainder fits in the unused slots at the item's stack limit.
pub fn has_space(inventory: &[ItemStack], item_id: &str, quantity: u32, max_slots: usize) -> bool {
    if quantity == 0 {
        return true;
    }
    let Some(definition) = registry::get_item(item_id) else {
        return false;
    };

    let free_in_stacks: u32 = inventory
        .iter()
        .filter(|s| s.item_id == item_id)
        .map(|s| s.max_stack.saturating_sub(s.quantity))
        .fold(0, u32::saturating_add);
    if free_in_stacks >= quantity {
        return true;
    }

    let needed = quantity.saturating_sub(free_in_stacks);
    let stacks_needed = needed.div_ceil(definition.max_stack.max(1));
    let free_slots = max_slots.saturating_sub(inventory.len());
    usize::try_from(stacks_needed).is_ok_and(|n| n <= free_slots)
}

/// Total units of `item_id` across all stacks.
pub fn get_count(inventory: &[ItemStack], item_id: &str) -> u32 {
    inventory
        .iter()
        .filter(|s| s.item_id == item_id)
        .map(|s| s.quantity)
        .fold(0, u32::saturating_add)
}

/// Whether at least `quantity` units of `item_id` are held.
pub fn contains(inventory: &[ItemStack], item_id: &str, quantity: u32) -> bool {
    get_count(inventory, item_id) >= quantity
}

/// Distinct item ids, in order of first appearance.
pub fn get_unique_items(inventory: &[ItemStack]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for stack in inventory {
        if !seen.iter().any(|id| *id == stack.item_id) {
            seen.push(stack.item_id.clone());
        }
    }
    seen
}

/// Number of occupied slots.
pub const fn get_used_slots(inventory: &[ItemStack]) -> usize {
    inventory.len()
}

/// Total units per item id.
pub fn get_summary(inventory: &[ItemStack]) -> BTreeMap<String, u32> {
    let mut summary = BTreeMap::new();
    for stack in inventory {
        let total = summary.entry(stack.item_id.clone()).or_insert(0_u32);
        *total = total.saturating_add(stack.quantity);
    }
    summary
}

/// Deep copy of an inventory.
pub fn clone_inventory(inventory: &[ItemStack]) -> Vec<ItemStack> {
    inventory.to_vec()
}

/// Whether the inventory holds nothing.
pub const fn is_empty(inventory: &[ItemStack]) -> bool {
    inventory.is_empty()
}

/// Whether every slot is occupied.
pub const fn is_full(inventory: &[ItemStack], max_slots: usize) -> bool {
    inventory.len() >= max_slots
}
