// src/hero/src/bag/inventory.rs
use std::cmp::Ordering;

use items::{EquipSlot, ItemTemplate, ItemType, template};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use super::equipment::Equipment;

/// Default slot count
pub const DEFAULT_CAPACITY: usize = 20;
/// Number of quick-use bindings
pub const QUICK_SLOTS: usize = 4;
/// How long the equip banner stays visible
pub const EQUIP_TEXT_MS: u64 = 3000;

/// Inventory operation failures; the Display text is shown to the player
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Inventory is full!")]
    Full { requested: u32, room: u32 },
    #[error("Invalid slot!")]
    InvalidSlot(usize),
    #[error("Unknown item!")]
    UnknownItem(String),
    #[error("Not enough items!")]
    NotEnough { requested: u32, available: u32 },
    #[error("Cannot use this item!")]
    Unusable,
    #[error("Already using an item!")]
    Busy,
    #[error("Cannot equip this item!")]
    NotEquipment,
    #[error("Nothing equipped!")]
    NothingEquipped,
    #[error("Quick slot is empty!")]
    EmptyQuickSlot,
    #[error("Not enough gold!")]
    NotEnoughGold { price: u32, gold: u32 },
}

impl From<InventoryError> for error::GameError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Full { .. } | InventoryError::NotEnoughGold { .. } => {
                error::GameError::ResourceExhausted(err.to_string())
            }
            InventoryError::UnknownItem(id) => error::GameError::unknown("item", id),
            other => error::GameError::Rejected(other.to_string()),
        }
    }
}

/// One occupied slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique within the owning inventory
    pub id: u64,
    pub template_id: String,
    pub quantity: u32,
}

impl InventoryItem {
    pub fn template(&self) -> Option<&'static ItemTemplate> {
        template(&self.template_id)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortMode {
    #[default]
    Type,
    Name,
    Rarity,
    Quantity,
}

/// A consumable whose effect lands when its use delay elapses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUse {
    pub item_id: u64,
    pub template_id: String,
    pub quantity: u32,
    pub duration_ms: u64,
    pub elapsed_ms: u64,
}

/// What `use_item` decided to do with a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseRequest {
    /// Consumable accepted; effect is deferred
    Consume(PendingUse),
    /// Equipment; the caller should route to `equip_item`
    Equip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReport {
    pub added: u32,
    pub new_slots: usize,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipReport {
    pub slot: EquipSlot,
    pub equipped: String,
    pub replaced: Option<String>,
    pub message: String,
}

/// Bounded per-player item storage
#[derive(Debug, Clone)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    capacity: usize,
    pub gold: u32,
    next_id: u64,
    quick_slots: [usize; QUICK_SLOTS],
    sort_mode: SortMode,
    using: Option<PendingUse>,
    equip_text: Option<(String, u64)>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            gold: 0,
            next_id: 0,
            quick_slots: [0, 1, 2, 3],
            sort_mode: SortMode::default(),
            using: None,
            equip_text: None,
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get_item(&self, slot: usize) -> Option<&InventoryItem> {
        self.items.get(slot)
    }

    pub fn find_by_id(&self, id: u64) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn empty_slots(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Total units of a template across all stacks
    pub fn count_of(&self, template_id: &str) -> u32 {
        self.items
            .iter()
            .filter(|i| i.template_id == template_id)
            .map(|i| i.quantity)
            .sum()
    }

    /// Units of `item` that fit without failing
    pub fn room_for(&self, item: &ItemTemplate) -> u32 {
        let stack = item.stack_size.max(1);
        let partial: u32 = self
            .items
            .iter()
            .filter(|i| i.template_id == item.id && i.quantity < stack)
            .map(|i| stack - i.quantity)
            .sum();
        let fresh = u32::try_from(self.empty_slots()).unwrap_or(u32::MAX);
        partial.saturating_add(fresh.saturating_mul(stack))
    }

    pub fn can_add_items(&self, template_id: &str, quantity: u32) -> bool {
        template(template_id).is_some_and(|t| self.room_for(t) >= quantity)
    }

    fn next_item_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Add `quantity` units, topping up partial stacks first
    ///
    /// All-or-nothing: if the full quantity does not fit the inventory is
    /// left untouched and [`InventoryError::Full`] reports the room left.
    pub fn add_item(&mut self, template_id: &str, quantity: u32) -> Result<AddReport, InventoryError> {
        let item = template(template_id)
            .ok_or_else(|| InventoryError::UnknownItem(template_id.to_string()))?;
        if quantity == 0 {
            return Ok(AddReport {
                added: 0,
                new_slots: 0,
                message: "Item added!",
            });
        }

        let room = self.room_for(item);
        if quantity > room {
            return Err(InventoryError::Full {
                requested: quantity,
                room,
            });
        }

        let stack = item.stack_size.max(1);
        let remaining = self.try_add_to_existing(item.id, quantity, stack);
        if remaining == 0 {
            return Ok(AddReport {
                added: quantity,
                new_slots: 0,
                message: "Added to stack!",
            });
        }
        let new_slots = self.add_new_stacks(item.id, remaining, stack);
        Ok(AddReport {
            added: quantity,
            new_slots,
            message: "Item added!",
        })
    }

    fn try_add_to_existing(&mut self, template_id: &str, mut quantity: u32, stack: u32) -> u32 {
        for slot in self
            .items
            .iter_mut()
            .filter(|i| i.template_id == template_id && i.quantity < stack)
        {
            let add = quantity.min(stack - slot.quantity);
            slot.quantity += add;
            quantity -= add;
            if quantity == 0 {
                break;
            }
        }
        quantity
    }

    fn add_new_stacks(&mut self, template_id: &str, mut remaining: u32, stack: u32) -> usize {
        let mut created = 0;
        while remaining > 0 && self.items.len() < self.capacity {
            let amount = remaining.min(stack);
            let id = self.next_item_id();
            self.items.push(InventoryItem {
                id,
                template_id: template_id.to_string(),
                quantity: amount,
            });
            remaining -= amount;
            created += 1;
        }
        created
    }

    /// Remove up to `quantity` units from a slot, returning how many were removed
    pub fn remove_item(&mut self, slot: usize, quantity: u32) -> Result<u32, InventoryError> {
        let entry = self
            .items
            .get_mut(slot)
            .ok_or(InventoryError::InvalidSlot(slot))?;
        if quantity >= entry.quantity {
            let removed = entry.quantity;
            self.items.remove(slot);
            Ok(removed)
        } else {
            entry.quantity -= quantity;
            Ok(quantity)
        }
    }

    /// Like `remove_item` but addressed by item id
    pub fn remove_by_id(&mut self, id: u64, quantity: u32) -> Option<u32> {
        let slot = self.items.iter().position(|i| i.id == id)?;
        self.remove_item(slot, quantity).ok()
    }

    /// Validate a use request and, for consumables, start the use delay
    pub fn use_item(&mut self, slot: usize, quantity: u32) -> Result<UseRequest, InventoryError> {
        let entry = self.items.get(slot).ok_or(InventoryError::InvalidSlot(slot))?;
        let item = entry
            .template()
            .ok_or_else(|| InventoryError::UnknownItem(entry.template_id.clone()))?;
        if entry.quantity < quantity {
            return Err(InventoryError::NotEnough {
                requested: quantity,
                available: entry.quantity,
            });
        }

        match item.item_type {
            ItemType::Equipment => return Ok(UseRequest::Equip),
            ItemType::Material | ItemType::Special => return Err(InventoryError::Unusable),
            ItemType::Consumable => {}
        }

        if self.using.is_some() {
            return Err(InventoryError::Busy);
        }

        let pending = PendingUse {
            item_id: entry.id,
            template_id: entry.template_id.clone(),
            quantity: quantity.max(1),
            duration_ms: item.use_time_ms(),
            elapsed_ms: 0,
        };
        self.using = Some(pending.clone());
        Ok(UseRequest::Consume(pending))
    }

    pub fn is_using(&self) -> bool {
        self.using.is_some()
    }

    pub fn pending_use(&self) -> Option<&PendingUse> {
        self.using.as_ref()
    }

    /// Clear the in-flight use if it matches `item_id`
    pub fn finish_use(&mut self, item_id: u64) -> Option<PendingUse> {
        if self.using.as_ref().is_some_and(|p| p.item_id == item_id) {
            self.using.take()
        } else {
            None
        }
    }

    pub fn cancel_use(&mut self) -> Option<PendingUse> {
        self.using.take()
    }

    /// 0.0 when idle, rising to 1.0 as the pending use completes
    pub fn usage_progress(&self) -> f64 {
        match &self.using {
            Some(p) if p.duration_ms > 0 => (p.elapsed_ms as f64 / p.duration_ms as f64).min(1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    /// Move a slot's item into its equipment slot
    ///
    /// The previously equipped item goes back into the inventory. If it
    /// cannot, the swap is rolled back and nothing changes.
    pub fn equip_item(
        &mut self,
        slot: usize,
        equipment: &mut Equipment,
    ) -> Result<EquipReport, InventoryError> {
        let entry = self.items.get(slot).ok_or(InventoryError::InvalidSlot(slot))?;
        let item = entry
            .template()
            .ok_or_else(|| InventoryError::UnknownItem(entry.template_id.clone()))?;
        let equip_slot = item.equip_slot().ok_or(InventoryError::NotEquipment)?;

        let backup = self.items.clone();
        let next_id = self.next_id;
        self.remove_item(slot, 1)?;

        let previous = equipment.get(equip_slot).map(str::to_string);
        if let Some(old) = &previous {
            if let Err(err) = self.add_item(old, 1) {
                self.items = backup;
                self.next_id = next_id;
                return Err(err);
            }
        }

        equipment.replace(equip_slot, Some(item.id.to_string()));
        let message = item.equip_text();
        self.equip_text = Some((message.clone(), EQUIP_TEXT_MS));

        Ok(EquipReport {
            slot: equip_slot,
            equipped: item.id.to_string(),
            replaced: previous,
            message,
        })
    }

    /// Return an equipped item to the inventory
    pub fn unequip_item(
        &mut self,
        slot: EquipSlot,
        equipment: &mut Equipment,
    ) -> Result<String, InventoryError> {
        let current = equipment
            .get(slot)
            .map(str::to_string)
            .ok_or(InventoryError::NothingEquipped)?;
        self.add_item(&current, 1)?;
        equipment.replace(slot, None);
        Ok(current)
    }

    /// Stable sort by the given mode
    pub fn sort_inventory(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.items.sort_by(|a, b| {
            let (Some(ta), Some(tb)) = (a.template(), b.template()) else {
                return Ordering::Equal;
            };
            match mode {
                SortMode::Type => ta.item_type.cmp(&tb.item_type),
                SortMode::Name => ta.name.cmp(tb.name),
                SortMode::Rarity => tb.rarity.cmp(&ta.rarity),
                SortMode::Quantity => b.quantity.cmp(&a.quantity),
            }
        });
    }

    /// Bind quick slot `slot_num` (1..=4) to an inventory slot
    pub fn set_quick_slot(&mut self, slot_num: usize, inventory_slot: usize) -> bool {
        match slot_num.checked_sub(1).and_then(|i| self.quick_slots.get_mut(i)) {
            Some(binding) => {
                *binding = inventory_slot;
                true
            }
            None => false,
        }
    }

    /// Inventory slot bound to quick slot `slot_num`, if it holds an item
    pub fn quick_slot_target(&self, slot_num: usize) -> Result<usize, InventoryError> {
        slot_num
            .checked_sub(1)
            .and_then(|i| self.quick_slots.get(i))
            .copied()
            .filter(|&target| target < self.items.len())
            .ok_or(InventoryError::EmptyQuickSlot)
    }

    pub fn is_quick_slot(&self, inventory_slot: usize) -> bool {
        self.quick_slots.contains(&inventory_slot)
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub fn spend_gold(&mut self, amount: u32) -> Result<(), InventoryError> {
        if self.gold < amount {
            return Err(InventoryError::NotEnoughGold {
                price: amount,
                gold: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    /// Advance the equip banner and the pending-use progress
    pub fn update(&mut self, delta_ms: u64) {
        if let Some((_, remaining)) = &mut self.equip_text {
            *remaining = remaining.saturating_sub(delta_ms);
            if *remaining == 0 {
                self.equip_text = None;
            }
        }
        if let Some(pending) = &mut self.using {
            pending.elapsed_ms = pending.elapsed_ms.saturating_add(delta_ms);
        }
    }

    /// Current equip banner, empty once it has timed out
    pub fn equip_text(&self) -> &str {
        self.equip_text.as_ref().map_or("", |(text, _)| text.as_str())
    }

    /// Rebuild from persisted `(template_id, quantity)` records
    ///
    /// Unknown templates and empty stacks are dropped; quantities are clamped
    /// to the template's stack size.
    pub fn restore(
        capacity: usize,
        gold: u32,
        records: impl IntoIterator<Item = (String, u32)>,
    ) -> Self {
        let mut inv = Self::with_capacity(capacity);
        inv.gold = gold;
        for (template_id, quantity) in records {
            let Some(item) = template(&template_id) else {
                log::warn!("dropping saved item with unknown template {template_id}");
                continue;
            };
            if quantity == 0 || inv.items.len() >= capacity {
                continue;
            }
            let id = inv.next_item_id();
            inv.items.push(InventoryItem {
                id,
                template_id,
                quantity: quantity.min(item.stack_size.max(1)),
            });
        }
        inv
    }
}
