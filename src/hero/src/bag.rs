// src/hero/src/bag.rs
pub mod equipment;
pub mod inventory;

pub use self::equipment::Equipment;
pub use self::inventory::{
    AddReport, DEFAULT_CAPACITY, EquipReport, Inventory, InventoryError, InventoryItem,
    PendingUse, QUICK_SLOTS, SortMode, UseRequest,
};
