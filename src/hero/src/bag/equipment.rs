use items::{EquipSlot, ItemTemplate, template};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Three equipment slots, each holding a template id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub accessory: Option<String>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&str> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_deref(),
            EquipSlot::Armor => self.armor.as_deref(),
            EquipSlot::Accessory => self.accessory.as_deref(),
        }
    }

    /// Put `item` in `slot`, returning whatever was there
    pub fn replace(&mut self, slot: EquipSlot, item: Option<String>) -> Option<String> {
        let target = match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Accessory => &mut self.accessory,
        };
        std::mem::replace(target, item)
    }

    /// Equipped templates; unknown ids are skipped
    pub fn templates(&self) -> impl Iterator<Item = (EquipSlot, &'static ItemTemplate)> + '_ {
        EquipSlot::iter().filter_map(|slot| {
            let id = self.get(slot)?;
            let found = template(id);
            if found.is_none() {
                log::warn!("equipped item {id} has no template");
            }
            found.map(|t| (slot, t))
        })
    }

    pub fn attack_bonus(&self) -> u32 {
        self.templates().map(|(_, t)| t.attack_bonus()).sum()
    }

    pub fn defense_bonus(&self) -> u32 {
        self.templates().map(|(_, t)| t.defense_bonus()).sum()
    }

    pub fn is_equipped(&self, template_id: &str) -> bool {
        EquipSlot::iter().any(|slot| self.get(slot) == Some(template_id))
    }
}
