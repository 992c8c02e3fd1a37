use std::collections::BTreeMap;
use std::sync::LazyLock;

use error::GameError;

use crate::{
    ConsumableStats, DEFAULT_USE_TIME_MS, EffectKind, EquipSlot, EquipStats, ItemTemplate,
    ItemType, Rarity,
};

static CATALOG: LazyLock<ItemCatalog> = LazyLock::new(ItemCatalog::new);

/// Keyed, immutable set of every item template
#[derive(Debug)]
pub struct ItemCatalog {
    templates: BTreeMap<&'static str, ItemTemplate>,
}

impl ItemCatalog {
    fn new() -> Self {
        let templates = all_templates()
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        Self { templates }
    }

    /// Process-wide catalog
    pub fn global() -> &'static ItemCatalog {
        &CATALOG
    }

    pub fn get(&self, id: &str) -> Option<&ItemTemplate> {
        self.templates.get(id)
    }

    /// Lookup that reports unknown ids as a data-integrity error
    pub fn require(&self, id: &str) -> Result<&ItemTemplate, GameError> {
        self.get(id).ok_or_else(|| {
            log::warn!("unknown item template: {id}");
            GameError::unknown("item", id)
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Shorthand for `ItemCatalog::global().get(id)`
pub fn template(id: &str) -> Option<&'static ItemTemplate> {
    ItemCatalog::global().get(id)
}

fn consumable(
    id: &'static str,
    name: &'static str,
    rarity: Rarity,
    stack_size: u32,
    description: &'static str,
    stats: ConsumableStats,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        item_type: ItemType::Consumable,
        rarity,
        stack_size,
        description,
        consumable: Some(stats),
        equip: None,
    }
}

fn potion(effect: EffectKind, value: u32) -> ConsumableStats {
    ConsumableStats {
        effect,
        value,
        use_time_ms: DEFAULT_USE_TIME_MS,
        duration_ms: None,
    }
}

fn material(
    id: &'static str,
    name: &'static str,
    rarity: Rarity,
    stack_size: u32,
    description: &'static str,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        item_type: ItemType::Material,
        rarity,
        stack_size,
        description,
        consumable: None,
        equip: None,
    }
}

fn gear(
    id: &'static str,
    name: &'static str,
    rarity: Rarity,
    description: &'static str,
    slot: EquipSlot,
    (attack_bonus, defense_bonus): (u32, u32),
    equip_text: &'static str,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        item_type: ItemType::Equipment,
        rarity,
        stack_size: 1,
        description,
        consumable: None,
        equip: Some(EquipStats {
            slot,
            attack_bonus,
            defense_bonus,
            equip_text,
        }),
    }
}

fn special(id: &'static str, name: &'static str, description: &'static str) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        item_type: ItemType::Special,
        rarity: Rarity::Unique,
        stack_size: 1,
        description,
        consumable: None,
        equip: None,
    }
}

fn all_templates() -> Vec<ItemTemplate> {
    use EffectKind::*;
    use EquipSlot::*;
    use Rarity::*;

    const FIVE_MINUTES: u64 = 300_000;
    const TEN_MINUTES: u64 = 600_000;

    vec![
        /* ==== consumables ==== */
        consumable("health_small", "Small Health Potion", Common, 10, "Restores 25 HP", potion(Heal, 25)),
        consumable("health_medium", "Medium Health Potion", Uncommon, 5, "Restores 50 HP", potion(Heal, 50)),
        consumable("health_large", "Large Health Potion", Rare, 3, "Restores 100 HP", potion(Heal, 100)),
        consumable("mana_small", "Small Mana Potion", Common, 10, "Restores 25 MP", potion(Mana, 25)),
        consumable("mana_medium", "Medium Mana Potion", Uncommon, 5, "Restores 50 MP", potion(Mana, 50)),
        consumable(
            "strength_potion",
            "Strength Potion",
            Uncommon,
            3,
            "+5 Attack for 5 minutes",
            ConsumableStats { duration_ms: Some(FIVE_MINUTES), ..potion(StrengthBoost, 5) },
        ),
        consumable(
            "defense_potion",
            "Defense Potion",
            Uncommon,
            3,
            "+5 Defense for 5 minutes",
            ConsumableStats { duration_ms: Some(FIVE_MINUTES), ..potion(DefenseBoost, 5) },
        ),
        consumable(
            "elixir_power",
            "Elixir of Power",
            Rare,
            1,
            "+3 All Stats for 10 minutes",
            ConsumableStats {
                use_time_ms: 1000,
                duration_ms: Some(TEN_MINUTES),
                ..potion(AllStats, 3)
            },
        ),
        consumable(
            "phoenix_down",
            "Phoenix Down",
            Rare,
            3,
            "Revives with 50% HP",
            ConsumableStats { use_time_ms: 2000, ..potion(Revive, 1) },
        ),
        /* ==== materials ==== */
        material("herb", "Herb", Common, 20, "Common healing ingredient"),
        material("crystal_shard", "Crystal Shard", Common, 10, "Fragment of magic crystal"),
        material("monster_part", "Monster Part", Common, 15, "Dropped by monsters"),
        material("magic_herb", "Magic Herb", Uncommon, 10, "Enchanted healing plant"),
        material("fire_crystal", "Fire Crystal", Uncommon, 5, "Contains fire energy"),
        material("rare_essence", "Rare Essence", Uncommon, 3, "Valuable magical essence"),
        material("dragon_scale", "Dragon Scale", Rare, 2, "Tough dragon scale"),
        material("soul_crystal", "Soul Crystal", Rare, 2, "Contains soul energy"),
        material("ancient_rune", "Ancient Rune", Rare, 1, "Mysterious ancient rune"),
        material("boss_essence", "Boss Essence", Unique, 1, "Essence of a defeated boss"),
        /* ==== equipment ==== */
        gear("dagger", "Dagger", Common, "Basic dagger +5 ATK", Weapon, (5, 0), "Equipped: Quick and reliable dagger"),
        gear("sword", "Sword", Uncommon, "Well-balanced sword +10 ATK", Weapon, (10, 0), "Equipped: Solid steel sword"),
        gear("greatsword", "Greatsword", Rare, "Heavy greatsword +18 ATK", Weapon, (18, 0), "Equipped: Mighty two-handed blade"),
        gear("leather_armor", "Leather Armor", Common, "Basic leather armor +8 DEF", Armor, (0, 8), "Equipped: Light leather protection"),
        gear("chain_mail", "Chain Mail", Uncommon, "Chain mail armor +15 DEF", Armor, (0, 15), "Equipped: Interlocking metal chains"),
        gear("plate_armor", "Plate Armor", Rare, "Heavy plate armor +25 DEF", Armor, (0, 25), "Equipped: Full plate protection"),
        gear("ring", "Ring", Common, "Simple ring +2 ATK/DEF", Accessory, (2, 2), "Equipped: Basic magical ring"),
        gear("amulet", "Amulet", Uncommon, "Protective amulet +5 ATK/3 DEF", Accessory, (5, 3), "Equipped: Enchanted protection amulet"),
        gear("magic_ring", "Magic Ring", Rare, "Magic ring +8 ATK/5 DEF", Accessory, (8, 5), "Equipped: Ring of mystical power"),
        gear("boots", "Boots", Uncommon, "Sturdy boots +4 DEF", Accessory, (0, 4), "Equipped: Reinforced leather boots"),
        gear("dragon_helm", "Dragon Helm", Rare, "Dragon scale helm +20 DEF", Armor, (0, 20), "Equipped: Helm forged from dragon scales"),
        gear("legendary_weapon", "Legendary Weapon", Unique, "Legendary blade +30 ATK", Weapon, (30, 0), "Equipped: Weapon of ancient heroes"),
        gear("legendary_armor", "Legendary Armor", Unique, "Legendary armor +35 DEF", Armor, (0, 35), "Equipped: Armor of the chosen one"),
        gear("artifact", "Ancient Artifact", Unique, "Ancient artifact +15 ATK/DEF", Accessory, (15, 15), "Equipped: Artifact from a lost age"),
        /* ==== special ==== */
        special("skill_book", "Skill Book", "Contains hidden knowledge"),
        special("stat_orb", "Stat Orb", "Permanently increases stats"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_complete() {
        let catalog = ItemCatalog::global();
        assert_eq!(catalog.len(), 35);
        assert_eq!(catalog.iter().filter(|t| t.item_type == ItemType::Consumable).count(), 9);
        assert_eq!(catalog.iter().filter(|t| t.item_type == ItemType::Material).count(), 10);
        assert_eq!(catalog.iter().filter(|t| t.item_type == ItemType::Equipment).count(), 14);
    }

    #[test]
    fn every_template_is_consistent() {
        for t in ItemCatalog::global().iter() {
            assert!(t.stack_size >= 1, "{}", t.id);
            assert_eq!(t.equip.is_some(), t.item_type == ItemType::Equipment, "{}", t.id);
            assert_eq!(t.consumable.is_some(), t.item_type == ItemType::Consumable, "{}", t.id);
        }
    }

    #[test]
    fn lookups() {
        let potion = template("health_small").unwrap();
        assert_eq!(potion.stack_size, 10);
        assert_eq!(potion.effect(), Some(EffectKind::Heal));
        assert_eq!(potion.use_time_ms(), 500);
        assert_eq!(template("phoenix_down").unwrap().use_time_ms(), 2000);
        assert_eq!(template("magic_ring").unwrap().attack_bonus(), 8);
        assert!(template("mana_large").is_none());
        assert!(ItemCatalog::global().require("mana_large").is_err());
    }
}
