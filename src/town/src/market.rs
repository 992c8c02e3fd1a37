//! Market pricing and stock

use items::{ItemTemplate, ItemType, Rarity};
use math::Dice;
use serde::Serialize;

use crate::towns::TownInfo;

/// Sell-back share of the base price
pub const SELL_RATIO: f64 = 0.5;

fn rarity_price(rarity: Rarity) -> u32 {
    match rarity {
        Rarity::Common => 25,
        Rarity::Uncommon => 75,
        Rarity::Rare => 200,
        Rarity::Unique => 500,
    }
}

fn type_multiplier(item_type: ItemType) -> f64 {
    match item_type {
        ItemType::Consumable => 1.0,
        ItemType::Equipment => 2.0,
        ItemType::Material => 0.5,
        ItemType::Special => 3.0,
    }
}

/// Town-independent price
pub fn base_price(item: &ItemTemplate) -> u32 {
    (f64::from(rarity_price(item.rarity)) * type_multiplier(item.item_type)).floor() as u32
}

pub fn buy_price(item: &ItemTemplate, town: &TownInfo) -> u32 {
    (f64::from(base_price(item)) * town.price_multiplier).floor() as u32
}

pub fn sell_price(item: &ItemTemplate) -> u32 {
    (f64::from(base_price(item)) * SELL_RATIO).floor() as u32
}

/// Units on the shelf for a fresh visit
pub fn roll_stock(rarity: Rarity, dice: &mut impl Dice) -> u32 {
    let stock = match rarity {
        Rarity::Common => dice.int_range(5, 15),
        Rarity::Uncommon => dice.int_range(2, 8),
        Rarity::Rare => dice.int_range(1, 3),
        Rarity::Unique => 1,
    };
    stock.max(0) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketItem {
    pub template_id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub stock: u32,
}

/// Build the shelf for one visit; unknown ids are dropped
pub fn stock_market(town: &TownInfo, dice: &mut impl Dice) -> Vec<MarketItem> {
    town.market_inventory
        .iter()
        .filter_map(|&id| {
            let Some(item) = items::template(id) else {
                log::warn!("market item {id} in {} has no template", town.id);
                return None;
            };
            Some(MarketItem {
                template_id: item.id,
                name: item.name,
                price: buy_price(item, town),
                stock: roll_stock(item.rarity, dice),
            })
        })
        .collect()
}
