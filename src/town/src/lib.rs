//! Town hub: market, mission board and inn
//!
//! A [`Town`] is built fresh on every visit (market stock is rerolled) and
//! works directly on the shared [`Player`]. Every action returns the text
//! shown to the player and also keeps it as the banner message for a few
//! seconds.

pub mod market;
pub mod towns;

use hero::{InventoryError, Player};
use math::Dice;
use thiserror::Error;

pub use crate::market::{MarketItem, base_price, buy_price, sell_price, stock_market};
pub use crate::towns::{
    Difficulty, MissionReward, MissionTemplate, Requirement, STARTER_TOWN, TOWNS, TownInfo,
    mission_template, town_info,
};

pub const INN_COST: u32 = 50;
/// How long a banner message stays up
pub const MESSAGE_MS: u64 = 3000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TownError {
    #[error("Unknown town: {0}")]
    UnknownTown(String),
    #[error("{0} is not accessible yet")]
    Locked(&'static str),
    #[error("Invalid selection!")]
    InvalidIndex(usize),
    #[error("Out of stock!")]
    OutOfStock,
    #[error("Not enough gold!")]
    NotEnoughGold { price: u32, gold: u32 },
    #[error("Inventory full!")]
    InventoryFull,
    #[error("No items to sell!")]
    NothingToSell,
    #[error("Mission already active!")]
    AlreadyActive,
    #[error("Mission already completed!")]
    AlreadyCompleted,
    #[error("Mission not active!")]
    NotActive,
    #[error("Requirements not met!")]
    RequirementsNotMet,
    #[error("Not enough gold! Need {cost} gold.")]
    InnTooExpensive { cost: u32 },
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl From<TownError> for error::GameError {
    fn from(err: TownError) -> Self {
        match err {
            TownError::UnknownTown(id) => error::GameError::unknown("town", id),
            TownError::Inventory(inner) => inner.into(),
            TownError::NotEnoughGold { .. }
            | TownError::InventoryFull
            | TownError::OutOfStock
            | TownError::InnTooExpensive { .. } => error::GameError::ResourceExhausted(err.to_string()),
            other => error::GameError::Rejected(other.to_string()),
        }
    }
}

/// Item requirements only look at the inventory; nothing is taken on turn-in
pub fn check_requirements(mission: &MissionTemplate, player: &Player) -> bool {
    match mission.requirement {
        Requirement::Item { id, quantity } => player.inventory.count_of(id) >= quantity,
        Requirement::Kill { id, quantity } => player.missions.kills(id) >= quantity,
    }
}

#[derive(Debug, Clone)]
pub struct Town {
    info: &'static TownInfo,
    market: Vec<MarketItem>,
    message: Option<String>,
    message_ms: u64,
}

impl Town {
    /// Enter a town the player has unlocked and stock its market
    pub fn enter(id: &str, player: &mut Player, dice: &mut impl Dice) -> Result<Self, TownError> {
        let info = town_info(id).ok_or_else(|| TownError::UnknownTown(id.to_string()))?;
        let open = progression::unlocked_towns(&player.defeated_bosses);
        if !open.iter().any(|t| t == info.unlock_key) {
            log::info!("town {id} is still locked");
            return Err(TownError::Locked(info.name));
        }

        player.last_town = Some(info.id.to_string());
        player.visit_area(info.id);
        log::info!("entering town {}", info.id);

        let mut town = Self {
            info,
            market: stock_market(info, dice),
            message: None,
            message_ms: 0,
        };
        town.show(format!("Welcome to {}!", info.name));
        Ok(town)
    }

    pub fn info(&self) -> &'static TownInfo {
        self.info
    }

    pub fn name(&self) -> &'static str {
        self.info.name
    }

    pub fn market(&self) -> &[MarketItem] {
        &self.market
    }

    pub fn missions(&self) -> &'static [MissionTemplate] {
        self.info.missions
    }

    /// Current banner, if it has not timed out
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn update(&mut self, delta_ms: u64) {
        if self.message.is_none() {
            return;
        }
        self.message_ms = self.message_ms.saturating_sub(delta_ms);
        if self.message_ms == 0 {
            self.message = None;
        }
    }

    fn show(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
        self.message_ms = MESSAGE_MS;
    }

    /// Mirror an action's result into the banner
    fn announce(&mut self, result: Result<String, TownError>) -> Result<String, TownError> {
        match &result {
            Ok(text) => self.show(text.clone()),
            Err(err) => self.show(err.to_string()),
        }
        result
    }

    /* ==== market ==== */

    pub fn buy_item(&mut self, index: usize, player: &mut Player) -> Result<String, TownError> {
        let result = self.try_buy(index, player);
        self.announce(result)
    }

    fn try_buy(&mut self, index: usize, player: &mut Player) -> Result<String, TownError> {
        let entry = self
            .market
            .get_mut(index)
            .ok_or(TownError::InvalidIndex(index))?;
        if entry.stock == 0 {
            return Err(TownError::OutOfStock);
        }
        if player.gold() < entry.price {
            return Err(TownError::NotEnoughGold {
                price: entry.price,
                gold: player.gold(),
            });
        }
        if !player.inventory.can_add_items(entry.template_id, 1) {
            return Err(TownError::InventoryFull);
        }

        player.spend_gold(entry.price)?;
        if let Err(err) = player.add_item(entry.template_id, 1) {
            // refund straight into the purse; this is not earned gold
            player.inventory.add_gold(entry.price);
            return Err(err.into());
        }
        entry.stock -= 1;
        log::debug!("bought {} for {}", entry.template_id, entry.price);
        Ok(format!("Purchased {}!", entry.name))
    }

    /// Sell one unit from an inventory slot at half the base price
    pub fn sell_item(&mut self, slot: usize, player: &mut Player) -> Result<String, TownError> {
        let result = Self::try_sell(slot, player);
        self.announce(result)
    }

    fn try_sell(slot: usize, player: &mut Player) -> Result<String, TownError> {
        if player.inventory.is_empty() {
            return Err(TownError::NothingToSell);
        }
        let item = player
            .inventory
            .get_item(slot)
            .ok_or(TownError::InvalidIndex(slot))?
            .template()
            .ok_or(TownError::NothingToSell)?;

        let price = sell_price(item);
        player.remove_item(slot, 1)?;
        player.add_gold(price);
        Ok(format!("Sold {} for {price} gold!", item.name))
    }

    /* ==== missions ==== */

    pub fn accept_mission(&mut self, index: usize, player: &mut Player) -> Result<String, TownError> {
        let result = self.try_accept(index, player);
        self.announce(result)
    }

    fn try_accept(&self, index: usize, player: &mut Player) -> Result<String, TownError> {
        let mission = self
            .info
            .missions
            .get(index)
            .ok_or(TownError::InvalidIndex(index))?;
        if player.missions.is_active(mission.id) {
            return Err(TownError::AlreadyActive);
        }
        if player.missions.is_completed(mission.id) {
            return Err(TownError::AlreadyCompleted);
        }
        player.missions.activate(mission.id);
        log::info!("mission {} accepted", mission.id);
        Ok(format!("Accepted mission: {}", mission.name))
    }

    pub fn complete_mission(&mut self, index: usize, player: &mut Player) -> Result<String, TownError> {
        let result = self.try_complete(index, player);
        self.announce(result)
    }

    fn try_complete(&self, index: usize, player: &mut Player) -> Result<String, TownError> {
        let mission = self
            .info
            .missions
            .get(index)
            .ok_or(TownError::InvalidIndex(index))?;
        if !player.missions.is_active(mission.id) {
            return Err(TownError::NotActive);
        }
        if !check_requirements(mission, player) {
            return Err(TownError::RequirementsNotMet);
        }

        let reward = mission.reward;
        if let Some(item) = reward.item {
            if !player.inventory.can_add_items(item, 1) {
                log::info!("mission {} reward {item} does not fit", mission.id);
                return Err(TownError::InventoryFull);
            }
        }
        if reward.gold > 0 {
            player.add_gold(reward.gold);
        }
        if reward.exp > 0 {
            player.gain_experience(reward.exp);
        }
        if let Some(item) = reward.item {
            player.add_item(item, 1)?;
        }
        player.missions.complete(mission.id);
        log::info!("mission {} completed", mission.id);
        Ok(format!("Completed mission: {}!", mission.name))
    }

    /* ==== inn ==== */

    pub fn rest_at_inn(&mut self, player: &mut Player) -> Result<String, TownError> {
        let result = if player.gold() < INN_COST {
            Err(TownError::InnTooExpensive { cost: INN_COST })
        } else {
            player
                .spend_gold(INN_COST)
                .map(|()| {
                    player.hp = player.max_hp;
                    player.mp = player.max_mp;
                    "Rested and fully recovered!".to_string()
                })
                .map_err(TownError::from)
        };
        self.announce(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::Midpoint;
    use pretty_assertions::assert_eq;

    fn starter(player: &mut Player) -> Town {
        Town::enter(STARTER_TOWN, player, &mut Midpoint).unwrap()
    }

    #[test]
    fn entering_sets_last_town_and_welcome() {
        let mut player = Player::new();
        let town = starter(&mut player);
        assert_eq!(town.message(), Some("Welcome to Riverside Village!"));
        assert_eq!(player.last_town.as_deref(), Some("starter_town"));
        assert!(player.visited_areas.contains("starter_town"));
    }

    #[test]
    fn locked_and_unknown_towns() {
        let mut player = Player::new();
        assert_eq!(
            Town::enter("port_town", &mut player, &mut Midpoint).unwrap_err(),
            TownError::Locked("Harbor City")
        );
        assert!(matches!(
            Town::enter("atlantis", &mut player, &mut Midpoint),
            Err(TownError::UnknownTown(_))
        ));

        player.defeat_boss("forest_guardian");
        assert!(Town::enter("port_town", &mut player, &mut Midpoint).is_ok());
    }

    #[test]
    fn buying_spends_gold_and_stock() {
        let mut player = Player::new();
        let mut town = starter(&mut player);
        assert_eq!(town.buy_item(0, &mut player).unwrap(), "Purchased Small Health Potion!");
        assert_eq!(player.gold(), 75);
        assert_eq!(player.inventory.count_of("health_small"), 1);
        assert_eq!(town.market()[0].stock, 9);
        assert_eq!(town.message(), Some("Purchased Small Health Potion!"));
    }

    #[test]
    fn buying_failures() {
        let mut player = Player::new();
        let mut town = starter(&mut player);
        assert_eq!(town.buy_item(9, &mut player), Err(TownError::InvalidIndex(9)));

        player.spend_gold(90).unwrap();
        assert_eq!(
            town.buy_item(0, &mut player),
            Err(TownError::NotEnoughGold { price: 25, gold: 10 })
        );
        assert_eq!(town.message(), Some("Not enough gold!"));

        player.add_gold(1000);
        for _ in 0..player.inventory.capacity() {
            player.add_item("dagger", 1).unwrap();
        }
        let gold = player.gold();
        assert_eq!(town.buy_item(3, &mut player), Err(TownError::InventoryFull));
        assert_eq!(player.gold(), gold);
    }

    #[test]
    fn stock_runs_out() {
        let mut player = Player::new();
        player.add_gold(10_000);
        let mut town = starter(&mut player);
        // dagger is common: ten on the shelf with no variance
        for _ in 0..10 {
            town.buy_item(3, &mut player).unwrap();
        }
        assert_eq!(town.buy_item(3, &mut player), Err(TownError::OutOfStock));
    }

    #[test]
    fn selling_pays_half_base_price() {
        let mut player = Player::new();
        let mut town = starter(&mut player);
        assert_eq!(town.sell_item(0, &mut player), Err(TownError::NothingToSell));

        player.add_item("sword", 1).unwrap();
        assert_eq!(town.sell_item(0, &mut player).unwrap(), "Sold Sword for 75 gold!");
        assert_eq!(player.gold(), 175);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn mission_lifecycle_with_kills() {
        let mut player = Player::new();
        let mut town = starter(&mut player);

        assert_eq!(town.complete_mission(1, &mut player), Err(TownError::NotActive));
        assert_eq!(town.accept_mission(1, &mut player).unwrap(), "Accepted mission: Goblin Trouble");
        assert_eq!(town.accept_mission(1, &mut player), Err(TownError::AlreadyActive));
        assert_eq!(town.complete_mission(1, &mut player), Err(TownError::RequirementsNotMet));

        for _ in 0..3 {
            player.missions.record_kill("Goblin");
        }
        assert_eq!(town.complete_mission(1, &mut player).unwrap(), "Completed mission: Goblin Trouble!");
        assert_eq!(player.gold(), 200);
        assert_eq!(player.experience, 50);
        assert_eq!(town.accept_mission(1, &mut player), Err(TownError::AlreadyCompleted));
    }

    #[test]
    fn item_missions_keep_the_items() {
        let mut player = Player::new();
        let mut town = starter(&mut player);
        town.accept_mission(0, &mut player).unwrap();
        player.add_item("herb", 5).unwrap();

        town.complete_mission(0, &mut player).unwrap();
        assert_eq!(player.inventory.count_of("herb"), 5);
        assert_eq!(player.inventory.count_of("health_medium"), 1);
        assert!(player.missions.is_completed("gather_herbs"));
    }

    #[test]
    fn item_reward_needs_room_before_anything_is_paid() {
        let mut player = Player::new();
        let mut town = starter(&mut player);
        town.accept_mission(0, &mut player).unwrap();
        player.add_item("herb", 5).unwrap();
        while player.inventory.items().len() < player.inventory.capacity() {
            player.add_item("sword", 1).unwrap();
        }

        assert_eq!(town.complete_mission(0, &mut player), Err(TownError::InventoryFull));
        assert_eq!(town.message(), Some("Inventory full!"));
        assert_eq!(player.gold(), 100);
        assert_eq!(player.experience, 0);
        assert!(player.missions.is_active("gather_herbs"));
        assert!(!player.missions.is_completed("gather_herbs"));

        let last = player.inventory.items().len() - 1;
        player.remove_item(last, 1).unwrap();
        assert_eq!(town.complete_mission(0, &mut player).unwrap(), "Completed mission: Gather Herbs!");
        assert_eq!(player.inventory.count_of("health_medium"), 1);
        assert_eq!(player.gold(), 150);
    }

    #[test]
    fn inn_restores_for_a_fee() {
        let mut player = Player::new();
        let mut town = starter(&mut player);
        player.hp = 3;
        player.mp = 0;
        assert_eq!(town.rest_at_inn(&mut player).unwrap(), "Rested and fully recovered!");
        assert_eq!((player.hp, player.mp, player.gold()), (50, 50, 50));

        town.rest_at_inn(&mut player).unwrap();
        assert_eq!(
            town.rest_at_inn(&mut player),
            Err(TownError::InnTooExpensive { cost: 50 })
        );
        assert_eq!(town.message(), Some("Not enough gold! Need 50 gold."));
    }

    #[test]
    fn banner_times_out() {
        let mut player = Player::new();
        let mut town = starter(&mut player);
        town.update(2999);
        assert!(town.message().is_some());
        town.update(1);
        assert_eq!(town.message(), None);
    }

    #[test]
    fn errors_map_onto_the_shared_taxonomy() {
        use error::{ErrorKind, GameError};
        assert_eq!(GameError::from(TownError::OutOfStock).kind(), ErrorKind::ResourceExhausted);
        assert_eq!(GameError::from(TownError::NotActive).kind(), ErrorKind::Rejected);
        assert_eq!(
            GameError::from(TownError::UnknownTown("x".into())).kind(),
            ErrorKind::UnknownTemplate
        );
    }
}
