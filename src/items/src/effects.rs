//! Consumable effect appliers

use serde::{Deserialize, Serialize};

use crate::{EffectKind, ItemTemplate};

/// Anything a consumable can be used on
pub trait EffectTarget {
    fn hp(&self) -> u32;
    fn max_hp(&self) -> u32;
    fn max_mp(&self) -> u32;

    /// Returns the HP actually restored
    fn heal(&mut self, amount: u32) -> u32;

    /// Returns the MP actually restored
    fn restore_mp(&mut self, amount: u32) -> u32;

    /// Apply a temporary bonus that must be reverted after `duration_ms`.
    /// Max HP/MP bonuses also raise current HP/MP by the same amount.
    fn apply_buff(&mut self, buff: StatBuff, duration_ms: u64);

    /// Overwrite current HP and MP (revive)
    fn set_vitals(&mut self, hp: u32, mp: u32);
}

/// Temporary stat bonus granted by a potion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBuff {
    pub attack: u32,
    pub defense: u32,
    pub max_hp: u32,
    pub max_mp: u32,
}

impl StatBuff {
    pub fn is_empty(&self) -> bool {
        *self == StatBuff::default()
    }

    pub fn merged(self, other: StatBuff) -> StatBuff {
        StatBuff {
            attack: self.attack + other.attack,
            defense: self.defense + other.defense,
            max_hp: self.max_hp + other.max_hp,
            max_mp: self.max_mp + other.max_mp,
        }
    }
}

/// Result of applying one consumable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectOutcome {
    pub success: bool,
    pub message: String,
    pub value: u32,
    pub duration_ms: Option<u64>,
}

impl EffectOutcome {
    fn ok(message: String, value: u32) -> Self {
        Self {
            success: true,
            message,
            value,
            duration_ms: None,
        }
    }

    fn timed(message: String, value: u32, duration_ms: u64) -> Self {
        Self {
            success: true,
            message,
            value,
            duration_ms: Some(duration_ms),
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            value: 0,
            duration_ms: None,
        }
    }
}

fn minutes(duration_ms: u64) -> f64 {
    duration_ms as f64 / 60_000.0
}

/// Apply `quantity` units of a consumable to `target`
///
/// A failed outcome means nothing changed and the item must not be consumed.
pub fn apply_effect<T: EffectTarget + ?Sized>(
    target: &mut T,
    template: &ItemTemplate,
    quantity: u32,
) -> EffectOutcome {
    let Some(stats) = template.consumable else {
        return EffectOutcome::failed("Cannot use this item!");
    };
    let amount = stats.value.saturating_mul(quantity);
    let duration = stats.duration_ms.unwrap_or(0);

    match stats.effect {
        EffectKind::Heal => {
            let healed = target.heal(amount);
            EffectOutcome::ok(format!("Healed for {healed} HP!"), healed)
        }
        EffectKind::Mana => {
            let restored = target.restore_mp(amount);
            EffectOutcome::ok(format!("Restored {restored} MP!"), restored)
        }
        EffectKind::StrengthBoost => {
            target.apply_buff(
                StatBuff {
                    attack: amount,
                    ..StatBuff::default()
                },
                duration,
            );
            EffectOutcome::timed(
                format!("+{amount} Attack for {} minutes!", minutes(duration)),
                amount,
                duration,
            )
        }
        EffectKind::DefenseBoost => {
            target.apply_buff(
                StatBuff {
                    defense: amount,
                    ..StatBuff::default()
                },
                duration,
            );
            EffectOutcome::timed(
                format!("+{amount} Defense for {} minutes!", minutes(duration)),
                amount,
                duration,
            )
        }
        EffectKind::AllStats => {
            target.apply_buff(
                StatBuff {
                    attack: amount,
                    defense: amount,
                    max_hp: amount * 5,
                    max_mp: amount * 3,
                },
                duration,
            );
            EffectOutcome::timed(
                format!("+{amount} All Stats for {} minutes!", minutes(duration)),
                amount,
                duration,
            )
        }
        EffectKind::Revive => {
            if target.hp() > 0 {
                return EffectOutcome::failed("Cannot use while alive!");
            }
            let hp = target.max_hp() / 2;
            let mp = target.max_mp() / 2;
            target.set_vitals(hp, mp);
            EffectOutcome::ok("Revived with 50% HP and MP!".to_string(), hp)
        }
    }
}
