use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::error::GameError;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum Currency {
    Gold,
    Gems,
}

impl Currency {
    fn insufficient(self) -> GameError {
        match self {
            Currency::Gold => GameError::InsufficientGold("Insufficient gold".to_string()),
            Currency::Gems => GameError::InsufficientGems("Insufficient gems".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOp {
    Add,
    Subtract,
}

pub fn balance(player: &Player, currency: Currency) -> u64 {
    match currency {
        Currency::Gold => player.gold,
        Currency::Gems => player.gems,
    }
}

/// The only way a balance changes. Returns the new balance.
///
/// A subtraction that would go below zero fails and leaves the balance untouched.
pub fn adjust(
    player: &mut Player,
    currency: Currency,
    amount: u64,
    op: AdjustOp,
) -> Result<u64, GameError> {
    let current = balance(player, currency);
    let next = match op {
        AdjustOp::Add => current.checked_add(amount).ok_or_else(|| {
            GameError::internal(format!("{currency:?} balance overflow for {}", player.id))
        })?,
        AdjustOp::Subtract => current
            .checked_sub(amount)
            .ok_or_else(|| currency.insufficient())?,
    };
    match currency {
        Currency::Gold => player.gold = next,
        Currency::Gems => player.gems = next,
    }
    log::debug!("{currency:?} {op:?} {amount} for {}: {current} -> {next}", player.id);
    Ok(next)
}
