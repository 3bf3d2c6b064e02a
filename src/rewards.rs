//! Reward bundles and the routine that pays them out.

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::cards;
use crate::catalog::Catalog;
use crate::economy::ledger::{self, AdjustOp, Currency};
use crate::economy::{progression, stamina};
use crate::error::GameError;
use crate::store::PlayerAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum RewardType {
    Gold,
    Gems,
    Exp,
    Card,
    Stamina,
    /// Any tag this server does not know; skipped on distribution.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct Reward {
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub card_id: Option<String>,
}

impl Reward {
    fn of(reward_type: RewardType, amount: u64) -> Self {
        Reward {
            reward_type,
            amount: Some(amount),
            card_id: None,
        }
    }

    pub fn gold(amount: u64) -> Self {
        Reward::of(RewardType::Gold, amount)
    }

    pub fn gems(amount: u64) -> Self {
        Reward::of(RewardType::Gems, amount)
    }

    pub fn exp(amount: u64) -> Self {
        Reward::of(RewardType::Exp, amount)
    }

    pub fn stamina(amount: u64) -> Self {
        Reward::of(RewardType::Stamina, amount)
    }

    pub fn card(card_id: impl Into<String>) -> Self {
        Reward {
            reward_type: RewardType::Card,
            amount: None,
            card_id: Some(card_id.into()),
        }
    }

    fn positive_amount(&self) -> Option<u64> {
        self.amount.filter(|a| *a > 0)
    }
}

/// Apply every reward in order and return the ones actually granted.
///
/// Entries with an unknown tag, a missing or zero amount, or a card reward without a card id
/// are skipped rather than failing the bundle.
pub fn distribute(
    aggregate: &mut PlayerAggregate,
    catalog: &Catalog,
    rewards: &[Reward],
    now: DateTime<Utc>,
) -> Result<Vec<Reward>, GameError> {
    let mut granted = Vec::with_capacity(rewards.len());
    for reward in rewards {
        let applied = match reward.reward_type {
            RewardType::Exp => match reward.positive_amount() {
                Some(amount) => {
                    progression::add_experience(&mut aggregate.player, amount);
                    true
                }
                None => false,
            },
            RewardType::Gold | RewardType::Gems => match reward.positive_amount() {
                Some(amount) => {
                    let currency = if reward.reward_type == RewardType::Gold {
                        Currency::Gold
                    } else {
                        Currency::Gems
                    };
                    ledger::adjust(&mut aggregate.player, currency, amount, AdjustOp::Add)?;
                    true
                }
                None => false,
            },
            RewardType::Card => match &reward.card_id {
                Some(card_id) => {
                    let master = catalog.get_by_id(card_id)?;
                    let card = cards::materialize(aggregate.player.id, master, now);
                    aggregate.add_card(card);
                    true
                }
                None => false,
            },
            RewardType::Stamina => match reward.positive_amount() {
                Some(amount) => {
                    let amount = u32::try_from(amount).unwrap_or(u32::MAX);
                    stamina::recover(&mut aggregate.player, amount, false, now)?;
                    true
                }
                None => false,
            },
            RewardType::Unknown => false,
        };
        if applied {
            granted.push(reward.clone());
        } else {
            log::debug!("skipping reward {reward:?} for {}", aggregate.player.id);
        }
    }
    Ok(granted)
}
