//! Owned card instances: creation, stat formula and the enhancement engine.

pub mod enhance;
mod endpoints;

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use uuid::Uuid;

use crate::catalog::CardMaster;

pub use endpoints::{
    enhance_card, list_collection, okapi_add_operation_for_enhance_card_,
    okapi_add_operation_for_list_collection_, CollectionEntry, EnhanceRequest,
};
pub use enhance::{enhance, EnhanceResult};

/// Stat bonus per level above 1.
pub const STAT_GROWTH_PER_LEVEL: u32 = 2;

/// One card instance a player possesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct OwnedCard {
    pub id: Uuid,
    pub player_id: Uuid,
    pub card_master_id: String,
    pub level: u32,
    pub exp: u64,
    pub attack: u32,
    pub defense: u32,
    pub acquired_at: DateTime<Utc>,
}

/// `(attack, defense)` of a card of `master` at `level`.
pub fn stats_at_level(master: &CardMaster, level: u32) -> (u32, u32) {
    let bonus = level.saturating_sub(1) * STAT_GROWTH_PER_LEVEL;
    (master.base_attack + bonus, master.base_defense + bonus)
}

/// New level 1 instance of `master`. Shared by gacha draws and card rewards.
pub fn materialize(player_id: Uuid, master: &CardMaster, now: DateTime<Utc>) -> OwnedCard {
    let (attack, defense) = stats_at_level(master, 1);
    OwnedCard {
        id: Uuid::new_v4(),
        player_id,
        card_master_id: master.id.clone(),
        level: 1,
        exp: 0,
        attack,
        defense,
        acquired_at: now,
    }
}
