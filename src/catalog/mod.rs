//! Card Catalog: immutable card templates every owned card is stamped from.
//!
//! The catalog is seeded out-of-band (built-in seed or `GAME_DATA_FILE`) and only read at
//! runtime, so it is shared between requests without locking.

pub mod data;
mod endpoints;
pub mod seed;

use std::collections::HashMap;

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::error::GameError;

pub use data::GameData;
pub use endpoints::{
    get_card_master, list_card_masters, okapi_add_operation_for_get_card_master_,
    okapi_add_operation_for_list_card_masters_,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    SuperRare,
    UltraRare,
}

impl Rarity {
    pub fn all() -> [Rarity; 4] {
        [
            Rarity::Common,
            Rarity::Rare,
            Rarity::SuperRare,
            Rarity::UltraRare,
        ]
    }

    pub fn is_rare_or_above(self) -> bool {
        self != Rarity::Common
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum Attribute {
    Fire,
    Water,
    Earth,
    Wind,
    Light,
    Dark,
}

/// A catalog entry. Owned cards reference it by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CardMaster {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub attribute: Attribute,
    /// Deck-budget units.
    pub cost: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub max_level: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<CardMaster>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(cards: Vec<CardMaster>) -> Self {
        let index = cards
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect::<HashMap<_, _>>();
        if index.len() != cards.len() {
            log::warn!("catalog contains duplicate card ids; later entries shadow earlier ones");
        }
        let catalog = Catalog { cards, index };
        for rarity in Rarity::all() {
            if catalog.of_rarity(rarity).is_empty() {
                log::warn!("catalog has no {rarity:?} cards; draws of that rarity will fail");
            }
        }
        catalog
    }

    pub fn get_all(&self) -> &[CardMaster] {
        &self.cards
    }

    pub fn get_by_id(&self, id: &str) -> Result<&CardMaster, GameError> {
        self.index
            .get(id)
            .and_then(|&i| self.cards.get(i))
            .ok_or_else(|| GameError::CardNotFound(format!("Card master {id} not found")))
    }

    pub fn of_rarity(&self, rarity: Rarity) -> Vec<&CardMaster> {
        self.cards.iter().filter(|c| c.rarity == rarity).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
