//! Decks: named selections of owned cards, at most five per player with one active.

mod endpoints;
pub mod validator;

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::GameError;
use crate::store::PlayerAggregate;

pub use endpoints::{
    activate_deck, create_deck, delete_deck, get_active_deck, get_deck, list_decks,
    okapi_add_operation_for_activate_deck_, okapi_add_operation_for_create_deck_,
    okapi_add_operation_for_delete_deck_, okapi_add_operation_for_get_active_deck_,
    okapi_add_operation_for_get_deck_, okapi_add_operation_for_list_decks_,
    okapi_add_operation_for_update_deck_, update_deck, CreateDeckRequest, UpdateDeckRequest,
};
pub use validator::validate;

pub const MAX_DECKS_PER_PLAYER: usize = 5;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub player_id: Uuid,
    pub name: String,
    pub card_ids: Vec<Uuid>,
    pub total_cost: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn deck_not_found() -> GameError {
    GameError::CardNotFound("Deck not found".to_string())
}

pub fn get(aggregate: &PlayerAggregate, deck_id: Uuid) -> Result<Deck, GameError> {
    aggregate.deck(deck_id).cloned().ok_or_else(deck_not_found)
}

pub fn list(aggregate: &PlayerAggregate) -> Vec<Deck> {
    aggregate.decks.clone()
}

/// The first deck a player creates becomes active.
pub fn create(
    aggregate: &mut PlayerAggregate,
    catalog: &Catalog,
    name: String,
    card_ids: Vec<Uuid>,
    now: DateTime<Utc>,
) -> Result<Deck, GameError> {
    let total_cost = validate(aggregate, catalog, &card_ids)?;
    if aggregate.decks.len() >= MAX_DECKS_PER_PLAYER {
        return Err(GameError::validation(format!(
            "Maximum {MAX_DECKS_PER_PLAYER} decks allowed per player"
        )));
    }
    let deck = Deck {
        id: Uuid::new_v4(),
        player_id: aggregate.player.id,
        name,
        card_ids,
        total_cost,
        is_active: aggregate.decks.is_empty(),
        created_at: now,
        updated_at: now,
    };
    aggregate.decks.push(deck.clone());
    log::info!(
        "player {} created deck {} ({} cards, cost {total_cost})",
        aggregate.player.id,
        deck.id,
        deck.card_ids.len()
    );
    Ok(deck)
}

/// Rename and/or replace the card list; a new card list is validated again.
pub fn update(
    aggregate: &mut PlayerAggregate,
    catalog: &Catalog,
    deck_id: Uuid,
    name: Option<String>,
    card_ids: Option<Vec<Uuid>>,
    now: DateTime<Utc>,
) -> Result<Deck, GameError> {
    aggregate.deck(deck_id).ok_or_else(deck_not_found)?;
    let total_cost = match &card_ids {
        Some(ids) => Some(validate(aggregate, catalog, ids)?),
        None => None,
    };
    let deck = aggregate.deck_mut(deck_id).ok_or_else(deck_not_found)?;
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        deck.name = name;
    }
    if let (Some(ids), Some(cost)) = (card_ids, total_cost) {
        deck.card_ids = ids;
        deck.total_cost = cost;
    }
    deck.updated_at = now;
    Ok(deck.clone())
}

/// Deleting the active deck promotes another one, if any remain.
pub fn delete(
    aggregate: &mut PlayerAggregate,
    deck_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    let was_active = aggregate.deck(deck_id).ok_or_else(deck_not_found)?.is_active;
    aggregate.decks.retain(|d| d.id != deck_id);
    if was_active {
        if let Some(next) = aggregate.decks.first_mut() {
            next.is_active = true;
            next.updated_at = now;
            log::debug!("deck {} promoted to active", next.id);
        }
    }
    Ok(())
}

pub fn set_active(
    aggregate: &mut PlayerAggregate,
    deck_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Deck, GameError> {
    aggregate.deck(deck_id).ok_or_else(deck_not_found)?;
    for deck in aggregate.decks.iter_mut() {
        deck.is_active = deck.id == deck_id;
        deck.updated_at = now;
    }
    get(aggregate, deck_id)
}

pub fn get_active(aggregate: &PlayerAggregate) -> Result<Deck, GameError> {
    aggregate
        .decks
        .iter()
        .find(|d| d.is_active)
        .cloned()
        .ok_or_else(|| GameError::validation("No active deck found"))
}
