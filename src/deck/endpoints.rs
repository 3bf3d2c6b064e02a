use chrono::Utc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};
use uuid::Uuid;

use super::Deck;
use crate::audit::ActionPayload;
use crate::error::GameError;
use crate::identity::CurrentPlayer;
use crate::status_messages::{respond, respond_with, ApiResult};
use crate::store::GameState;

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CreateDeckRequest {
    pub name: String,
    pub card_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct UpdateDeckRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub card_ids: Option<Vec<Uuid>>,
}

fn check_name(name: &str) -> Result<(), GameError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(GameError::validation(format!(
            "Deck name must be 1-{MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn parse_deck_id(raw: &str) -> Result<Uuid, GameError> {
    Uuid::parse_str(raw).map_err(|_| GameError::validation("Invalid deck id"))
}

/// The caller's decks
#[openapi]
#[get("/decks")]
pub async fn list_decks(player: CurrentPlayer, state: &State<GameState>) -> ApiResult<Vec<Deck>> {
    let result = async {
        let player_id = player.id()?;
        state.store.read(player_id, super::list).await
    }
    .await;
    respond("list decks", result)
}

/// Create a deck; the first one becomes active
#[openapi]
#[post("/decks", format = "json", data = "<request>")]
pub async fn create_deck(
    player: CurrentPlayer,
    request: Json<CreateDeckRequest>,
    state: &State<GameState>,
) -> ApiResult<Deck> {
    let request = request.into_inner();
    let result = async {
        let player_id = player.id()?;
        check_name(&request.name)?;
        let now = Utc::now();
        state
            .commit(
                player_id,
                now,
                |agg, data| super::create(agg, &data.catalog, request.name, request.card_ids, now),
                |deck: &Deck| ActionPayload::DeckCreated {
                    deck_id: deck.id,
                    total_cost: deck.total_cost,
                },
            )
            .await
    }
    .await;
    respond_with("create deck", Status::Created, result)
}

/// The caller's active deck
#[openapi]
#[get("/decks/active")]
pub async fn get_active_deck(player: CurrentPlayer, state: &State<GameState>) -> ApiResult<Deck> {
    let result = async {
        let player_id = player.id()?;
        state.store.read(player_id, super::get_active).await?
    }
    .await;
    respond("active deck", result)
}

/// One of the caller's decks
#[openapi]
#[get("/decks/<deck_id>", rank = 2)]
pub async fn get_deck(
    player: CurrentPlayer,
    deck_id: &str,
    state: &State<GameState>,
) -> ApiResult<Deck> {
    let result = async {
        let player_id = player.id()?;
        let deck_id = parse_deck_id(deck_id)?;
        state
            .store
            .read(player_id, |agg| super::get(agg, deck_id))
            .await?
    }
    .await;
    respond("get deck", result)
}

/// Rename a deck and/or replace its cards
#[openapi]
#[put("/decks/<deck_id>", format = "json", data = "<request>")]
pub async fn update_deck(
    player: CurrentPlayer,
    deck_id: &str,
    request: Json<UpdateDeckRequest>,
    state: &State<GameState>,
) -> ApiResult<Deck> {
    let request = request.into_inner();
    let result = async {
        let player_id = player.id()?;
        let deck_id = parse_deck_id(deck_id)?;
        if let Some(name) = &request.name {
            check_name(name)?;
        }
        let now = Utc::now();
        state
            .commit(
                player_id,
                now,
                |agg, data| {
                    super::update(
                        agg,
                        &data.catalog,
                        deck_id,
                        request.name,
                        request.card_ids,
                        now,
                    )
                },
                |deck: &Deck| ActionPayload::DeckUpdated {
                    deck_id: deck.id,
                    total_cost: deck.total_cost,
                },
            )
            .await
    }
    .await;
    respond("update deck", result)
}

/// Delete a deck, promoting another if it was active
#[openapi]
#[delete("/decks/<deck_id>")]
pub async fn delete_deck(
    player: CurrentPlayer,
    deck_id: &str,
    state: &State<GameState>,
) -> ApiResult<bool> {
    let result = async {
        let player_id = player.id()?;
        let deck_id = parse_deck_id(deck_id)?;
        let now = Utc::now();
        state
            .commit(
                player_id,
                now,
                |agg, _| super::delete(agg, deck_id, now),
                |_: &()| ActionPayload::DeckDeleted { deck_id },
            )
            .await
            .map(|()| true)
    }
    .await;
    respond("delete deck", result)
}

/// Make a deck the only active one
#[openapi]
#[post("/decks/<deck_id>/activate")]
pub async fn activate_deck(
    player: CurrentPlayer,
    deck_id: &str,
    state: &State<GameState>,
) -> ApiResult<Deck> {
    let result = async {
        let player_id = player.id()?;
        let deck_id = parse_deck_id(deck_id)?;
        let now = Utc::now();
        state
            .commit(
                player_id,
                now,
                |agg, _| super::set_active(agg, deck_id, now),
                |deck: &Deck| ActionPayload::DeckActivated { deck_id: deck.id },
            )
            .await
    }
    .await;
    respond("activate deck", result)
}
