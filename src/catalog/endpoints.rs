use rocket::State;
use rocket_okapi::openapi;

use super::CardMaster;
use crate::status_messages::{respond, ApiResult};
use crate::store::GameState;

/// List every card in the catalog
#[openapi]
#[get("/cards/master")]
pub async fn list_card_masters(state: &State<GameState>) -> ApiResult<Vec<CardMaster>> {
    respond("list card masters", Ok(state.data.catalog.get_all().to_vec()))
}

/// Get one catalog entry
#[openapi]
#[get("/cards/master/<card_id>")]
pub async fn get_card_master(card_id: &str, state: &State<GameState>) -> ApiResult<CardMaster> {
    respond(
        "get card master",
        state.data.catalog.get_by_id(card_id).cloned(),
    )
}
