use chrono::Utc;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};
use uuid::Uuid;

use super::enhance::{self, EnhanceResult};
use super::OwnedCard;
use crate::audit::ActionPayload;
use crate::catalog::CardMaster;
use crate::error::GameError;
use crate::identity::CurrentPlayer;
use crate::status_messages::{respond, ApiResult};
use crate::store::GameState;

pub const MAX_MATERIALS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub target_card_id: Uuid,
    pub material_card_ids: Vec<Uuid>,
    pub gold_cost: u64,
}

/// An owned card joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CollectionEntry {
    pub player_card: OwnedCard,
    pub card_master: CardMaster,
}

/// The caller's card collection
#[openapi]
#[get("/cards/collection")]
pub async fn list_collection(
    player: CurrentPlayer,
    state: &State<GameState>,
) -> ApiResult<Vec<CollectionEntry>> {
    let result = async {
        let player_id = player.id()?;
        let catalog = &state.data.catalog;
        state
            .store
            .read(player_id, |agg| {
                agg.cards
                    .iter()
                    .filter_map(|card| {
                        catalog
                            .get_by_id(&card.card_master_id)
                            .ok()
                            .map(|master| CollectionEntry {
                                player_card: card.clone(),
                                card_master: master.clone(),
                            })
                    })
                    .collect::<Vec<_>>()
            })
            .await
    }
    .await;
    respond("collection", result)
}

/// Feed material cards into a target card
#[openapi]
#[post("/cards/enhance", format = "json", data = "<request>")]
pub async fn enhance_card(
    player: CurrentPlayer,
    request: Json<EnhanceRequest>,
    state: &State<GameState>,
) -> ApiResult<EnhanceResult> {
    let request = request.into_inner();
    let result = async {
        let player_id = player.id()?;
        if request.material_card_ids.len() > MAX_MATERIALS {
            return Err(GameError::validation(format!(
                "At most {MAX_MATERIALS} material cards"
            )));
        }
        if request.gold_cost == 0 {
            return Err(GameError::validation("goldCost must be positive"));
        }
        state
            .commit(
                player_id,
                Utc::now(),
                |agg, data| {
                    enhance::enhance(
                        agg,
                        &data.catalog,
                        request.target_card_id,
                        &request.material_card_ids,
                        request.gold_cost,
                    )
                },
                |r: &EnhanceResult| ActionPayload::CardEnhanced {
                    target_card_id: request.target_card_id,
                    material_card_ids: request.material_card_ids.clone(),
                    gold_cost: request.gold_cost,
                    levels_gained: r.levels_gained,
                    exp_gained: r.exp_gained,
                },
            )
            .await
    }
    .await;
    respond("enhance", result)
}
