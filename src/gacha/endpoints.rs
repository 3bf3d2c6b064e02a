use chrono::Utc;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};

use super::banner::{self, GachaBanner};
use super::{GachaHistory, PullResult, PullType};
use crate::audit::ActionPayload;
use crate::economy::Currency;
use crate::identity::CurrentPlayer;
use crate::status_messages::{respond, ApiResult};
use crate::store::GameState;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct PullRequest {
    pub banner_id: String,
    pub pull_type: PullType,
    pub currency_type: Currency,
}

/// Banners open right now
#[openapi]
#[get("/gacha/banners")]
pub async fn list_banners(state: &State<GameState>) -> ApiResult<Vec<GachaBanner>> {
    respond(
        "list banners",
        Ok(banner::list_available(&state.data.banners, Utc::now())),
    )
}

/// Pull once or ten times on a banner
#[openapi]
#[post("/gacha/pull", format = "json", data = "<request>")]
pub async fn pull_gacha(
    player: CurrentPlayer,
    request: Json<PullRequest>,
    state: &State<GameState>,
) -> ApiResult<PullResult> {
    let request = request.into_inner();
    let result = async {
        let player_id = player.id()?;
        let now = Utc::now();
        state
            .commit(
                player_id,
                now,
                |agg, data| {
                    super::pull(
                        agg,
                        &data.catalog,
                        &data.banners,
                        &request.banner_id,
                        request.pull_type,
                        request.currency_type,
                        now,
                    )
                },
                |r: &PullResult| ActionPayload::GachaPulled {
                    banner_id: request.banner_id.clone(),
                    pull_type: request.pull_type,
                    currency: request.currency_type,
                    cost: r.cost,
                    card_ids: r.cards.iter().map(|c| c.player_card.id).collect(),
                },
            )
            .await
    }
    .await;
    respond("gacha pull", result)
}

/// The caller's pulls, oldest first
#[openapi]
#[get("/gacha/history?<limit>")]
pub async fn gacha_history(
    player: CurrentPlayer,
    limit: Option<usize>,
    state: &State<GameState>,
) -> ApiResult<Vec<GachaHistory>> {
    let result = async {
        let player_id = player.id()?;
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        state
            .store
            .read(player_id, |agg| super::history(agg, limit))
            .await
    }
    .await;
    respond("gacha history", result)
}
