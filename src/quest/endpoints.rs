use chrono::Utc;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};

use super::{CompleteQuestResult, Quest, QuestProgress, StartQuestResult};
use crate::audit::ActionPayload;
use crate::identity::CurrentPlayer;
use crate::status_messages::{respond, ApiResult};
use crate::store::GameState;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CompleteQuestRequest {
    pub victory: bool,
}

/// Quests open for attempts
#[openapi]
#[get("/quests")]
pub async fn list_quests(state: &State<GameState>) -> ApiResult<Vec<Quest>> {
    respond("list quests", Ok(super::list_available(&state.data.quests)))
}

/// The caller's progress on every quest they have started
#[openapi]
#[get("/quests/progress")]
pub async fn list_quest_progress(
    player: CurrentPlayer,
    state: &State<GameState>,
) -> ApiResult<Vec<QuestProgress>> {
    let result = async {
        let player_id = player.id()?;
        state.store.read(player_id, super::progress).await
    }
    .await;
    respond("quest progress", result)
}

#[openapi]
#[get("/quests/<quest_id>", rank = 2)]
pub async fn get_quest(quest_id: &str, state: &State<GameState>) -> ApiResult<Quest> {
    respond(
        "get quest",
        super::find_available(&state.data.quests, quest_id).cloned(),
    )
}

/// Pay the stamina cost and record an attempt
#[openapi]
#[post("/quests/<quest_id>/start")]
pub async fn start_quest(
    player: CurrentPlayer,
    quest_id: &str,
    state: &State<GameState>,
) -> ApiResult<StartQuestResult> {
    let result = async {
        let player_id = player.id()?;
        let now = Utc::now();
        state
            .commit(
                player_id,
                now,
                |agg, data| super::start(agg, &data.quests, quest_id, now),
                |r: &StartQuestResult| ActionPayload::QuestStarted {
                    quest_id: r.quest.id.clone(),
                    stamina_cost: r.stamina_cost,
                },
            )
            .await
    }
    .await;
    respond("start quest", result)
}

/// Report the outcome of a started quest; a victory pays out its rewards
#[openapi]
#[post("/quests/<quest_id>/complete", format = "json", data = "<request>")]
pub async fn complete_quest(
    player: CurrentPlayer,
    quest_id: &str,
    request: Json<CompleteQuestRequest>,
    state: &State<GameState>,
) -> ApiResult<CompleteQuestResult> {
    let victory = request.victory;
    let result = async {
        let player_id = player.id()?;
        let now = Utc::now();
        state
            .commit(
                player_id,
                now,
                |agg, data| {
                    super::complete(agg, &data.catalog, &data.quests, quest_id, victory, now)
                },
                |r: &CompleteQuestResult| ActionPayload::QuestCompleted {
                    quest_id: quest_id.to_string(),
                    victory: r.victory,
                    first_clear: r.first_clear,
                    rewards: r.rewards.clone(),
                },
            )
            .await
    }
    .await;
    respond("complete quest", result)
}
