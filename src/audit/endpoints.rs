use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};

use super::{ActionEntry, ActionQuery};
use crate::identity::CurrentPlayer;
use crate::status_messages::{respond, ApiResult};
use crate::store::GameState;

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ActionLogResponse {
    pub entries: Vec<ActionEntry>,
    /// Where to continue from; absent when nothing more matched.
    pub next_seq: Option<u64>,
    pub limit: usize,
}

/// The caller's committed actions in sequence order, optionally filtered
#[openapi]
#[get("/actions/log?<from_seq>&<limit>&<action_type>")]
pub async fn list_actions_log(
    player: CurrentPlayer,
    from_seq: Option<u64>,
    limit: Option<usize>,
    action_type: Option<String>,
    state: &State<GameState>,
) -> ApiResult<ActionLogResponse> {
    let result = player.id().map(|player_id| {
        let (entries, next_seq, limit) = state.action_log.query(&ActionQuery {
            from_seq,
            action_type,
            actor: Some(player_id),
            limit,
        });
        ActionLogResponse {
            entries,
            next_seq,
            limit,
        }
    });
    respond("action log", result)
}
