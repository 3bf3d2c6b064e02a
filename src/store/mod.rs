//! Per-player state and the unit of work every mutating operation runs in.

mod aggregate;
mod memory;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::audit::{ActionLog, ActionPayload};
use crate::catalog::GameData;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::player::Player;

pub use aggregate::{player_seed, seed_bytes, PlayerAggregate};
pub use memory::MemoryStore;

/// Everything the HTTP layer shares between requests.
#[derive(Debug)]
pub struct GameState {
    pub data: GameData,
    pub store: MemoryStore,
    pub action_log: Arc<ActionLog>,
}

impl GameState {
    pub fn new(data: GameData, server_seed: u64, action_log: ActionLog) -> Self {
        GameState {
            data,
            store: MemoryStore::new(server_seed),
            action_log: Arc::new(action_log),
        }
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        let data = GameData::from_config(config)?;
        let action_log = ActionLog::open(config.action_log_file.as_deref());
        Ok(GameState::new(data, config.server_seed(), action_log))
    }

    /// Run a mutating operation for one player and record it in the action log.
    ///
    /// Nothing is stored or logged when `op` fails.
    pub async fn commit<T, F, D>(
        &self,
        player_id: Uuid,
        now: DateTime<Utc>,
        op: F,
        describe: D,
    ) -> Result<T, GameError>
    where
        F: FnOnce(&mut PlayerAggregate, &GameData) -> Result<T, GameError>,
        D: FnOnce(&T) -> ActionPayload,
    {
        let data = &self.data;
        let action_log = &self.action_log;
        self.store
            .transact(player_id, |aggregate| {
                let out = op(aggregate, data)?;
                action_log.append(player_id, describe(&out), now);
                Ok(out)
            })
            .await
    }

    pub fn register(&self, username: &str, now: DateTime<Utc>) -> Result<Player, GameError> {
        let player = self.store.register(username, now)?;
        self.action_log.append(
            player.id,
            ActionPayload::PlayerRegistered {
                username: player.username.clone(),
            },
            now,
        );
        log::info!("registered player {} ({})", player.id, player.username);
        Ok(player)
    }
}
