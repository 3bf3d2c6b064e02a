use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use chrono::{DateTime, Utc};
use rocket::futures::lock::Mutex;
use uuid::Uuid;

use super::PlayerAggregate;
use crate::error::GameError;
use crate::player::Player;

#[derive(Debug, Default)]
struct Directory {
    by_id: HashMap<Uuid, Arc<Mutex<PlayerAggregate>>>,
    by_username: HashMap<String, Uuid>,
}

/// Player aggregates behind one async lock each.
///
/// The directory lock is held only for lookups and registration, never across an await.
#[derive(Debug)]
pub struct MemoryStore {
    directory: StdMutex<Directory>,
    server_seed: u64,
}

impl MemoryStore {
    pub fn new(server_seed: u64) -> Self {
        MemoryStore {
            directory: StdMutex::new(Directory::default()),
            server_seed,
        }
    }

    fn directory(&self) -> MutexGuard<'_, Directory> {
        match self.directory.lock() {
            Ok(g) => g,
            Err(e) => e.into_inner(),
        }
    }

    fn slot(&self, player_id: Uuid) -> Result<Arc<Mutex<PlayerAggregate>>, GameError> {
        self.directory()
            .by_id
            .get(&player_id)
            .cloned()
            .ok_or_else(|| GameError::PlayerNotFound("Player not found".to_string()))
    }

    /// Create a player with starting resources. Usernames are unique.
    pub fn register(&self, username: &str, now: DateTime<Utc>) -> Result<Player, GameError> {
        let mut directory = self.directory();
        if directory.by_username.contains_key(username) {
            return Err(GameError::validation("Username already taken"));
        }
        let player = Player::new(username.to_string(), now);
        let aggregate = PlayerAggregate::new(player.clone(), self.server_seed);
        directory
            .by_username
            .insert(username.to_string(), player.id);
        directory
            .by_id
            .insert(player.id, Arc::new(Mutex::new(aggregate)));
        Ok(player)
    }

    /// Move a player to a new username. Fails when another player holds it.
    ///
    /// Callers hold the player's aggregate lock and write the new name into the aggregate.
    pub fn rename(&self, player_id: Uuid, from: &str, to: &str) -> Result<(), GameError> {
        let mut directory = self.directory();
        match directory.by_username.get(to) {
            Some(owner) if *owner == player_id => return Ok(()),
            Some(_) => return Err(GameError::validation("Username already taken")),
            None => {}
        }
        if directory.by_username.get(from) == Some(&player_id) {
            directory.by_username.remove(from);
        }
        directory.by_username.insert(to.to_string(), player_id);
        Ok(())
    }

    /// Run `op` against a copy of the player's aggregate and keep the copy only if `op`
    /// succeeds. Calls for the same player run one at a time.
    pub async fn transact<T, F>(&self, player_id: Uuid, op: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut PlayerAggregate) -> Result<T, GameError>,
    {
        let slot = self.slot(player_id)?;
        let mut committed = slot.lock().await;
        let mut working = committed.clone();
        let out = op(&mut working)?;
        *committed = working;
        Ok(out)
    }

    /// Read-only access to the player's aggregate.
    pub async fn read<T, F>(&self, player_id: Uuid, op: F) -> Result<T, GameError>
    where
        F: FnOnce(&PlayerAggregate) -> T,
    {
        let slot = self.slot(player_id)?;
        let aggregate = slot.lock().await;
        Ok(op(&aggregate))
    }

    pub fn player_count(&self) -> usize {
        self.directory().by_id.len()
    }
}
