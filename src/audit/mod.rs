//! Append-only, sequenced log of every committed economy operation.
//!
//! Entries are kept in memory and, when a [`persistence::FileWriter`] is attached, streamed to
//! a JSONL file by a background thread.

mod endpoints;
pub mod persistence;

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use uuid::Uuid;

use crate::economy::Currency;
use crate::error::GameError;
use crate::gacha::PullType;
use crate::rewards::Reward;
use persistence::FileWriter;

pub use endpoints::{list_actions_log, okapi_add_operation_for_list_actions_log_, ActionLogResponse};

/// What happened. One variant per committed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", tag = "type")]
pub enum ActionPayload {
    #[serde(rename_all = "camelCase")]
    PlayerRegistered {
        username: String,
    },
    #[serde(rename_all = "camelCase")]
    ProfileUpdated {
        username: String,
        icon_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    DailyLoginClaimed {
        consecutive_days: u32,
        gold: u64,
        gems: u64,
    },
    #[serde(rename_all = "camelCase")]
    StaminaRecovered {
        amount: u32,
        gems_spent: u64,
        stamina: u32,
    },
    #[serde(rename_all = "camelCase")]
    GachaPulled {
        banner_id: String,
        pull_type: PullType,
        currency: Currency,
        cost: u64,
        card_ids: Vec<Uuid>,
    },
    #[serde(rename_all = "camelCase")]
    CardEnhanced {
        target_card_id: Uuid,
        material_card_ids: Vec<Uuid>,
        gold_cost: u64,
        levels_gained: u32,
        exp_gained: u64,
    },
    #[serde(rename_all = "camelCase")]
    DeckCreated {
        deck_id: Uuid,
        total_cost: u32,
    },
    #[serde(rename_all = "camelCase")]
    DeckUpdated {
        deck_id: Uuid,
        total_cost: u32,
    },
    #[serde(rename_all = "camelCase")]
    DeckDeleted {
        deck_id: Uuid,
    },
    #[serde(rename_all = "camelCase")]
    DeckActivated {
        deck_id: Uuid,
    },
    #[serde(rename_all = "camelCase")]
    QuestStarted {
        quest_id: String,
        stamina_cost: u32,
    },
    #[serde(rename_all = "camelCase")]
    QuestCompleted {
        quest_id: String,
        victory: bool,
        first_clear: bool,
        rewards: Vec<Reward>,
    },
}

impl ActionPayload {
    pub fn action_type(&self) -> &'static str {
        match self {
            ActionPayload::PlayerRegistered { .. } => "PlayerRegistered",
            ActionPayload::ProfileUpdated { .. } => "ProfileUpdated",
            ActionPayload::DailyLoginClaimed { .. } => "DailyLoginClaimed",
            ActionPayload::StaminaRecovered { .. } => "StaminaRecovered",
            ActionPayload::GachaPulled { .. } => "GachaPulled",
            ActionPayload::CardEnhanced { .. } => "CardEnhanced",
            ActionPayload::DeckCreated { .. } => "DeckCreated",
            ActionPayload::DeckUpdated { .. } => "DeckUpdated",
            ActionPayload::DeckDeleted { .. } => "DeckDeleted",
            ActionPayload::DeckActivated { .. } => "DeckActivated",
            ActionPayload::QuestStarted { .. } => "QuestStarted",
            ActionPayload::QuestCompleted { .. } => "QuestCompleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ActionEntry {
    pub seq: u64,
    pub action_type: String,
    /// Player the action was committed for.
    pub actor: Uuid,
    pub payload: ActionPayload,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct LogState {
    last_seq: u64,
    entries: Vec<ActionEntry>,
}

#[derive(Debug, Default)]
pub struct ActionLog {
    state: Mutex<LogState>,
    writer: Option<FileWriter>,
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog::default()
    }

    fn from_entries(mut entries: Vec<ActionEntry>) -> ActionLog {
        entries.sort_by_key(|e| e.seq);
        let last_seq = entries.iter().map(|e| e.seq).max().unwrap_or(0);
        ActionLog {
            state: Mutex::new(LogState { last_seq, entries }),
            writer: None,
        }
    }

    /// Load existing entries from a JSONL file, continuing the sequence after the highest one.
    ///
    /// A torn final line is skipped; corruption anywhere else is an error.
    pub fn load_from_file(path: &Path) -> Result<ActionLog, GameError> {
        let contents = persistence::read_jsonl(path)?;
        Ok(ActionLog::from_entries(contents.entries))
    }

    /// Memory-only when `path` is `None`; otherwise loads what the file holds and appends to it.
    ///
    /// A torn final line is cut off the file before appending. A file that cannot be read is
    /// left alone and the log stays memory-only, so sequence numbers on disk are never reused.
    pub fn open(path: Option<&Path>) -> ActionLog {
        let Some(path) = path else {
            return ActionLog::new();
        };
        let mut log = if path.exists() {
            match persistence::read_jsonl(path).and_then(|contents| {
                persistence::repair_tail(path, &contents)?;
                Ok(contents)
            }) {
                Ok(contents) => ActionLog::from_entries(contents.entries),
                Err(e) => {
                    log::error!(
                        "action log {} is unreadable, keeping actions in memory only: {e}",
                        path.display()
                    );
                    return ActionLog::new();
                }
            }
        } else {
            ActionLog::new()
        };
        log.set_writer(Some(FileWriter::new(path.to_path_buf())));
        log::info!(
            "action log at {} ({} entries loaded)",
            path.display(),
            log.len()
        );
        log
    }

    pub fn set_writer(&mut self, writer: Option<FileWriter>) {
        self.writer = writer;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LogState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(e) => e.into_inner(),
        }
    }

    /// Append an entry with the next sequence number.
    pub fn append(&self, actor: Uuid, payload: ActionPayload, now: DateTime<Utc>) -> ActionEntry {
        let entry = {
            let mut state = self.lock();
            state.last_seq += 1;
            let entry = ActionEntry {
                seq: state.last_seq,
                action_type: payload.action_type().to_string(),
                actor,
                payload,
                timestamp: now,
            };
            state.entries.push(entry.clone());
            entry
        };
        if let Some(writer) = &self.writer {
            writer.send(entry.clone());
        }
        entry
    }

    /// Snapshot of all entries in sequence order.
    pub fn entries(&self) -> Vec<ActionEntry> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flush and close the file writer, if any.
    pub fn shutdown(&self) {
        if let Some(writer) = &self.writer {
            writer.close();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionQuery {
    pub from_seq: Option<u64>,
    pub action_type: Option<String>,
    pub actor: Option<Uuid>,
    pub limit: Option<usize>,
}

pub const DEFAULT_QUERY_LIMIT: usize = 1000;

impl ActionLog {
    /// Matching entries plus the sequence to continue from when more remain.
    pub fn query(&self, query: &ActionQuery) -> (Vec<ActionEntry>, Option<u64>, usize) {
        let limit = query.limit.unwrap_or(DEFAULT_QUERY_LIMIT);
        let state = self.lock();
        let mut matching: Vec<ActionEntry> = state
            .entries
            .iter()
            .filter(|e| query.from_seq.map_or(true, |from| e.seq >= from))
            .filter(|e| query.action_type.as_deref().map_or(true, |t| e.action_type == t))
            .filter(|e| query.actor.map_or(true, |a| e.actor == a))
            .take(limit.saturating_add(1))
            .cloned()
            .collect();
        let has_more = matching.len() > limit;
        matching.truncate(limit);
        let next_seq = if has_more {
            matching.last().map(|e| e.seq + 1)
        } else {
            None
        };
        (matching, next_seq, limit)
    }
}
