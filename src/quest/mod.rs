//! Quest attempts: level gate, stamina cost and reward payout.
//!
//! Per player and quest the progress goes `NotStarted -> Attempted -> Cleared`. Cleared is
//! sticky, and the first-clear bundle is paid exactly once.

mod endpoints;

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::economy::stamina;
use crate::error::GameError;
use crate::rewards::{self, Reward};
use crate::store::PlayerAggregate;

pub use endpoints::{
    complete_quest, get_quest, list_quest_progress, list_quests,
    okapi_add_operation_for_complete_quest_, okapi_add_operation_for_get_quest_,
    okapi_add_operation_for_list_quest_progress_, okapi_add_operation_for_list_quests_,
    okapi_add_operation_for_start_quest_, start_quest, CompleteQuestRequest,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub stamina_cost: u32,
    pub required_level: u32,
    #[serde(default)]
    pub enemy_deck_id: Option<String>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub first_clear_rewards: Vec<Reward>,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct QuestProgress {
    pub player_id: Uuid,
    pub quest_id: String,
    pub cleared: bool,
    pub cleared_at: Option<DateTime<Utc>>,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct StartQuestResult {
    pub quest: Quest,
    pub enemy_deck_id: Option<String>,
    pub stamina_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CompleteQuestResult {
    pub victory: bool,
    /// Rewards actually granted.
    pub rewards: Vec<Reward>,
    pub first_clear: bool,
}

pub fn list_available(quests: &[Quest]) -> Vec<Quest> {
    quests.iter().filter(|q| q.is_available).cloned().collect()
}

/// A quest that exists and is open for attempts.
pub fn find_available<'a>(quests: &'a [Quest], quest_id: &str) -> Result<&'a Quest, GameError> {
    let quest = quests
        .iter()
        .find(|q| q.id == quest_id)
        .ok_or_else(|| GameError::validation("Quest not found"))?;
    if !quest.is_available {
        return Err(GameError::validation("Quest is not available"));
    }
    Ok(quest)
}

pub fn start(
    aggregate: &mut PlayerAggregate,
    quests: &[Quest],
    quest_id: &str,
    now: DateTime<Utc>,
) -> Result<StartQuestResult, GameError> {
    let quest = find_available(quests, quest_id)?;
    if aggregate.player.level < quest.required_level {
        return Err(GameError::LevelTooLow(format!(
            "Player level {} required",
            quest.required_level
        )));
    }
    stamina::spend(&mut aggregate.player, quest.stamina_cost, now)?;

    let player_id = aggregate.player.id;
    let progress = aggregate
        .quest_progress
        .entry(quest.id.clone())
        .or_insert_with(|| QuestProgress {
            player_id,
            quest_id: quest.id.clone(),
            cleared: false,
            cleared_at: None,
            attempts: 0,
        });
    progress.attempts += 1;
    log::info!(
        "player {player_id} started {} (attempt {})",
        quest.id,
        progress.attempts
    );

    Ok(StartQuestResult {
        quest: quest.clone(),
        enemy_deck_id: quest.enemy_deck_id.clone(),
        stamina_cost: quest.stamina_cost,
    })
}

pub fn complete(
    aggregate: &mut PlayerAggregate,
    catalog: &Catalog,
    quests: &[Quest],
    quest_id: &str,
    victory: bool,
    now: DateTime<Utc>,
) -> Result<CompleteQuestResult, GameError> {
    let quest = find_available(quests, quest_id)?;
    let progress = aggregate
        .quest_progress
        .get_mut(&quest.id)
        .ok_or_else(|| GameError::validation("Quest not started"))?;

    if !victory {
        return Ok(CompleteQuestResult {
            victory: false,
            rewards: Vec::new(),
            first_clear: false,
        });
    }

    let mut bundle = quest.rewards.clone();
    let first_clear = !progress.cleared;
    if first_clear {
        bundle.extend(quest.first_clear_rewards.iter().cloned());
        progress.cleared = true;
        progress.cleared_at = Some(now);
    }
    let granted = rewards::distribute(aggregate, catalog, &bundle, now)?;
    log::info!(
        "player {} cleared {} (first clear: {first_clear}, {} rewards)",
        aggregate.player.id,
        quest.id,
        granted.len()
    );
    Ok(CompleteQuestResult {
        victory: true,
        rewards: granted,
        first_clear,
    })
}

pub fn progress(aggregate: &PlayerAggregate) -> Vec<QuestProgress> {
    aggregate.quest_progress.values().cloned().collect()
}
