//! Daily Login Engine: a 7-day cycling streak with escalating gold and gem bonuses.

use chrono::{DateTime, Duration, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use super::Player;
use crate::economy::ledger::{self, AdjustOp, Currency};
use crate::error::GameError;
use crate::rewards::Reward;

pub const STREAK_CYCLE_DAYS: u32 = 7;
pub const STREAK_GRACE_HOURS: i64 = 48;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct DailyLoginResult {
    pub already_claimed: bool,
    pub consecutive_days: u32,
    pub rewards: Vec<Reward>,
}

pub fn gold_for_streak(streak: u32) -> u64 {
    100 * u64::from(streak)
}

pub fn gems_for_streak(streak: u32) -> u64 {
    if streak == STREAK_CYCLE_DAYS {
        500
    } else {
        10 * u64::from(streak)
    }
}

fn next_streak(player: &Player, last_login: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let continues = last_login
        .map(|last| now - last <= Duration::hours(STREAK_GRACE_HOURS))
        .unwrap_or(false);
    let streak = if continues {
        player.consecutive_login_days + 1
    } else {
        1
    };
    if streak > STREAK_CYCLE_DAYS {
        1
    } else {
        streak
    }
}

/// Claim today's bonus. A second claim on the same UTC calendar date changes nothing.
pub fn claim(player: &mut Player, now: DateTime<Utc>) -> Result<DailyLoginResult, GameError> {
    let last_login = player.last_login_date;
    if last_login.is_some_and(|last| last.date_naive() == now.date_naive()) {
        return Ok(DailyLoginResult {
            already_claimed: true,
            consecutive_days: player.consecutive_login_days,
            rewards: Vec::new(),
        });
    }

    let streak = next_streak(player, last_login, now);
    let gold = gold_for_streak(streak);
    let gems = gems_for_streak(streak);
    ledger::adjust(player, Currency::Gold, gold, AdjustOp::Add)?;
    ledger::adjust(player, Currency::Gems, gems, AdjustOp::Add)?;
    player.consecutive_login_days = streak;
    player.last_login_date = Some(now);

    Ok(DailyLoginResult {
        already_claimed: false,
        consecutive_days: streak,
        rewards: vec![Reward::gold(gold), Reward::gems(gems)],
    })
}
