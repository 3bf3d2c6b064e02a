//! Player experience curve.

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::player::Player;

/// Experience needed to advance from `level` to `level + 1`.
pub fn exp_for_next_level(level: u32) -> u64 {
    let level = u64::from(level);
    level * level * 100
}

/// Level implied by a lifetime experience total.
///
/// A closed-form estimate only; levels are always advanced with [`apply_experience`].
#[allow(dead_code)]
pub(crate) fn level_from_exp(exp: u64) -> u32 {
    ((exp as f64 / 100.0).sqrt().floor() as u32).saturating_add(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct LevelUp {
    pub new_level: u32,
    pub new_exp: u64,
    pub leveled_up: bool,
    pub levels_gained: u32,
}

/// Carry `amount` into `(level, exp)`, levelling up as many times as it covers.
pub fn apply_experience(level: u32, exp: u64, amount: u64) -> LevelUp {
    let mut new_exp = exp.saturating_add(amount);
    let mut new_level = level;
    while new_exp >= exp_for_next_level(new_level) {
        new_exp -= exp_for_next_level(new_level);
        new_level += 1;
    }
    LevelUp {
        new_level,
        new_exp,
        leveled_up: new_level > level,
        levels_gained: new_level - level,
    }
}

pub fn add_experience(player: &mut Player, amount: u64) -> LevelUp {
    let result = apply_experience(player.level, player.exp, amount);
    player.level = result.new_level;
    player.exp = result.new_exp;
    if result.leveled_up {
        log::info!(
            "player {} reached level {} (+{})",
            player.id,
            result.new_level,
            result.levels_gained
        );
    }
    result
}
