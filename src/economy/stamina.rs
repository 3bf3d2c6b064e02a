//! Stamina Clock.
//!
//! Stamina is stored as a baseline plus the time it was last written; the current value is
//! derived from elapsed time. Reads that observe regeneration hand back an updated player so
//! the caller can persist the caught-up baseline.

use chrono::{DateTime, Utc};

use super::ledger::{self, AdjustOp, Currency};
use crate::error::GameError;
use crate::player::Player;

/// One stamina point regenerates per this many elapsed minutes.
pub const MINUTES_PER_STAMINA: i64 = 5;
pub const GEMS_PER_STAMINA: u64 = 10;

pub fn current_stamina(
    stored: u32,
    max: u32,
    last_update: DateTime<Utc>,
    now: DateTime<Utc>,
) -> u32 {
    let minutes_passed = (now - last_update).num_minutes().max(0);
    let recovered = minutes_passed / MINUTES_PER_STAMINA;
    let recovered = u32::try_from(recovered).unwrap_or(u32::MAX);
    stored.saturating_add(recovered).min(max)
}

/// Minutes until stamina is full again; zero when already full.
pub fn recovery_eta_minutes(stamina: u32, max: u32) -> u64 {
    u64::from(max.saturating_sub(stamina)) * MINUTES_PER_STAMINA as u64
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaminaReading {
    pub value: u32,
    /// Present when the read caught up regeneration that has to be persisted.
    pub updated: Option<Player>,
}

pub fn read(player: &Player, now: DateTime<Utc>) -> StaminaReading {
    let value = current_stamina(
        player.stamina,
        player.max_stamina,
        player.last_stamina_update,
        now,
    );
    let updated = (value != player.stamina).then(|| {
        let mut caught_up = player.clone();
        caught_up.stamina = value;
        caught_up.last_stamina_update = now;
        caught_up
    });
    StaminaReading { value, updated }
}

/// Apply a read to `player` in place and return the current value.
pub fn sync(player: &mut Player, now: DateTime<Utc>) -> u32 {
    let reading = read(player, now);
    if let Some(updated) = reading.updated {
        *player = updated;
    }
    reading.value
}

pub fn spend(player: &mut Player, amount: u32, now: DateTime<Utc>) -> Result<u32, GameError> {
    let current = sync(player, now);
    if current < amount {
        return Err(GameError::InsufficientStamina(format!(
            "Insufficient stamina: {current} available, {amount} required"
        )));
    }
    player.stamina = current - amount;
    player.last_stamina_update = now;
    Ok(player.stamina)
}

/// Restore up to `amount` stamina, optionally paying `amount * 10` gems first.
pub fn recover(
    player: &mut Player,
    amount: u32,
    pay_with_gems: bool,
    now: DateTime<Utc>,
) -> Result<u32, GameError> {
    let current = sync(player, now);
    if pay_with_gems {
        let gem_cost = u64::from(amount) * GEMS_PER_STAMINA;
        ledger::adjust(player, Currency::Gems, gem_cost, AdjustOp::Subtract)?;
    }
    player.stamina = current.saturating_add(amount).min(player.max_stamina);
    player.last_stamina_update = now;
    Ok(player.stamina)
}
