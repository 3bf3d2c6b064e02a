//! Player accounts: registration, profile reads and the daily login bonus.

pub mod daily_login;
mod endpoints;

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use uuid::Uuid;

pub use daily_login::{claim, DailyLoginResult};
pub use endpoints::{
    claim_daily_login, get_profile, okapi_add_operation_for_claim_daily_login_,
    okapi_add_operation_for_get_profile_, okapi_add_operation_for_recover_stamina_,
    okapi_add_operation_for_register_player_, okapi_add_operation_for_update_profile_,
    recover_stamina, register_player, update_profile, PlayerProfile, RecoverStaminaRequest,
    RegisterRequest, StaminaResponse, UpdateProfileRequest,
};

pub const STARTING_GOLD: u64 = 10_000;
pub const STARTING_GEMS: u64 = 500;
pub const STARTING_STAMINA: u32 = 100;

/// One row per account; every engine mutates it inside a store transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    pub level: u32,
    /// Progress inside the current level; reset on level-up.
    pub exp: u64,
    pub gold: u64,
    pub gems: u64,
    pub stamina: u32,
    pub max_stamina: u32,
    pub last_stamina_update: DateTime<Utc>,
    pub consecutive_login_days: u32,
    /// `None` until the first daily bonus is claimed.
    pub last_login_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(username: String, now: DateTime<Utc>) -> Self {
        Player {
            id: Uuid::new_v4(),
            username,
            icon_url: None,
            level: 1,
            exp: 0,
            gold: STARTING_GOLD,
            gems: STARTING_GEMS,
            stamina: STARTING_STAMINA,
            max_stamina: STARTING_STAMINA,
            last_stamina_update: now,
            consecutive_login_days: 0,
            last_login_date: None,
            created_at: now,
        }
    }
}
