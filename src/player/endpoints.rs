use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use rocket_okapi::{openapi, JsonSchema};
use uuid::Uuid;

use super::daily_login::{self, DailyLoginResult};
use super::Player;
use crate::audit::ActionPayload;
use crate::economy::{progression, stamina};
use crate::error::GameError;
use crate::identity::CurrentPlayer;
use crate::rewards::RewardType;
use crate::status_messages::{respond, respond_with, ApiResult};
use crate::store::GameState;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct RecoverStaminaRequest {
    pub amount: u32,
    #[serde(default)]
    pub use_gems: bool,
}

/// Fields left out keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct StaminaResponse {
    pub stamina: u32,
}

/// Player view with stamina caught up to the time of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct PlayerProfile {
    pub player_id: Uuid,
    pub username: String,
    pub icon_url: Option<String>,
    pub level: u32,
    pub exp: u64,
    pub exp_to_next_level: u64,
    pub gold: u64,
    pub gems: u64,
    pub stamina: u32,
    pub max_stamina: u32,
    pub last_stamina_update: DateTime<Utc>,
    /// Minutes until stamina is full; zero when full.
    pub stamina_full_in_minutes: u64,
    pub consecutive_login_days: u32,
    pub last_login_date: Option<DateTime<Utc>>,
}

impl From<&Player> for PlayerProfile {
    fn from(p: &Player) -> Self {
        PlayerProfile {
            player_id: p.id,
            username: p.username.clone(),
            icon_url: p.icon_url.clone(),
            level: p.level,
            exp: p.exp,
            exp_to_next_level: progression::exp_for_next_level(p.level),
            gold: p.gold,
            gems: p.gems,
            stamina: p.stamina,
            max_stamina: p.max_stamina,
            last_stamina_update: p.last_stamina_update,
            stamina_full_in_minutes: stamina::recovery_eta_minutes(p.stamina, p.max_stamina),
            consecutive_login_days: p.consecutive_login_days,
            last_login_date: p.last_login_date,
        }
    }
}

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;
const MAX_RECOVER_AMOUNT: u32 = 100;
const MAX_ICON_URL_LEN: usize = 2048;

fn check_username(username: &str) -> Result<&str, GameError> {
    let username = username.trim();
    if !USERNAME_LEN.contains(&username.chars().count()) {
        return Err(GameError::validation(format!(
            "Username must be {}-{} characters",
            USERNAME_LEN.start(),
            USERNAME_LEN.end()
        )));
    }
    Ok(username)
}

fn check_icon_url(url: &str) -> Result<&str, GameError> {
    let url = url.trim();
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .and_then(|rest| rest.split(['/', '?', '#']).next())
        .unwrap_or("");
    if host.is_empty() || url.len() > MAX_ICON_URL_LEN || url.chars().any(char::is_whitespace) {
        return Err(GameError::validation("iconUrl must be an http(s) URL"));
    }
    Ok(url)
}

/// Register a new player with starting resources
#[openapi]
#[post("/player/register", format = "json", data = "<request>")]
pub async fn register_player(
    request: Json<RegisterRequest>,
    state: &State<GameState>,
) -> ApiResult<PlayerProfile> {
    let result = check_username(&request.username)
        .and_then(|username| state.register(username, Utc::now()))
        .map(|player| PlayerProfile::from(&player));
    respond_with("register", Status::Created, result)
}

/// Current player's profile; persists any stamina regenerated since the last write
#[openapi]
#[get("/player/profile")]
pub async fn get_profile(player: CurrentPlayer, state: &State<GameState>) -> ApiResult<PlayerProfile> {
    let result = async {
        let player_id = player.id()?;
        let now = Utc::now();
        state
            .store
            .transact(player_id, |agg| {
                stamina::sync(&mut agg.player, now);
                Ok(PlayerProfile::from(&agg.player))
            })
            .await
    }
    .await;
    respond("profile", result)
}

/// Change the current player's username or icon
#[openapi]
#[put("/player/profile", format = "json", data = "<request>")]
pub async fn update_profile(
    player: CurrentPlayer,
    request: Json<UpdateProfileRequest>,
    state: &State<GameState>,
) -> ApiResult<PlayerProfile> {
    let request = request.into_inner();
    let result = async {
        let player_id = player.id()?;
        let username = request.username.as_deref().map(check_username).transpose()?;
        let icon_url = request.icon_url.as_deref().map(check_icon_url).transpose()?;
        let now = Utc::now();
        let store = &state.store;
        state
            .commit(
                player_id,
                now,
                |agg, _| {
                    if let Some(url) = icon_url {
                        agg.player.icon_url = Some(url.to_string());
                    }
                    if let Some(name) = username {
                        if name != agg.player.username {
                            store.rename(player_id, &agg.player.username, name)?;
                            agg.player.username = name.to_string();
                        }
                    }
                    stamina::sync(&mut agg.player, now);
                    Ok(PlayerProfile::from(&agg.player))
                },
                |profile: &PlayerProfile| ActionPayload::ProfileUpdated {
                    username: profile.username.clone(),
                    icon_url: profile.icon_url.clone(),
                },
            )
            .await
    }
    .await;
    respond("profile update", result)
}

/// Claim today's login bonus
#[openapi]
#[post("/player/daily-login")]
pub async fn claim_daily_login(
    player: CurrentPlayer,
    state: &State<GameState>,
) -> ApiResult<DailyLoginResult> {
    let result = async {
        let player_id = player.id()?;
        let now = Utc::now();
        state
            .commit(
                player_id,
                now,
                |agg, _| daily_login::claim(&mut agg.player, now),
                |r: &DailyLoginResult| {
                    let amount_of = |t: RewardType| {
                        r.rewards
                            .iter()
                            .find(|rw| rw.reward_type == t)
                            .and_then(|rw| rw.amount)
                            .unwrap_or(0)
                    };
                    ActionPayload::DailyLoginClaimed {
                        consecutive_days: r.consecutive_days,
                        gold: amount_of(RewardType::Gold),
                        gems: amount_of(RewardType::Gems),
                    }
                },
            )
            .await
    }
    .await;
    respond("daily login", result)
}

/// Restore stamina, optionally paying 10 gems per point
#[openapi]
#[post("/player/stamina/recover", format = "json", data = "<request>")]
pub async fn recover_stamina(
    player: CurrentPlayer,
    request: Json<RecoverStaminaRequest>,
    state: &State<GameState>,
) -> ApiResult<StaminaResponse> {
    let request = request.into_inner();
    let result = async {
        let player_id = player.id()?;
        if request.amount == 0 || request.amount > MAX_RECOVER_AMOUNT {
            return Err(GameError::validation(format!(
                "amount must be 1-{MAX_RECOVER_AMOUNT}"
            )));
        }
        let now = Utc::now();
        let gems_spent = if request.use_gems {
            u64::from(request.amount) * stamina::GEMS_PER_STAMINA
        } else {
            0
        };
        state
            .commit(
                player_id,
                now,
                |agg, _| stamina::recover(&mut agg.player, request.amount, request.use_gems, now),
                |value: &u32| ActionPayload::StaminaRecovered {
                    amount: request.amount,
                    gems_spent,
                    stamina: *value,
                },
            )
            .await
            .map(|stamina| StaminaResponse { stamina })
    }
    .await;
    respond("stamina recover", result)
}
