//! # Gacha Card Game
//!
//! HTTP API for the economy side of a collectible card game: players spend gold and gems on
//! gacha banners, enhance the cards they pull, build decks and run quests for rewards.
//!
//! ## Architecture
//!
//! Each player's state lives in one aggregate behind its own async lock
//! ([`store::MemoryStore`]). Mutating endpoints run their engine against a working copy of the
//! aggregate and commit it, together with an [`audit`] log entry, only when the engine
//! succeeds. Engines take the current time and randomness as inputs so they can be tested
//! deterministically.

// Rocket makes this a bit tricky to support
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate rocket;

use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::Request;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

pub mod audit;
pub mod cards;
pub mod catalog;
pub mod config;
pub mod deck;
pub mod economy;
pub mod error;
pub mod gacha;
pub mod identity;
pub mod player;
pub mod quest;
pub mod rewards;
pub mod status_messages;
pub mod store;

use crate::catalog::GameData;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::status_messages::{new_status, ApiResponse};
use crate::store::GameState;

/// Builds the server from `GameConfig::from_env()`.
///
/// Bad game data or seed settings are logged and replaced with the built-in defaults, so the
/// server always starts.
///
/// # Example
///
/// ```no_run
/// use gacha_cardgame::rocket_initialize;
///
/// #[rocket::main]
/// async fn main() {
///     let _ = rocket_initialize().launch().await;
/// }
/// ```
pub fn rocket_initialize() -> rocket::Rocket<rocket::Build> {
    #[allow(clippy::no_effect_underscore_binding)]
    let _ = env_logger::try_init();

    let config = GameConfig::from_env();
    let state = match GameState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("could not load game data, falling back to built-in seed: {e}");
            let action_log = audit::ActionLog::open(config.action_log_file.as_deref());
            GameState::new(GameData::builtin(), config.server_seed(), action_log)
        }
    };
    rocket_with_state(state)
}

/// Builds the server around an existing state. Tests use this to fix the seed and data.
pub fn rocket_with_state(state: GameState) -> rocket::Rocket<rocket::Build> {
    use crate::audit::{list_actions_log, okapi_add_operation_for_list_actions_log_};
    use crate::cards::{
        enhance_card, list_collection, okapi_add_operation_for_enhance_card_,
        okapi_add_operation_for_list_collection_,
    };
    use crate::catalog::{
        get_card_master, list_card_masters, okapi_add_operation_for_get_card_master_,
        okapi_add_operation_for_list_card_masters_,
    };
    use crate::deck::{
        activate_deck, create_deck, delete_deck, get_active_deck, get_deck, list_decks,
        okapi_add_operation_for_activate_deck_, okapi_add_operation_for_create_deck_,
        okapi_add_operation_for_delete_deck_, okapi_add_operation_for_get_active_deck_,
        okapi_add_operation_for_get_deck_, okapi_add_operation_for_list_decks_,
        okapi_add_operation_for_update_deck_, update_deck,
    };
    use crate::gacha::{
        gacha_history, list_banners, okapi_add_operation_for_gacha_history_,
        okapi_add_operation_for_list_banners_, okapi_add_operation_for_pull_gacha_, pull_gacha,
    };
    use crate::player::{
        claim_daily_login, get_profile, okapi_add_operation_for_claim_daily_login_,
        okapi_add_operation_for_get_profile_, okapi_add_operation_for_recover_stamina_,
        okapi_add_operation_for_register_player_, okapi_add_operation_for_update_profile_,
        recover_stamina, register_player, update_profile,
    };
    use crate::quest::{
        complete_quest, get_quest, list_quest_progress, list_quests,
        okapi_add_operation_for_complete_quest_, okapi_add_operation_for_get_quest_,
        okapi_add_operation_for_list_quest_progress_, okapi_add_operation_for_list_quests_,
        okapi_add_operation_for_start_quest_, start_quest,
    };

    rocket::build()
        .mount(
            "/",
            openapi_get_routes![
                register_player,
                get_profile,
                update_profile,
                claim_daily_login,
                recover_stamina,
                list_card_masters,
                get_card_master,
                list_collection,
                enhance_card,
                list_banners,
                pull_gacha,
                gacha_history,
                list_decks,
                create_deck,
                get_active_deck,
                get_deck,
                update_deck,
                delete_deck,
                activate_deck,
                list_quests,
                list_quest_progress,
                get_quest,
                start_quest,
                complete_quest,
                list_actions_log
            ],
        )
        .mount("/swagger", make_swagger_ui(&get_docs()))
        .register("/", catchers![bad_request, not_found, unprocessable])
        .manage(state)
        .attach(AdHoc::on_liftoff("actionlog-shutdown", |rocket| {
            Box::pin(async move {
                // Flush the action log file writer when the process is asked to stop
                if let Some(action_log) = rocket.state::<GameState>().map(|s| s.action_log.clone())
                {
                    rocket::tokio::spawn(async move {
                        wait_for_shutdown_signal().await;
                        log::info!("shutting down, flushing action log");
                        action_log.shutdown();
                    });
                }
            })
        }))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use rocket::tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                rocket::tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                log::error!("cannot install signal handlers ({e}), waiting for ctrl-c");
                let _ = rocket::tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = rocket::tokio::signal::ctrl_c().await;
    }
}

#[catch(400)]
fn bad_request(_req: &Request) -> Json<ApiResponse<()>> {
    new_status(&GameError::validation("Malformed request"))
}

#[catch(404)]
fn not_found(req: &Request) -> Custom<Json<ApiResponse<()>>> {
    Custom(
        Status::NotFound,
        new_status(&GameError::validation(format!("No route for {}", req.uri()))),
    )
}

#[catch(422)]
fn unprocessable(_req: &Request) -> Json<ApiResponse<()>> {
    new_status(&GameError::validation("Request body does not match the expected shape"))
}

fn get_docs() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}
