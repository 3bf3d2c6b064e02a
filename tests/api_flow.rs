use gacha_cardgame::audit::ActionLog;
use gacha_cardgame::catalog::GameData;
use gacha_cardgame::identity::PLAYER_ID_HEADER;
use gacha_cardgame::rocket_with_state;
use gacha_cardgame::store::GameState;
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::Client;
use serde_json::{json, Value};

fn client() -> Client {
    let state = GameState::new(GameData::builtin(), 7, ActionLog::new());
    Client::tracked(rocket_with_state(state)).expect("valid rocket instance")
}

fn as_player(id: &str) -> Header<'static> {
    Header::new(PLAYER_ID_HEADER, id.to_string())
}

fn register(client: &Client, username: &str) -> String {
    let response = client
        .post("/player/register")
        .header(ContentType::JSON)
        .body(json!({ "username": username }).to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Created);
    let body: Value = response.into_json().expect("json body");
    body["data"]["playerId"]
        .as_str()
        .expect("player id")
        .to_string()
}

fn get(client: &Client, player: &str, path: &str) -> (Status, Value) {
    let response = client.get(path.to_string()).header(as_player(player)).dispatch();
    let status = response.status();
    (status, response.into_json().expect("json body"))
}

fn post(client: &Client, player: &str, path: &str, body: Value) -> (Status, Value) {
    let response = client
        .post(path.to_string())
        .header(ContentType::JSON)
        .header(as_player(player))
        .body(body.to_string())
        .dispatch();
    let status = response.status();
    (status, response.into_json().expect("json body"))
}

fn put(client: &Client, player: &str, path: &str, body: Value) -> (Status, Value) {
    let response = client
        .put(path.to_string())
        .header(ContentType::JSON)
        .header(as_player(player))
        .body(body.to_string())
        .dispatch();
    let status = response.status();
    (status, response.into_json().expect("json body"))
}

fn error_code(body: &Value) -> u64 {
    body["error"]["code"].as_u64().expect("error code")
}

#[test]
fn registration_gives_starting_resources() {
    let client = client();
    let id = register(&client, "alice");
    let (status, body) = get(&client, &id, "/player/profile");
    assert_eq!(status, Status::Ok);
    assert_eq!(body["success"], json!(true));
    let profile = &body["data"];
    assert_eq!(profile["username"], json!("alice"));
    assert_eq!(profile["level"], json!(1));
    assert_eq!(profile["gold"], json!(10000));
    assert_eq!(profile["gems"], json!(500));
    assert_eq!(profile["stamina"], json!(100));
    assert_eq!(profile["staminaFullInMinutes"], json!(0));
}

#[test]
fn duplicate_and_short_usernames_are_rejected() {
    let client = client();
    register(&client, "bob");
    for name in ["bob", "bo"] {
        let response = client
            .post("/player/register")
            .header(ContentType::JSON)
            .body(json!({ "username": name }).to_string())
            .dispatch();
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().expect("json body");
        assert_eq!(body["success"], json!(false));
        assert_eq!(error_code(&body), 9003);
    }
}

#[test]
fn profile_update_renames_and_sets_icon() {
    let client = client();
    let carol = register(&client, "carol");
    let dave = register(&client, "dave");

    let (status, body) = put(&client, &carol, "/player/profile", json!({ "username": "dave" }));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(error_code(&body), 9003);
    assert_eq!(body["error"]["message"], json!("Username already taken"));

    let (status, body) = put(
        &client,
        &carol,
        "/player/profile",
        json!({ "username": "caroline", "iconUrl": "https://cdn.example.com/carol.png" }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["username"], json!("caroline"));
    assert_eq!(body["data"]["iconUrl"], json!("https://cdn.example.com/carol.png"));

    // a rejected update changes nothing
    let (status, body) = put(
        &client,
        &carol,
        "/player/profile",
        json!({ "iconUrl": "not a url" }),
    );
    assert_eq!(status, Status::BadRequest);
    assert_eq!(error_code(&body), 9003);
    let (_, body) = get(&client, &carol, "/player/profile");
    assert_eq!(body["data"]["username"], json!("caroline"));
    assert_eq!(body["data"]["iconUrl"], json!("https://cdn.example.com/carol.png"));

    // the old name is free again, the new one is not
    register(&client, "carol");
    let response = client
        .post("/player/register")
        .header(ContentType::JSON)
        .body(json!({ "username": "caroline" }).to_string())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);

    let (_, body) = put(&client, &dave, "/player/profile", json!({ "username": "caroline" }));
    assert_eq!(body["error"]["message"], json!("Username already taken"));

    let (_, body) = get(&client, &carol, "/actions/log?action_type=ProfileUpdated");
    let entries = body["data"]["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["payload"]["username"], json!("caroline"));
}

#[test]
fn missing_or_unknown_player_header() {
    let client = client();
    let response = client.get("/player/profile").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    let body: Value = response.into_json().expect("json body");
    assert_eq!(error_code(&body), 1003);

    let (status, body) = get(&client, "not-a-uuid", "/player/profile");
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(error_code(&body), 1003);

    let (status, body) = get(
        &client,
        "6f1c1a52-3f1e-4d5e-9a57-0d7f2b3c4e5f",
        "/player/profile",
    );
    assert_eq!(status, Status::NotFound);
    assert_eq!(error_code(&body), 2001);
}

#[test]
fn daily_login_once_per_day() {
    let client = client();
    let id = register(&client, "carol");
    let (status, first) = post(&client, &id, "/player/daily-login", json!({}));
    assert_eq!(status, Status::Ok);
    assert_eq!(first["data"]["alreadyClaimed"], json!(false));
    assert_eq!(first["data"]["consecutiveDays"], json!(1));

    let (_, second) = post(&client, &id, "/player/daily-login", json!({}));
    assert_eq!(second["data"]["alreadyClaimed"], json!(true));
    assert_eq!(second["data"]["rewards"], json!([]));

    let (_, profile) = get(&client, &id, "/player/profile");
    assert_eq!(profile["data"]["gold"], json!(10100));
    assert_eq!(profile["data"]["gems"], json!(510));
}

#[test]
fn catalog_and_banners() {
    let client = client();
    let response = client.get("/cards/master").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json body");
    assert_eq!(body["data"].as_array().map(Vec::len), Some(21));

    let response = client.get("/cards/master/sr_002").dispatch();
    let body: Value = response.into_json().expect("json body");
    assert_eq!(body["data"]["rarity"], json!("super_rare"));

    let response = client.get("/cards/master/nope").dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().expect("json body");
    assert_eq!(error_code(&body), 3001);

    let response = client.get("/gacha/banners").dispatch();
    let body: Value = response.into_json().expect("json body");
    let ids: Vec<&str> = body["data"]
        .as_array()
        .expect("banners")
        .iter()
        .filter_map(|b| b["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["standard", "blazing_skies"]);
}

#[test]
fn pull_enhance_and_build_a_deck() {
    let client = client();
    let id = register(&client, "dana");

    let (status, pull) = post(
        &client,
        &id,
        "/gacha/pull",
        json!({ "bannerId": "standard", "pullType": "multi", "currencyType": "gold" }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(pull["data"]["cost"], json!(10000));
    let pulled = pull["data"]["cards"].as_array().expect("cards");
    assert_eq!(pulled.len(), 10);
    assert!(pulled
        .iter()
        .any(|c| c["cardMaster"]["rarity"] != json!("common")));

    // the wallet is empty now
    let (status, body) = post(
        &client,
        &id,
        "/gacha/pull",
        json!({ "bannerId": "standard", "pullType": "single", "currencyType": "gold" }),
    );
    assert_eq!(status, Status::BadRequest);
    assert_eq!(error_code(&body), 2002);

    let (_, history) = get(&client, &id, "/gacha/history");
    assert_eq!(history["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(history["data"][0]["amount"], json!(10000));

    let (_, collection) = get(&client, &id, "/cards/collection");
    let mut owned: Vec<(String, u64)> = collection["data"]
        .as_array()
        .expect("collection")
        .iter()
        .map(|e| {
            (
                e["playerCard"]["id"].as_str().expect("id").to_string(),
                e["cardMaster"]["cost"].as_u64().expect("cost"),
            )
        })
        .collect();
    assert_eq!(owned.len(), 10);
    owned.sort_by_key(|(_, cost)| *cost);

    post(&client, &id, "/player/daily-login", json!({}));
    let (target, _) = owned.remove(0);
    let (material, _) = owned.remove(0);
    let (status, enhanced) = post(
        &client,
        &id,
        "/cards/enhance",
        json!({ "targetCardId": target, "materialCardIds": [material], "goldCost": 100 }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(enhanced["data"]["expGained"], json!(50));
    assert_eq!(enhanced["data"]["enhancedCard"]["exp"], json!(50));

    let (_, collection) = get(&client, &id, "/cards/collection");
    assert_eq!(collection["data"].as_array().map(Vec::len), Some(9));

    // the cheapest cards go in three times, the rest twice: 20 entries, cost at most 200
    owned.insert(0, (target, 0));
    let mut deck: Vec<String> = Vec::new();
    for (i, (card, _)) in owned.iter().enumerate() {
        let copies = if i < 2 { 3 } else { 2 };
        deck.extend(std::iter::repeat(card.clone()).take(copies));
    }
    assert_eq!(deck.len(), 20);

    let (status, body) = post(
        &client,
        &id,
        "/decks",
        json!({ "name": "Starter", "cardIds": deck[..19] }),
    );
    assert_eq!(status, Status::BadRequest);
    assert_eq!(error_code(&body), 3003);

    let (status, created) = post(
        &client,
        &id,
        "/decks",
        json!({ "name": "Starter", "cardIds": deck }),
    );
    assert_eq!(status, Status::Created);
    assert_eq!(created["data"]["isActive"], json!(true));
    let deck_id = created["data"]["id"].as_str().expect("deck id").to_string();

    let (_, active) = get(&client, &id, "/decks/active");
    assert_eq!(active["data"]["id"], json!(deck_id));

    let (status, _) = get(&client, &id, &format!("/decks/{deck_id}"));
    assert_eq!(status, Status::Ok);

    let response = client
        .delete(format!("/decks/{deck_id}"))
        .header(as_player(&id))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let (status, body) = get(&client, &id, "/decks/active");
    assert_eq!(status, Status::BadRequest);
    assert_eq!(error_code(&body), 9003);

    let (_, decks) = get(&client, &id, "/decks");
    assert_eq!(decks["data"], json!([]));
}

#[test]
fn quest_first_clear_pays_once() {
    let client = client();
    let id = register(&client, "erin");

    let (status, body) = post(&client, &id, "/quests/q_002/start", json!({}));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(error_code(&body), 2005);

    let (status, body) = post(
        &client,
        &id,
        "/quests/q_001/complete",
        json!({ "victory": true }),
    );
    assert_eq!(status, Status::BadRequest);
    assert_eq!(error_code(&body), 9003);

    let (status, started) = post(&client, &id, "/quests/q_001/start", json!({}));
    assert_eq!(status, Status::Ok);
    assert_eq!(started["data"]["staminaCost"], json!(10));
    assert_eq!(started["data"]["enemyDeckId"], json!("enemy_forest"));

    let (_, first) = post(
        &client,
        &id,
        "/quests/q_001/complete",
        json!({ "victory": true }),
    );
    assert_eq!(first["data"]["firstClear"], json!(true));
    assert_eq!(first["data"]["rewards"].as_array().map(Vec::len), Some(4));

    post(&client, &id, "/quests/q_001/start", json!({}));
    let (_, second) = post(
        &client,
        &id,
        "/quests/q_001/complete",
        json!({ "victory": true }),
    );
    assert_eq!(second["data"]["firstClear"], json!(false));
    assert_eq!(second["data"]["rewards"].as_array().map(Vec::len), Some(2));

    let (_, profile) = get(&client, &id, "/player/profile");
    assert_eq!(profile["data"]["gold"], json!(10400));
    assert_eq!(profile["data"]["gems"], json!(550));
    assert_eq!(profile["data"]["exp"], json!(0));
    assert_eq!(profile["data"]["level"], json!(2));
    assert_eq!(profile["data"]["stamina"], json!(80));

    let (_, collection) = get(&client, &id, "/cards/collection");
    assert_eq!(
        collection["data"][0]["cardMaster"]["id"],
        json!("c_002")
    );

    let (_, progress) = get(&client, &id, "/quests/progress");
    assert_eq!(progress["data"][0]["cleared"], json!(true));
    assert_eq!(progress["data"][0]["attempts"], json!(2));

    let response = client.get("/quests/q_004").dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
fn stamina_recovery_with_gems() {
    let client = client();
    let id = register(&client, "finn");
    post(&client, &id, "/quests/q_001/start", json!({}));

    let (status, body) = post(
        &client,
        &id,
        "/player/stamina/recover",
        json!({ "amount": 0 }),
    );
    assert_eq!(status, Status::BadRequest);
    assert_eq!(error_code(&body), 9003);

    let (status, body) = post(
        &client,
        &id,
        "/player/stamina/recover",
        json!({ "amount": 5, "useGems": true }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["stamina"], json!(95));

    let (_, profile) = get(&client, &id, "/player/profile");
    assert_eq!(profile["data"]["gems"], json!(450));
}

#[test]
fn committed_operations_show_up_in_the_action_log() {
    let client = client();
    let id = register(&client, "gale");
    post(&client, &id, "/player/daily-login", json!({}));
    post(
        &client,
        &id,
        "/gacha/pull",
        json!({ "bannerId": "blazing_skies", "pullType": "single", "currencyType": "gems" }),
    );
    // rejected: the banner takes gems only
    post(
        &client,
        &id,
        "/gacha/pull",
        json!({ "bannerId": "blazing_skies", "pullType": "single", "currencyType": "gold" }),
    );

    let (status, body) = get(&client, &id, "/actions/log");
    assert_eq!(status, Status::Ok);
    let types: Vec<&str> = body["data"]["entries"]
        .as_array()
        .expect("entries")
        .iter()
        .filter_map(|e| e["actionType"].as_str())
        .collect();
    assert_eq!(types, vec!["PlayerRegistered", "DailyLoginClaimed", "GachaPulled"]);

    let (_, body) = get(&client, &id, "/actions/log?action_type=GachaPulled");
    let pulled = &body["data"]["entries"][0];
    assert_eq!(pulled["seq"], json!(3));
    assert_eq!(pulled["payload"]["bannerId"], json!("blazing_skies"));
    assert_eq!(pulled["payload"]["cost"], json!(150));

    let (_, body) = get(&client, &id, "/actions/log?from_seq=1&limit=1");
    assert_eq!(body["data"]["nextSeq"], json!(2));
}

#[test]
fn action_log_is_private_to_each_player() {
    let client = client();
    let alice = register(&client, "alice");
    let mallory = register(&client, "mallory");
    post(&client, &alice, "/player/daily-login", json!({}));

    let response = client.get("/actions/log").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    let body: Value = response.into_json().expect("json body");
    assert_eq!(error_code(&body), 1003);
    assert!(body.get("data").is_none());

    let (status, body) = get(&client, &mallory, "/actions/log");
    assert_eq!(status, Status::Ok);
    let entries = body["data"]["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["actor"], json!(mallory));
    assert_eq!(entries[0]["payload"]["username"], json!("mallory"));
    assert!(!body.to_string().contains(&alice));
}

#[test]
fn unknown_routes_use_the_envelope() {
    let client = client();
    let response = client.get("/nowhere").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().expect("json body");
    assert_eq!(body["success"], json!(false));
}

#[test]
fn startup_manages_only_the_game_state() {
    let rocket = gacha_cardgame::rocket_initialize();
    assert!(rocket.state::<GameState>().is_some());
    assert!(rocket.state::<gacha_cardgame::config::GameConfig>().is_none());
}
