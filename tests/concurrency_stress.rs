// Concurrent pulls against one wallet must never overspend it
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use gacha_cardgame::audit::ActionLog;
use gacha_cardgame::catalog::GameData;
use gacha_cardgame::economy::Currency;
use gacha_cardgame::error::GameError;
use gacha_cardgame::gacha::{self, PullResult, PullType};
use gacha_cardgame::store::GameState;
use uuid::Uuid;

async fn pull_once(state: &GameState, player_id: Uuid) -> Result<PullResult, GameError> {
    let now = Utc::now();
    state
        .commit(
            player_id,
            now,
            |agg, data| {
                gacha::pull(
                    agg,
                    &data.catalog,
                    &data.banners,
                    "standard",
                    PullType::Single,
                    Currency::Gold,
                    now,
                )
            },
            |r: &PullResult| gacha_cardgame::audit::ActionPayload::GachaPulled {
                banner_id: "standard".to_string(),
                pull_type: PullType::Single,
                currency: Currency::Gold,
                cost: r.cost,
                card_ids: r.cards.iter().map(|c| c.player_card.id).collect(),
            },
        )
        .await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_pulls_spend_exactly_the_balance() {
    let state = Arc::new(GameState::new(GameData::builtin(), 11, ActionLog::new()));
    // 10000 starting gold pays for exactly ten single pulls at 1000
    let player_id = state.register("spender", Utc::now()).expect("register").id;

    let attempts = 25usize;
    let mut handles = Vec::new();
    for _ in 0..attempts {
        let state = Arc::clone(&state);
        handles.push(tokio::spawn(async move { pull_once(&state, player_id).await }));
    }
    let mut succeeded = 0usize;
    let mut rejected = 0usize;
    for h in handles {
        match h.await.expect("task panicked") {
            Ok(_) => succeeded += 1,
            Err(GameError::InsufficientGold(_)) => rejected += 1,
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(succeeded, 10);
    assert_eq!(rejected, attempts - 10);

    let (gold, cards, pulls) = state
        .store
        .read(player_id, |agg| {
            (agg.player.gold, agg.cards.len(), agg.gacha_history.len())
        })
        .await
        .expect("read");
    assert_eq!(gold, 0);
    assert_eq!(cards, 10);
    assert_eq!(pulls, 10);

    let logged = state
        .action_log
        .entries()
        .iter()
        .filter(|e| e.action_type == "GachaPulled")
        .count();
    assert_eq!(logged, 10);
}

#[test]
fn action_log_sequence_is_gapless_across_threads() {
    let log = Arc::new(ActionLog::new());
    let threads = 16usize;
    let per_thread = 500usize;
    let mut handles = Vec::new();
    for i in 0..threads {
        let log = Arc::clone(&log);
        handles.push(thread::spawn(move || {
            let actor = Uuid::new_v4();
            for j in 0..per_thread {
                log.append(
                    actor,
                    gacha_cardgame::audit::ActionPayload::StaminaRecovered {
                        amount: (i + j) as u32,
                        gems_spent: 0,
                        stamina: 0,
                    },
                    Utc::now(),
                );
            }
        }));
    }
    for h in handles {
        h.join().expect("thread panicked");
    }
    let entries = log.entries();
    assert_eq!(entries.len(), threads * per_thread);
    for (idx, entry) in entries.iter().enumerate() {
        assert_eq!(entry.seq as usize, idx + 1);
    }
}

#[test]
fn players_do_not_block_each_other() {
    let state = Arc::new(GameState::new(GameData::builtin(), 3, ActionLog::new()));
    let players: Vec<Uuid> = (0..8)
        .map(|i| {
            state
                .register(&format!("player{i}"), Utc::now())
                .expect("register")
                .id
        })
        .collect();

    let handles: Vec<_> = players
        .iter()
        .map(|&id| {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .expect("runtime");
                (0..5)
                    .filter(|_| runtime.block_on(pull_once(&state, id)).is_ok())
                    .count()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().expect("thread panicked"), 5);
    }
    assert_eq!(state.action_log.len(), 8 + 8 * 5);
}
