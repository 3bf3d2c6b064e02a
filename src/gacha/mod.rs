//! Gacha Engine.
//!
//! A pull resolves the banner, debits the full cost, draws from the catalog by rarity table,
//! materializes the drawn cards and appends one history record. It runs against a working copy
//! of the player aggregate, so any failure leaves the player untouched.

pub mod banner;
mod endpoints;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_pcg::Lcg64Xsh32;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use uuid::Uuid;

use crate::cards::{self, OwnedCard};
use crate::catalog::{CardMaster, Catalog, Rarity};
use crate::economy::ledger::{self, AdjustOp, Currency};
use crate::error::GameError;
use crate::store::PlayerAggregate;

pub use banner::GachaBanner;
pub use endpoints::{
    gacha_history, list_banners, okapi_add_operation_for_gacha_history_,
    okapi_add_operation_for_list_banners_, okapi_add_operation_for_pull_gacha_, pull_gacha,
    PullRequest,
};

pub const MULTI_PULL_COUNT: usize = 10;
/// Chance that a draw from a tier holding rate-up cards is restricted to those cards.
pub const RATE_UP_CHANCE: f64 = 0.5;

/// Cumulative rarity thresholds, rarest first. Anything above the last is common.
const RARITY_TABLE: [(Rarity, f64); 3] = [
    (Rarity::UltraRare, 0.02),
    (Rarity::SuperRare, 0.08),
    (Rarity::Rare, 0.20),
];

/// Rarity table for the guaranteed tenth card of a multi pull.
const GUARANTEE_TABLE: [(Rarity, f64); 2] = [(Rarity::Rare, 0.70), (Rarity::SuperRare, 0.25)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum PullType {
    Single,
    Multi,
}

impl PullType {
    pub fn draws(self) -> usize {
        match self {
            PullType::Single => 1,
            PullType::Multi => MULTI_PULL_COUNT,
        }
    }

    pub fn cost_multiplier(self) -> u64 {
        match self {
            PullType::Single => 1,
            PullType::Multi => 10,
        }
    }
}

/// Append-only audit record of one pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GachaHistory {
    pub id: Uuid,
    pub player_id: Uuid,
    pub banner_id: String,
    pub pull_type: PullType,
    pub currency_used: Currency,
    pub amount: u64,
    pub cards_obtained: Vec<Uuid>,
    pub pulled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct PulledCard {
    pub player_card: OwnedCard,
    pub card_master: CardMaster,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct PullResult {
    pub cards: Vec<PulledCard>,
    pub cost: u64,
}

/// Source of randomness for draws.
pub trait RollSource {
    /// Uniform sample in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Uniform index below `len`; `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.roll() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl RollSource for Lcg64Xsh32 {
    fn roll(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.gen_range(0..len.max(1))
    }
}

fn pick_from_table(table: &[(Rarity, f64)], fallback: Rarity, sample: f64) -> Rarity {
    let mut cumulative = 0.0;
    for (rarity, rate) in table {
        cumulative += rate;
        if sample < cumulative {
            return *rarity;
        }
    }
    fallback
}

/// Rarity of an unconstrained draw.
pub fn sample_rarity(sample: f64) -> Rarity {
    pick_from_table(&RARITY_TABLE, Rarity::Common, sample)
}

/// Rarity of the forced tenth card: rare 70%, super rare 25%, ultra rare 5%.
pub fn guaranteed_rarity(sample: f64) -> Rarity {
    pick_from_table(&GUARANTEE_TABLE, Rarity::UltraRare, sample)
}

/// The pool a draw of `rarity` picks from: the whole tier, or only its rate-up cards when the
/// tier has some and `sample` falls under [`RATE_UP_CHANCE`].
pub fn rate_up_pool<'a>(
    catalog: &'a Catalog,
    rarity: Rarity,
    rate_up_ids: &[String],
    sample: f64,
) -> Vec<&'a CardMaster> {
    let tier = catalog.of_rarity(rarity);
    let rate_up: Vec<&CardMaster> = tier
        .iter()
        .copied()
        .filter(|c| rate_up_ids.contains(&c.id))
        .collect();
    if !rate_up.is_empty() && sample < RATE_UP_CHANCE {
        rate_up
    } else {
        tier
    }
}

/// One card from the banner. `forced` skips the rarity roll.
pub fn draw<'a>(
    catalog: &'a Catalog,
    banner: &GachaBanner,
    forced: Option<Rarity>,
    rolls: &mut dyn RollSource,
) -> Result<&'a CardMaster, GameError> {
    let rarity = match forced {
        Some(rarity) => rarity,
        None => sample_rarity(rolls.roll()),
    };
    let pool = rate_up_pool(catalog, rarity, &banner.rate_up_card_ids, rolls.roll());
    if pool.is_empty() {
        return Err(GameError::internal(format!(
            "no {rarity:?} cards in catalog for banner {}",
            banner.id
        )));
    }
    let card = pool[rolls.index(pool.len())];
    log::debug!("drew {} ({rarity:?}) from {}", card.id, banner.id);
    Ok(card)
}

/// Draw all cards of a pull. A multi pull whose first nine draws are all common forces the
/// tenth to rare or better.
pub fn draw_cards<'a>(
    catalog: &'a Catalog,
    banner: &GachaBanner,
    pull_type: PullType,
    rolls: &mut dyn RollSource,
) -> Result<Vec<&'a CardMaster>, GameError> {
    let count = pull_type.draws();
    let mut drawn = Vec::with_capacity(count);
    for _ in 0..count.saturating_sub(1) {
        drawn.push(draw(catalog, banner, None, rolls)?);
    }
    let forced = match pull_type {
        PullType::Multi if !drawn.iter().any(|c| c.rarity.is_rare_or_above()) => {
            Some(guaranteed_rarity(rolls.roll()))
        }
        _ => None,
    };
    drawn.push(draw(catalog, banner, forced, rolls)?);
    Ok(drawn)
}

/// Pull against an already resolved banner.
pub fn pull_with(
    aggregate: &mut PlayerAggregate,
    catalog: &Catalog,
    banner: &GachaBanner,
    pull_type: PullType,
    currency: Currency,
    now: DateTime<Utc>,
    rolls: &mut dyn RollSource,
) -> Result<PullResult, GameError> {
    let cost = banner
        .base_cost(currency)?
        .checked_mul(pull_type.cost_multiplier())
        .ok_or_else(|| GameError::internal(format!("cost overflow on banner {}", banner.id)))?;
    ledger::adjust(&mut aggregate.player, currency, cost, AdjustOp::Subtract)?;

    let masters = draw_cards(catalog, banner, pull_type, rolls)?;
    let player_id = aggregate.player.id;
    let cards: Vec<PulledCard> = masters
        .into_iter()
        .map(|master| PulledCard {
            player_card: cards::materialize(player_id, master, now),
            card_master: master.clone(),
        })
        .collect();
    for pulled in &cards {
        aggregate.add_card(pulled.player_card.clone());
    }
    aggregate.gacha_history.push(GachaHistory {
        id: Uuid::new_v4(),
        player_id,
        banner_id: banner.id.clone(),
        pull_type,
        currency_used: currency,
        amount: cost,
        cards_obtained: cards.iter().map(|c| c.player_card.id).collect(),
        pulled_at: now,
    });
    log::info!(
        "player {player_id} pulled {pull_type:?} on {} for {cost} {currency:?}",
        banner.id
    );
    Ok(PullResult { cards, cost })
}

/// Pull using the player's own random stream.
pub fn pull(
    aggregate: &mut PlayerAggregate,
    catalog: &Catalog,
    banners: &[GachaBanner],
    banner_id: &str,
    pull_type: PullType,
    currency: Currency,
    now: DateTime<Utc>,
) -> Result<PullResult, GameError> {
    let banner = banner::find_available(banners, banner_id, now)?;
    let mut rng = aggregate.rng.clone();
    let result = pull_with(aggregate, catalog, banner, pull_type, currency, now, &mut rng)?;
    aggregate.rng = rng;
    Ok(result)
}

/// The player's pulls, oldest first, at most `limit`.
pub fn history(aggregate: &PlayerAggregate, limit: usize) -> Vec<GachaHistory> {
    aggregate
        .gacha_history
        .iter()
        .take(limit)
        .cloned()
        .collect()
}
