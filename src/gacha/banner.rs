use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::economy::Currency;
use crate::error::GameError;

/// A time-boxed gacha offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GachaBanner {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Per single pull; `None` or zero means gold is not accepted.
    #[serde(default)]
    pub cost_gold: Option<u64>,
    #[serde(default)]
    pub cost_gems: Option<u64>,
    #[serde(default)]
    pub featured_card_ids: Vec<String>,
    #[serde(default)]
    pub rate_up_card_ids: Vec<String>,
}

impl GachaBanner {
    /// Inclusive on both ends.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }

    pub fn base_cost(&self, currency: Currency) -> Result<u64, GameError> {
        let cost = match currency {
            Currency::Gold => self.cost_gold,
            Currency::Gems => self.cost_gems,
        };
        cost.filter(|c| *c > 0).ok_or_else(|| {
            GameError::BannerNotAvailable(format!(
                "This banner does not accept {}",
                match currency {
                    Currency::Gold => "gold",
                    Currency::Gems => "gems",
                }
            ))
        })
    }
}

/// Look up a banner that is open at `now`.
pub fn find_available<'a>(
    banners: &'a [GachaBanner],
    banner_id: &str,
    now: DateTime<Utc>,
) -> Result<&'a GachaBanner, GameError> {
    let banner = banners
        .iter()
        .find(|b| b.id == banner_id)
        .ok_or_else(|| GameError::BannerNotAvailable("Banner not found".to_string()))?;
    if !banner.is_available(now) {
        return Err(GameError::BannerNotAvailable(
            "Banner is not currently available".to_string(),
        ));
    }
    Ok(banner)
}

pub fn list_available(banners: &[GachaBanner], now: DateTime<Utc>) -> Vec<GachaBanner> {
    banners
        .iter()
        .filter(|b| b.is_available(now))
        .cloned()
        .collect()
}
