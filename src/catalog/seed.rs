//! Built-in game data used when no `GAME_DATA_FILE` is configured.

use chrono::{DateTime, TimeZone, Utc};

use super::{Attribute, CardMaster, Rarity};
use crate::gacha::GachaBanner;
use crate::quest::Quest;
use crate::rewards::Reward;

/// Midnight UTC on the given day; the unix epoch if the date does not exist.
fn utc_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn card(
    id: &str,
    name: &str,
    rarity: Rarity,
    attribute: Attribute,
    cost: u32,
    base_attack: u32,
    base_defense: u32,
    max_level: u32,
    description: &str,
) -> CardMaster {
    CardMaster {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        attribute,
        cost,
        base_attack,
        base_defense,
        max_level,
        description: description.to_string(),
    }
}

#[rustfmt::skip]
pub fn card_masters() -> Vec<CardMaster> {
    use Attribute::*;
    use Rarity::*;
    vec![
        // ---- common ----
        card("c_001", "Ember Sprite", Common, Fire, 2, 22, 14, 20, "A spark that learned to bite."),
        card("c_002", "Tide Crab", Common, Water, 2, 16, 24, 20, "Hides behind a shell of river stones."),
        card("c_003", "Mossback Toad", Common, Earth, 3, 20, 28, 20, "Slow, patient and very heavy."),
        card("c_004", "Gale Sparrow", Common, Wind, 2, 24, 12, 20, "Faster than it looks."),
        card("c_005", "Lantern Moth", Common, Light, 3, 18, 22, 20, "Drawn to every flame it meets."),
        card("c_006", "Shade Rat", Common, Dark, 2, 23, 13, 20, "Steals whatever is left unwatched."),
        card("c_007", "Clay Sentry", Common, Earth, 4, 26, 30, 20, "Built to guard a single door."),
        card("c_008", "Brook Otter", Common, Water, 3, 21, 19, 20, "Plays in the current, fights in it too."),
        // ---- rare ----
        card("r_001", "Flame Lancer", Rare, Fire, 5, 42, 30, 30, "Charges through smoke without slowing."),
        card("r_002", "Frost Maiden", Rare, Water, 5, 36, 40, 30, "Her touch stills running water."),
        card("r_003", "Stone Warden", Rare, Earth, 6, 34, 50, 30, "Sworn to the old mountain roads."),
        card("r_004", "Storm Archer", Rare, Wind, 5, 45, 26, 30, "Looses arrows on the leading edge of a gust."),
        card("r_005", "Dawn Cleric", Rare, Light, 4, 30, 38, 30, "Mends what the night has broken."),
        card("r_006", "Night Stalker", Rare, Dark, 5, 46, 24, 30, "Only seen when it wants to be."),
        // ---- super rare ----
        card("sr_001", "Inferno Drake", SuperRare, Fire, 7, 64, 48, 40, "Its breath leaves glass where sand once was."),
        card("sr_002", "Leviathan Calf", SuperRare, Water, 7, 56, 62, 40, "Already larger than most ships."),
        card("sr_003", "Tempest Knight", SuperRare, Wind, 8, 68, 50, 40, "Rides the eye of every storm."),
        card("sr_004", "Abyss Oracle", SuperRare, Dark, 7, 60, 54, 40, "Answers questions nobody asked."),
        // ---- ultra rare ----
        card("ur_001", "Phoenix Sovereign", UltraRare, Fire, 10, 92, 70, 50, "Every ending is only a molt."),
        card("ur_002", "Celestial Arbiter", UltraRare, Light, 10, 84, 84, 50, "Weighs each soul on a scale of starlight."),
        card("ur_003", "Worldroot Titan", UltraRare, Earth, 9, 78, 96, 50, "The forest grows on its shoulders."),
    ]
}

pub fn banners() -> Vec<GachaBanner> {
    vec![
        GachaBanner {
            id: "standard".to_string(),
            name: "Standard Summon".to_string(),
            description: "Every card in the catalog at base rates.".to_string(),
            start_date: utc_midnight(2020, 1, 1),
            end_date: utc_midnight(2100, 1, 1),
            cost_gold: Some(1000),
            cost_gems: Some(100),
            featured_card_ids: vec![],
            rate_up_card_ids: vec![],
        },
        GachaBanner {
            id: "blazing_skies".to_string(),
            name: "Blazing Skies".to_string(),
            description: "Fire cards are featured. Gems only.".to_string(),
            start_date: utc_midnight(2020, 1, 1),
            end_date: utc_midnight(2100, 1, 1),
            cost_gold: None,
            cost_gems: Some(150),
            featured_card_ids: vec!["ur_001".to_string(), "sr_001".to_string()],
            rate_up_card_ids: vec![
                "ur_001".to_string(),
                "sr_001".to_string(),
                "r_001".to_string(),
            ],
        },
        GachaBanner {
            id: "launch_celebration".to_string(),
            name: "Launch Celebration".to_string(),
            description: "Ended.".to_string(),
            start_date: utc_midnight(2020, 1, 1),
            end_date: utc_midnight(2021, 1, 1),
            cost_gold: Some(500),
            cost_gems: Some(50),
            featured_card_ids: vec!["ur_002".to_string()],
            rate_up_card_ids: vec!["ur_002".to_string()],
        },
    ]
}

pub fn quests() -> Vec<Quest> {
    vec![
        Quest {
            id: "q_001".to_string(),
            name: "Forest Path".to_string(),
            description: "Clear the goblins off the road to the village.".to_string(),
            stamina_cost: 10,
            required_level: 1,
            enemy_deck_id: Some("enemy_forest".to_string()),
            rewards: vec![Reward::gold(200), Reward::exp(50)],
            first_clear_rewards: vec![Reward::gems(50), Reward::card("c_002")],
            is_available: true,
        },
        Quest {
            id: "q_002".to_string(),
            name: "River Crossing".to_string(),
            description: "Something lives under the old bridge.".to_string(),
            stamina_cost: 15,
            required_level: 3,
            enemy_deck_id: Some("enemy_river".to_string()),
            rewards: vec![Reward::gold(300), Reward::exp(120)],
            first_clear_rewards: vec![Reward::gems(80)],
            is_available: true,
        },
        Quest {
            id: "q_003".to_string(),
            name: "Volcano Summit".to_string(),
            description: "The drake nesting at the crater is restless.".to_string(),
            stamina_cost: 25,
            required_level: 10,
            enemy_deck_id: Some("enemy_volcano".to_string()),
            rewards: vec![Reward::gold(800), Reward::exp(400), Reward::stamina(5)],
            first_clear_rewards: vec![Reward::gems(150), Reward::card("sr_001")],
            is_available: true,
        },
        Quest {
            id: "q_004".to_string(),
            name: "Sealed Shrine".to_string(),
            description: "Closed until the festival.".to_string(),
            stamina_cost: 20,
            required_level: 5,
            enemy_deck_id: None,
            rewards: vec![Reward::gold(500)],
            first_clear_rewards: vec![],
            is_available: false,
        },
    ]
}
