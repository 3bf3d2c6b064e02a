use std::fs;
use std::path::Path;

use rocket::serde::{Deserialize, Serialize};

use super::{seed, CardMaster, Catalog};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::gacha::GachaBanner;
use crate::quest::Quest;

/// On-disk shape of a `GAME_DATA_FILE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct GameDataFile {
    pub cards: Vec<CardMaster>,
    #[serde(default)]
    pub banners: Vec<GachaBanner>,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

/// Static reference data, read-only at runtime.
#[derive(Debug, Clone)]
pub struct GameData {
    pub catalog: Catalog,
    pub banners: Vec<GachaBanner>,
    pub quests: Vec<Quest>,
}

impl From<GameDataFile> for GameData {
    fn from(file: GameDataFile) -> Self {
        GameData {
            catalog: Catalog::new(file.cards),
            banners: file.banners,
            quests: file.quests,
        }
    }
}

impl GameData {
    pub fn builtin() -> Self {
        GameData {
            catalog: Catalog::new(seed::card_masters()),
            banners: seed::banners(),
            quests: seed::quests(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let raw = fs::read_to_string(path)?;
        let file: GameDataFile = serde_json::from_str(&raw)?;
        log::info!(
            "loaded {} cards, {} banners, {} quests from {}",
            file.cards.len(),
            file.banners.len(),
            file.quests.len(),
            path.display()
        );
        Ok(file.into())
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        match &config.game_data_file {
            Some(path) => GameData::from_file(path),
            None => Ok(GameData::builtin()),
        }
    }
}
