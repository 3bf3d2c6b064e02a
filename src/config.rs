use std::path::PathBuf;

/// Process-wide settings, read once from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    /// JSONL file the action log is loaded from and appended to.
    pub action_log_file: Option<PathBuf>,
    /// JSON file with `{cards, banners, quests}` replacing the built-in seed data.
    pub game_data_file: Option<PathBuf>,
    /// Server seed every player RNG stream is derived from.
    pub gacha_seed: Option<u64>,
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let gacha_seed = non_empty("GACHA_SEED").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::warn!("ignoring GACHA_SEED={raw:?}: {e}");
                None
            }
        });
        GameConfig {
            action_log_file: non_empty("ACTION_LOG_FILE").map(PathBuf::from),
            game_data_file: non_empty("GAME_DATA_FILE").map(PathBuf::from),
            gacha_seed,
        }
    }

    /// The configured seed, or a fresh random one.
    pub fn server_seed(&self) -> u64 {
        self.gacha_seed.unwrap_or_else(rand::random::<u64>)
    }
}
