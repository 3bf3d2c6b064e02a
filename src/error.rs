use rocket::http::Status;
use thiserror::Error;

/// Every way a game operation can fail.
///
/// Each variant carries the message shown to the client; `Internal` messages are
/// logged but never leaked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    PlayerNotFound(String),
    #[error("{0}")]
    CardNotFound(String),
    #[error("{0}")]
    CardNotOwned(String),
    #[error("{0}")]
    InvalidDeckSize(String),
    #[error("{0}")]
    DuplicateCardLimit(String),
    #[error("{0}")]
    DeckCostExceeded(String),
    #[error("{0}")]
    InsufficientGold(String),
    #[error("{0}")]
    InsufficientGems(String),
    #[error("{0}")]
    InsufficientStamina(String),
    #[error("{0}")]
    BannerNotAvailable(String),
    #[error("{0}")]
    LevelTooLow(String),
    #[error("{0}")]
    Internal(String),
}

impl GameError {
    pub fn validation(message: impl Into<String>) -> Self {
        GameError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GameError::Internal(message.into())
    }

    /// Stable numeric error code exposed in the response envelope.
    pub fn code(&self) -> u32 {
        match self {
            GameError::Unauthorized(_) => 1003,
            GameError::PlayerNotFound(_) => 2001,
            GameError::InsufficientGold(_) => 2002,
            GameError::InsufficientGems(_) => 2003,
            GameError::InsufficientStamina(_) => 2004,
            GameError::LevelTooLow(_) => 2005,
            GameError::CardNotFound(_) => 3001,
            GameError::CardNotOwned(_) => 3002,
            GameError::InvalidDeckSize(_) => 3003,
            GameError::DeckCostExceeded(_) => 3004,
            GameError::DuplicateCardLimit(_) => 3005,
            GameError::BannerNotAvailable(_) => 5001,
            GameError::Internal(_) => 9001,
            GameError::Validation(_) => 9003,
        }
    }

    /// Short name of the taxonomy entry, used in logs and the action log.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::Unauthorized(_) => "Unauthorized",
            GameError::Validation(_) => "ValidationError",
            GameError::PlayerNotFound(_) => "PlayerNotFound",
            GameError::CardNotFound(_) => "CardNotFound",
            GameError::CardNotOwned(_) => "CardNotOwned",
            GameError::InvalidDeckSize(_) => "InvalidDeckSize",
            GameError::DuplicateCardLimit(_) => "DuplicateCardLimit",
            GameError::DeckCostExceeded(_) => "DeckCostExceeded",
            GameError::InsufficientGold(_) => "InsufficientGold",
            GameError::InsufficientGems(_) => "InsufficientGems",
            GameError::InsufficientStamina(_) => "InsufficientStamina",
            GameError::BannerNotAvailable(_) => "BannerNotAvailable",
            GameError::LevelTooLow(_) => "LevelTooLow",
            GameError::Internal(_) => "InternalError",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            GameError::Unauthorized(_) => Status::Unauthorized,
            GameError::PlayerNotFound(_) => Status::NotFound,
            GameError::Internal(_) => Status::InternalServerError,
            _ => Status::BadRequest,
        }
    }

    /// Message safe to hand to a client.
    pub fn public_message(&self) -> String {
        match self {
            GameError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::Internal(e.to_string())
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Internal(e.to_string())
    }
}
