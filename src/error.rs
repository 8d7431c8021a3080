use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Riot API error: {status} - {message}")]
    RiotApi { status: u16, message: String },

    #[error("Riot API rate limit reached")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Discord error: {0}")]
    Discord(Box<serenity::Error>),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Player not found: {game_name}#{tag_line}")]
    PlayerNotFound { game_name: String, tag_line: String },

    #[error("{riot_id} is already registered by another member")]
    PlayerAlreadyRegistered { riot_id: String },

    #[error("This member is not registered")]
    NotRegistered,

    #[error("Member is no longer part of the server")]
    MembershipUnavailable,

    #[error("A rank synchronization is already running")]
    SyncInProgress,

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::RiotApi { status: 404, .. })
    }
}

impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::Discord(Box::new(err))
    }
}
