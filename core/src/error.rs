use sapper_protocol::RecordId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("No game in progress")]
    NoActiveGame,
    #[error("Game {0} not found")]
    NotFound(RecordId),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Failure reported by a record store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Record store failure: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
