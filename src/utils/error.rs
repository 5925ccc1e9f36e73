use thiserror::Error;

use crate::models::{PersonValidationError, PurchaseTransitionError, SettingsValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Lagringsfel: {0}")]
    Storage(String),

    #[error("Databasfel: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialiseringsfel: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO-fel: {0}")]
    Io(#[from] std::io::Error),

    #[error("Valideringsfel: {0}")]
    Validation(String),

    #[error("Ogiltig person: {0}")]
    InvalidPerson(#[from] PersonValidationError),

    #[error("Ogiltiga inställningar: {0}")]
    InvalidSettings(#[from] SettingsValidationError),

    #[error("Hittades inte: {0}")]
    NotFound(String),

    #[error("Ogiltig statusövergång: {0}")]
    InvalidTransition(#[from] PurchaseTransitionError),

    #[error("Notifieringsfel: {0}")]
    Notification(String),
}

impl AppError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Inmatningen avvisades innan något ändrades
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidPerson(_) | Self::InvalidSettings(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
