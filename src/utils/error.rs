use thiserror::Error;

use crate::services::ServiceError;

/// Errors the skill can surface to the dispatch layer
#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Invalid date: {message}")]
    InvalidDate { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Profile service error: {0}")]
    Profile(#[source] ServiceError),

    #[error("Timezone service error: {0}")]
    Timezone(#[source] ServiceError),

    #[error("Reminder service error: {0}")]
    Reminder(#[source] ServiceError),

    #[error("Birthday dataset error: {0}")]
    Dataset(#[source] ServiceError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SkillError {
    /// Build an `InvalidDate` error from anything displayable
    pub fn invalid_date(message: impl Into<String>) -> Self {
        SkillError::InvalidDate {
            message: message.into(),
        }
    }

    /// Build an `InvalidInput` error from anything displayable
    pub fn invalid_input(message: impl Into<String>) -> Self {
        SkillError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
