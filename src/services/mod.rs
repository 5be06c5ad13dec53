/// Clients for the external collaborators the skill consumes
mod celebrities;
mod profile;
mod reminders;

pub use celebrities::WikidataClient;
pub use profile::SettingsClient;
pub use reminders::RemindersClient;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::utils::reminder::ReminderSpec;

/// Status-tagged error shared by all collaborator clients
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("unauthorized (missing consent or permissions)")]
    Unauthorized,
    #[error("forbidden (not supported for this account or device)")]
    Forbidden,
    #[error("resource not found")]
    NotFound,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ServiceError {
    pub(crate) fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ServiceError::Unauthorized,
            StatusCode::FORBIDDEN => ServiceError::Forbidden,
            StatusCode::NOT_FOUND => ServiceError::NotFound,
            other => ServiceError::Status(other.as_u16()),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Account profile lookups, gated behind user consent
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// The account owner's given name, `None` when the user never set one
    async fn given_name(&self) -> ServiceResult<Option<String>>;
}

/// Per-device settings lookups
#[async_trait]
pub trait TimezoneService: Send + Sync {
    /// IANA timezone identifier configured for a device
    async fn device_timezone(&self, device_id: &str) -> ServiceResult<String>;
}

/// Scheduled reminder management
#[async_trait]
pub trait ReminderService: Send + Sync {
    /// Schedule a reminder, returning its opaque alert token
    async fn create_reminder(&self, spec: &ReminderSpec) -> ServiceResult<String>;
    async fn delete_reminder(&self, alert_token: &str) -> ServiceResult<()>;
    /// Tokens of the reminders this skill currently has scheduled
    async fn list_reminders(&self) -> ServiceResult<Vec<String>>;
}

/// Public dataset of notable people by birthday
#[async_trait]
pub trait BirthdayDatasetService: Send + Sync {
    /// Names of notable people born on (day, month), most notable first
    async fn notable_people(&self, day: u32, month: u32, limit: u32) -> ServiceResult<Vec<String>>;
}

/// The collaborator bundle handed to every request handler
pub struct Services {
    pub profile: Arc<dyn ProfileService>,
    pub timezone: Arc<dyn TimezoneService>,
    pub reminders: Arc<dyn ReminderService>,
    pub dataset: Arc<dyn BirthdayDatasetService>,
}
