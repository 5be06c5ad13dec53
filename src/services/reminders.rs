use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{ReminderService, ServiceError, ServiceResult};
use crate::utils::reminder::ReminderSpec;

/// HTTP client for the reminder management API
pub struct RemindersClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReminderResponse {
    alert_token: String,
}

#[derive(Deserialize, Default)]
struct RemindersList {
    #[serde(default)]
    alerts: Vec<ReminderAlert>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReminderAlert {
    alert_token: String,
}

impl RemindersClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ReminderService for RemindersClient {
    async fn create_reminder(&self, spec: &ReminderSpec) -> ServiceResult<String> {
        let response = self
            .http
            .post(self.url("/v1/alerts/reminders"))
            .bearer_auth(&self.token)
            .json(spec)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_status(response.status()));
        }
        let created: CreateReminderResponse = response.json().await?;
        debug!("Created reminder with token {}", created.alert_token);
        Ok(created.alert_token)
    }

    async fn delete_reminder(&self, alert_token: &str) -> ServiceResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/v1/alerts/reminders/{}", alert_token)))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_status(response.status()));
        }
        debug!("Deleted reminder with token {}", alert_token);
        Ok(())
    }

    async fn list_reminders(&self) -> ServiceResult<Vec<String>> {
        let response = self
            .http
            .get(self.url("/v1/alerts/reminders"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_status(response.status()));
        }
        let list: RemindersList = response.json().await?;
        Ok(list.alerts.into_iter().map(|a| a.alert_token).collect())
    }
}
