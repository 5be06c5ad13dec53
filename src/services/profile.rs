use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::{ProfileService, ServiceError, ServiceResult, TimezoneService};

/// HTTP client for the account/device settings API, which backs both the
/// profile and timezone collaborators
pub struct SettingsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SettingsClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Settings endpoints return their value as a bare JSON string
    async fn get_setting(&self, path: &str) -> ServiceResult<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<String>().await?),
            status => Err(ServiceError::from_status(status)),
        }
    }
}

#[async_trait]
impl ProfileService for SettingsClient {
    async fn given_name(&self) -> ServiceResult<Option<String>> {
        match self
            .get_setting("/v2/accounts/~current/settings/Profile.givenName")
            .await
        {
            Ok(name) if name.is_empty() => Ok(None),
            Ok(name) => Ok(Some(name)),
            // The user might simply not have set a name
            Err(ServiceError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl TimezoneService for SettingsClient {
    async fn device_timezone(&self, device_id: &str) -> ServiceResult<String> {
        self.get_setting(&format!(
            "/v2/devices/{}/settings/System.timeZone",
            device_id
        ))
        .await
    }
}
