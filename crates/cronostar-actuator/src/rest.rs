//! Home Assistant REST API actuator
//!
//! Sends `POST <base_url>/api/services/<domain>/<service>` with a
//! long-lived access token.

use crate::actuator::{Actuator, ActuatorError, ActuatorResult, Target};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout applied to each service call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RestActuator {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestActuator {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> ActuatorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn service_url(&self, domain: &str, service: &str) -> String {
        format!("{}/api/services/{}/{}", self.base_url, domain, service)
    }
}

#[async_trait]
impl Actuator for RestActuator {
    async fn apply(&self, target: &Target, value: f64) -> ActuatorResult<()> {
        let command = target.command(value)?;
        let url = self.service_url(&command.domain, &command.service);

        debug!(
            entity_id = %target.entity_id(),
            url = %url,
            value,
            "Calling Home Assistant service"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&command.data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                service = %command.service_id(),
                status = status.as_u16(),
                "Service call rejected"
            );
            return Err(ActuatorError::Rejected {
                service: command.service_id(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
