use std::time::Duration;

use tracing::{debug, info};

use crate::utils::logging::redact_key;
use crate::utils::url::construct_api_url;

/// Outcome of one probe. Only [`KeyStatus::Valid`] counts as usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyStatus {
    Valid,
    Unauthorized,
    OtherStatus(u16),
    Unreachable,
}

/// Advisory check that a credential can list models. Never errors.
#[derive(Debug, Clone)]
pub struct KeyValidator {
    client: reqwest::Client,
    base_url: String,
}

impl KeyValidator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn check(&self, credential: &str) -> bool {
        let credential = credential.trim();
        if credential.is_empty() {
            debug!("key check skipped: empty credential");
            return false;
        }

        let status = self.probe(credential).await;
        info!(key = %redact_key(credential), ?status, "key check finished");
        status == KeyStatus::Valid
    }

    async fn probe(&self, credential: &str) -> KeyStatus {
        let url = construct_api_url(&self.base_url, "models");
        let response = self
            .client
            .get(url)
            .query(&[("key", credential)])
            .header("Content-Type", "application/json")
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    KeyStatus::Valid
                } else if status.as_u16() == 401 || status.as_u16() == 403 {
                    KeyStatus::Unauthorized
                } else {
                    KeyStatus::OtherStatus(status.as_u16())
                }
            }
            Err(err) => {
                debug!(error = %err, "key check transport failure");
                KeyStatus::Unreachable
            }
        }
    }
}
