//! Client for the external push-notification sender.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::message::AlertPayload;

const SEND_TIMEOUT_SECS: u64 = 10;

/// Delivery failures. Never retried within a run; the next scheduled run
/// is the retry boundary.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Sender rejected notification with status {0}")]
    Rejected(u16),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    user_id: &'a str,
    payload: &'a AlertPayload,
}

/// HTTP client for the notification sender endpoint.
#[derive(Debug, Clone)]
pub struct NotifySender {
    client: Client,
    endpoint: String,
    user_id: String,
}

impl NotifySender {
    /// Build a sender client for `endpoint`, addressing `user_id`.
    ///
    /// # Errors
    /// Returns the underlying `reqwest` error if the client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            user_id: user_id.into(),
        })
    }

    /// Deliver one notification. Any non-2xx response is a failure.
    ///
    /// # Errors
    /// Returns `NotifyError` on transport failure or rejection.
    pub async fn send(&self, payload: &AlertPayload) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&Envelope {
                user_id: &self.user_id,
                payload,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        tracing::info!(status = status.as_u16(), "Notification sent");
        Ok(())
    }
}
