//! Fetch-with-retry client for the upstream forecast source.
//!
//! Every attempt is audited as an `AttemptRecord`, stamped before the
//! network call blocks. Timeouts, transport errors, non-2xx statuses and
//! undecodable bodies are all retryable; the first success returns
//! immediately. Exhausting the budget is a soft failure: the caller gets
//! `None` plus the full attempt batch and decides what to persist.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;

use crate::upstream::UpstreamPayload;
use windwatch_store::AttemptRecord;

/// Retry knobs for one ingestion fetch.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts per run.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the forecast source.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    url: String,
    policy: RetryPolicy,
}

impl ForecastClient {
    /// Build a client for `url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns the underlying `reqwest` error if the client cannot be built.
    pub fn new(
        url: impl Into<String>,
        request_timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            policy,
        })
    }

    /// Fetch the upstream payload, retrying up to the attempt budget.
    ///
    /// Returns the decoded payload (or `None` after the budget is spent)
    /// together with the complete attempt batch. Performs no persistence;
    /// the only side effects are the outbound requests and the
    /// inter-attempt sleeps.
    pub async fn fetch(&self) -> (Option<UpstreamPayload>, Vec<AttemptRecord>) {
        let mut attempts = Vec::new();

        for attempt_number in 1..=self.policy.max_attempts {
            // Stamp the record before the call blocks.
            let timestamp = Utc::now();
            tracing::info!(
                attempt = attempt_number,
                max = self.policy.max_attempts,
                url = %self.url,
                "Fetching forecast"
            );

            let outcome = self.attempt().await;
            match outcome {
                AttemptOutcome::Success { status, payload } => {
                    attempts.push(AttemptRecord {
                        attempt_number,
                        timestamp,
                        success: true,
                        status_code: Some(status),
                        error: None,
                    });
                    tracing::info!(status, "Successfully fetched forecast");
                    return (Some(payload), attempts);
                }
                AttemptOutcome::Failure { status, error } => {
                    tracing::warn!(
                        attempt = attempt_number,
                        status_code = ?status,
                        error = %error,
                        "Forecast fetch attempt failed"
                    );
                    attempts.push(AttemptRecord {
                        attempt_number,
                        timestamp,
                        success: false,
                        status_code: status,
                        error: Some(error),
                    });
                }
            }

            if attempt_number < self.policy.max_attempts {
                tokio::time::sleep(self.policy.retry_delay).await;
            }
        }

        tracing::error!(
            attempts = attempts.len(),
            "Failed to fetch forecast after exhausting retry budget"
        );
        (None, attempts)
    }

    async fn attempt(&self) -> AttemptOutcome {
        let response = match self.client.get(&self.url).send().await {
            Ok(r) => r,
            Err(e) => {
                let error = if e.is_timeout() {
                    "timed out".to_string()
                } else {
                    e.to_string()
                };
                return AttemptOutcome::Failure {
                    status: None,
                    error,
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            return AttemptOutcome::Failure {
                status: Some(status.as_u16()),
                error: format!("upstream returned {status}"),
            };
        }

        match response.json::<UpstreamPayload>().await {
            Ok(payload) => AttemptOutcome::Success {
                status: status.as_u16(),
                payload,
            },
            Err(e) => AttemptOutcome::Failure {
                status: Some(status.as_u16()),
                error: format!("undecodable body: {e}"),
            },
        }
    }
}

enum AttemptOutcome {
    Success { status: u16, payload: UpstreamPayload },
    Failure { status: Option<u16>, error: String },
}
