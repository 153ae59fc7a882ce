//! Webhook delivery to the upstream push service, with exponential-backoff
//! retry.
//!
//! [`WebhookDelivery`] POSTs a JSON-encoded [`PushEvent`] to the push
//! service. Failed attempts are retried with backoff (1 s, 2 s, 4 s by
//! default) before the event is given up on.

use std::time::Duration;

use crate::bus::PushEvent;

/// Retry delays (exponential backoff: 1s, 2s, 4s).
const DEFAULT_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// Default HTTP request timeout for a single delivery attempt.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Push service returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// PushServiceConfig
// ---------------------------------------------------------------------------

/// Where and how to reach the upstream push service.
#[derive(Debug, Clone)]
pub struct PushServiceConfig {
    /// Endpoint receiving push events.
    pub url: String,
    /// Optional bearer token sent in the `Authorization` header.
    pub token: Option<String>,
    /// Per-attempt request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl PushServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `PUSH_SERVICE_URL` is not set, signalling that
    /// events should only be logged.
    ///
    /// | Variable                    | Required | Default |
    /// |-----------------------------|----------|---------|
    /// | `PUSH_SERVICE_URL`          | yes      | —       |
    /// | `PUSH_SERVICE_TOKEN`        | no       | —       |
    /// | `PUSH_REQUEST_TIMEOUT_SECS` | no       | `10`    |
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("PUSH_SERVICE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())?;
        Some(Self {
            url,
            token: std::env::var("PUSH_SERVICE_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            request_timeout_secs: std::env::var("PUSH_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Delivers push events to the push service endpoint.
pub struct WebhookDelivery {
    client: reqwest::Client,
    config: PushServiceConfig,
    retry_delays: Vec<Duration>,
}

impl WebhookDelivery {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new(config: PushServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            config,
            retry_delays: DEFAULT_RETRY_DELAYS.to_vec(),
        }
    }

    /// Replace the backoff schedule. One retry is made per delay.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Deliver an event with retry.
    ///
    /// Returns `Ok(())` on the first successful attempt, or the last error
    /// once every retry has failed.
    pub async fn deliver(&self, event: &PushEvent) -> Result<(), WebhookError> {
        let url = self.config.url.as_str();

        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_send(event).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url,
                        event_id = %event.event_id,
                        error = %e,
                        "Push delivery attempt failed, retrying"
                    );
                    tokio::time::sleep(*delay).await;
                }
            }
        }

        // Final attempt after the last backoff.
        self.try_send(event).await.inspect_err(|e| {
            tracing::error!(
                url,
                event_id = %event.event_id,
                error = %e,
                "Push delivery failed after all retries"
            );
        })
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, event: &PushEvent) -> Result<(), WebhookError> {
        let mut request = self.client.post(&self.config.url).json(event);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let delivery = WebhookDelivery::new(PushServiceConfig::new("http://localhost:9/push"));
        assert_eq!(delivery.url(), "http://localhost:9/push");
        assert_eq!(delivery.retry_delays.len(), 3);
    }

    #[test]
    fn config_defaults() {
        let config = PushServiceConfig::new("http://push.local");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.token.is_none());
    }

    #[test]
    fn webhook_error_display_http_status() {
        let err = WebhookError::HttpStatus(502);
        assert_eq!(err.to_string(), "Push service returned HTTP 502");
    }

    #[test]
    fn webhook_error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = WebhookError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
