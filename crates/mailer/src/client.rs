//! Resend HTTP client.

use async_trait::async_trait;
use relay_core::{Error, Result};
use serde::Deserialize;
use std::time::{Duration, Instant};
use telemetry::metrics;
use tracing::{debug, error, info, warn};

use crate::config::MailerConfig;
use crate::message::OutboundEmail;

/// Outcome of a successful send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReceipt {
    /// Provider-assigned message id, when the response carried one
    pub id: Option<String>,
}

/// Anything that can deliver an [`OutboundEmail`].
///
/// Implementations make exactly one attempt per call. A missing
/// configuration is reported as [`Error::NotConfigured`], every other
/// failure as [`Error::Gateway`].
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt>;
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

/// Client for the Resend `POST /emails` API.
#[derive(Clone)]
pub struct ResendClient {
    config: MailerConfig,
    http_client: reqwest::Client,
}

impl ResendClient {
    /// Creates a new client. The request timeout comes from the config.
    pub fn new(config: MailerConfig) -> Result<Self> {
        config.validate().map_err(Error::internal)?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    async fn post(&self, api_key: &str, email: &OutboundEmail) -> Result<SendReceipt> {
        debug!(url = %self.config.api_url, subject = %email.subject, "Calling email provider");

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Email provider request failed");
                Error::gateway(format!("Send failed: {}", e))
            })?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Email provider returned error");
            return Err(Error::gateway(format!(
                "Resend error: {} {}",
                status.as_u16(),
                body
            )));
        }

        // The id is informational; an unexpected body still counts as sent.
        let id = response
            .json::<ResendResponse>()
            .await
            .ok()
            .and_then(|r| r.id);

        Ok(SendReceipt { id })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt> {
        let Some(api_key) = self.config.api_key() else {
            error!("Email provider API key is not set");
            return Err(Error::not_configured("RESEND_API_KEY is not set"));
        };

        let start = Instant::now();
        let result = self.post(api_key, email).await;
        metrics()
            .send_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        match &result {
            Ok(receipt) => {
                metrics().emails_sent.inc();
                info!(id = receipt.id.as_deref().unwrap_or("none"), "Email sent");
            }
            Err(_) => metrics().send_failures.inc(),
        }

        result
    }
}
