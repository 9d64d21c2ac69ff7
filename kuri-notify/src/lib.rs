//! Outbound email delivery through the Cloudflare email worker.
//! Delivery is best-effort: callers log failures and move on.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use kuri_core::notify::{EmailMessage, Mailer};
use kuri_core::{CoreError, CoreResult};

/// Posts `{to, subject, body}` to the configured worker endpoint.
pub struct WorkerMailer {
    client: reqwest::Client,
    url: String,
}

impl WorkerMailer {
    pub fn new(url: String, timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::PersistenceError(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Mailer for WorkerMailer {
    async fn send(&self, message: &EmailMessage) -> CoreResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| CoreError::PersistenceError(format!("Email worker call failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CoreError::PersistenceError(format!(
                "Email worker responded with status {}",
                response.status()
            )));
        }

        info!("Confirmation email sent to {}", message.to);
        Ok(())
    }
}

/// Stand-in used when no worker URL is configured.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, message: &EmailMessage) -> CoreResult<()> {
        warn!(
            "Notifier worker URL is not set, skipping email to {}",
            message.to
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_payload_shape() {
        // The worker contract expects exactly {to, subject, body}.
        let message = EmailMessage {
            to: "budi@example.com".to_string(),
            subject: "Kuri Coffee Reservation Confirmed: RES-7".to_string(),
            body: "<h1>Reservation Confirmation</h1>".to_string(),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["to"], "budi@example.com");
        assert!(value["subject"].as_str().unwrap().contains("RES-7"));
        assert!(value.get("body").is_some());
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_noop_mailer_always_succeeds() {
        let message = EmailMessage {
            to: "budi@example.com".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(NoopMailer.send(&message).await.is_ok());
    }
}
