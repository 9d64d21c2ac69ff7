use async_trait::async_trait;
use serde::Serialize;

use crate::CoreResult;

/// Payload for the external email worker: `{to, subject, body}`.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Best-effort outbound notification. Callers log and swallow failures;
/// delivery is never part of a booking's transactional contract.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> CoreResult<()>;
}
