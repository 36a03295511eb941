use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// The chat sink must answer 200 within this window or the notification
/// counts as failed.
const NOTIFY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification endpoint answered {0}")]
    Status(u16),
    #[error("notification transport error: {0}")]
    Transport(String),
}

/// Fire-and-forget chat sink. One outbound call per invocation, no retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_notification(&self, recipient: &str, content: &str) -> Result<(), NotifyError>;
}

/// Posts WeCom-style messages as form fields to a fixed endpoint.
pub struct WeComNotifier {
    client: Client,
    endpoint: String,
}

impl WeComNotifier {
    pub fn new(endpoint: String) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(NOTIFY_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Notifier for WeComNotifier {
    async fn post_notification(&self, recipient: &str, content: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .form(&[("touseridlist", recipient), ("content", content)])
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        // Success is exactly 200, matching what the sink documents.
        if resp.status().as_u16() != 200 {
            return Err(NotifyError::Status(resp.status().as_u16()));
        }
        debug!(recipient, "notification delivered");
        Ok(())
    }
}
