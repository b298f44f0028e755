use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::platform::{CopyOutcome, IncomingMessage, Outbound};
use crate::router::Handler;

/// Sends every message back to its chat. Messages that cannot be copied get a
/// fixed text reply instead.
pub struct EchoHandler {
    fallback_text: String,
}

impl EchoHandler {
    pub fn new(fallback_text: impl Into<String>) -> Self {
        Self {
            fallback_text: fallback_text.into(),
        }
    }
}

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, message: &IncomingMessage, out: &dyn Outbound) -> Result<()> {
        match out.copy_message(message).await? {
            CopyOutcome::Copied => Ok(()),
            CopyOutcome::Unsupported(reason) => {
                info!("Not echoing message {}: {}", message.message_id, reason);
                out.send_text(message.chat_id, &self.fallback_text).await
            }
        }
    }
}
