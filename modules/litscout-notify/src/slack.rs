// Slack incoming-webhook channel.
// Docs: https://api.slack.com/messaging/webhooks

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::Channel;

// Webhook payloads truncate around 40k characters; keep chunks well
// inside that so formatting survives intact.
const MAX_MESSAGE_BYTES: usize = 36_000;

pub struct SlackChannel {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackChannel {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Channel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn max_bytes(&self) -> usize {
        MAX_MESSAGE_BYTES
    }

    async fn send(&self, chunk: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "text": chunk }))
            .send()
            .await
            .context("Slack webhook request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("Slack webhook returned {status}: {detail}");
        }
        Ok(())
    }
}
