// Telegram Bot API channel.
// Docs: https://core.telegram.org/bots/api#sendmessage

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::Channel;

// Telegram rejects messages over 4096 characters; stay safely under in
// bytes so multibyte text never trips the limit.
const MAX_MESSAGE_BYTES: usize = 4000;

pub struct TelegramChannel {
    client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramChannel {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.token)
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn max_bytes(&self) -> usize {
        MAX_MESSAGE_BYTES
    }

    async fn send(&self, chunk: &str) -> Result<()> {
        let body = json!({
            "chat_id": self.chat_id,
            "text": chunk,
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });

        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .context("Telegram request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram returned {status}: {detail}");
        }
        Ok(())
    }
}
