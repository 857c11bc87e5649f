use std::env;
use std::path::PathBuf;

use tracing::info;

/// Deployment configuration loaded from environment variables.
/// Credentials are all optional: a channel or connector without credentials
/// is skipped, not an error. The keyword taxonomy and tuning knobs live in
/// the TOML file config, not here.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    // Slack incoming webhook
    pub slack_webhook_url: Option<String>,

    // Semantic Scholar
    pub s2_api_key: Option<String>,

    // Durable state (seen set, archive, dashboard) lives here
    pub state_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            telegram_bot_token: optional_env("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: optional_env("TELEGRAM_CHAT_ID"),
            slack_webhook_url: optional_env("SLACK_WEBHOOK_URL"),
            s2_api_key: optional_env("S2_API_KEY"),
            state_dir: env::var("LITSCOUT_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Log which credentials are present without printing their values.
    pub fn log_redacted(&self) {
        info!(
            telegram = self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some(),
            slack = self.slack_webhook_url.is_some(),
            semantic_scholar = self.s2_api_key.is_some(),
            state_dir = %self.state_dir.display(),
            "Config loaded"
        );
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
