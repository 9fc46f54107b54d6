use std::future::Future;
use std::time::Duration;

use tracing::info;

use crate::config::{Config, HTTP_TIMEOUT_SECS};
use crate::error::{AppError, Result};

/// The delivery-channel collaborator. Success must be synchronously
/// confirmable: the coordinator commits the watermark only after `deliver`
/// returns `Ok`.
pub trait Notifier {
    fn deliver(&self, text: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Posts the digest to Slack via `chat.postMessage`. In dry-run mode the
/// digest is logged instead and counts as delivered.
pub struct SlackNotifier {
    client: reqwest::Client,
    cfg: Config,
}

impl SlackNotifier {
    pub fn new(cfg: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, cfg })
    }
}

impl Notifier for SlackNotifier {
    async fn deliver(&self, text: &str) -> Result<()> {
        if self.cfg.dry_run {
            info!("DRY_RUN set; digest follows:\n{text}");
            return Ok(());
        }

        let url = format!("{}/chat.postMessage", self.cfg.slack_api_url);
        let params = [
            ("token", self.cfg.slack_token.as_str()),
            ("channel", self.cfg.slack_channel.as_str()),
            ("username", self.cfg.slack_bot_name.as_str()),
            ("as_user", "false"),
            ("unfurl_links", "false"),
            ("text", text),
        ];

        let resp = self.client.post(&url).form(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Delivery(format!(
                "chat.postMessage returned {status}"
            )));
        }

        // Slack reports failures inside a 200 body.
        let body: serde_json::Value = resp.json().await?;
        if !body.get("ok").and_then(|v| v.as_bool()).unwrap_or(false) {
            let cause = body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("unknown");
            return Err(AppError::Delivery(format!("Slack rejected message: {cause}")));
        }

        Ok(())
    }
}
