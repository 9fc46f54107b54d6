use crate::error::{AppError, Result};

pub const STACK_API_URL: &str = "https://api.stackexchange.com/2.2";
pub const SLACK_API_URL: &str = "https://slack.com/api";
pub const SITE_LINK_URL: &str = "http://stackoverflow.com";

/// Request timeout for all outbound HTTP calls (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Slack message icons, one per rendered event kind.
pub mod icons {
    pub const NEW_ACTIVITY: &str = ":loudspeaker:";
    pub const TOPIC: &str = ":question:";
    pub const ASKED_QUESTION: &str = ":grey_question:";
    pub const REVISED_QUESTION: &str = ":pencil2:";
    pub const REVISED_ANSWER: &str = ":pencil:";
    pub const ANSWER_ACCEPTED: &str = ":white_check_mark:";
    pub const COMMENT: &str = ":speech_balloon:";
    pub const POSTED_ANSWER: &str = ":memo:";
}

#[derive(Debug, Clone)]
pub struct Config {
    pub stack_api_url: String,
    /// Stack Exchange site parameter, e.g. "stackoverflow".
    pub site: String,
    /// Semicolon-separated tag filter (TAGS), e.g. "rust;tokio".
    pub tags: String,
    /// Base URL for question/answer/comment permalinks.
    pub site_link_url: String,
    pub slack_api_url: String,
    pub slack_token: String,
    pub slack_channel: String,
    pub slack_bot_name: String,
    /// Render and log the digest instead of posting it (DRY_RUN).
    pub dry_run: bool,
    /// Path of the watermark file (WATERMARK_PATH).
    pub watermark_path: String,
    /// First-run lookback window in seconds, assembled from
    /// LOOKBACK_MINUTES + LOOKBACK_HOURS + LOOKBACK_DAYS.
    pub lookback_secs: i64,
    /// Background poll interval in seconds; 0 disables the poller (POLL_INTERVAL_SECS).
    pub poll_interval_secs: u64,
    pub api_port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let tags = std::env::var("TAGS").unwrap_or_default();
        if tags.trim().is_empty() {
            return Err(AppError::Config(
                "TAGS must be set (semicolon-separated tag list, e.g. \"rust;tokio\")".to_string(),
            ));
        }

        let dry_run = std::env::var("DRY_RUN")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let slack_token = std::env::var("SLACK_API_TOKEN").unwrap_or_default();
        let slack_channel = std::env::var("SLACK_CHANNEL").unwrap_or_default();
        if !dry_run && (slack_token.is_empty() || slack_channel.is_empty()) {
            return Err(AppError::Config(
                "SLACK_API_TOKEN and SLACK_CHANNEL must be set unless DRY_RUN=true".to_string(),
            ));
        }

        let minutes = env_i64("LOOKBACK_MINUTES", 0);
        let hours = env_i64("LOOKBACK_HOURS", 0);
        let days = env_i64("LOOKBACK_DAYS", 0);
        let mut lookback_secs = minutes * 60 + hours * 3600 + days * 86_400;
        if lookback_secs <= 0 {
            // An uninitialized watermark with no window would mean an
            // unbounded first fetch; default to one hour back.
            lookback_secs = 3600;
        }

        Ok(Self {
            stack_api_url: std::env::var("STACK_API_URL")
                .unwrap_or_else(|_| STACK_API_URL.to_string()),
            site: std::env::var("SITE").unwrap_or_else(|_| "stackoverflow".to_string()),
            tags,
            site_link_url: std::env::var("SITE_LINK_URL")
                .unwrap_or_else(|_| SITE_LINK_URL.to_string()),
            slack_api_url: std::env::var("SLACK_API_URL")
                .unwrap_or_else(|_| SLACK_API_URL.to_string()),
            slack_token,
            slack_channel,
            slack_bot_name: std::env::var("SLACK_BOT_NAME")
                .unwrap_or_else(|_| "stackwatch".to_string()),
            dry_run,
            watermark_path: std::env::var("WATERMARK_PATH")
                .unwrap_or_else(|_| "last_run".to_string()),
            lookback_secs,
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "0".to_string())
                .parse::<u64>()
                .unwrap_or(0),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}
