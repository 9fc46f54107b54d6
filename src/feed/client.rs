use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::{Config, HTTP_TIMEOUT_SECS};
use crate::error::{AppError, Result};
use crate::feed::messages::{AnswersPage, QuestionsPage, TimelinePage};
use crate::feed::QuestionFeed;

/// Stack Exchange API client. One reused connection pool; every endpoint is
/// a single-page GET with the `site` parameter attached.
pub struct StackClient {
    client: reqwest::Client,
    cfg: Config,
}

impl StackClient {
    pub fn new(cfg: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .gzip(true)
            .build()?;
        Ok(Self { client, cfg })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let resp = self.client.get(url).query(params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Api(format!("GET {url} returned {status}")));
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl QuestionFeed for StackClient {
    async fn fetch_questions(&self) -> Result<QuestionsPage> {
        let url = format!("{}/questions", self.cfg.stack_api_url);
        self.get_json(
            &url,
            &[
                ("order", "desc".to_string()),
                ("sort", "activity".to_string()),
                ("tagged", self.cfg.tags.clone()),
                ("site", self.cfg.site.clone()),
            ],
        )
        .await
    }

    async fn fetch_timeline(&self, question_ids: &[u64]) -> Result<TimelinePage> {
        let url = format!(
            "{}/questions/{}/timeline",
            self.cfg.stack_api_url,
            join_ids(question_ids)
        );
        self.get_json(&url, &[("site", self.cfg.site.clone())]).await
    }

    async fn fetch_answers(
        &self,
        question_ids: &[u64],
        from_date: i64,
        to_date: i64,
    ) -> Result<AnswersPage> {
        let url = format!(
            "{}/questions/{}/answers",
            self.cfg.stack_api_url,
            join_ids(question_ids)
        );
        self.get_json(
            &url,
            &[
                ("fromdate", from_date.to_string()),
                ("todate", to_date.to_string()),
                ("order", "desc".to_string()),
                ("sort", "activity".to_string()),
                ("site", self.cfg.site.clone()),
            ],
        )
        .await
    }
}

/// The API takes vectorized ids as a semicolon-joined path segment.
fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(";")
}
