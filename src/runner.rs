use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::feed::client::StackClient;
use crate::feed::QuestionFeed;
use crate::pipeline::{apply_answers, build_ledger, classify_timeline, render_digest};
use crate::slack::{Notifier, SlackNotifier};
use crate::types::RunOutcome;
use crate::watermark::WatermarkStore;

/// The concrete runner wired up in main.
pub type AppRunner = Runner<StackClient, SlackNotifier>;

/// Sequences one digest run: watermark → questions → timeline →
/// (reconciliation) → digest → delivery → watermark commit.
///
/// The caller must serialize invocations against the same watermark store;
/// concurrent runs could clobber each other's advanced watermark and
/// produce missed or duplicated notifications.
pub struct Runner<F, N> {
    feed: F,
    notifier: N,
    store: WatermarkStore,
    cfg: Config,
}

impl<F: QuestionFeed, N: Notifier> Runner<F, N> {
    pub fn new(feed: F, notifier: N, store: WatermarkStore, cfg: Config) -> Self {
        Self { feed, notifier, store, cfg }
    }

    /// Current stored watermark, for health reporting.
    pub fn watermark(&self) -> Option<i64> {
        self.store.read()
    }

    pub async fn run_once(&self) -> Result<RunOutcome> {
        self.run_at(unix_now()).await
    }

    /// Run one cycle with `now` as the captured run-start time. `now` is
    /// sampled exactly once: it bounds the reconciliation date window and
    /// becomes the committed watermark, so the two can never disagree.
    pub async fn run_at(&self, now: i64) -> Result<RunOutcome> {
        let since = self.store.load_or_init(now)?;

        let questions = self.feed.fetch_questions().await?;
        if let (Some(max), Some(remaining)) = (questions.quota_max, questions.quota_remaining) {
            info!("quota_max: {max} quota_remaining: {remaining}");
        }

        let ledger = build_ledger(questions.items, since);
        if ledger.is_empty() {
            info!("No activity since {since}; nothing to report");
            return Ok(RunOutcome::NoActivity);
        }

        let ids: Vec<u64> = ledger.keys().copied().collect();
        let timeline = self.feed.fetch_timeline(&ids).await?;
        let (ledger, pending) =
            classify_timeline(ledger, timeline.items, since, &self.cfg.site_link_url);

        // New answers are invisible in the timeline beyond a bare signal;
        // resolve them against the answers endpoint for exactly the pending
        // questions over [since, now].
        let ledger = if pending.is_empty() {
            ledger
        } else {
            let pending_ids: Vec<u64> = pending.keys().copied().collect();
            let answers = self.feed.fetch_answers(&pending_ids, since, now).await?;
            apply_answers(ledger, pending, answers.items, &self.cfg.site_link_url)
        };

        let Some(digest) = render_digest(&ledger, &self.cfg.tags, &self.cfg.site_link_url) else {
            return Ok(RunOutcome::NoActivity);
        };

        self.notifier.deliver(&digest).await?;
        self.store.write(now)?;

        let questions = ledger.len();
        let events: usize = ledger.values().map(|a| a.actions.len()).sum();
        info!("Delivered digest: {questions} questions, {events} events; watermark now {now}");
        Ok(RunOutcome::Delivered { questions, events, watermark: now })
    }
}

pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
