use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::icons;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Closed set of reportable activity kinds. Timeline entry types outside this
/// set (unaccepted answers, post state changes, vote aggregates, anything the
/// API adds later) are dropped at the parse boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Asked,
    RevisedQuestion,
    RevisedAnswer,
    AnswerAccepted,
    PostedComment,
    PostedAnswer,
}

impl EventKind {
    /// Human-readable description rendered after the actor name.
    pub fn description(&self) -> &'static str {
        match self {
            EventKind::Asked => "asked this question.",
            EventKind::RevisedQuestion => "revised the question.",
            EventKind::RevisedAnswer => "revised an answer.",
            EventKind::AnswerAccepted => "answer was accepted.",
            EventKind::PostedComment => "made a comment.",
            EventKind::PostedAnswer => "posted an answer.",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EventKind::Asked => icons::ASKED_QUESTION,
            EventKind::RevisedQuestion => icons::REVISED_QUESTION,
            EventKind::RevisedAnswer => icons::REVISED_ANSWER,
            EventKind::AnswerAccepted => icons::ANSWER_ACCEPTED,
            EventKind::PostedComment => icons::COMMENT,
            EventKind::PostedAnswer => icons::POSTED_ANSWER,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::Asked => "asked",
            EventKind::RevisedQuestion => "revised_question",
            EventKind::RevisedAnswer => "revised_answer",
            EventKind::AnswerAccepted => "answer_accepted",
            EventKind::PostedComment => "posted_comment",
            EventKind::PostedAnswer => "posted_answer",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Per-run activity ledger
// ---------------------------------------------------------------------------

/// One reported occurrence on a question.
#[derive(Debug, Clone)]
pub struct ActionEvent {
    /// Epoch seconds of the event.
    pub when: i64,
    /// Decoded display name of the actor.
    pub who: String,
    pub kind: EventKind,
    /// Deep link for answer/comment events; question-level events have none.
    pub link: Option<String>,
}

/// Activity collected for a single question during one run.
#[derive(Debug, Clone)]
pub struct QuestionActivity {
    pub id: u64,
    /// Display title, HTML entities already decoded.
    pub title: String,
    pub creation_date: i64,
    pub link: String,
    pub actions: Vec<ActionEvent>,
}

/// Per-run mapping from question id to its activity record. BTreeMap keys
/// give the renderer its deterministic question order.
pub type Ledger = BTreeMap<u64, QuestionActivity>;

/// Question id → answer-creation timestamps seen as bare timeline "answer"
/// signals. Transient; resolved by the answer reconciliation pass.
pub type Pending = BTreeMap<u64, Vec<i64>>;

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// Result of one coordinator run, reported on the trigger API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RunOutcome {
    /// Nothing newer than the watermark; no fetches beyond the question
    /// list, no delivery, watermark untouched.
    NoActivity,
    /// Digest delivered and watermark advanced to the run's start time.
    Delivered {
        questions: usize,
        events: usize,
        watermark: i64,
    },
}

// ---------------------------------------------------------------------------
// Permalinks
// ---------------------------------------------------------------------------

pub fn answer_link(base: &str, answer_id: u64) -> String {
    format!("{base}/a/{answer_id}")
}

pub fn comment_link(base: &str, question_id: u64, post_id: u64, comment_id: u64) -> String {
    format!("{base}/questions/{question_id}/{post_id}#comment{comment_id}_{post_id}")
}
