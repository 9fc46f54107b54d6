use serde::Deserialize;

// ---------------------------------------------------------------------------
// Raw Stack Exchange API payloads
// ---------------------------------------------------------------------------

/// Common response wrapper. Quota fields are informational only and logged
/// by the coordinator, never enforced.
#[derive(Debug, Deserialize)]
pub struct QuestionsPage {
    #[serde(default)]
    pub items: Vec<RawQuestion>,
    pub quota_max: Option<u32>,
    pub quota_remaining: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    pub question_id: u64,
    pub title: String,
    pub last_activity_date: i64,
    pub creation_date: i64,
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub struct TimelinePage {
    #[serde(default)]
    pub items: Vec<RawTimelineEntry>,
}

/// One `/questions/{ids}/timeline` item. Fields are optional where different
/// timeline types carry different subsets; the actor arrives as either a
/// `user` or an `owner` object depending on the entry type.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimelineEntry {
    pub timeline_type: String,
    pub question_id: u64,
    pub post_id: Option<u64>,
    pub comment_id: Option<u64>,
    pub creation_date: i64,
    pub user: Option<RawActor>,
    pub owner: Option<RawActor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawActor {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswersPage {
    #[serde(default)]
    pub items: Vec<RawAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAnswer {
    pub answer_id: u64,
    pub question_id: u64,
    pub creation_date: i64,
    pub owner: Option<RawActor>,
}

impl RawAnswer {
    /// Decoded display name of the answerer, if the API reported one.
    pub fn actor(&self) -> Option<String> {
        self.owner.as_ref().and_then(decode_actor)
    }
}

// ---------------------------------------------------------------------------
// Parsed timeline events
// ---------------------------------------------------------------------------

/// A timeline entry reduced to the closed set of kinds this service reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEvent {
    /// The question itself was posted.
    Asked { question_id: u64, at: i64, who: String },
    /// A revision of either the question or one of its answers; which one is
    /// decided downstream by comparing `post_id` against the question id.
    Revised { question_id: u64, post_id: u64, at: i64, who: String },
    /// An answer was accepted.
    Accepted { question_id: u64, answer_id: u64, at: i64, who: String },
    /// A comment on the question or on an answer.
    Commented { question_id: u64, post_id: u64, comment_id: u64, at: i64, who: String },
    /// A new answer. The timeline carries neither the answerer nor the
    /// answer id, so this is only a signal that the answers endpoint must be
    /// consulted for this question.
    Answered { question_id: u64, at: i64 },
}

impl TimelineEvent {
    pub fn question_id(&self) -> u64 {
        match self {
            TimelineEvent::Asked { question_id, .. }
            | TimelineEvent::Revised { question_id, .. }
            | TimelineEvent::Accepted { question_id, .. }
            | TimelineEvent::Commented { question_id, .. }
            | TimelineEvent::Answered { question_id, .. } => *question_id,
        }
    }

    pub fn at(&self) -> i64 {
        match self {
            TimelineEvent::Asked { at, .. }
            | TimelineEvent::Revised { at, .. }
            | TimelineEvent::Accepted { at, .. }
            | TimelineEvent::Commented { at, .. }
            | TimelineEvent::Answered { at, .. } => *at,
        }
    }
}

/// Parse one raw timeline entry into a reportable event.
///
/// Returns `None` for timeline types outside the reported set
/// (`unaccepted_answer`, `post_state_changed`, `vote_aggregate`, and
/// whatever the API grows next) and for entries missing a field the
/// rendered event would need. Dropping instead of failing keeps the
/// classifier forward-compatible with new entry types.
pub fn parse_timeline_entry(raw: RawTimelineEntry) -> Option<TimelineEvent> {
    let question_id = raw.question_id;
    let at = raw.creation_date;

    match raw.timeline_type.as_str() {
        "question" => Some(TimelineEvent::Asked {
            question_id,
            at,
            who: resolve_actor(&raw)?,
        }),
        "revision" => Some(TimelineEvent::Revised {
            question_id,
            post_id: raw.post_id?,
            at,
            who: resolve_actor(&raw)?,
        }),
        "accepted_answer" => Some(TimelineEvent::Accepted {
            question_id,
            answer_id: raw.post_id?,
            at,
            who: resolve_actor(&raw)?,
        }),
        "comment" => Some(TimelineEvent::Commented {
            question_id,
            post_id: raw.post_id?,
            comment_id: raw.comment_id?,
            at,
            who: resolve_actor(&raw)?,
        }),
        "answer" => Some(TimelineEvent::Answered { question_id, at }),
        _ => None,
    }
}

/// Resolve the entry's actor from whichever of `user`/`owner` the API
/// populated, decoding HTML entities once here so nothing downstream has to.
fn resolve_actor(raw: &RawTimelineEntry) -> Option<String> {
    raw.user
        .as_ref()
        .or(raw.owner.as_ref())
        .and_then(decode_actor)
}

fn decode_actor(actor: &RawActor) -> Option<String> {
    actor
        .display_name
        .as_deref()
        .map(|name| html_escape::decode_html_entities(name).into_owned())
}
