use crate::feed::messages::{parse_timeline_entry, RawTimelineEntry, TimelineEvent};
use crate::types::{answer_link, comment_link, ActionEvent, EventKind, Ledger, Pending};

/// Walk the combined timeline response and append one action per reportable
/// event to the owning ledger entry.
///
/// Entries at or before the watermark are skipped, as are entries for
/// question ids absent from the ledger (the fetch is scoped to ledger ids,
/// so those should not occur, but a stray entry must not fail the run).
///
/// `answer` entries are not appended: the timeline gives neither the
/// answerer nor the answer id, so they only feed the pending map consumed
/// by the reconciliation pass.
pub fn classify_timeline(
    mut ledger: Ledger,
    entries: Vec<RawTimelineEntry>,
    watermark: i64,
    link_base: &str,
) -> (Ledger, Pending) {
    let mut pending = Pending::new();

    for raw in entries {
        let Some(event) = parse_timeline_entry(raw) else {
            continue;
        };
        if event.at() <= watermark {
            continue;
        }
        let Some(activity) = ledger.get_mut(&event.question_id()) else {
            continue;
        };

        match event {
            TimelineEvent::Asked { at, who, .. } => {
                activity.actions.push(ActionEvent {
                    when: at,
                    who,
                    kind: EventKind::Asked,
                    link: None,
                });
            }
            TimelineEvent::Revised { question_id, post_id, at, who } => {
                if post_id == question_id {
                    activity.actions.push(ActionEvent {
                        when: at,
                        who,
                        kind: EventKind::RevisedQuestion,
                        link: None,
                    });
                } else {
                    activity.actions.push(ActionEvent {
                        when: at,
                        who,
                        kind: EventKind::RevisedAnswer,
                        link: Some(answer_link(link_base, post_id)),
                    });
                }
            }
            TimelineEvent::Accepted { answer_id, at, who, .. } => {
                activity.actions.push(ActionEvent {
                    when: at,
                    who,
                    kind: EventKind::AnswerAccepted,
                    link: Some(answer_link(link_base, answer_id)),
                });
            }
            TimelineEvent::Commented { question_id, post_id, comment_id, at, who } => {
                activity.actions.push(ActionEvent {
                    when: at,
                    who,
                    kind: EventKind::PostedComment,
                    link: Some(comment_link(link_base, question_id, post_id, comment_id)),
                });
            }
            TimelineEvent::Answered { question_id, at } => {
                pending.entry(question_id).or_default().push(at);
            }
        }
    }

    (ledger, pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionActivity;

    const BASE: &str = "http://stackoverflow.com";

    fn ledger_with(ids: &[u64]) -> Ledger {
        ids.iter()
            .map(|&id| {
                (
                    id,
                    QuestionActivity {
                        id,
                        title: format!("q{id}"),
                        creation_date: 100,
                        link: format!("{BASE}/questions/{id}/q"),
                        actions: Vec::new(),
                    },
                )
            })
            .collect()
    }

    fn entry(json: &str) -> RawTimelineEntry {
        serde_json::from_str(json).expect("valid fixture")
    }

    #[test]
    fn question_revision_has_no_link() {
        let (ledger, _) = classify_timeline(
            ledger_with(&[42]),
            vec![entry(
                r#"{"timeline_type":"revision","question_id":42,"post_id":42,
                    "creation_date":1500,"user":{"display_name":"alice"}}"#,
            )],
            1000,
            BASE,
        );
        let actions = &ledger[&42].actions;
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, EventKind::RevisedQuestion);
        assert!(actions[0].link.is_none());
    }

    #[test]
    fn answer_revision_links_the_answer() {
        let (ledger, _) = classify_timeline(
            ledger_with(&[42]),
            vec![entry(
                r#"{"timeline_type":"revision","question_id":42,"post_id":77,
                    "creation_date":1500,"user":{"display_name":"alice"}}"#,
            )],
            1000,
            BASE,
        );
        let actions = &ledger[&42].actions;
        assert_eq!(actions[0].kind, EventKind::RevisedAnswer);
        assert_eq!(actions[0].link.as_deref(), Some("http://stackoverflow.com/a/77"));
    }

    #[test]
    fn comment_permalink_anchors_post_and_comment() {
        let (ledger, _) = classify_timeline(
            ledger_with(&[42]),
            vec![entry(
                r#"{"timeline_type":"comment","question_id":42,"post_id":77,"comment_id":9,
                    "creation_date":1500,"user":{"display_name":"bob"}}"#,
            )],
            1000,
            BASE,
        );
        let actions = &ledger[&42].actions;
        assert_eq!(actions[0].kind, EventKind::PostedComment);
        assert_eq!(
            actions[0].link.as_deref(),
            Some("http://stackoverflow.com/questions/42/77#comment9_77")
        );
    }

    #[test]
    fn accepted_answer_links_the_answer() {
        let (ledger, _) = classify_timeline(
            ledger_with(&[42]),
            vec![entry(
                r#"{"timeline_type":"accepted_answer","question_id":42,"post_id":77,
                    "creation_date":1500,"owner":{"display_name":"alice"}}"#,
            )],
            1000,
            BASE,
        );
        let actions = &ledger[&42].actions;
        assert_eq!(actions[0].kind, EventKind::AnswerAccepted);
        assert_eq!(actions[0].link.as_deref(), Some("http://stackoverflow.com/a/77"));
    }

    #[test]
    fn answer_entries_feed_pending_not_actions() {
        let (ledger, pending) = classify_timeline(
            ledger_with(&[42]),
            vec![
                entry(r#"{"timeline_type":"answer","question_id":42,"creation_date":1500}"#),
                entry(r#"{"timeline_type":"answer","question_id":42,"creation_date":1600}"#),
            ],
            1000,
            BASE,
        );
        assert!(ledger[&42].actions.is_empty());
        assert_eq!(pending[&42], vec![1500, 1600]);
    }

    #[test]
    fn entries_at_or_before_watermark_are_skipped() {
        let (ledger, pending) = classify_timeline(
            ledger_with(&[42]),
            vec![
                entry(
                    r#"{"timeline_type":"question","question_id":42,"creation_date":1000,
                        "owner":{"display_name":"alice"}}"#,
                ),
                entry(r#"{"timeline_type":"answer","question_id":42,"creation_date":999}"#),
            ],
            1000,
            BASE,
        );
        assert!(ledger[&42].actions.is_empty());
        assert!(pending.is_empty());
    }

    #[test]
    fn entry_for_unknown_question_is_ignored() {
        let (ledger, pending) = classify_timeline(
            ledger_with(&[42]),
            vec![
                entry(
                    r#"{"timeline_type":"question","question_id":99,"creation_date":1500,
                        "owner":{"display_name":"alice"}}"#,
                ),
                entry(r#"{"timeline_type":"answer","question_id":99,"creation_date":1500}"#),
            ],
            1000,
            BASE,
        );
        assert!(ledger[&42].actions.is_empty());
        assert!(pending.is_empty(), "answer signal for unknown question must not pend");
    }

    #[test]
    fn unknown_timeline_types_produce_nothing() {
        let (ledger, pending) = classify_timeline(
            ledger_with(&[42]),
            vec![entry(
                r#"{"timeline_type":"vote_aggregate","question_id":42,"creation_date":1500}"#,
            )],
            1000,
            BASE,
        );
        assert!(ledger[&42].actions.is_empty());
        assert!(pending.is_empty());
    }
}
