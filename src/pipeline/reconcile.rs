use crate::feed::messages::RawAnswer;
use crate::types::{answer_link, ActionEvent, EventKind, Ledger, Pending};

/// Resolve pending "answer" timeline signals against the answers endpoint.
///
/// A returned answer becomes a PostedAnswer action only when its
/// `(question_id, creation_date)` pair exactly matches a recorded signal;
/// the timeline's timestamp is the correlation key, equality, not a range.
/// Answers for questions that are not pending, answers at any other
/// timestamp, and answers without an attributable actor are dropped.
pub fn apply_answers(
    mut ledger: Ledger,
    pending: Pending,
    answers: Vec<RawAnswer>,
    link_base: &str,
) -> Ledger {
    for answer in answers {
        let Some(candidates) = pending.get(&answer.question_id) else {
            continue;
        };
        if !candidates.contains(&answer.creation_date) {
            continue;
        }
        let Some(who) = answer.actor() else {
            continue;
        };
        let Some(activity) = ledger.get_mut(&answer.question_id) else {
            continue;
        };
        activity.actions.push(ActionEvent {
            when: answer.creation_date,
            who,
            kind: EventKind::PostedAnswer,
            link: Some(answer_link(link_base, answer.answer_id)),
        });
    }
    ledger
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

    fn pending_one(question_id: u64, timestamps: &[i64]) -> Pending {
        let mut pending = Pending::new();
        pending.insert(question_id, timestamps.to_vec());
        pending
    }

    fn answer(answer_id: u64, question_id: u64, creation_date: i64) -> RawAnswer {
        serde_json::from_str(&format!(
            r#"{{"answer_id":{answer_id},"question_id":{question_id},
                "creation_date":{creation_date},"owner":{{"display_name":"carol"}}}}"#
        ))
        .expect("valid fixture")
    }

    #[test]
    fn exact_timestamp_match_yields_one_linked_action() {
        let ledger = apply_answers(
            ledger_with(&[42]),
            pending_one(42, &[1000]),
            vec![answer(77, 42, 1000)],
            BASE,
        );
        let actions = &ledger[&42].actions;
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, EventKind::PostedAnswer);
        assert_eq!(actions[0].who, "carol");
        assert_eq!(actions[0].link.as_deref(), Some("http://stackoverflow.com/a/77"));
    }

    #[test]
    fn off_by_one_timestamp_does_not_match() {
        let ledger = apply_answers(
            ledger_with(&[42]),
            pending_one(42, &[1000]),
            vec![answer(77, 42, 999)],
            BASE,
        );
        assert!(ledger[&42].actions.is_empty());
    }

    #[test]
    fn answer_for_non_pending_question_is_dropped() {
        let ledger = apply_answers(
            ledger_with(&[42, 43]),
            pending_one(42, &[1000]),
            vec![answer(78, 43, 1000)],
            BASE,
        );
        assert!(ledger[&42].actions.is_empty());
        assert!(ledger[&43].actions.is_empty());
    }

    #[test]
    fn multiple_signals_resolve_independently() {
        let ledger = apply_answers(
            ledger_with(&[42]),
            pending_one(42, &[1000, 2000]),
            vec![answer(77, 42, 1000), answer(78, 42, 2000), answer(79, 42, 3000)],
            BASE,
        );
        assert_eq!(ledger[&42].actions.len(), 2);
    }

    #[test]
    fn unmatched_pending_leaves_question_with_no_actions() {
        // The reconciliation found nothing; the question still renders with
        // just its header line downstream.
        let ledger = apply_answers(ledger_with(&[42]), pending_one(42, &[1000]), vec![], BASE);
        assert!(ledger[&42].actions.is_empty());
    }
}
