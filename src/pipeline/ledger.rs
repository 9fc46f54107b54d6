use crate::feed::messages::RawQuestion;
use crate::types::{Ledger, QuestionActivity};

/// Build the per-run activity ledger from the fetched question list.
///
/// Keeps only questions with activity strictly newer than the watermark.
/// Titles have their HTML entities decoded here, the single decode point;
/// everything downstream treats the title as display-ready text.
pub fn build_ledger(items: Vec<RawQuestion>, watermark: i64) -> Ledger {
    items
        .into_iter()
        .filter(|q| q.last_activity_date > watermark)
        .map(|q| {
            let activity = QuestionActivity {
                id: q.question_id,
                title: html_escape::decode_html_entities(&q.title).into_owned(),
                creation_date: q.creation_date,
                link: q.link,
                actions: Vec::new(),
            };
            (q.question_id, activity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64, title: &str, last_activity: i64) -> RawQuestion {
        RawQuestion {
            question_id: id,
            title: title.to_string(),
            last_activity_date: last_activity,
            creation_date: 500,
            link: format!("http://stackoverflow.com/questions/{id}/x"),
        }
    }

    #[test]
    fn keeps_only_activity_strictly_after_watermark() {
        let ledger = build_ledger(
            vec![question(1, "old", 900), question(2, "boundary", 1000), question(3, "new", 1001)],
            1000,
        );
        assert_eq!(ledger.keys().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn fully_filtered_list_yields_empty_ledger() {
        let ledger = build_ledger(vec![question(1, "old", 10)], 1000);
        assert!(ledger.is_empty());
    }

    #[test]
    fn decodes_title_entities_exactly_once() {
        let ledger = build_ledger(vec![question(1, "C# &amp; Rust", 2000)], 1000);
        assert_eq!(ledger[&1].title, "C# & Rust");

        // A doubly-encoded source stays singly-encoded: no double decode.
        let ledger = build_ledger(vec![question(2, "a &amp;amp; b", 2000)], 1000);
        assert_eq!(ledger[&2].title, "a &amp; b");
    }

    #[test]
    fn one_entry_per_question_id() {
        // Same id twice in the page: last one wins, never two entries.
        let ledger = build_ledger(vec![question(7, "first", 2000), question(7, "second", 2001)], 1000);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[&7].title, "second");
    }
}
