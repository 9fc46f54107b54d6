use chrono::DateTime;

use crate::config::icons;
use crate::types::{ActionEvent, Ledger};

/// Render the final digest handed to the delivery channel.
///
/// Ordering contract: questions in ledger key order (ascending id, stable
/// for the run); within a question, actions ascending by timestamp with a
/// stable sort, so same-second events keep their arrival order. An empty
/// ledger renders nothing; a ledger entry whose reconciliation matched no
/// answers still gets its header line.
pub fn render_digest(ledger: &Ledger, tags: &str, link_base: &str) -> Option<String> {
    if ledger.is_empty() {
        return None;
    }

    let tag_display = tags.replace(';', "|");
    let mut out = format!(
        "{} New StackOverflow activity on the <{}/questions/tagged/{}|{} Tag>:\n\n",
        icons::NEW_ACTIVITY,
        link_base,
        tag_display,
        tag_display,
    );

    for activity in ledger.values() {
        out.push_str(&format!(
            "{} <{}|{}>: _{}_\n",
            icons::TOPIC,
            activity.link,
            activity.title,
            format_ts(activity.creation_date),
        ));

        let mut actions: Vec<&ActionEvent> = activity.actions.iter().collect();
        actions.sort_by_key(|a| a.when);

        for action in actions {
            let what = match &action.link {
                Some(link) => format!("<{}|{}>", link, action.kind.description()),
                None => action.kind.description().to_string(),
            };
            out.push_str(&format!(
                "\t\t\t {} {} {} _{}_\n",
                action.kind.icon(),
                action.who,
                what,
                format_ts(action.when),
            ));
        }
        out.push('\n');
    }

    Some(out)
}

fn format_ts(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%a %b %e %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}
