//! Slack-formatted links and one-line bug descriptions

use bz_client::{Bug, Query, DEFAULT_BUGZILLA_URL as BUGZILLA_URL};

/// Saved buglist used as the base of aggregate links
const BUGLIST_BASE: &[(&str, &str)] = &[
    ("f1", "bug_id"),
    ("list_id", "11100046"),
    ("o1", "anyexact"),
    ("query_format", "advanced"),
];

/// Slack link to a single bug: `<https://…/show_bug.cgi?id=ID|#ID>`
pub fn bug_url(id: u64) -> String {
    format!("<{}/show_bug.cgi?id={}|#{}>", BUGZILLA_URL, id, id)
}

/// Slack link to a buglist of all `ids`, shown as `text`
///
/// The ids travel comma-joined in the single `v1` parameter; parameters are
/// form-encoded in key order.
pub fn buglist_link(text: &str, ids: &[u64]) -> String {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in BUGLIST_BASE {
        serializer.append_pair(key, value);
    }
    serializer.append_pair("v1", &joined);

    format!(
        "<{}/buglist.cgi?{}|{}>",
        BUGZILLA_URL,
        serializer.finish(),
        text
    )
}

/// Browser URL running `query`
pub fn query_url(query: &Query) -> String {
    format!("{}/buglist.cgi?{}", BUGZILLA_URL, query.encode())
}

/// One-line description: `<link> [*STATUS*] @assignee: summary`
pub fn format_bug_message(bug: &Bug) -> String {
    if bug.assigned_to.is_empty() {
        format!("{} [*{}*] {}", bug_url(bug.id), bug.status, bug.summary)
    } else {
        format!(
            "{} [*{}*] @{}: {}",
            bug_url(bug.id),
            bug.status,
            bug.assigned_to,
            bug.summary
        )
    }
}
