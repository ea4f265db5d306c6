//! Slack message texts of the reporters
//!
//! Everything here is plain string assembly. Functions returning `Option`
//! yield `None` when there is nothing to say, so callers never post an empty
//! or zero-count message.

use bz_client::{Bug, Query};
use std::collections::{BTreeMap, BTreeSet};
use strum::IntoEnumIterator;

use crate::bugutil::{bug_url, buglist_link, format_bug_message, query_url};
use crate::classify::Classification;
use crate::escalation::{EscalationSummary, LeadStatus};
use crate::per_person::PerPerson;
use crate::rules::{Level, STALE_MARKER};

const STALE_QUERY_URL: &str = "https://bugzilla.redhat.com/buglist.cgi?cmdtype=dorem&remaction=run&namedcmd=openshift-group-b-lifecycle-stale&sharer_id=290313";

/// Links listed in the admin new-bug message before the rest is summarised
pub const NEW_BUGS_ADMIN_LIMIT: usize = 50;

/// Lines of the on-demand new-bug report before the rest is summarised
pub const NEW_BUGS_REPORT_LIMIT: usize = 20;

/// Direct message kinds sent to assignees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalNotice {
    Triage,
    BlockerPlus,
    Urgent,
}

impl PersonalNotice {
    fn intro(&self, count: usize, release: &str) -> String {
        match self {
            PersonalNotice::Triage => format!("You have *{} untriaged bugs*:\n\n", count),
            PersonalNotice::BlockerPlus => format!(
                "You have *{} blocker+ bugs* for the {} release:\n\n",
                count, release
            ),
            PersonalNotice::Urgent => format!("You have *{} urgent bugs*:\n\n", count),
        }
    }

    fn outro(&self) -> &'static str {
        match self {
            PersonalNotice::Triage => {
                "\n\nPlease make sure all these have the _Severity_, _Priority_ and _Target Release_ set, and move to ASSIGNED, so I can stop bothering you :-)\n\n"
            }
            PersonalNotice::BlockerPlus => {
                "\n\nPlease keep eyes on these, they will risk the upcoming release if not finished in time!"
            }
            PersonalNotice::Urgent => {
                "\n\nWe are expected to actively work on these before anything else!"
            }
        }
    }

    /// Message for one assignee, `None` for an empty group
    pub fn render(&self, lines: &[String], release: &str) -> Option<String> {
        if lines.is_empty() {
            return None;
        }
        Some(format!(
            "{}{}{}",
            self.intro(lines.len(), release),
            lines.join("\n"),
            self.outro()
        ))
    }
}

/// `(assignee, message)` for every non-empty group
pub fn person_messages(
    notice: PersonalNotice,
    groups: &PerPerson,
    release: &str,
) -> Vec<(String, String)> {
    groups
        .lines
        .iter()
        .filter_map(|(person, lines)| {
            notice
                .render(lines, release)
                .map(|message| (person.clone(), message))
        })
        .collect()
}

fn breakdown(counts: &BTreeMap<String, usize>) -> String {
    Level::iter()
        .filter_map(|level| {
            let count = counts.get(level.as_str()).copied().unwrap_or(0);
            (count > 0).then(|| format!("{} _{}_", count, level))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Channel summary lines of the blocker report
pub fn channel_stats(
    release: &str,
    active_count: usize,
    summary: &Classification,
    all_releases_query: &Query,
    current_release_query: &Query,
) -> Vec<String> {
    let mut lines = vec![
        format!(
            "> All active 4.x and 3.11 Bugs: <{}|{}>",
            query_url(all_releases_query),
            active_count
        ),
        format!(
            "> All active {} Bugs: <{}|{}>",
            release,
            query_url(current_release_query),
            summary.current_release_count
        ),
        format!(
            "> Bugs Severity Breakdown: {}",
            breakdown(&summary.severity_count)
        ),
        format!(
            "> Bugs Priority Breakdown: {}",
            breakdown(&summary.priority_count)
        ),
        format!(
            "> Bugs Marked as _{}_: <{}|{}>",
            STALE_MARKER, STALE_QUERY_URL, summary.stale_count
        ),
    ];

    for (key, ids) in &summary.serious {
        if !ids.is_empty() {
            lines.push(format!(
                "> Bugs with _{}_: {}",
                key,
                buglist_link(&ids.len().to_string(), ids)
            ));
        }
    }

    lines
}

/// The channel-wide blocker report
pub fn blockers_channel_report(stats: &[String]) -> String {
    format!(
        "\n:bug: *Today 4.x Bug Report:* :bug:\n{}\n",
        stats.join("\n")
    )
}

/// Per-assignee counts for the admin channel, `None` when every group is empty
pub fn admin_debug_stats(
    blocker_plus: &BTreeMap<String, Vec<u64>>,
    to_triage: &BTreeMap<String, Vec<u64>>,
    urgent: &BTreeMap<String, Vec<u64>>,
) -> Option<String> {
    let sections = [
        (blocker_plus, "blocker+ bugs"),
        (to_triage, "bugs that need triage"),
        (urgent, "urgent bugs"),
    ];

    let mut messages = Vec::new();
    for (groups, what) in sections {
        for (person, ids) in groups {
            if !ids.is_empty() {
                messages.push(format!(
                    "> {}: {} {}",
                    buglist_link(person, ids),
                    ids.len(),
                    what
                ));
            }
        }
    }

    (!messages.is_empty()).then(|| messages.join("\n"))
}

fn links(bugs: &[Bug]) -> String {
    bugs.iter()
        .map(|b| bug_url(b.id))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Channel report of escalations per lead, `None` when there is nothing to report
pub fn escalation_report(summary: &EscalationSummary) -> Option<String> {
    if summary.is_quiet() {
        return None;
    }

    let mut lines = vec!["Escalation report:".to_string(), String::new()];

    for (lead, report) in &summary.leads {
        let count = report.bugs.len();
        match report.status {
            LeadStatus::OverQuota => lines.push(format!(
                ":red-siren: {}'s team with {} bugs, above the quota of {}",
                lead, count, report.quota
            )),
            LeadStatus::Normal => lines.push(format!(
                "{}'s team with {} {}",
                lead,
                count,
                if count == 1 { "bug" } else { "bugs" }
            )),
        }

        for b in &report.bugs {
            lines.push(format!(
                "> {} {} @ {}: {}",
                bug_url(b.id),
                b.status,
                b.assigned_to,
                b.summary
            ));
        }
    }

    let repeated: Vec<_> = summary
        .assigned
        .iter()
        .filter(|(_, bugs)| bugs.len() > 1)
        .collect();
    if !repeated.is_empty() {
        lines.push(String::new());
        lines.push("Assignees with more than one escalation:".to_string());
        for (assignee, bugs) in repeated {
            lines.push(format!("> :red-siren: {}: {}", assignee, links(bugs)));
        }
    }

    if !summary.silenced.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{} silenced bugs :see_no_evil: : {}",
            summary.silenced.len(),
            links(&summary.silenced)
        ));
    }

    Some(lines.join("\n"))
}

/// Admin channel note listing unconfigured components
pub fn missing_components_message(missing: &BTreeSet<String>) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    let names: Vec<&str> = missing.iter().map(String::as_str).collect();
    Some(format!("Missing components in config: {}", names.join(", ")))
}

fn truncated<T>(items: &[T], limit: usize, render: impl Fn(&T) -> String) -> Vec<String> {
    let mut out: Vec<String> = items.iter().take(limit).map(render).collect();
    if items.len() > limit {
        out.push(format!(" ... and {} more", items.len() - limit));
    }
    out
}

/// Admin channel note about freshly filed bugs
pub fn new_bugs_admin_message(bugs: &[Bug]) -> Option<String> {
    if bugs.is_empty() {
        return None;
    }
    let links = truncated(bugs, NEW_BUGS_ADMIN_LIMIT, |b| bug_url(b.id));
    Some(format!("Found new bugs: {}", links.join(", ")))
}

/// On-demand report of the last day's new bugs
pub fn new_bugs_report(bugs: &[Bug]) -> String {
    let mut lines = vec![
        "New bugs of the last week (excluding those already in a different state):".to_string(),
        String::new(),
    ];
    lines.extend(truncated(bugs, NEW_BUGS_REPORT_LIMIT, |b| {
        format!("> {}", format_bug_message(b))
    }));
    lines.join("\n")
}
