//! Bugzilla searches issued by the reporters
//!
//! Every search must list each field the rules read in `include_fields`,
//! Bugzilla leaves the others empty.

use bz_client::{AdvancedQuery, Query};

use crate::rules::UNSET_RELEASE;

const CLASSIFICATION: &str = "Red Hat";
const PRODUCT: &str = "OpenShift Container Platform";
const ACTIVE_STATES: &[&str] = &["NEW", "ASSIGNED", "POST", "ON_DEV"];

/// First run of the new-bug reporter only scans this window
pub const BOOTSTRAP_WINDOW: &str = "-24h";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn base_query(status: &[&str], components: &[String]) -> Query {
    Query {
        classification: strings(&[CLASSIFICATION]),
        product: strings(&[PRODUCT]),
        status: strings(status),
        component: components.to_vec(),
        ..Query::default()
    }
}

/// Predicate selecting bugs the new-bug reporter has not seen yet
///
/// Without a watermark only bugs created in the last day are considered.
pub fn new_bugs_predicate(watermark: u64) -> AdvancedQuery {
    if watermark == 0 {
        AdvancedQuery::new("creation_ts", "greaterthaneq", BOOTSTRAP_WINDOW)
    } else {
        AdvancedQuery::new("bug_id", "greaterthan", watermark.to_string())
    }
}

/// NEW bugs of `components` above the watermark
pub fn new_bugs_query(components: &[String], watermark: u64) -> Query {
    Query {
        advanced: vec![new_bugs_predicate(watermark)],
        include_fields: strings(&["id", "assigned_to", "component", "summary"]),
        ..base_query(&["NEW"], components)
    }
}

/// Active, non-low bugs slated for one of `target_releases` or unset
pub fn triage_query(components: &[String], target_releases: &[String]) -> Query {
    let mut releases = vec![UNSET_RELEASE.to_string()];
    releases.extend(target_releases.iter().cloned());

    Query {
        target_release: releases,
        advanced: vec![
            AdvancedQuery::new("bug_severity", "notequals", "low"),
            AdvancedQuery::new("priority", "notequals", "low"),
        ],
        include_fields: strings(&[
            "id",
            "assigned_to",
            "keywords",
            "status",
            "resolution",
            "summary",
            "changeddate",
            "severity",
            "priority",
            "target_release",
            "whiteboard",
            "flags",
        ]),
        ..base_query(ACTIVE_STATES, components)
    }
}

/// Active urgent-severity bugs with the fields the escalation rules read
pub fn urgent_severity_query(components: &[String]) -> Query {
    Query {
        advanced: vec![AdvancedQuery::new("bug_severity", "equals", "urgent")],
        include_fields: strings(&[
            "id",
            "assigned_to",
            "status",
            "severity",
            "priority",
            "external_bugs",
            "component",
            "summary",
            "escalation",
        ]),
        ..base_query(ACTIVE_STATES, components)
    }
}
