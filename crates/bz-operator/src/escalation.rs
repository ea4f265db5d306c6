//! Escalation aggregator
//!
//! Groups escalated urgent-severity bugs by assignee and by component lead,
//! and checks each lead's load against a quota derived from the team size.

use bz_client::Bug;
use bz_config::OperatorConfig;
use std::collections::{BTreeMap, BTreeSet};

use crate::rules;

/// Share of a team that may carry escalations at the same time
const QUOTA_DIVISOR: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadStatus {
    Normal,
    OverQuota,
}

/// Escalations of one lead's team with the quota they were checked against
#[derive(Debug, Clone, PartialEq)]
pub struct LeadReport {
    pub bugs: Vec<Bug>,
    pub team_size: usize,
    pub quota: usize,
    pub status: LeadStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EscalationSummary {
    /// Assignee to escalated bugs, in input order
    pub assigned: BTreeMap<String, Vec<Bug>>,
    /// Lead to their team's escalations
    pub leads: BTreeMap<String, LeadReport>,
    /// Urgent severity bugs whose priority was lowered on purpose
    pub silenced: Vec<Bug>,
    /// Primary components with no configuration entry
    pub missing_components: BTreeSet<String>,
}

impl EscalationSummary {
    /// Nothing worth a channel report
    pub fn is_quiet(&self) -> bool {
        self.leads.is_empty() && self.silenced.is_empty()
    }
}

/// Maximum escalations a team of `team_size` carries before its lead is flagged
pub fn team_quota(team_size: usize) -> usize {
    (team_size / QUOTA_DIVISOR).max(1)
}

/// Aggregate `bugs`, which the caller has already narrowed to urgent severity
pub fn aggregate_escalations(bugs: &[Bug], config: &OperatorConfig) -> EscalationSummary {
    let mut summary = EscalationSummary::default();
    let mut leads_bugs: BTreeMap<String, Vec<Bug>> = BTreeMap::new();

    for bug in bugs {
        if rules::is_escalation_eligible(bug) {
            summary
                .assigned
                .entry(bug.assigned_to.clone())
                .or_default()
                .push(bug.clone());

            let Some(name) = bug.primary_component() else {
                continue;
            };
            match config.component(name) {
                Some(component) if !component.lead.is_empty() => {
                    leads_bugs
                        .entry(component.lead.clone())
                        .or_default()
                        .push(bug.clone());
                }
                Some(_) => {}
                None => {
                    log::debug!("Component {} of bug {} is not configured", name, bug.id);
                    summary.missing_components.insert(name.to_string());
                }
            }
        } else if rules::is_silenced(bug) {
            summary.silenced.push(bug.clone());
        }
    }

    summary.leads = leads_bugs
        .into_iter()
        .map(|(lead, bugs)| {
            let team_size = config.team_of(&lead).len();
            let quota = team_quota(team_size);
            let status = if bugs.len() > quota {
                LeadStatus::OverQuota
            } else {
                LeadStatus::Normal
            };
            (
                lead,
                LeadReport {
                    bugs,
                    team_size,
                    quota,
                    status,
                },
            )
        })
        .collect();

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use bz_client::ExternalBug;

    const CONFIG: &str = r#"
        [components.kube-apiserver]
        lead = "lead@redhat.com"
        developers = ["a@redhat.com", "b@redhat.com", "team"]

        [components.etcd]
        lead = "lead@redhat.com"
        developers = ["a@redhat.com", "g@redhat.com"]

        [components.oauth]
        lead = "solo@redhat.com"
        developers = ["s@redhat.com"]

        [components.unowned]
        developers = ["u@redhat.com"]

        [groups]
        team = ["c@redhat.com", "d@redhat.com", "nested"]
        nested = ["e@redhat.com", "f@redhat.com", "team"]
    "#;

    fn config() -> OperatorConfig {
        OperatorConfig::from_toml_str(CONFIG).unwrap()
    }

    fn escalated(id: u64, component: &str, assignee: &str) -> Bug {
        Bug {
            id,
            assigned_to: assignee.to_string(),
            component: vec![component.to_string()],
            severity: "urgent".to_string(),
            priority: "high".to_string(),
            escalation: "Yes".to_string(),
            status: "ASSIGNED".to_string(),
            ..Bug::default()
        }
    }

    #[test]
    fn test_team_quota() {
        assert_eq!(team_quota(0), 1);
        assert_eq!(team_quota(1), 1);
        assert_eq!(team_quota(7), 1);
        assert_eq!(team_quota(10), 2);
        assert_eq!(team_quota(14), 2);
        assert_eq!(team_quota(20), 4);
    }

    #[test]
    fn test_lead_over_quota() {
        let bugs = vec![
            escalated(1, "kube-apiserver", "a@redhat.com"),
            escalated(2, "etcd", "g@redhat.com"),
        ];
        let summary = aggregate_escalations(&bugs, &config());

        let lead = &summary.leads["lead@redhat.com"];
        // a, b, c, d, e, f, g
        assert_eq!(lead.team_size, 7);
        assert_eq!(lead.quota, 1);
        assert_eq!(lead.bugs.len(), 2);
        assert_eq!(lead.status, LeadStatus::OverQuota);
    }

    #[test]
    fn test_lead_within_quota() {
        let bugs = vec![escalated(3, "oauth", "s@redhat.com")];
        let summary = aggregate_escalations(&bugs, &config());
        assert_eq!(summary.leads["solo@redhat.com"].status, LeadStatus::Normal);
        assert!(!summary.is_quiet());
    }

    #[test]
    fn test_eligibility_paths() {
        let mut customer_urgent = escalated(10, "oauth", "x@redhat.com");
        customer_urgent.escalation.clear();
        customer_urgent.priority = "urgent".to_string();
        customer_urgent.external_bugs = vec![ExternalBug::of_type("SFDC")];

        let mut customer_unprioritised = customer_urgent.clone();
        customer_unprioritised.id = 11;
        customer_unprioritised.priority = "unspecified".to_string();

        let mut silenced = escalated(12, "oauth", "x@redhat.com");
        silenced.escalation.clear();

        let mut untriaged = silenced.clone();
        untriaged.id = 13;
        untriaged.priority = "unspecified".to_string();

        let bugs = vec![customer_urgent, customer_unprioritised, silenced, untriaged];
        let summary = aggregate_escalations(&bugs, &config());

        let ids: Vec<u64> = summary.assigned["x@redhat.com"].iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![10, 11]);
        let silenced: Vec<u64> = summary.silenced.iter().map(|b| b.id).collect();
        assert_eq!(silenced, vec![12]);
    }

    #[test]
    fn test_missing_component_is_collected() {
        let bugs = vec![
            escalated(20, "networking", "n@redhat.com"),
            escalated(21, "networking", "n@redhat.com"),
            escalated(22, "storage", "n@redhat.com"),
            escalated(23, "oauth", "s@redhat.com"),
        ];
        let summary = aggregate_escalations(&bugs, &config());

        let missing: Vec<&str> = summary.missing_components.iter().map(String::as_str).collect();
        assert_eq!(missing, vec!["networking", "storage"]);
        // Unconfigured components still count per assignee
        assert_eq!(summary.assigned["n@redhat.com"].len(), 3);
        assert_eq!(summary.leads.len(), 1);
    }

    #[test]
    fn test_component_without_lead() {
        let bugs = vec![escalated(30, "unowned", "u@redhat.com")];
        let summary = aggregate_escalations(&bugs, &config());
        assert!(summary.leads.is_empty());
        assert!(summary.missing_components.is_empty());
        assert_eq!(summary.assigned.len(), 1);
    }

    #[test]
    fn test_bug_without_component() {
        let mut bug = escalated(40, "oauth", "s@redhat.com");
        bug.component.clear();
        let summary = aggregate_escalations(&[bug], &config());
        assert!(summary.leads.is_empty());
        assert_eq!(summary.assigned["s@redhat.com"].len(), 1);
        assert!(summary.is_quiet());
    }
}
