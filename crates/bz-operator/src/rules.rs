//! Rule predicates shared by the classifier and the escalation aggregator
//!
//! Each predicate looks at a single bug and nothing else, so they can be
//! combined freely and tested in isolation.

use bz_client::Bug;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Target release value meaning "not set"
pub const UNSET_RELEASE: &str = "---";

/// Whiteboard marker set on bugs without activity for a long time
pub const STALE_MARKER: &str = "LifecycleStale";

/// Keyword marking bugs planned into the upcoming sprint
pub const UPCOMING_SPRINT: &str = "UpcomingSprint";

/// External tracker type of customer cases
pub const CUSTOMER_CASE_TYPE: &str = "SFDC";

const BLOCKER_FLAG: &str = "blocker";
const ESCALATED: &str = "Yes";

static TRIAGE_STATES: LazyLock<StringSet> = LazyLock::new(|| StringSet::from_strs(&["NEW", ""]));
static UNSET_LEVELS: LazyLock<StringSet> =
    LazyLock::new(|| StringSet::from_strs(&[Level::Unspecified.as_str(), ""]));

/// Severity and priority values, in reporting order
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Urgent,
    High,
    Medium,
    Low,
    Unspecified,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Keywords signalling trouble beyond severity and priority
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    Display,
    AsRefStr,
    EnumString,
)]
pub enum SeriousKeyword {
    ServiceDeliveryBlocker,
    TestBlocker,
    UpgradeBlocker,
}

/// Value of the `blocker` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display, AsRefStr)]
pub enum BlockerState {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "?")]
    QuestionMark,
}

/// A set of strings with cheap membership checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringSet(BTreeSet<String>);

impl StringSet {
    pub fn from_strs(items: &[&str]) -> Self {
        Self(items.iter().map(|s| s.to_string()).collect())
    }

    pub fn has(&self, item: &str) -> bool {
        self.0.contains(item)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StringSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Keywords of a bug as a set
pub fn keywords(bug: &Bug) -> StringSet {
    bug.keywords.iter().cloned().collect()
}

fn is_level(value: &str, level: Level) -> bool {
    value == level.as_str()
}

/// First target release, or `---` when none is set
pub fn resolved_target_release(bug: &Bug) -> &str {
    bug.target_release
        .first()
        .map(String::as_str)
        .unwrap_or(UNSET_RELEASE)
}

/// The bug is slated for the reference release or not slated at all
pub fn in_current_release(bug: &Bug, reference_release: &str) -> bool {
    let release = resolved_target_release(bug);
    release == reference_release || release == UNSET_RELEASE
}

pub fn has_flag(bug: &Bug, name: &str, value: &str) -> bool {
    bug.flags.iter().any(|f| f.name == name && f.status == value)
}

/// `blocker` flag in the given state, on a bug of the reference release
pub fn is_release_blocker(bug: &Bug, state: BlockerState, reference_release: &str) -> bool {
    has_flag(bug, BLOCKER_FLAG, state.as_ref()) && in_current_release(bug, reference_release)
}

pub fn is_urgent(bug: &Bug) -> bool {
    is_level(&bug.priority, Level::Urgent) || is_level(&bug.severity, Level::Urgent)
}

pub fn is_stale(bug: &Bug) -> bool {
    bug.whiteboard.contains(STALE_MARKER)
}

/// Severity, priority or target release still need a decision
pub fn needs_triage(bug: &Bug, reference_release: &str) -> bool {
    let release = resolved_target_release(bug);
    (release == reference_release && TRIAGE_STATES.has(&bug.status))
        || release == UNSET_RELEASE
        || UNSET_LEVELS.has(&bug.priority)
        || UNSET_LEVELS.has(&bug.severity)
}

pub fn has_customer_case(bug: &Bug) -> bool {
    bug.external_bugs
        .iter()
        .any(|eb| eb.kind.kind == CUSTOMER_CASE_TYPE)
}

/// Explicitly escalated, or customer-facing and urgent
pub fn is_escalation_eligible(bug: &Bug) -> bool {
    let explicit = bug.escalation == ESCALATED;
    let customer = has_customer_case(bug);

    explicit
        || (customer && is_level(&bug.priority, Level::Urgent))
        || (customer
            && is_level(&bug.severity, Level::Urgent)
            && is_level(&bug.priority, Level::Unspecified))
}

/// Urgent severity that was deliberately not given an urgent priority
pub fn is_silenced(bug: &Bug) -> bool {
    !is_escalation_eligible(bug)
        && is_level(&bug.severity, Level::Urgent)
        && !is_level(&bug.priority, Level::Unspecified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bz_client::{ExternalBug, Flag};
    use strum::IntoEnumIterator;

    fn bug() -> Bug {
        Bug {
            id: 1,
            status: "ASSIGNED".to_string(),
            severity: "medium".to_string(),
            priority: "medium".to_string(),
            target_release: vec!["4.6.0".to_string()],
            ..Bug::default()
        }
    }

    #[test]
    fn test_level_order_and_names() {
        let names: Vec<String> = Level::iter().map(|l| l.to_string()).collect();
        assert_eq!(names, vec!["urgent", "high", "medium", "low", "unspecified"]);
        assert_eq!("high".parse::<Level>().unwrap(), Level::High);
    }

    #[test]
    fn test_serious_keyword_names() {
        let names: Vec<String> = SeriousKeyword::iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            vec!["ServiceDeliveryBlocker", "TestBlocker", "UpgradeBlocker"]
        );
    }

    #[test]
    fn test_string_set() {
        let set: StringSet = ["a", "b", "a"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.has("a"));
        assert!(!set.has("c"));
    }

    #[test]
    fn test_resolved_target_release() {
        let mut b = bug();
        assert_eq!(resolved_target_release(&b), "4.6.0");
        b.target_release = vec!["4.5.z".to_string(), "4.6.0".to_string()];
        assert_eq!(resolved_target_release(&b), "4.5.z");
        b.target_release.clear();
        assert_eq!(resolved_target_release(&b), UNSET_RELEASE);
        assert!(in_current_release(&b, "4.6.0"));
    }

    #[test]
    fn test_is_urgent() {
        let mut b = bug();
        assert!(!is_urgent(&b));
        b.severity = "urgent".to_string();
        assert!(is_urgent(&b));
        b.severity = "low".to_string();
        b.priority = "urgent".to_string();
        assert!(is_urgent(&b));
    }

    #[test]
    fn test_is_release_blocker() {
        let mut b = bug();
        b.flags = vec![Flag::new("blocker", "+")];
        assert!(is_release_blocker(&b, BlockerState::Plus, "4.6.0"));
        assert!(!is_release_blocker(&b, BlockerState::QuestionMark, "4.6.0"));
        assert!(!is_release_blocker(&b, BlockerState::Plus, "4.7.0"));

        b.target_release.clear();
        assert!(is_release_blocker(&b, BlockerState::Plus, "4.7.0"));
    }

    #[test]
    fn test_needs_triage() {
        let mut b = bug();
        assert!(!needs_triage(&b, "4.6.0"));

        b.status = "NEW".to_string();
        assert!(needs_triage(&b, "4.6.0"));
        // NEW on another release is not enough
        assert!(!needs_triage(&b, "4.7.0"));

        let mut b = bug();
        b.status = String::new();
        assert!(needs_triage(&b, "4.6.0"));

        let mut b = bug();
        b.priority = "unspecified".to_string();
        assert!(needs_triage(&b, "4.7.0"));

        let mut b = bug();
        b.severity = String::new();
        assert!(needs_triage(&b, "4.7.0"));

        let mut b = bug();
        b.target_release.clear();
        assert!(needs_triage(&b, "4.7.0"));
    }

    #[test]
    fn test_is_stale() {
        let mut b = bug();
        assert!(!is_stale(&b));
        b.whiteboard = "tracker LifecycleStale".to_string();
        assert!(is_stale(&b));
    }

    #[test]
    fn test_escalation_eligibility() {
        let mut b = bug();
        b.severity = "urgent".to_string();
        b.priority = "high".to_string();
        assert!(!is_escalation_eligible(&b));
        assert!(is_silenced(&b));

        b.escalation = "Yes".to_string();
        assert!(is_escalation_eligible(&b));
        assert!(!is_silenced(&b));

        let mut b = bug();
        b.external_bugs = vec![ExternalBug::of_type("SFDC")];
        b.priority = "urgent".to_string();
        assert!(is_escalation_eligible(&b));

        let mut b = bug();
        b.external_bugs = vec![ExternalBug::of_type("SFDC")];
        b.severity = "urgent".to_string();
        b.priority = "unspecified".to_string();
        assert!(is_escalation_eligible(&b));

        // Customer case on a non-urgent bug is not enough
        let mut b = bug();
        b.external_bugs = vec![ExternalBug::of_type("SFDC"), ExternalBug::of_type("Github")];
        assert!(!is_escalation_eligible(&b));
        assert!(!is_silenced(&b));
    }

    #[test]
    fn test_unspecified_priority_is_not_silenced() {
        let mut b = bug();
        b.severity = "urgent".to_string();
        b.priority = "unspecified".to_string();
        assert!(!is_escalation_eligible(&b));
        assert!(!is_silenced(&b));
    }
}
