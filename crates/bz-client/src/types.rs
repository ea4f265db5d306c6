//! Bugzilla API data transfer objects
//!
//! These types represent the data returned from the Bugzilla REST API
//! and the search descriptor sent to it. They are intentionally separate
//! from the operator's rule logic to keep this crate pure and reusable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bug from the Bugzilla API
///
/// Every field defaults to empty: Bugzilla only returns the fields listed in
/// the query's `include_fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bug {
    /// Bug number (e.g., 1834567)
    pub id: u64,

    /// Assignee login (usually an email address)
    pub assigned_to: String,

    /// Components, the first one is the primary component
    pub component: Vec<String>,

    /// Keywords (e.g., "TestBlocker", "UpcomingSprint")
    pub keywords: Vec<String>,

    /// Free-text status whiteboard
    pub whiteboard: String,

    /// Severity (urgent, high, medium, low, unspecified)
    pub severity: String,

    /// Priority (urgent, high, medium, low, unspecified)
    pub priority: String,

    /// Target releases, empty when unset
    pub target_release: Vec<String>,

    /// Status (NEW, ASSIGNED, POST, ON_DEV, ...)
    pub status: String,

    /// Resolution, empty while the bug is open
    pub resolution: String,

    /// Flags such as `blocker+`
    pub flags: Vec<Flag>,

    /// Escalation marker, "Yes" when escalated through support
    pub escalation: String,

    /// Links into external trackers (customer cases, upstream issues)
    pub external_bugs: Vec<ExternalBug>,

    /// One-line summary
    pub summary: String,
}

impl Bug {
    /// Primary component, the first of the component list
    pub fn primary_component(&self) -> Option<&str> {
        self.component.first().map(String::as_str)
    }
}

/// A flag set on a bug
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flag {
    /// Flag name (e.g., "blocker")
    pub name: String,
    /// Flag state ("+", "-" or "?")
    pub status: String,
}

impl Flag {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// A link from a bug into an external tracker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalBug {
    /// Which external system the link points into
    #[serde(rename = "type")]
    pub kind: ExternalBugType,
}

impl ExternalBug {
    /// Build a link of the given tracker type (e.g. "SFDC")
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: ExternalBugType {
                kind: kind.into(),
                ..ExternalBugType::default()
            },
        }
    }
}

/// External tracker descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalBugType {
    /// Tracker type (e.g., "SFDC" for customer cases)
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub url: String,
}

/// One field/operator/value predicate of an advanced search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedQuery {
    pub field: String,
    pub op: String,
    pub value: String,
}

impl AdvancedQuery {
    pub fn new(field: impl Into<String>, op: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }
}

/// A declarative Bugzilla search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub classification: Vec<String>,
    pub product: Vec<String>,
    pub status: Vec<String>,
    pub component: Vec<String>,
    pub target_release: Vec<String>,
    pub advanced: Vec<AdvancedQuery>,
    pub include_fields: Vec<String>,
}

impl Query {
    /// Search parameters, grouped by key in their insertion order
    ///
    /// The keys are the ones understood by both `/rest/bug` and
    /// `buglist.cgi`, so the same values drive API calls and browser links.
    pub fn values(&self) -> BTreeMap<String, Vec<String>> {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut add = |key: &str, items: &[String]| {
            if !items.is_empty() {
                values
                    .entry(key.to_string())
                    .or_default()
                    .extend(items.iter().cloned());
            }
        };

        add("classification", &self.classification);
        add("product", &self.product);
        add("bug_status", &self.status);
        add("component", &self.component);
        add("target_release", &self.target_release);

        for (i, aq) in self.advanced.iter().enumerate() {
            let n = i + 1;
            add(&format!("f{}", n), std::slice::from_ref(&aq.field));
            add(&format!("o{}", n), std::slice::from_ref(&aq.op));
            add(&format!("v{}", n), std::slice::from_ref(&aq.value));
        }

        if !self.include_fields.is_empty() {
            values.insert(
                "include_fields".to_string(),
                vec![self.include_fields.join(",")],
            );
        }

        values
    }

    /// Form-encode the search; keys are sorted, values keep their order
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, items) in self.values() {
            for item in items {
                serializer.append_pair(&key, &item);
            }
        }
        serializer.finish()
    }
}
