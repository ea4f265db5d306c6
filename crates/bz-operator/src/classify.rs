//! Bug classifier
//!
//! Sorts a flat search result into the overlapping reporting categories.
//! A bug lands in every category whose rule it matches; nothing is
//! deduplicated across categories.

use bz_client::Bug;
use std::collections::BTreeMap;
use std::fmt;
use strum::{AsRefStr, Display, EnumIter};

use crate::bugutil::format_bug_message;
use crate::rules::{self, BlockerState, Level, SeriousKeyword, UPCOMING_SPRINT};

/// Reporting categories, each kept as an id bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display, AsRefStr)]
pub enum Category {
    #[strum(serialize = "urgent")]
    Urgent,
    #[strum(serialize = "blocker+")]
    BlockerPlus,
    #[strum(serialize = "blocker?")]
    BlockerQuestionMark,
    #[strum(serialize = "to-triage")]
    ToTriage,
    #[strum(serialize = "needs-upcoming-sprint")]
    NeedsUpcomingSprint,
    #[strum(serialize = "stale")]
    Stale,
}

/// Key of the "serious" summary: a serious keyword or a release blocker flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeriousKey {
    Keyword(SeriousKeyword),
    Blocker(BlockerState),
}

impl fmt::Display for SeriousKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriousKey::Keyword(keyword) => write!(f, "{}", keyword),
            SeriousKey::Blocker(state) => write!(f, "blocker{}", state),
        }
    }
}

/// Ids of a category with their rendered lines, index-aligned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    pub ids: Vec<u64>,
    pub lines: Vec<String>,
}

static EMPTY_BUCKET: Bucket = Bucket {
    ids: Vec::new(),
    lines: Vec::new(),
};

impl Bucket {
    fn push(&mut self, bug: &Bug) {
        self.ids.push(bug.id);
        self.lines.push(format_bug_message(bug));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Result of classifying one search result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    buckets: BTreeMap<Category, Bucket>,
    /// Serious keyword and blocker flag buckets
    pub serious: BTreeMap<SeriousKey, Vec<u64>>,
    /// Size of the `Stale` bucket
    pub stale_count: usize,
    /// Raw severity value to count, empty values included
    pub severity_count: BTreeMap<String, usize>,
    /// Raw priority value to count, empty values included
    pub priority_count: BTreeMap<String, usize>,
    /// Bugs on the reference release or without a target release
    pub current_release_count: usize,
}

impl Classification {
    pub fn bucket(&self, category: Category) -> &Bucket {
        self.buckets.get(&category).unwrap_or(&EMPTY_BUCKET)
    }

    pub fn ids(&self, category: Category) -> &[u64] {
        &self.bucket(category).ids
    }

    pub fn severity(&self, level: Level) -> usize {
        self.severity_count.get(level.as_str()).copied().unwrap_or(0)
    }

    pub fn priority(&self, level: Level) -> usize {
        self.priority_count.get(level.as_str()).copied().unwrap_or(0)
    }

    fn add(&mut self, category: Category, bug: &Bug) {
        self.buckets.entry(category).or_default().push(bug);
    }
}

/// Classify `bugs` against `reference_release` (the current target release)
///
/// Total over any input: unknown or empty field values get their own
/// histogram entries and feed the triage rule instead of failing.
pub fn summarize_bugs(reference_release: &str, bugs: &[Bug]) -> Classification {
    let mut r = Classification::default();

    for bug in bugs {
        let keywords = rules::keywords(bug);

        for keyword in <SeriousKeyword as strum::IntoEnumIterator>::iter() {
            if keywords.has(keyword.as_ref()) {
                r.serious
                    .entry(SeriousKey::Keyword(keyword))
                    .or_default()
                    .push(bug.id);
            }
        }

        if rules::is_stale(bug) {
            r.add(Category::Stale, bug);
            r.stale_count += 1;
        }

        *r.severity_count.entry(bug.severity.clone()).or_default() += 1;
        *r.priority_count.entry(bug.priority.clone()).or_default() += 1;

        if rules::is_urgent(bug) {
            r.add(Category::Urgent, bug);
        }

        if !keywords.has(UPCOMING_SPRINT) {
            r.add(Category::NeedsUpcomingSprint, bug);
        }

        for (state, category) in [
            (BlockerState::Plus, Category::BlockerPlus),
            (BlockerState::QuestionMark, Category::BlockerQuestionMark),
        ] {
            if rules::is_release_blocker(bug, state, reference_release) {
                r.add(category, bug);
                r.serious
                    .entry(SeriousKey::Blocker(state))
                    .or_default()
                    .push(bug.id);
            }
        }

        if rules::needs_triage(bug, reference_release) {
            r.add(Category::ToTriage, bug);
        }

        if rules::in_current_release(bug, reference_release) {
            r.current_release_count += 1;
        }
    }

    r
}
