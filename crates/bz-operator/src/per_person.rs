//! Splitting a category bucket up by assignee

use bz_client::Bug;
use std::collections::{BTreeMap, HashMap};

/// One category split up by assignee
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerPerson {
    pub ids: BTreeMap<String, Vec<u64>>,
    pub lines: BTreeMap<String, Vec<String>>,
    /// Ids that had no entry in the index
    pub skipped: usize,
}

impl PerPerson {
    /// Ids placed into a group
    pub fn total(&self) -> usize {
        self.ids.values().map(Vec::len).sum()
    }
}

/// Index of a search result by bug id
pub fn index_bugs(bugs: &[Bug]) -> HashMap<u64, &Bug> {
    bugs.iter().map(|b| (b.id, b)).collect()
}

/// Group `ids` and their index-aligned `lines` by the assignee found in `index`
///
/// Relative order within each assignee's group follows the input order.
pub fn group_per_person(
    ids: &[u64],
    lines: &[String],
    index: &HashMap<u64, &Bug>,
) -> PerPerson {
    let mut result = PerPerson::default();

    for (id, line) in ids.iter().zip(lines) {
        let Some(bug) = index.get(id) else {
            log::debug!("Bug {} is not in the search result, skipping", id);
            result.skipped += 1;
            continue;
        };
        result
            .ids
            .entry(bug.assigned_to.clone())
            .or_default()
            .push(*id);
        result
            .lines
            .entry(bug.assigned_to.clone())
            .or_default()
            .push(line.clone());
    }

    result
}
