//! Transitive expansion of named people groups

use std::collections::{BTreeMap, BTreeSet};

/// Expand group names into the flat set of member identifiers
///
/// An entry naming a group is replaced by that group's members, recursively.
/// Every other entry is an identifier and kept as is. Each group is expanded
/// at most once, so membership cycles terminate.
pub fn expand_groups<S: AsRef<str>>(
    groups: &BTreeMap<String, Vec<String>>,
    roots: &[S],
) -> BTreeSet<String> {
    let mut members = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut pending: Vec<String> = roots.iter().rev().map(|r| r.as_ref().to_string()).collect();

    while let Some(entry) = pending.pop() {
        match groups.get(&entry) {
            Some(group_members) => {
                if visited.insert(entry) {
                    pending.extend(group_members.iter().rev().cloned());
                }
            }
            None => {
                members.insert(entry);
            }
        }
    }

    members
}
