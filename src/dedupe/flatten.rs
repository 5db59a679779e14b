use std::collections::HashSet;

use super::group::MovieGroup;
use crate::models::{CanonicalMovie, MovieRecord, TimingEntry};

/// Pick the poster for a group.
///
/// Chains are tried in `priority` order; within a chain the first member with
/// a non-empty image wins. With no match the representative's image is used
/// as-is, even when it is missing.
pub fn select_poster<S: AsRef<str>>(members: &[MovieRecord], priority: &[S]) -> Option<String> {
    for chain in priority {
        let chain = chain.as_ref();
        let hit = members.iter().find(|m| {
            m.is_from_chain(chain) && m.image_url.as_deref().is_some_and(|u| !u.is_empty())
        });
        if let Some(m) = hit {
            return m.image_url.clone();
        }
    }
    members.first().and_then(|m| m.image_url.clone())
}

/// Union of every member's timings in member order, dropping entries that are
/// structurally identical to one already kept.
pub fn merge_timings(members: &[MovieRecord]) -> Vec<TimingEntry> {
    let mut seen: HashSet<&TimingEntry> = HashSet::new();
    members
        .iter()
        .flat_map(|m| m.timings.iter())
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}

/// Collapse one group into its canonical movie.
pub fn flatten_group<S: AsRef<str>>(group: &MovieGroup, priority: &[S]) -> CanonicalMovie {
    let members = group.members();
    CanonicalMovie {
        image_url: select_poster(members, priority),
        timings: merge_timings(members),
        ..group.representative().clone()
    }
}

/// One canonical movie per group, in group order.
pub fn flatten_groups<S: AsRef<str>>(groups: &[MovieGroup], priority: &[S]) -> Vec<CanonicalMovie> {
    groups.iter().map(|g| flatten_group(g, priority)).collect()
}
