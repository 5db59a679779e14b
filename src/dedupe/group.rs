use super::normalize::{keys_overlap, normalize_title};
use crate::models::MovieRecord;

/// Records believed to be the same film. Never empty; the first member is
/// the representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieGroup {
    key: String,
    members: Vec<MovieRecord>,
}

impl MovieGroup {
    fn new(key: String, first: MovieRecord) -> Self {
        Self {
            key,
            members: vec![first],
        }
    }

    /// Normalized title of the member that opened the group.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn representative(&self) -> &MovieRecord {
        &self.members[0]
    }

    pub fn members(&self) -> &[MovieRecord] {
        &self.members
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.members.len()
    }

    pub fn into_members(self) -> Vec<MovieRecord> {
        self.members
    }

    // Empty keys would contain-match everything, so they never accept members.
    fn accepts(&self, key: &str) -> bool {
        !self.key.is_empty() && !key.is_empty() && keys_overlap(&self.key, key)
    }
}

/// Partition `records` into groups of the same film, keeping input order.
///
/// Each record joins the first existing group whose key contains its
/// normalized title or is contained by it; otherwise it opens a new group.
/// Records with an empty normalized title always stay on their own.
pub fn group_by_title(records: impl IntoIterator<Item = MovieRecord>) -> Vec<MovieGroup> {
    let mut groups: Vec<MovieGroup> = Vec::new();

    for record in records {
        let key = normalize_title(record.title.as_deref());
        match groups.iter().position(|g| g.accepts(&key)) {
            Some(idx) => groups[idx].members.push(record),
            None => groups.push(MovieGroup::new(key, record)),
        }
    }

    groups
}
