use std::collections::HashSet;

use crate::client::types::{GroupSummary, RoleSummary, UserSummary};
use crate::types::PrincipalKind;

/// Anything the cache stores is keyed by its principal id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for UserSummary {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for GroupSummary {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for RoleSummary {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
struct KindCache<T> {
    entries: Vec<T>,
    ids: HashSet<String>,
}

// A derive would add a `T: Default` bound that the summary types lack
impl<T> Default for KindCache<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), ids: HashSet::new() }
    }
}

impl<T: Keyed> KindCache<T> {
    fn replace(&mut self, entries: Vec<T>) -> usize {
        self.clear();
        self.merge(entries)
    }

    /// Append entries whose id is not already cached; everything already
    /// present keeps its position and its data.
    fn merge(&mut self, incoming: Vec<T>) -> usize {
        let mut added = 0;
        for entry in incoming {
            if self.ids.insert(entry.key().to_string()) {
                self.entries.push(entry);
                added += 1;
            }
        }
        added
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.ids.clear();
    }
}

/// Deduplicated ordered collections of the three principal kinds.
///
/// Built once from the initial bulk load, then only ever appended to by
/// search merges for the rest of the session. Order is arrival order.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    users: KindCache<UserSummary>,
    groups: KindCache<GroupSummary>,
    roles: KindCache<RoleSummary>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[UserSummary] {
        &self.users.entries
    }

    pub fn groups(&self) -> &[GroupSummary] {
        &self.groups.entries
    }

    pub fn roles(&self) -> &[RoleSummary] {
        &self.roles.entries
    }

    pub fn replace_users(&mut self, entries: Vec<UserSummary>) -> usize {
        self.users.replace(entries)
    }

    pub fn replace_groups(&mut self, entries: Vec<GroupSummary>) -> usize {
        self.groups.replace(entries)
    }

    pub fn replace_roles(&mut self, entries: Vec<RoleSummary>) -> usize {
        self.roles.replace(entries)
    }

    pub fn merge_users(&mut self, entries: Vec<UserSummary>) -> usize {
        self.users.merge(entries)
    }

    pub fn merge_groups(&mut self, entries: Vec<GroupSummary>) -> usize {
        self.groups.merge(entries)
    }

    pub fn merge_roles(&mut self, entries: Vec<RoleSummary>) -> usize {
        self.roles.merge(entries)
    }

    pub fn clear(&mut self, kind: PrincipalKind) {
        match kind {
            PrincipalKind::User => self.users.clear(),
            PrincipalKind::Group => self.groups.clear(),
            PrincipalKind::Role => self.roles.clear(),
        }
    }

    pub fn len(&self, kind: PrincipalKind) -> usize {
        match kind {
            PrincipalKind::User => self.users.entries.len(),
            PrincipalKind::Group => self.groups.entries.len(),
            PrincipalKind::Role => self.roles.entries.len(),
        }
    }

    pub fn is_empty(&self, kind: PrincipalKind) -> bool {
        self.len(kind) == 0
    }

    pub fn contains(&self, kind: PrincipalKind, id: &str) -> bool {
        match kind {
            PrincipalKind::User => self.users.ids.contains(id),
            PrincipalKind::Group => self.groups.ids.contains(id),
            PrincipalKind::Role => self.roles.ids.contains(id),
        }
    }
}
