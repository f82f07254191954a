use std::collections::HashSet;

/// Which draft nodes currently show their children.
///
/// Keyed by tree path. This is view state only: the data tree never reads it,
/// and clearing it loses nothing but the caller's open/closed markers. After a
/// node is removed from the tree, [`ExpansionState::forget_subtree`] keeps the
/// remaining markers pointing at the nodes they were opened for.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<Vec<usize>>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, path: &[usize]) -> bool {
        self.expanded.contains(path)
    }

    /// Flip the marker at `path` and return the new state.
    pub fn toggle(&mut self, path: &[usize]) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_vec());
            true
        }
    }

    pub fn expand(&mut self, path: &[usize]) {
        self.expanded.insert(path.to_vec());
    }

    pub fn collapse(&mut self, path: &[usize]) {
        self.expanded.remove(path);
    }

    /// Drop markers for a removed node and everything under it, and re-key the
    /// markers of its later siblings (and their subtrees) one index down.
    pub fn forget_subtree(&mut self, removed: &[usize]) {
        let Some((&removed_index, parent)) = removed.split_last() else {
            self.expanded.clear();
            return;
        };
        let depth = parent.len();
        self.expanded = std::mem::take(&mut self.expanded)
            .into_iter()
            .filter_map(|mut path| {
                if path.len() <= depth || &path[..depth] != parent {
                    return Some(path);
                }
                match path[depth].cmp(&removed_index) {
                    std::cmp::Ordering::Less => Some(path),
                    std::cmp::Ordering::Equal => None,
                    std::cmp::Ordering::Greater => {
                        path[depth] -= 1;
                        Some(path)
                    }
                }
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}
