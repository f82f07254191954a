use serde::{Deserialize, Serialize};

use crate::draft::error::DraftError;
use crate::grants::GrantSet;

/// One folder being authored, with its grants and nested subfolders.
///
/// The tree nests to arbitrary depth through `subgroups`; every node has the
/// same shape as the root. Nodes are addressed by a path of zero-based child
/// indices, so `[2, 0]` means `root.subgroups[2].subgroups[0]` and the empty
/// path is the root itself. The tree lives purely in memory until the wizard
/// submits it whole.
///
/// Serialization is the folder-creation wire format: `name`, `description`,
/// `parentId` (omitted when absent), the three grant sequences under the
/// backend's field names, and `subgroups`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub grants: GrantSet,
    #[serde(default)]
    pub subgroups: Vec<FolderDraft>,
}

impl FolderDraft {
    /// The empty root draft the wizard opens with, bound to its parent folder
    /// when the wizard was launched inside one.
    pub fn for_parent(parent_id: Option<String>) -> Self {
        Self { parent_id, ..Default::default() }
    }

    /// Borrow the node at `path`, walking the index sequence from this node.
    pub fn node(&self, path: &[usize]) -> Result<&FolderDraft, DraftError> {
        let mut current = self;
        for &index in path {
            let len = current.subgroups.len();
            current = current
                .subgroups
                .get(index)
                .ok_or_else(|| DraftError::PathNotFound { path: path.to_vec(), index, len })?;
        }
        Ok(current)
    }

    /// Mutably borrow the node at `path`. The tree has a single owner, so this
    /// is the only way edits reach a nested node.
    pub fn node_mut(&mut self, path: &[usize]) -> Result<&mut FolderDraft, DraftError> {
        let mut current = self;
        for &index in path {
            let len = current.subgroups.len();
            current = current
                .subgroups
                .get_mut(index)
                .ok_or_else(|| DraftError::PathNotFound { path: path.to_vec(), index, len })?;
        }
        Ok(current)
    }

    /// Append an empty child draft under `parent_path` and return the new
    /// child's path.
    pub fn add_child(&mut self, parent_path: &[usize]) -> Result<Vec<usize>, DraftError> {
        let parent = self.node_mut(parent_path)?;
        parent.subgroups.push(FolderDraft::default());

        let mut path = parent_path.to_vec();
        path.push(parent.subgroups.len() - 1);
        Ok(path)
    }

    /// Merge the provided fields into the node at `path`, leaving every other
    /// node untouched.
    pub fn update_node(&mut self, path: &[usize], update: DraftUpdate) -> Result<(), DraftError> {
        let node = self.node_mut(path)?;
        update.apply(node);
        Ok(())
    }

    /// Remove and return the node at `path`; later siblings shift down one
    /// index. The root (empty path) has no parent to remove it from.
    pub fn remove_node(&mut self, path: &[usize]) -> Result<FolderDraft, DraftError> {
        let Some((&child_index, parent_path)) = path.split_last() else {
            return Err(DraftError::RootRemoval);
        };
        let parent = self.node_mut(parent_path)?;
        if child_index >= parent.subgroups.len() {
            return Err(DraftError::PathNotFound {
                path: path.to_vec(),
                index: child_index,
                len: parent.subgroups.len(),
            });
        }
        Ok(parent.subgroups.remove(child_index))
    }

    /// Total nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self.subgroups.iter().map(FolderDraft::node_count).sum::<usize>()
    }
}

/// Partial update for one draft node. Only fields that are `Some` are written;
/// a provided `subgroups` replaces the whole child array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subgroups: Option<Vec<FolderDraft>>,
}

impl DraftUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Default::default() }
    }

    pub fn describe(description: impl Into<String>) -> Self {
        Self { description: Some(description.into()), ..Default::default() }
    }

    fn apply(self, node: &mut FolderDraft) {
        if let Some(name) = self.name {
            node.name = name;
        }
        if let Some(description) = self.description {
            node.description = description;
        }
        if let Some(subgroups) = self.subgroups {
            node.subgroups = subgroups;
        }
    }
}
