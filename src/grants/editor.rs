use serde::{Deserialize, Serialize};

use crate::grants::error::GrantError;
use crate::grants::permission::{PermissionSet, PermissionUpdate};
use crate::grants::preset::Preset;
use crate::types::PrincipalKind;

/// One principal paired with the flags it holds on a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalGrant {
    pub id: String,
    pub permission: PermissionSet,
}

impl PrincipalGrant {
    /// A freshly attached principal starts out view-only.
    pub fn with_view_only(id: impl Into<String>) -> Self {
        Self { id: id.into(), permission: Preset::ViewOnly.permissions() }
    }
}

/// The three grant sequences of one folder draft.
///
/// Ordering within each sequence is attachment order and ids are unique per
/// sequence. The wire field names are the backend's own, misspellings
/// included; changing them breaks folder creation against the deployed API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSet {
    #[serde(default, rename = "usersGevenPermission")]
    pub users: Vec<PrincipalGrant>,
    #[serde(default, rename = "goupesGevenPermission")]
    pub groups: Vec<PrincipalGrant>,
    #[serde(default, rename = "rolesGevenPermission")]
    pub roles: Vec<PrincipalGrant>,
}

impl GrantSet {
    pub fn sequence(&self, kind: PrincipalKind) -> &[PrincipalGrant] {
        match kind {
            PrincipalKind::User => &self.users,
            PrincipalKind::Group => &self.groups,
            PrincipalKind::Role => &self.roles,
        }
    }

    fn sequence_mut(&mut self, kind: PrincipalKind) -> &mut Vec<PrincipalGrant> {
        match kind {
            PrincipalKind::User => &mut self.users,
            PrincipalKind::Group => &mut self.groups,
            PrincipalKind::Role => &mut self.roles,
        }
    }

    pub fn contains(&self, kind: PrincipalKind, id: &str) -> bool {
        self.sequence(kind).iter().any(|grant| grant.id == id)
    }

    /// Total grants across all three sequences.
    pub fn grant_count(&self) -> usize {
        self.users.len() + self.groups.len() + self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grant_count() == 0
    }

    /// Ids that appear more than once within a sequence. Grants built through
    /// [`GrantSet::attach`] never have any; deserialized ones might.
    pub fn duplicate_ids(&self) -> Vec<(PrincipalKind, String)> {
        let mut duplicates = Vec::new();
        for kind in PrincipalKind::ALL {
            let mut seen = std::collections::HashSet::new();
            for grant in self.sequence(kind) {
                if !seen.insert(grant.id.as_str()) {
                    duplicates.push((kind, grant.id.clone()));
                }
            }
        }
        duplicates
    }

    /// Append a view-only grant for `id` to the given kind's sequence.
    ///
    /// Rejected without any state change when the principal already holds a
    /// grant in that sequence, or when a user grant names the requesting user
    /// (`current_user_id`).
    pub fn attach(
        &mut self,
        kind: PrincipalKind,
        id: impl Into<String>,
        current_user_id: &str,
    ) -> Result<(), GrantError> {
        let id = id.into();
        if kind == PrincipalKind::User && id == current_user_id {
            return Err(GrantError::SelfGrant { id });
        }
        if self.contains(kind, &id) {
            return Err(GrantError::DuplicatePrincipal { kind, id });
        }
        self.sequence_mut(kind).push(PrincipalGrant::with_view_only(id));
        Ok(())
    }

    /// Merge `update` into the grant at `index`; flags the update does not
    /// carry keep their prior values.
    pub fn update(
        &mut self,
        kind: PrincipalKind,
        index: usize,
        update: PermissionUpdate,
    ) -> Result<(), GrantError> {
        let seq = self.sequence_mut(kind);
        let len = seq.len();
        let grant = seq.get_mut(index).ok_or(GrantError::IndexOutOfBounds { kind, index, len })?;
        update.apply(&mut grant.permission);
        Ok(())
    }

    /// Remove and return the grant at `index`. Later grants in the sequence
    /// shift down, so callers must not reuse indices captured before the call.
    pub fn remove(&mut self, kind: PrincipalKind, index: usize) -> Result<PrincipalGrant, GrantError> {
        let seq = self.sequence_mut(kind);
        if index >= seq.len() {
            return Err(GrantError::IndexOutOfBounds { kind, index, len: seq.len() });
        }
        Ok(seq.remove(index))
    }

    /// Replace the whole flag set at `index` with the preset's table. Full
    /// replace, not a merge.
    pub fn apply_preset(
        &mut self,
        kind: PrincipalKind,
        index: usize,
        preset: Preset,
    ) -> Result<(), GrantError> {
        let seq = self.sequence_mut(kind);
        let len = seq.len();
        let grant = seq.get_mut(index).ok_or(GrantError::IndexOutOfBounds { kind, index, len })?;
        grant.permission = preset.permissions();
        Ok(())
    }

    /// Direct write of a full flag set, for callers that assembled one by hand.
    pub fn set_permissions(
        &mut self,
        kind: PrincipalKind,
        index: usize,
        permissions: PermissionSet,
    ) -> Result<(), GrantError> {
        let seq = self.sequence_mut(kind);
        let len = seq.len();
        let grant = seq.get_mut(index).ok_or(GrantError::IndexOutOfBounds { kind, index, len })?;
        grant.permission = permissions;
        Ok(())
    }
}
