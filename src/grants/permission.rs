use serde::{Deserialize, Serialize};

/// The capability flags a grant carries for one folder.
///
/// The first six flags govern the folder itself and the next five govern
/// documents inside it; `inherits` controls whether the grant propagates to
/// descendant folders. Serialization always emits the flat camelCase object the backend
/// expects with all twelve fields present (`canView`, `canEditDoc`, ...);
/// deserialization tolerates missing flags, which default to false, so draft
/// files only need to spell out the flags they set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionSet {
    // Folder-level capabilities
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_share: bool,
    pub can_manage_permissions: bool,
    pub can_create_sub_folders: bool,
    // Document-level capabilities
    pub can_upload: bool,
    pub can_edit_doc: bool,
    pub can_delete_doc: bool,
    pub can_share_doc: bool,
    pub can_manage_permissions_doc: bool,
    // Whether the grant applies to sub-folders
    pub inherits: bool,
}

impl PermissionSet {
    /// True when none of the eleven capability flags is set (`inherits` is not a
    /// capability and is ignored here).
    pub fn grants_nothing(&self) -> bool {
        !(self.can_view
            || self.can_edit
            || self.can_delete
            || self.can_share
            || self.can_manage_permissions
            || self.can_create_sub_folders
            || self.can_upload
            || self.can_edit_doc
            || self.can_delete_doc
            || self.can_share_doc
            || self.can_manage_permissions_doc)
    }
}

/// Partial update for a [`PermissionSet`]: only the flags that are `Some` are
/// written, everything else keeps its prior value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionUpdate {
    pub can_view: Option<bool>,
    pub can_edit: Option<bool>,
    pub can_delete: Option<bool>,
    pub can_share: Option<bool>,
    pub can_manage_permissions: Option<bool>,
    pub can_create_sub_folders: Option<bool>,
    pub can_upload: Option<bool>,
    pub can_edit_doc: Option<bool>,
    pub can_delete_doc: Option<bool>,
    pub can_share_doc: Option<bool>,
    pub can_manage_permissions_doc: Option<bool>,
    pub inherits: Option<bool>,
}

impl PermissionUpdate {
    pub fn apply(&self, target: &mut PermissionSet) {
        if let Some(v) = self.can_view {
            target.can_view = v;
        }
        if let Some(v) = self.can_edit {
            target.can_edit = v;
        }
        if let Some(v) = self.can_delete {
            target.can_delete = v;
        }
        if let Some(v) = self.can_share {
            target.can_share = v;
        }
        if let Some(v) = self.can_manage_permissions {
            target.can_manage_permissions = v;
        }
        if let Some(v) = self.can_create_sub_folders {
            target.can_create_sub_folders = v;
        }
        if let Some(v) = self.can_upload {
            target.can_upload = v;
        }
        if let Some(v) = self.can_edit_doc {
            target.can_edit_doc = v;
        }
        if let Some(v) = self.can_delete_doc {
            target.can_delete_doc = v;
        }
        if let Some(v) = self.can_share_doc {
            target.can_share_doc = v;
        }
        if let Some(v) = self.can_manage_permissions_doc {
            target.can_manage_permissions_doc = v;
        }
        if let Some(v) = self.inherits {
            target.inherits = v;
        }
    }

    /// True when no flag is set, i.e. applying it would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == PermissionUpdate::default()
    }
}
