use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grants::permission::PermissionSet;

/// The four named permission bundles the console offers.
///
/// Each preset expands to a fixed [`PermissionSet`]; see [`Preset::permissions`].
/// The mapping is the single source of truth for both directions: applying a
/// preset writes the full set, and [`classify`] recovers the preset from a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    ViewOnly,
    Contributor,
    Editor,
    Admin,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::ViewOnly, Preset::Contributor, Preset::Editor, Preset::Admin];

    /// The full flag set this preset stands for. The three graded presets all
    /// propagate to sub-folders; `Admin` asserts every capability but leaves
    /// `inherits` off, so an admin grant stays scoped to the folder it is
    /// placed on unless the caller opts in.
    pub fn permissions(&self) -> PermissionSet {
        match self {
            Preset::ViewOnly => PermissionSet { can_view: true, inherits: true, ..Default::default() },
            Preset::Contributor => PermissionSet {
                can_view: true,
                can_upload: true,
                can_edit_doc: true,
                inherits: true,
                ..Default::default()
            },
            Preset::Editor => PermissionSet {
                can_view: true,
                can_edit: true,
                can_create_sub_folders: true,
                can_upload: true,
                can_edit_doc: true,
                can_delete_doc: true,
                inherits: true,
                ..Default::default()
            },
            Preset::Admin => PermissionSet {
                can_view: true,
                can_edit: true,
                can_delete: true,
                can_share: true,
                can_manage_permissions: true,
                can_create_sub_folders: true,
                can_upload: true,
                can_edit_doc: true,
                can_delete_doc: true,
                can_share_doc: true,
                can_manage_permissions_doc: true,
                inherits: false,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::ViewOnly => "viewOnly",
            Preset::Contributor => "contributor",
            Preset::Editor => "editor",
            Preset::Admin => "admin",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewOnly" | "view-only" | "viewonly" => Ok(Preset::ViewOnly),
            "contributor" => Ok(Preset::Contributor),
            "editor" => Ok(Preset::Editor),
            "admin" => Ok(Preset::Admin),
            other => Err(ParsePresetError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown preset '{0}' (expected viewOnly, contributor, editor, or admin)")]
pub struct ParsePresetError(String);

/// What a [`PermissionSet`] looks like when summarized for display: either it
/// matches one of the four presets exactly, or it is a custom combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Preset(Preset),
    Custom,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Preset(preset) => preset.as_str(),
            Classification::Custom => "custom",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Match a flag set against the preset table. All twelve flags participate,
/// `inherits` included, so an admin set with `inherits` on classifies as
/// custom rather than admin. Pure, no allocation.
pub fn classify(permissions: &PermissionSet) -> Classification {
    for preset in Preset::ALL {
        if preset.permissions() == *permissions {
            return Classification::Preset(preset);
        }
    }
    Classification::Custom
}
