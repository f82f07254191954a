pub mod editor;
pub mod error;
pub mod permission;
pub mod preset;

pub use editor::{GrantSet, PrincipalGrant};
pub use error::GrantError;
pub use permission::{PermissionSet, PermissionUpdate};
pub use preset::{classify, Classification, Preset};
