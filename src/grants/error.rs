use thiserror::Error;

use crate::types::PrincipalKind;

/// Errors from editing a folder's grant sequences.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrantError {
    #[error("{kind} '{id}' already holds a grant on this folder")]
    DuplicatePrincipal { kind: PrincipalKind, id: String },

    #[error("Cannot grant permissions to yourself ('{id}' is the requesting user)")]
    SelfGrant { id: String },

    #[error("No {kind} grant at position {index} (sequence has {len})")]
    IndexOutOfBounds { kind: PrincipalKind, index: usize, len: usize },
}
