use thiserror::Error;

/// Errors from addressing or editing the draft tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DraftError {
    #[error("Path {path:?} does not address a subfolder (index {index} out of {len} children)")]
    PathNotFound { path: Vec<usize>, index: usize, len: usize },

    #[error("The root draft cannot be removed from its own tree")]
    RootRemoval,
}
