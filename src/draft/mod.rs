pub mod error;
pub mod expansion;
pub mod tree;

pub use error::DraftError;
pub use expansion::ExpansionState;
pub use tree::{DraftUpdate, FolderDraft};
