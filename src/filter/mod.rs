pub mod error;
pub mod listing;
pub mod matching;

pub use error::ListError;
pub use listing::{ListQuery, ListRecord, Page, SortDirection};
pub use matching::{filter_prefix, Matchable};
