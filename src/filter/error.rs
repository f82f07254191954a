use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListError {
    #[error("Unknown sort field '{field}' (sortable fields: {allowed})")]
    UnknownSortField { field: String, allowed: String },

    #[error("Unknown sort direction '{0}' (expected asc or desc)")]
    UnknownSortDirection(String),

    #[error("Page size must be at least 1")]
    InvalidPageSize,
}
