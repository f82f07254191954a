use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid backend base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    UnexpectedStatus { status: reqwest::StatusCode, body: String },
}
