use thiserror::Error;

use crate::client::ClientError;
use crate::draft::DraftError;
use crate::grants::GrantError;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Folder name must not be empty")]
    EmptyFolderName,
    #[error("A submission is already in flight")]
    SubmissionInFlight,
    #[error("Grant error: {0}")]
    Grant(#[from] GrantError),
    #[error("Draft error: {0}")]
    Draft(#[from] DraftError),
    #[error("Request error: {0}")]
    Client(#[from] ClientError),
}
