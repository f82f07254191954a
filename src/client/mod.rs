pub mod error;
pub mod rest;
pub mod types;

pub use error::ClientError;
pub use rest::RestClient;
pub use types::{CreatedFolder, GroupSummary, PageRequest, RoleSummary, UserSummary};

use async_trait::async_trait;

use crate::draft::FolderDraft;

/// The slice of the admin backend this crate talks to: the three directory
/// list endpoints and the single folder-creation call. Implemented by
/// [`RestClient`] for production and by stubs in tests.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_users(&self, request: &PageRequest) -> Result<Vec<UserSummary>, ClientError>;

    async fn list_groups(&self, request: &PageRequest) -> Result<Vec<GroupSummary>, ClientError>;

    async fn list_roles(&self, request: &PageRequest) -> Result<Vec<RoleSummary>, ClientError>;

    /// Create the whole drafted tree in one call. The draft is sent as-is;
    /// the backend owns id assignment and any server-side validation.
    async fn create_folder(&self, draft: &FolderDraft) -> Result<CreatedFolder, ClientError>;
}
