use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::client::error::ClientError;
use crate::client::types::{CreatedFolder, GroupSummary, PageRequest, RoleSummary, UserSummary};
use crate::client::AdminApi;
use crate::config::CONFIG;
use crate::draft::FolderDraft;

/// HTTP implementation of [`AdminApi`] against the admin backend.
///
/// Holds one pooled `reqwest` client for the session. The bearer token is
/// optional; when present it is attached to every request.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|err| ClientError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: err.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(CONFIG.http.request_timeout_secs))
            .build()?;

        Ok(Self { http, base_url, bearer_token: None })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &PageRequest,
    ) -> Result<Vec<T>, ClientError> {
        let mut params = vec![("page", request.page.to_string()), ("size", request.size.to_string())];
        if let Some(query) = &request.query {
            params.push(("query", query.clone()));
        }

        let response = self.authorize(self.http.get(self.endpoint(path))).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus { status, body });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AdminApi for RestClient {
    async fn list_users(&self, request: &PageRequest) -> Result<Vec<UserSummary>, ClientError> {
        self.fetch_list("/api/admin/users", request).await
    }

    async fn list_groups(&self, request: &PageRequest) -> Result<Vec<GroupSummary>, ClientError> {
        self.fetch_list("/api/admin/groups", request).await
    }

    async fn list_roles(&self, request: &PageRequest) -> Result<Vec<RoleSummary>, ClientError> {
        self.fetch_list("/api/admin/roles", request).await
    }

    async fn create_folder(&self, draft: &FolderDraft) -> Result<CreatedFolder, ClientError> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, folders = draft.node_count(), "submitting folder creation");

        let response = self
            .authorize(self.http.post(self.endpoint("/api/admin/folders")))
            .header("X-Request-Id", request_id.to_string())
            .json(draft)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus { status, body });
        }
        Ok(response.json().await?)
    }
}
