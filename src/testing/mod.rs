use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::client::types::{CreatedFolder, GroupSummary, PageRequest, RoleSummary, UserSummary};
use crate::client::{AdminApi, ClientError};
use crate::draft::FolderDraft;

/// Canned backend for unit tests: fixed directory lists, switchable per-call
/// failures, and a log of every request received. Queried list calls are
/// served from the `search_*` lists so tests can hand back results that
/// differ from the bulk load.
#[derive(Default)]
pub struct StubApi {
    pub users: Vec<UserSummary>,
    pub groups: Vec<GroupSummary>,
    pub roles: Vec<RoleSummary>,
    pub search_users: Vec<UserSummary>,
    pub search_groups: Vec<GroupSummary>,
    pub search_roles: Vec<RoleSummary>,
    pub fail_users: bool,
    pub fail_groups: bool,
    pub fail_roles: bool,
    pub fail_create: bool,
    created_count: AtomicUsize,
    calls: Mutex<CallLog>,
}

/// Everything a [`StubApi`] has been asked so far.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub user_requests: Vec<PageRequest>,
    pub group_requests: Vec<PageRequest>,
    pub role_requests: Vec<PageRequest>,
    pub created: Vec<FolderDraft>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(users: Vec<UserSummary>, groups: Vec<GroupSummary>, roles: Vec<RoleSummary>) -> Self {
        Self { users, groups, roles, ..Default::default() }
    }

    /// Snapshot of the calls received so far.
    pub fn calls(&self) -> CallLog {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record<F: FnOnce(&mut CallLog)>(&self, record: F) {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        record(&mut calls);
    }
}

fn stub_failure() -> ClientError {
    ClientError::UnexpectedStatus {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: "stub failure".to_string(),
    }
}

#[async_trait]
impl AdminApi for StubApi {
    async fn list_users(&self, request: &PageRequest) -> Result<Vec<UserSummary>, ClientError> {
        self.record(|calls| calls.user_requests.push(request.clone()));
        if self.fail_users {
            return Err(stub_failure());
        }
        if request.query.is_some() {
            return Ok(self.search_users.clone());
        }
        Ok(self.users.clone())
    }

    async fn list_groups(&self, request: &PageRequest) -> Result<Vec<GroupSummary>, ClientError> {
        self.record(|calls| calls.group_requests.push(request.clone()));
        if self.fail_groups {
            return Err(stub_failure());
        }
        if request.query.is_some() {
            return Ok(self.search_groups.clone());
        }
        Ok(self.groups.clone())
    }

    async fn list_roles(&self, request: &PageRequest) -> Result<Vec<RoleSummary>, ClientError> {
        self.record(|calls| calls.role_requests.push(request.clone()));
        if self.fail_roles {
            return Err(stub_failure());
        }
        if request.query.is_some() {
            return Ok(self.search_roles.clone());
        }
        Ok(self.roles.clone())
    }

    async fn create_folder(&self, draft: &FolderDraft) -> Result<CreatedFolder, ClientError> {
        self.record(|calls| calls.created.push(draft.clone()));
        if self.fail_create {
            return Err(stub_failure());
        }
        let serial = self.created_count.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CreatedFolder { id: format!("folder-{serial}"), name: draft.name.clone() })
    }
}

pub fn user(id: &str, first: &str, last: &str, email: &str, username: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        username: username.to_string(),
        created_at: None,
    }
}

pub fn group(id: &str, name: &str, path: &str) -> GroupSummary {
    GroupSummary { id: id.to_string(), name: name.to_string(), path: path.to_string() }
}

pub fn role(id: &str, name: &str, description: &str) -> RoleSummary {
    RoleSummary { id: id.to_string(), name: name.to_string(), description: description.to_string() }
}

/// Small fixed directory used across unit tests.
pub fn sample_directory() -> (Vec<UserSummary>, Vec<GroupSummary>, Vec<RoleSummary>) {
    (
        vec![
            user("u1", "Ada", "Lovelace", "ada@corp.example", "ada"),
            user("u2", "Grace", "Hopper", "grace@corp.example", "grace"),
            user("u3", "Annie", "Easley", "annie@corp.example", "annie"),
        ],
        vec![group("g1", "Engineering", "/corp/engineering"), group("g2", "Legal", "/corp/legal")],
        vec![role("r1", "Administrator", "Full console access"), role("r2", "Auditor", "Read-only oversight")],
    )
}
