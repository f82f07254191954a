use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::listing::ListRecord;
use crate::filter::Matchable;

/// Paging parameters for the three directory list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub query: Option<String>,
}

impl PageRequest {
    pub fn first(size: usize) -> Self {
        Self { page: 0, size, query: None }
    }

    pub fn search(size: usize, query: impl Into<String>) -> Self {
        Self { page: 0, size, query: Some(query.into()) }
    }
}

/// Directory entry for a user, as the list endpoint returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserSummary {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Reply to a successful folder-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFolder {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

// The dropdown matches each kind against its display fields; sort names are
// the wire-level field names a caller already sees in the JSON.

impl Matchable for UserSummary {
    fn match_fields(&self) -> Vec<&str> {
        vec![&self.first_name, &self.last_name, &self.email, &self.username]
    }
}

impl ListRecord for UserSummary {
    const SORT_FIELDS: &'static [&'static str] = &["firstName", "lastName", "email", "username"];

    fn sort_field(&self, field: &str) -> Option<&str> {
        match field {
            "firstName" => Some(&self.first_name),
            "lastName" => Some(&self.last_name),
            "email" => Some(&self.email),
            "username" => Some(&self.username),
            _ => None,
        }
    }
}

impl Matchable for GroupSummary {
    fn match_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.path]
    }
}

impl ListRecord for GroupSummary {
    const SORT_FIELDS: &'static [&'static str] = &["name", "path"];

    fn sort_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "path" => Some(&self.path),
            _ => None,
        }
    }
}

impl Matchable for RoleSummary {
    fn match_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }
}

impl ListRecord for RoleSummary {
    const SORT_FIELDS: &'static [&'static str] = &["name", "description"];

    fn sort_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}
