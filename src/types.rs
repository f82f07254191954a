use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three principal categories a folder grant can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Group,
    Role,
}

impl PrincipalKind {
    pub const ALL: [PrincipalKind; 3] = [PrincipalKind::User, PrincipalKind::Group, PrincipalKind::Role];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Group => "group",
            PrincipalKind::Role => "role",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown principal kind: '{0}' (expected user, group, or role)")]
pub struct ParsePrincipalKindError(String);

impl FromStr for PrincipalKind {
    type Err = ParsePrincipalKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" | "users" => Ok(PrincipalKind::User),
            "group" | "groups" => Ok(PrincipalKind::Group),
            "role" | "roles" => Ok(PrincipalKind::Role),
            other => Err(ParsePrincipalKindError(other.to_string())),
        }
    }
}

/// Identity of the console operator, as handed over by the host application.
/// Authentication itself happens elsewhere; this only carries what the editing
/// rules need (the self-grant check compares against `user_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: String,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into() }
    }
}
