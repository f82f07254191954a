use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{AdminApi, PageRequest, RestClient};
use crate::types::SessionContext;

/// The saved connection context: which backend the CLI talks to and as whom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliContext {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub user_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CliContext {
    pub fn new(base_url: String, bearer_token: Option<String>, user_id: Option<String>) -> Self {
        Self { base_url, bearer_token, user_id, updated_at: Utc::now() }
    }

    /// REST client configured from this context.
    pub fn client(&self) -> anyhow::Result<RestClient> {
        let client = RestClient::new(&self.base_url)?;
        Ok(match &self.bearer_token {
            Some(token) => client.with_bearer_token(token.clone()),
            None => client,
        })
    }

    /// Session for editor operations; the self-grant check needs a user id,
    /// so contexts saved without one fall back to an id no backend issues.
    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.user_id.clone().unwrap_or_else(|| "cli".to_string()))
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("DOCKET_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("docket").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_context() -> anyhow::Result<Option<CliContext>> {
    let context_file = get_config_dir()?.join("context.json");

    if !context_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(context_file)?;
    let context: CliContext = serde_json::from_str(&content)?;
    Ok(Some(context))
}

pub fn save_context(context: &CliContext) -> anyhow::Result<()> {
    let context_file = get_config_dir()?.join("context.json");

    let content = serde_json::to_string_pretty(context)?;
    fs::write(context_file, content)?;
    Ok(())
}

pub fn clear_context() -> anyhow::Result<bool> {
    let context_file = get_config_dir()?.join("context.json");

    if !context_file.exists() {
        return Ok(false);
    }

    fs::remove_file(context_file)?;
    Ok(true)
}

pub fn require_context() -> anyhow::Result<CliContext> {
    load_context()?.ok_or_else(|| anyhow::anyhow!("No context configured. Run 'docket context use <url>' first"))
}

/// Cheap connectivity probe: one single-entry role listing.
pub async fn ping_backend(context: &CliContext) -> bool {
    match context.client() {
        Ok(client) => client.list_roles(&PageRequest::first(1)).await.is_ok(),
        Err(_) => false,
    }
}
