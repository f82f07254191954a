use std::sync::Arc;

use clap::Subcommand;
use serde::Serialize;
use serde_json::json;

use crate::cli::config::require_context;
use crate::cli::utils::output_list;
use crate::cli::OutputFormat;
use crate::client::{AdminApi, PageRequest};
use crate::config::CONFIG;
use crate::directory::PrincipalDirectory;
use crate::filter::{ListQuery, Page, SortDirection};
use crate::types::PrincipalKind;

#[derive(Subcommand)]
pub enum DirectoryCommands {
    #[command(about = "List principals of one kind, shaped locally")]
    List {
        #[arg(help = "Principal kind: users, groups or roles")]
        kind: String,
        #[arg(long, help = "Prefix filter over the kind's display fields")]
        filter: Option<String>,
        #[arg(long, help = "Sort field (wire name, e.g. lastName)")]
        sort: Option<String>,
        #[arg(long, default_value = "asc", help = "Sort direction: asc or desc")]
        direction: String,
        #[arg(long, default_value = "0", help = "Zero-based page to show")]
        page: usize,
        #[arg(long, help = "Page size; omit to show everything")]
        size: Option<usize>,
    },

    #[command(about = "Search the backend directory and show matches")]
    Search {
        #[arg(help = "Principal kind: users, groups or roles")]
        kind: String,
        #[arg(help = "Search text")]
        query: String,
    },
}

pub async fn handle(cmd: DirectoryCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DirectoryCommands::List { kind, filter, sort, direction, page, size } => {
            handle_list(kind, filter, sort, direction, page, size, output_format).await
        }
        DirectoryCommands::Search { kind, query } => handle_search(kind, query, output_format).await,
    }
}

fn build_query(
    filter: Option<String>,
    sort: Option<String>,
    direction: String,
    page: usize,
    size: Option<usize>,
) -> anyhow::Result<ListQuery> {
    let mut query = ListQuery::new();
    if let Some(filter) = filter {
        query.query(filter);
    }
    if let Some(field) = sort {
        query.sort(field, direction.parse::<SortDirection>()?);
    }
    if let Some(size) = size {
        query.page(page, size)?;
    }
    Ok(query)
}

fn output_page<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    page: &Page<'_, T>,
    render: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: page.items,
                    "total": page.total,
                    "page": page.page,
                    "pages": page.pages
                }))?
            );
        }
        OutputFormat::Text => {
            if page.items.is_empty() {
                println!("No {} found", collection_name);
            }
            for item in &page.items {
                println!("{}", render(item));
            }
            if page.pages > 1 {
                println!("Page {} of {} ({} matches)", page.page + 1, page.pages, page.total);
            }
        }
    }
    Ok(())
}

async fn handle_list(
    kind: String,
    filter: Option<String>,
    sort: Option<String>,
    direction: String,
    page: usize,
    size: Option<usize>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let kind: PrincipalKind = kind.parse()?;
    let context = require_context()?;
    let client = context.client()?;
    let request = PageRequest::first(CONFIG.directory.initial_load_size);
    let query = build_query(filter, sort, direction, page, size)?;

    match kind {
        PrincipalKind::User => {
            let records = client.list_users(&request).await?;
            let page = query.apply(&records)?;
            output_page(&output_format, "users", &page, |u| {
                format!("{}  {} <{}>", u.id, u.display_name(), u.email)
            })
        }
        PrincipalKind::Group => {
            let records = client.list_groups(&request).await?;
            let page = query.apply(&records)?;
            output_page(&output_format, "groups", &page, |g| format!("{}  {} ({})", g.id, g.name, g.path))
        }
        PrincipalKind::Role => {
            let records = client.list_roles(&request).await?;
            let page = query.apply(&records)?;
            output_page(&output_format, "roles", &page, |r| format!("{}  {}: {}", r.id, r.name, r.description))
        }
    }
}

async fn handle_search(kind: String, query: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let kind: PrincipalKind = kind.parse()?;
    let context = require_context()?;
    let api = Arc::new(context.client()?) as Arc<dyn AdminApi>;
    let directory = PrincipalDirectory::new(api);

    let added = directory.search_now(kind, &query).await?;
    tracing::debug!(kind = %kind, added, "directory search merged");

    match kind {
        PrincipalKind::User => {
            let matches = directory.filter_users(&query);
            output_list(&output_format, "users", &matches, |u| {
                format!("{}  {} <{}>", u.id, u.display_name(), u.email)
            })
        }
        PrincipalKind::Group => {
            let matches = directory.filter_groups(&query);
            output_list(&output_format, "groups", &matches, |g| format!("{}  {} ({})", g.id, g.name, g.path))
        }
        PrincipalKind::Role => {
            let matches = directory.filter_roles(&query);
            output_list(&output_format, "roles", &matches, |r| format!("{}  {}: {}", r.id, r.name, r.description))
        }
    }
}
