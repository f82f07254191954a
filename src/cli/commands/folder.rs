use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::cli::commands::draft::load_draft;
use crate::cli::config::require_context;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::AdminApi;
use crate::directory::PrincipalDirectory;
use crate::wizard::FolderWizard;

#[derive(Subcommand)]
pub enum FolderCommands {
    #[command(about = "Create a folder tree from a draft file")]
    Create {
        #[arg(help = "Draft file (.yaml, .yml or .json)")]
        file: PathBuf,
        #[arg(long, help = "Parent folder id; overrides the file's parentId")]
        parent: Option<String>,
        #[arg(long, help = "Validate and print the payload without sending")]
        dry_run: bool,
    },
}

pub async fn handle(cmd: FolderCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        FolderCommands::Create { file, parent, dry_run } => {
            handle_create(file, parent, dry_run, output_format).await
        }
    }
}

async fn handle_create(
    file: PathBuf,
    parent: Option<String>,
    dry_run: bool,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let context = require_context()?;
    let mut draft = load_draft(&file)?;
    if let Some(parent) = parent {
        draft.parent_id = Some(parent);
    }

    let api = Arc::new(context.client()?) as Arc<dyn AdminApi>;
    let directory = Arc::new(PrincipalDirectory::new(Arc::clone(&api)));
    let mut wizard = FolderWizard::new(api, directory, context.session());
    wizard.load_draft(draft)?;

    if dry_run {
        let payload = wizard.begin_submit()?;
        if matches!(output_format, OutputFormat::Text) {
            println!("Would send {} node(s):", payload.node_count());
        }
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let nodes = wizard.draft().node_count();
    let created = wizard.submit().await?;

    output_success(
        &output_format,
        &format!("Folder tree created as {}", created.id),
        Some(json!({
            "folder_id": created.id,
            "name": created.name,
            "nodes": nodes
        })),
    )
}
