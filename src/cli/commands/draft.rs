use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::draft::FolderDraft;
use crate::grants::classify;
use crate::types::PrincipalKind;

#[derive(Subcommand)]
pub enum DraftCommands {
    #[command(about = "Check a draft file against the submission rules")]
    Validate {
        #[arg(help = "Draft file (.yaml, .yml or .json)")]
        file: PathBuf,
    },

    #[command(about = "Print a draft file as a folder tree")]
    Show {
        #[arg(help = "Draft file (.yaml, .yml or .json)")]
        file: PathBuf,
    },

    #[command(about = "Write a starter draft file")]
    New {
        #[arg(help = "Root folder name")]
        name: String,
        #[arg(long, help = "Parent folder id for the root")]
        parent: Option<String>,
        #[arg(long, help = "Output path; prints to stdout when omitted")]
        output: Option<PathBuf>,
    },
}

pub async fn handle(cmd: DraftCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DraftCommands::Validate { file } => handle_validate(file, output_format),
        DraftCommands::Show { file } => handle_show(file, output_format),
        DraftCommands::New { name, parent, output } => handle_new(name, parent, output, output_format),
    }
}

/// Parse a draft file by extension; anything that is not `.json` goes through
/// the YAML parser, which accepts JSON as well.
pub fn load_draft(path: &Path) -> anyhow::Result<FolderDraft> {
    let content = fs::read_to_string(path)
        .map_err(|err| anyhow::anyhow!("Cannot read {}: {}", path.display(), err))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        _ => Ok(serde_yaml::from_str(&content)?),
    }
}

fn total_grants(draft: &FolderDraft) -> usize {
    draft.grants.grant_count() + draft.subgroups.iter().map(total_grants).sum::<usize>()
}

fn collect_issues(draft: &FolderDraft, path: &mut Vec<usize>, issues: &mut Vec<String>) {
    let label = if path.is_empty() { "root".to_string() } else { format!("node {:?}", path) };
    for (kind, id) in draft.grants.duplicate_ids() {
        issues.push(format!("{}: duplicate {} grant '{}'", label, kind, id));
    }
    for (index, child) in draft.subgroups.iter().enumerate() {
        path.push(index);
        collect_issues(child, path, issues);
        path.pop();
    }
}

fn handle_validate(file: PathBuf, output_format: OutputFormat) -> anyhow::Result<()> {
    let draft = load_draft(&file)?;

    let mut issues = Vec::new();
    if draft.name.trim().is_empty() {
        issues.push("root: folder name must not be empty".to_string());
    }
    collect_issues(&draft, &mut Vec::new(), &mut issues);

    if issues.is_empty() {
        output_success(
            &output_format,
            &format!("{} is valid", file.display()),
            Some(json!({
                "nodes": draft.node_count(),
                "grants": total_grants(&draft)
            })),
        )
    } else {
        output_error(&output_format, &issues.join("; "), Some("invalid_draft"))
    }
}

fn render_tree(draft: &FolderDraft, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let name = if draft.name.trim().is_empty() { "(unnamed)" } else { draft.name.as_str() };
    if draft.description.is_empty() {
        lines.push(format!("{}{}", indent, name));
    } else {
        lines.push(format!("{}{}  [{}]", indent, name, draft.description));
    }

    for kind in PrincipalKind::ALL {
        for grant in draft.grants.sequence(kind) {
            lines.push(format!("{}  @{} {} ({})", indent, kind, grant.id, classify(&grant.permission)));
        }
    }

    for child in &draft.subgroups {
        render_tree(child, depth + 1, lines);
    }
}

fn handle_show(file: PathBuf, output_format: OutputFormat) -> anyhow::Result<()> {
    let draft = load_draft(&file)?;

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        OutputFormat::Text => {
            let mut lines = Vec::new();
            render_tree(&draft, 0, &mut lines);
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn handle_new(
    name: String,
    parent: Option<String>,
    output: Option<PathBuf>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut draft = FolderDraft::for_parent(parent);
    draft.name = name;

    let rendered = serde_yaml::to_string(&draft)?;
    match output {
        Some(path) => {
            fs::write(&path, rendered)?;
            output_success(
                &output_format,
                &format!("Draft written to {}", path.display()),
                Some(json!({ "name": draft.name })),
            )
        }
        None => {
            print!("{}", rendered);
            Ok(())
        }
    }
}
