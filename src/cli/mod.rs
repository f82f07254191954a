pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "docket")]
#[command(about = "Docket CLI - Folder authoring against the document admin API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Connection context management")]
    Context {
        #[command(subcommand)]
        cmd: commands::context::ContextCommands,
    },

    #[command(about = "Principal directory lookups")]
    Directory {
        #[command(subcommand)]
        cmd: commands::directory::DirectoryCommands,
    },

    #[command(about = "Folder draft files: inspect and validate")]
    Draft {
        #[command(subcommand)]
        cmd: commands::draft::DraftCommands,
    },

    #[command(about = "Folder creation against the backend")]
    Folder {
        #[command(subcommand)]
        cmd: commands::folder::FolderCommands,
    },

    #[command(about = "Permission preset tables")]
    Presets {
        #[command(subcommand)]
        cmd: commands::presets::PresetsCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Context { cmd } => commands::context::handle(cmd, output_format).await,
        Commands::Directory { cmd } => commands::directory::handle(cmd, output_format).await,
        Commands::Draft { cmd } => commands::draft::handle(cmd, output_format).await,
        Commands::Folder { cmd } => commands::folder::handle(cmd, output_format).await,
        Commands::Presets { cmd } => commands::presets::handle(cmd, output_format).await,
    }
}
