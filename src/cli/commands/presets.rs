use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::grants::{PermissionSet, Preset};

#[derive(Subcommand)]
pub enum PresetsCommands {
    #[command(about = "List the four permission presets")]
    List,

    #[command(about = "Show one preset's flag table")]
    Show {
        #[arg(help = "Preset name: viewOnly, contributor, editor or admin")]
        name: String,
    },
}

pub async fn handle(cmd: PresetsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PresetsCommands::List => handle_list(output_format),
        PresetsCommands::Show { name } => handle_show(name, output_format),
    }
}

/// Wire names of the flags a set enables.
fn enabled_flags(permissions: &PermissionSet) -> Vec<String> {
    match serde_json::to_value(permissions) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter(|(_, value)| value.as_bool() == Some(true))
            .map(|(name, _)| name)
            .collect(),
        _ => Vec::new(),
    }
}

fn handle_list(output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut presets = serde_json::Map::new();
            for preset in Preset::ALL {
                presets.insert(preset.as_str().to_string(), json!(preset.permissions()));
            }
            println!("{}", serde_json::to_string_pretty(&Value::Object(presets))?);
        }
        OutputFormat::Text => {
            for preset in Preset::ALL {
                println!("{}: {}", preset, enabled_flags(&preset.permissions()).join(", "));
            }
        }
    }
    Ok(())
}

fn handle_show(name: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let preset: Preset = name.parse()?;
    let permissions = preset.permissions();

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ preset.as_str(): permissions }))?);
        }
        OutputFormat::Text => {
            println!("{}", preset);
            for flag in enabled_flags(&permissions) {
                println!("  {}", flag);
            }
        }
    }
    Ok(())
}
