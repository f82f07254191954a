use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{clear_context, load_context, ping_backend, save_context, CliContext};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::RestClient;

#[derive(Subcommand)]
pub enum ContextCommands {
    #[command(about = "Point the CLI at a backend")]
    Use {
        #[arg(help = "Backend base URL, e.g. https://docs.example.com")]
        url: String,
        #[arg(long, help = "Bearer token sent with every request")]
        token: Option<String>,
        #[arg(long, help = "Acting user id, used by the self-grant check")]
        user: Option<String>,
    },

    #[command(about = "Show the saved context")]
    Show,

    #[command(about = "Forget the saved context")]
    Clear,

    #[command(about = "Check connectivity to the configured backend")]
    Ping,
}

pub async fn handle(cmd: ContextCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ContextCommands::Use { url, token, user } => handle_use(url, token, user, output_format),
        ContextCommands::Show => handle_show(output_format),
        ContextCommands::Clear => handle_clear(output_format),
        ContextCommands::Ping => handle_ping(output_format).await,
    }
}

fn handle_use(
    url: String,
    token: Option<String>,
    user: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    // Reject malformed URLs before persisting anything
    RestClient::new(&url)?;

    let context = CliContext::new(url, token, user);
    save_context(&context)?;

    output_success(
        &output_format,
        &format!("Context saved for {}", context.base_url),
        Some(json!({
            "base_url": context.base_url,
            "user_id": context.user_id,
            "has_token": context.bearer_token.is_some()
        })),
    )
}

fn handle_show(output_format: OutputFormat) -> anyhow::Result<()> {
    match load_context()? {
        Some(context) => match output_format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "base_url": context.base_url,
                        "user_id": context.user_id,
                        "has_token": context.bearer_token.is_some(),
                        "updated_at": context.updated_at
                    }))?
                );
                Ok(())
            }
            OutputFormat::Text => {
                println!("Backend: {}", context.base_url);
                println!("User: {}", context.user_id.as_deref().unwrap_or("(not set)"));
                println!("Token: {}", if context.bearer_token.is_some() { "set" } else { "not set" });
                println!("Updated: {}", context.updated_at);
                Ok(())
            }
        },
        None => output_error(&output_format, "No context configured", Some("no_context")),
    }
}

fn handle_clear(output_format: OutputFormat) -> anyhow::Result<()> {
    if clear_context()? {
        output_success(&output_format, "Context cleared", None)
    } else {
        output_error(&output_format, "No context to clear", Some("no_context"))
    }
}

async fn handle_ping(output_format: OutputFormat) -> anyhow::Result<()> {
    let context = crate::cli::config::require_context()?;

    if ping_backend(&context).await {
        output_success(&output_format, &format!("{} is reachable", context.base_url), None)
    } else {
        output_error(&output_format, &format!("{} is not reachable", context.base_url), Some("unreachable"))
    }
}
