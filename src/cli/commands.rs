//! CLI command implementations

use anyhow::Result;
use std::sync::Arc;

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::llm::build_provider;
use crate::recommend;
use crate::server;

/// Run the HTTP API server until interrupted.
pub async fn serve(settings: &Settings, listen: Option<String>) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(listen) = listen {
        settings.server.listen_addr = listen;
    }

    let provider: server::DynLlmProvider = Arc::from(build_provider(&settings)?);
    server::serve(&settings, provider).await?;

    Ok(())
}

/// Summarize a message in one sentence and print the result.
pub async fn summarize_message(settings: &Settings, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("Message cannot be empty");
    }

    let provider = build_provider(settings)?;
    let summary = provider.summarize(message).await?;
    let summary = recommend::sanitize_summary(&summary);

    println!("{}", summary);

    Ok(())
}

/// Print the recommendation derived from a summary.
pub fn recommend_summary(summary: &str, json: bool) -> Result<()> {
    if json {
        let record = recommend::recommend_record(&serde_json::json!({ "summary": summary }))?;
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", recommend::recommendation_for(summary));
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}
