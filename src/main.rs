//! Laere CLI entry point.

use anyhow::Result;
use clap::Parser;
use laere::cli::{commands, Cli, Commands};
use laere::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("laere={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Generate {
            title,
            class_type,
            files,
            audio,
            notes,
            output,
            narrate,
            api_key,
        } => {
            commands::run_generate(
                title,
                class_type,
                files,
                audio,
                notes,
                output,
                *narrate,
                api_key.clone(),
                settings,
            )
            .await?;
        }

        Commands::Batch {
            input,
            output,
            narrate,
        } => {
            commands::run_batch(input, output, *narrate, settings).await?;
        }

        Commands::Render {
            script,
            avatar,
            voice,
        } => {
            commands::run_render(script, avatar.clone(), voice.clone(), settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
