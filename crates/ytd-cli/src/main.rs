mod args;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the interactive screen quiet unless asked otherwise
    let filter = match cli.verbose {
        0 => "ytd=warn",
        1 => "ytd=info",
        2 => "ytd=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Interactive { url }) => commands::interactive::run(url, config_path).await,
        Some(Commands::Info { url, json }) => commands::info::run(&url, json, config_path).await,
        Some(Commands::Video {
            url,
            variant,
            resolution,
            save,
        }) => {
            let choice = commands::fetch::VariantChoice::from_args(variant, resolution);
            commands::fetch::run_video(&url, choice, &save, config_path).await
        }
        Some(Commands::Audio { url, save }) => {
            commands::fetch::run_audio(&url, &save, config_path).await
        }
        Some(Commands::Doctor) => commands::doctor::run(config_path).await,
        Some(Commands::Config) => commands::config::run(config_path).await,
        None => commands::interactive::run(cli.url, config_path).await,
    }
}
