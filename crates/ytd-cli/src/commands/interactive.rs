use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::Path;
use tracing::debug;

use crate::ui;
use ytd_core::{Config, DownloadJob, Session, Target, VideoMetadata};

const FORMATS: [&str; 2] = ["Video (MP4)", "Audio (MP3)"];

enum Next {
    SameVideo,
    Refresh,
    NewUrl,
    Quit,
}

pub async fn run(initial_url: Option<String>, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let session = Session::from_config(&config)?;
    session.prepare_output_dir().await?;

    let theme = ColorfulTheme::default();

    println!("YouTube Downloader");
    println!("Files are saved to {}\n", session.output_dir().display());

    let mut pending = initial_url;

    loop {
        let url = match pending.take() {
            Some(url) => url,
            None => prompt_url(&theme)?,
        };
        if url.trim().is_empty() {
            break;
        }

        let metadata = match ui::with_spinner("Fetching video info...", session.resolve(&url)).await
        {
            Ok(metadata) => metadata,
            Err(e) => {
                ui::error(&e.to_string());
                continue;
            }
        };

        ui::print_summary(&metadata);

        loop {
            run_job(&session, &metadata, &theme).await?;

            match prompt_next(&theme)? {
                Next::SameVideo => continue,
                Next::Refresh => {
                    session.invalidate(&url);
                    pending = Some(url.clone());
                    break;
                }
                Next::NewUrl => break,
                Next::Quit => return Ok(()),
            }
        }
    }

    Ok(())
}

fn prompt_url(theme: &ColorfulTheme) -> Result<String> {
    let url = Input::<String>::with_theme(theme)
        .with_prompt("Paste URL here (empty to quit)")
        .allow_empty(true)
        .interact_text()?;
    Ok(url)
}

fn prompt_next(theme: &ColorfulTheme) -> Result<Next> {
    let items = [
        "Download this video again",
        "Refresh video info",
        "Enter a new URL",
        "Quit",
    ];
    let choice = Select::with_theme(theme)
        .with_prompt("What next?")
        .items(&items)
        .default(2)
        .interact()?;

    Ok(match choice {
        0 => Next::SameVideo,
        1 => Next::Refresh,
        2 => Next::NewUrl,
        _ => Next::Quit,
    })
}

async fn run_job(session: &Session, metadata: &VideoMetadata, theme: &ColorfulTheme) -> Result<()> {
    let format = Select::with_theme(theme)
        .with_prompt("Choose Download Format")
        .items(&FORMATS)
        .default(0)
        .interact()?;

    let target = if format == 0 {
        // Selection is by position: labels can repeat or read "N/A"
        let labels: Vec<String> = metadata.variants.iter().map(|v| v.to_string()).collect();
        let index = Select::with_theme(theme)
            .with_prompt("Select Resolution")
            .items(&labels)
            .default(metadata.best_variant().unwrap_or(0))
            .interact()?;
        ui::print_variant(metadata, index);
        Target::Video { variant: index }
    } else {
        Target::Audio
    };

    let file_name = Input::<String>::with_theme(theme)
        .with_prompt("Save as")
        .default(metadata.title.clone())
        .allow_empty(true)
        .interact_text()?;

    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!("Download {}?", target))
        .default(true)
        .interact()?;
    if !confirmed {
        debug!("Download cancelled before start");
        return Ok(());
    }

    let job = DownloadJob::new(target, file_name, session.output_dir());
    let message = match target {
        Target::Video { .. } => "Downloading video...",
        Target::Audio => "Downloading audio...",
    };
    let outcome = ui::with_spinner(message, session.download(&job, metadata)).await;
    ui::report(&outcome);

    Ok(())
}
