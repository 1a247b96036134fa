use anyhow::Result;
use std::path::Path;
use ytd_core::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytd configuration\n");
    print!("{}", toml::to_string_pretty(&config)?);

    if config.paths.yt_dlp.is_none() {
        println!("# paths.yt_dlp not set: {}", describe(config.yt_dlp_path().ok()));
    }
    if config.paths.ffmpeg.is_none() {
        println!("# paths.ffmpeg not set: {}", describe(config.ffmpeg_path().ok()));
    }

    // Show config file locations
    println!("\nConfig sources (later entries override earlier ones):");
    if let Some(p) = Config::default_path() {
        println!("  1. {}", p.display());
    }
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    println!("  3. Environment variables (YTD_*, nested keys joined with __)");

    Ok(())
}

fn describe(found: Option<std::path::PathBuf>) -> String {
    match found {
        Some(p) => format!("auto-detected {}", p.display()),
        None => "not found in PATH".to_string(),
    }
}
