use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

use ytd_core::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytd dependency check\n");

    let mut all_ok = true;

    print!("yt-dlp:     ");
    all_ok &= check_tool(
        config.yt_dlp_path().ok(),
        &["--version"],
        |out| out.trim().to_string(),
        "pip install yt-dlp",
    );

    print!("ffmpeg:     ");
    all_ok &= check_tool(
        config.ffmpeg_path().ok(),
        &["-version"],
        ffmpeg_version,
        "brew install ffmpeg",
    );

    print!("downloads:  ");
    let dir = &config.output.directory;
    if dir.is_dir() {
        println!("OK ({})", dir.display());
    } else if dir.exists() {
        println!("NOT A DIRECTORY ({})", dir.display());
        all_ok = false;
    } else {
        println!("will be created at {}", dir.display());
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}

/// "ffmpeg version 6.1.1 Copyright ..." -> "6.1.1"
fn ffmpeg_version(output: &str) -> String {
    output
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(2))
        .unwrap_or("unknown")
        .to_string()
}

fn check_tool(
    path: Option<PathBuf>,
    version_args: &[&str],
    version: impl Fn(&str) -> String,
    install_hint: &str,
) -> bool {
    let Some(path) = path else {
        println!("NOT FOUND");
        println!("            Install with: {}", install_hint);
        return false;
    };

    match Command::new(&path).args(version_args).output() {
        Ok(out) if out.status.success() => {
            let v = String::from_utf8_lossy(&out.stdout);
            println!("OK ({}, {})", version(&v), path.display());
            true
        }
        _ => {
            println!("FOUND but failed to get version ({})", path.display());
            false
        }
    }
}
