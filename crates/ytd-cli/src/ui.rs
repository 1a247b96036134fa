//! Terminal presentation: busy spinner, notifications and metadata display

use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;
use ytd_core::{DownloadOutcome, VideoMetadata};

/// Show a spinner with `message` while `task` runs
pub async fn with_spinner<F, T>(message: impl Into<Cow<'static, str>>, task: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} [{elapsed}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;

    pb.finish_and_clear();
    result
}

pub fn success(message: &str) {
    println!("✅ {}", message);
}

pub fn error(message: &str) {
    eprintln!("🚨 {}", message);
}

pub fn report(outcome: &DownloadOutcome) {
    match outcome {
        DownloadOutcome::Success(path) => success(&format!("Download complete: {}", path.display())),
        DownloadOutcome::Failure(reason) => error(&format!("Error: {}", reason)),
    }
}

pub fn print_summary(metadata: &VideoMetadata) {
    println!();
    println!("Title:     {}", metadata.title);
    println!("Length:    {}", format_length(metadata.duration));
    if !metadata.thumbnail_url.is_empty() {
        println!("Thumbnail: {}", metadata.thumbnail_url);
    }
    println!();
}

pub fn print_variant_table(metadata: &VideoMetadata) {
    println!("{:>3}  {:<10} {:<8} {:<8} {}", "#", "Resolution", "FPS", "Format", "Tag");
    for (index, v) in metadata.variants.iter().enumerate() {
        println!(
            "{:>3}  {:<10} {:<8} {:<8} {}",
            index, v.resolution, v.frame_rate, v.container, v.tag
        );
    }
}

pub fn print_variant(metadata: &VideoMetadata, index: usize) {
    if let Some(v) = metadata.variant(index) {
        println!("Resolution: {}", v.resolution);
        println!("Frame Rate: {}", v.frame_rate);
        println!("Format:     {}", v.container);
    }
}

/// "212 sec (3:32)"
pub fn format_length(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{} sec ({}:{:02}:{:02})", seconds, h, m, s)
    } else {
        format!("{} sec ({}:{:02})", seconds, m, s)
    }
}
