//! yt-dlp backed extractor

use super::{Extractor, Stream, StreamSelector, VideoHandle};
use crate::error::ExtractError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct YtDlp {
    yt_dlp_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    title: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    thumbnails: Vec<RawThumbnail>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: String,
    #[serde(default)]
    width: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    #[serde(default)]
    format_id: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    format_note: Option<String>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    fps: Option<f64>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
}

impl RawInfo {
    fn best_thumbnail(&self) -> Option<String> {
        if let Some(ref url) = self.thumbnail {
            return Some(url.clone());
        }
        self.thumbnails
            .iter()
            .max_by_key(|t| t.width.unwrap_or(0))
            .map(|t| t.url.clone())
    }

    fn into_handle(self) -> VideoHandle {
        let thumbnail_url = self.best_thumbnail();
        let streams = self.formats.into_iter().map(RawFormat::into_stream).collect();
        VideoHandle {
            title: self.title,
            thumbnail_url,
            duration: self.duration,
            streams,
        }
    }
}

impl RawFormat {
    fn into_stream(self) -> Stream {
        let description = match (self.format, self.format_note) {
            (Some(format), Some(note)) if !format.contains(&note) => format!("{} {}", format, note),
            (Some(format), _) => format,
            (None, Some(note)) => note,
            (None, None) => String::new(),
        };
        Stream {
            tag: self.format_id,
            container: self.ext,
            height: self.height,
            fps: self.fps,
            vcodec: self.vcodec,
            acodec: self.acodec,
            description,
        }
    }
}

impl YtDlp {
    pub fn new(yt_dlp_path: PathBuf) -> Self {
        Self { yt_dlp_path }
    }

    fn classify_failure(url: &str, code: Option<i32>, stderr: &str) -> ExtractError {
        debug!("yt-dlp stderr: {}", stderr);

        if stderr.contains("Video unavailable")
            || stderr.contains("Private video")
            || stderr.contains("This video is private")
        {
            return ExtractError::VideoUnavailable(url.to_string());
        }
        if stderr.contains("is not a valid URL") || stderr.contains("Unsupported URL") {
            return ExtractError::InvalidUrl(url.to_string());
        }
        if stderr.contains("Requested format is not available") {
            return ExtractError::StreamNotFound(url.to_string());
        }

        let message = stderr
            .lines()
            .rev()
            .find(|l| l.starts_with("ERROR:"))
            .unwrap_or_else(|| stderr.trim())
            .to_string();
        ExtractError::YtDlpFailed { code, message }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.yt_dlp_path);
        cmd.args(["--no-playlist", "--no-warnings"]);
        cmd
    }
}

#[async_trait]
impl Extractor for YtDlp {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch(&self, url: &str) -> Result<VideoHandle, ExtractError> {
        info!("Fetching video info: {}", url);

        let output = self
            .command()
            .arg("--dump-single-json")
            .arg(url)
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::classify_failure(url, output.status.code(), &stderr));
        }

        let handle = parse_info(&output.stdout)?;
        debug!("Fetched: {} ({} streams)", handle.title, handle.streams.len());
        Ok(handle)
    }

    async fn download(
        &self,
        url: &str,
        selector: &StreamSelector,
        output: &Path,
    ) -> Result<PathBuf, ExtractError> {
        info!("Downloading {} to {}", selector, output.display());

        let format = match selector {
            StreamSelector::Tag(tag) => tag.as_str(),
            StreamSelector::BestAudio => "bestaudio",
        };

        let result = self
            .command()
            .args(["-f", format])
            // Write straight to the final name; overwrite what a previous run left
            .args(["--no-part", "--force-overwrites"])
            .arg("-o")
            .arg(output_template(output))
            .arg(url)
            .output()
            .await
            .map_err(spawn_error)?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Self::classify_failure(url, result.status.code(), &stderr));
        }

        if !output.exists() {
            return Err(ExtractError::YtDlpFailed {
                code: result.status.code(),
                message: format!("expected output {} was not written", output.display()),
            });
        }

        debug!("Downloaded: {}", output.display());
        Ok(output.to_path_buf())
    }
}

fn spawn_error(err: std::io::Error) -> ExtractError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ExtractError::YtDlpNotFound
    } else {
        ExtractError::Io(err)
    }
}

fn parse_info(stdout: &[u8]) -> Result<VideoHandle, ExtractError> {
    let raw: RawInfo =
        serde_json::from_slice(stdout).map_err(|e| ExtractError::MetadataParse(e.to_string()))?;
    Ok(raw.into_handle())
}

/// yt-dlp treats `-o` as a template; `%` must be doubled to be taken literally
fn output_template(path: &Path) -> String {
    path.to_string_lossy().replace('%', "%%")
}
