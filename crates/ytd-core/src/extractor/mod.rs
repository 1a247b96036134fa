//! Extraction collaborator: fetches video handles and downloads streams

mod ytdlp;

pub use ytdlp::YtDlp;

use crate::error::ExtractError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Video-site extraction backend.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short backend name for logs and diagnostics
    fn name(&self) -> &str;

    /// Construct a handle for `url`, including every stream the site offers
    async fn fetch(&self, url: &str) -> Result<VideoHandle, ExtractError>;

    /// Download the stream chosen by `selector` to exactly `output`
    async fn download(
        &self,
        url: &str,
        selector: &StreamSelector,
        output: &Path,
    ) -> Result<PathBuf, ExtractError>;
}

/// Everything the extractor knows about one video.
#[derive(Debug, Clone, Default)]
pub struct VideoHandle {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<f64>,
    pub streams: Vec<Stream>,
}

impl VideoHandle {
    /// Streams carrying both audio and video in one container, in extractor order
    pub fn progressive(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter().filter(|s| s.is_progressive())
    }
}

/// A single downloadable stream as reported by the extractor.
///
/// Structured fields are optional because extractors do not always fill them;
/// `description` is the human-readable summary line and is kept so callers can
/// recover missing attributes from it.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    pub tag: Option<String>,
    pub container: Option<String>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub description: String,
}

impl Stream {
    // yt-dlp writes "none" for a missing track; an absent codec field means unknown
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some("none")
    }

    pub fn has_audio(&self) -> bool {
        self.acodec.as_deref() != Some("none")
    }

    pub fn is_progressive(&self) -> bool {
        self.has_video() && self.has_audio()
    }
}

/// Which stream a download should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSelector {
    /// The exact stream with this opaque tag
    Tag(String),
    /// Whatever the extractor ranks as the best audio-only stream
    BestAudio,
}

impl std::fmt::Display for StreamSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamSelector::Tag(tag) => write!(f, "stream {}", tag),
            StreamSelector::BestAudio => write!(f, "best audio"),
        }
    }
}
