//! Resolved metadata and download job types

use serde::Serialize;
use std::path::PathBuf;

/// Placeholder for an attribute that could not be determined
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder tag for a stream whose identifier could not be determined
pub const UNKNOWN_TAG: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    /// URL the metadata was resolved from
    pub url: String,
    pub title: String,
    pub thumbnail_url: String,
    /// Length in whole seconds (0 when unknown)
    pub duration: u64,
    pub variants: Vec<StreamVariant>,
}

impl VideoMetadata {
    pub fn variant(&self, index: usize) -> Option<&StreamVariant> {
        self.variants.get(index)
    }

    /// Index of the variant with the tallest parseable resolution, first on ties
    pub fn best_variant(&self) -> Option<usize> {
        let height = |v: &StreamVariant| {
            v.resolution
                .strip_suffix('p')
                .and_then(|h| h.parse::<u32>().ok())
                .unwrap_or(0)
        };
        self.variants
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, v)| height(v))
            .map(|(index, _)| index)
    }

    /// Index of the first variant with this resolution label
    pub fn find_resolution(&self, label: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.resolution == label)
    }
}

/// One progressive stream as shown to the user.
///
/// Display attributes and the tag used to download travel together so the
/// position a variant is shown at is always the position it is fetched by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamVariant {
    pub resolution: String,
    pub container: String,
    pub frame_rate: String,
    pub tag: String,
}

impl StreamVariant {
    pub fn has_known_tag(&self) -> bool {
        self.tag != UNKNOWN_TAG
    }
}

impl std::fmt::Display for StreamVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} fps, {})",
            self.resolution, self.frame_rate, self.container
        )
    }
}

/// What a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The progressive stream at this index of `VideoMetadata::variants`
    Video { variant: usize },
    /// The extractor's best audio-only stream, converted to MP3
    Audio,
}

impl Target {
    pub fn extension(&self) -> &'static str {
        match self {
            Target::Video { .. } => "mp4",
            Target::Audio => "mp3",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Video { .. } => write!(f, "Video (MP4)"),
            Target::Audio => write!(f, "Audio (MP3)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub target: Target,
    /// Name as typed by the user; empty means "use the video title"
    pub file_name: String,
    pub output_dir: PathBuf,
}

impl DownloadJob {
    pub fn new(target: Target, file_name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            target,
            file_name: file_name.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// Result of a job as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success(PathBuf),
    Failure(String),
}
