//! Error types for ytd-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, YtdError>;

#[derive(Error, Debug)]
pub enum YtdError {
    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the metadata resolver.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Not a valid video URL: {0}")]
    InvalidUrl(String),

    #[error("No progressive (audio + video) streams available for this video")]
    NoCompatibleStreams,

    #[error("Error fetching video info: {0}")]
    CollaboratorFailure(String),
}

impl From<ExtractError> for ResolutionError {
    fn from(err: ExtractError) -> Self {
        ResolutionError::CollaboratorFailure(err.to_string())
    }
}

/// Failures of a single download job.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("No stream variant at index {index} ({available} available)")]
    NoSuchVariant { index: usize, available: usize },

    #[error("Stream variant at index {0} has no usable stream tag")]
    UnknownStreamTag(usize),

    #[error("Output {0} would overwrite the intermediate audio file")]
    OutputConflict(std::path::PathBuf),

    #[error("Intermediate audio file {0} already exists; move it or set audio.temp_file_name")]
    TempFileExists(std::path::PathBuf),

    #[error("Download failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Audio conversion failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by the extraction collaborator (yt-dlp).
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("yt-dlp not found. Install with: pip install yt-dlp")]
    YtDlpNotFound,

    #[error("yt-dlp failed with exit code {code:?}: {message}")]
    YtDlpFailed { code: Option<i32>, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("Requested stream not found: {0}")]
    StreamNotFound(String),

    #[error("Failed to parse video info: {0}")]
    MetadataParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by the transcoding collaborator (FFmpeg).
#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("FFmpeg not found. Install with: brew install ffmpeg")]
    FfmpegNotFound,

    #[error("FFmpeg failed with exit code {code:?}: {message}")]
    FfmpegFailed { code: Option<i32>, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
