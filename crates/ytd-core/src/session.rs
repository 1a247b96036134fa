//! Wiring of resolver, orchestrator and collaborators for one user session

use crate::config::Config;
use crate::error::{ConfigError, ResolutionError, Result};
use crate::extractor::{Extractor, YtDlp};
use crate::model::{DownloadJob, DownloadOutcome, VideoMetadata};
use crate::orchestrator::{Orchestrator, OrchestratorSettings};
use crate::resolver::Resolver;
use crate::transcoder::{Ffmpeg, Transcoder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub struct Session {
    resolver: Resolver,
    orchestrator: Orchestrator,
    output_dir: PathBuf,
}

impl Session {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        transcoder: Arc<dyn Transcoder>,
        config: &Config,
    ) -> Self {
        let settings = OrchestratorSettings {
            temp_file_name: config.audio.temp_file_name.clone(),
            cleanup_on_failure: config.temp.cleanup_on_failure,
        };
        debug!("Using {} for extraction", extractor.name());
        Self {
            resolver: Resolver::new(extractor.clone(), config.cache.capacity),
            orchestrator: Orchestrator::new(extractor, transcoder, settings),
            output_dir: config.output.directory.clone(),
        }
    }

    /// Build a session backed by yt-dlp and FFmpeg as located by `config`
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let extractor = Arc::new(YtDlp::new(config.yt_dlp_path()?));
        let transcoder = Arc::new(Ffmpeg::new(config.ffmpeg_path()?, config.audio.mp3_quality));
        Ok(Self::new(extractor, transcoder, config))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the download directory if it does not exist yet
    pub async fn prepare_output_dir(&self) -> Result<()> {
        prepare_dir(&self.output_dir).await
    }

    pub async fn resolve(&self, url: &str) -> std::result::Result<VideoMetadata, ResolutionError> {
        self.resolver.resolve(url).await
    }

    pub fn invalidate(&self, url: &str) -> bool {
        self.resolver.invalidate(url)
    }

    pub async fn download(&self, job: &DownloadJob, metadata: &VideoMetadata) -> DownloadOutcome {
        self.orchestrator.download(job, metadata).await
    }
}

pub async fn prepare_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Creating download directory: {}", dir.display());
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}
