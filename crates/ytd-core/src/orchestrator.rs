//! Download orchestration: runs one video or audio job to completion

use crate::error::DownloadError;
use crate::extractor::{Extractor, StreamSelector};
use crate::filename::normalize_file_name;
use crate::model::{DownloadJob, DownloadOutcome, Target, VideoMetadata};
use crate::transcoder::Transcoder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// File name the audio stream is downloaded to before conversion
    pub temp_file_name: String,
    /// Remove the intermediate audio file when a job fails
    pub cleanup_on_failure: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            temp_file_name: "temp_audio.mp4".to_string(),
            cleanup_on_failure: true,
        }
    }
}

pub struct Orchestrator {
    extractor: Arc<dyn Extractor>,
    transcoder: Arc<dyn Transcoder>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        transcoder: Arc<dyn Transcoder>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            extractor,
            transcoder,
            settings,
        }
    }

    /// Run `job` and report the result; never returns an error
    pub async fn download(&self, job: &DownloadJob, metadata: &VideoMetadata) -> DownloadOutcome {
        let start_time = Instant::now();

        match self.execute(job, metadata).await {
            Ok(path) => {
                info!(
                    "Download complete: {} ({:.1}s)",
                    path.display(),
                    start_time.elapsed().as_secs_f32()
                );
                DownloadOutcome::Success(path)
            }
            Err(e) => {
                warn!("{} download of \"{}\" failed: {}", job.target, metadata.title, e);
                DownloadOutcome::Failure(e.to_string())
            }
        }
    }

    /// Run `job`, returning the written file or the typed failure
    pub async fn execute(
        &self,
        job: &DownloadJob,
        metadata: &VideoMetadata,
    ) -> Result<PathBuf, DownloadError> {
        let file_name = normalize_file_name(&job.file_name, &metadata.title, job.target.extension());
        let output = job.output_dir.join(&file_name);

        // Reserved for the audio intermediate
        let temp_file = job.output_dir.join(&self.settings.temp_file_name);
        if temp_file == output {
            return Err(DownloadError::OutputConflict(output));
        }

        info!("Starting {} download: {}", job.target, output.display());

        match job.target {
            Target::Video { variant } => self.download_video(metadata, variant, &output).await,
            Target::Audio => self.download_audio(metadata, &temp_file, &output).await,
        }
    }

    async fn download_video(
        &self,
        metadata: &VideoMetadata,
        index: usize,
        output: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let variant = metadata
            .variant(index)
            .ok_or(DownloadError::NoSuchVariant {
                index,
                available: metadata.variants.len(),
            })?;

        if !variant.has_known_tag() {
            return Err(DownloadError::UnknownStreamTag(index));
        }

        debug!("Selected variant {}: {} (tag {})", index, variant, variant.tag);

        let selector = StreamSelector::Tag(variant.tag.clone());
        let path = self
            .extractor
            .download(&metadata.url, &selector, output)
            .await?;
        Ok(path)
    }

    async fn download_audio(
        &self,
        metadata: &VideoMetadata,
        temp_file: &Path,
        output: &Path,
    ) -> Result<PathBuf, DownloadError> {
        // yt-dlp overwrites this path
        if tokio::fs::try_exists(temp_file).await? {
            return Err(DownloadError::TempFileExists(temp_file.to_path_buf()));
        }

        match self.fetch_and_convert(metadata, temp_file, output).await {
            Ok(()) => {
                remove_if_present(temp_file).await;
                Ok(output.to_path_buf())
            }
            Err(e) => {
                if self.settings.cleanup_on_failure {
                    remove_if_present(temp_file).await;
                } else if temp_file.exists() {
                    debug!("Intermediate file kept at: {}", temp_file.display());
                }
                Err(e)
            }
        }
    }

    async fn fetch_and_convert(
        &self,
        metadata: &VideoMetadata,
        temp_file: &Path,
        output: &Path,
    ) -> Result<(), DownloadError> {
        let downloaded = self
            .extractor
            .download(&metadata.url, &StreamSelector::BestAudio, temp_file)
            .await?;
        self.transcoder.to_mp3(&downloaded, output).await?;
        Ok(())
    }
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed intermediate file: {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::VideoHandle;
    use crate::model::StreamVariant;
    use crate::testing::{progressive, FakeExtractor, FakeTranscoder};

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn variant(resolution: &str, tag: &str) -> StreamVariant {
        StreamVariant {
            resolution: resolution.to_string(),
            container: "mp4".to_string(),
            frame_rate: "30".to_string(),
            tag: tag.to_string(),
        }
    }

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            url: URL.to_string(),
            title: "Sample Video".to_string(),
            thumbnail_url: String::new(),
            duration: 212,
            variants: vec![variant("360p", "18"), variant("360p", "43"), variant("N/A", "0")],
        }
    }

    fn handle() -> VideoHandle {
        VideoHandle {
            title: "Sample Video".to_string(),
            streams: vec![progressive("18", Some(360)), progressive("43", Some(360))],
            ..Default::default()
        }
    }

    fn orchestrator(
        extractor: Arc<FakeExtractor>,
        transcoder: Arc<FakeTranscoder>,
        cleanup_on_failure: bool,
    ) -> Orchestrator {
        Orchestrator::new(
            extractor,
            transcoder,
            OrchestratorSettings {
                cleanup_on_failure,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_video_downloads_tag_at_selected_index() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let orch = orchestrator(extractor.clone(), Arc::new(FakeTranscoder::new()), true);

        // Both variants read "360p"; the index decides which stream is fetched
        let job = DownloadJob::new(Target::Video { variant: 1 }, "clip", dir.path());
        let outcome = orch.download(&job, &metadata()).await;

        let expected = dir.path().join("clip.mp4");
        assert_eq!(outcome, DownloadOutcome::Success(expected.clone()));
        assert!(expected.exists());
        assert_eq!(
            extractor.downloads(),
            vec![(StreamSelector::Tag("43".to_string()), expected)]
        );
    }

    #[tokio::test]
    async fn test_video_name_defaults_to_title() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let orch = orchestrator(extractor, Arc::new(FakeTranscoder::new()), true);

        let job = DownloadJob::new(Target::Video { variant: 0 }, "", dir.path());
        let path = orch.execute(&job, &metadata()).await.unwrap();
        assert_eq!(path, dir.path().join("Sample Video.mp4"));
    }

    #[tokio::test]
    async fn test_video_keeps_foreign_extension() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let orch = orchestrator(extractor, Arc::new(FakeTranscoder::new()), true);

        let job = DownloadJob::new(Target::Video { variant: 0 }, "clip.mkv", dir.path());
        let path = orch.execute(&job, &metadata()).await.unwrap();
        assert_eq!(path, dir.path().join("clip.mkv.mp4"));
    }

    #[tokio::test]
    async fn test_video_rejects_bad_selection() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let orch = orchestrator(extractor.clone(), Arc::new(FakeTranscoder::new()), true);

        let job = DownloadJob::new(Target::Video { variant: 7 }, "clip", dir.path());
        let err = orch.execute(&job, &metadata()).await.unwrap_err();
        assert!(matches!(err, DownloadError::NoSuchVariant { index: 7, available: 3 }));

        let job = DownloadJob::new(Target::Video { variant: 2 }, "clip", dir.path());
        let err = orch.execute(&job, &metadata()).await.unwrap_err();
        assert!(matches!(err, DownloadError::UnknownStreamTag(2)));

        assert!(extractor.downloads().is_empty());
    }

    #[tokio::test]
    async fn test_video_download_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::failing_download(handle()));
        let orch = orchestrator(extractor, Arc::new(FakeTranscoder::new()), true);

        let job = DownloadJob::new(Target::Video { variant: 0 }, "clip", dir.path());
        match orch.download(&job, &metadata()).await {
            DownloadOutcome::Failure(reason) => assert!(reason.contains("unable to download")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_audio_success_removes_intermediate_file() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let transcoder = Arc::new(FakeTranscoder::new());
        let orch = orchestrator(extractor.clone(), transcoder.clone(), true);

        let job = DownloadJob::new(Target::Audio, "song", dir.path());
        let outcome = orch.download(&job, &metadata()).await;

        let mp3 = dir.path().join("song.mp3");
        let temp = dir.path().join("temp_audio.mp4");
        assert_eq!(outcome, DownloadOutcome::Success(mp3.clone()));
        assert!(mp3.exists());
        assert!(!temp.exists());
        assert_eq!(transcoder.calls(), 1);
        assert_eq!(extractor.downloads(), vec![(StreamSelector::BestAudio, temp)]);
    }

    #[tokio::test]
    async fn test_audio_transcode_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let orch = orchestrator(extractor, Arc::new(FakeTranscoder::failing()), true);

        let job = DownloadJob::new(Target::Audio, "song.mp3", dir.path());
        let outcome = orch.download(&job, &metadata()).await;

        assert!(matches!(outcome, DownloadOutcome::Failure(_)));
        assert!(!dir.path().join("temp_audio.mp4").exists());
        assert!(!dir.path().join("song.mp3").exists());
    }

    #[tokio::test]
    async fn test_audio_transcode_failure_can_keep_intermediate() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let orch = orchestrator(extractor, Arc::new(FakeTranscoder::failing()), false);

        let job = DownloadJob::new(Target::Audio, "song", dir.path());
        let err = orch.execute(&job, &metadata()).await.unwrap_err();

        assert!(matches!(err, DownloadError::Transcode(_)));
        assert!(dir.path().join("temp_audio.mp4").exists());
    }

    #[tokio::test]
    async fn test_audio_download_failure_skips_transcoder() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::failing_download(handle()));
        let transcoder = Arc::new(FakeTranscoder::new());
        let orch = orchestrator(extractor, transcoder.clone(), true);

        let job = DownloadJob::new(Target::Audio, "song", dir.path());
        let err = orch.execute(&job, &metadata()).await.unwrap_err();

        assert!(matches!(err, DownloadError::Extract(_)));
        assert_eq!(transcoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_video_may_not_take_intermediate_name() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let orch = orchestrator(extractor.clone(), Arc::new(FakeTranscoder::new()), true);

        let job = DownloadJob::new(Target::Video { variant: 0 }, "temp_audio", dir.path());
        let err = orch.execute(&job, &metadata()).await.unwrap_err();

        match err {
            DownloadError::OutputConflict(path) => {
                assert_eq!(path, dir.path().join("temp_audio.mp4"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(extractor.downloads().is_empty());
    }

    #[tokio::test]
    async fn test_audio_leaves_existing_intermediate_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("temp_audio.mp4");
        std::fs::write(&existing, b"user video").unwrap();

        let extractor = Arc::new(FakeExtractor::new(handle()));
        let transcoder = Arc::new(FakeTranscoder::new());
        let orch = orchestrator(extractor.clone(), transcoder.clone(), true);

        let job = DownloadJob::new(Target::Audio, "song", dir.path());
        let err = orch.execute(&job, &metadata()).await.unwrap_err();

        assert!(matches!(err, DownloadError::TempFileExists(_)));
        assert_eq!(std::fs::read(&existing).unwrap(), b"user video");
        assert!(extractor.downloads().is_empty());
        assert_eq!(transcoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_audio_succeeds_when_intermediate_already_gone() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let transcoder = Arc::new(FakeTranscoder::removing_input());
        let orch = orchestrator(extractor, transcoder, true);

        let job = DownloadJob::new(Target::Audio, "song", dir.path());
        let path = orch.execute(&job, &metadata()).await.unwrap();

        assert_eq!(path, dir.path().join("song.mp3"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_audio_output_may_not_overwrite_intermediate() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(FakeExtractor::new(handle()));
        let orch = Orchestrator::new(
            extractor.clone(),
            Arc::new(FakeTranscoder::new()),
            OrchestratorSettings {
                temp_file_name: "song.mp3".to_string(),
                cleanup_on_failure: true,
            },
        );

        let job = DownloadJob::new(Target::Audio, "song", dir.path());
        let err = orch.execute(&job, &metadata()).await.unwrap_err();
        assert!(matches!(err, DownloadError::OutputConflict(_)));
        assert!(extractor.downloads().is_empty());
    }
}
