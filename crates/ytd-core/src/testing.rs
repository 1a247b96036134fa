//! In-memory collaborators for unit tests

use crate::error::{ExtractError, TranscodeError};
use crate::extractor::{Extractor, Stream, StreamSelector, VideoHandle};
use crate::transcoder::Transcoder;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn progressive(tag: &str, height: Option<u32>) -> Stream {
    Stream {
        tag: Some(tag.to_string()),
        container: Some("mp4".to_string()),
        height,
        fps: Some(30.0),
        vcodec: Some("avc1.42001E".to_string()),
        acodec: Some("mp4a.40.2".to_string()),
        description: format!("{} - progressive", tag),
    }
}

pub struct FakeExtractor {
    handle: Option<VideoHandle>,
    fail_download: bool,
    fetches: AtomicUsize,
    downloads: Mutex<Vec<(StreamSelector, PathBuf)>>,
}

impl FakeExtractor {
    pub fn new(handle: VideoHandle) -> Self {
        Self {
            handle: Some(handle),
            fail_download: false,
            fetches: AtomicUsize::new(0),
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            handle: None,
            ..Self::new(VideoHandle::default())
        }
    }

    pub fn failing_download(handle: VideoHandle) -> Self {
        Self {
            fail_download: true,
            ..Self::new(handle)
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> Vec<(StreamSelector, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, url: &str) -> Result<VideoHandle, ExtractError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.handle
            .clone()
            .ok_or_else(|| ExtractError::VideoUnavailable(url.to_string()))
    }

    async fn download(
        &self,
        url: &str,
        selector: &StreamSelector,
        output: &Path,
    ) -> Result<PathBuf, ExtractError> {
        self.downloads
            .lock()
            .unwrap()
            .push((selector.clone(), output.to_path_buf()));

        if self.fail_download {
            return Err(ExtractError::YtDlpFailed {
                code: Some(1),
                message: format!("ERROR: unable to download {}", url),
            });
        }
        tokio::fs::write(output, format!("{}", selector)).await?;
        Ok(output.to_path_buf())
    }
}

pub struct FakeTranscoder {
    fail: bool,
    remove_input: bool,
    calls: AtomicUsize,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self {
            fail: false,
            remove_input: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Converts, then deletes its input so the caller's cleanup finds nothing
    pub fn removing_input() -> Self {
        Self {
            remove_input: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn to_mp3(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranscodeError::FfmpegFailed {
                code: Some(1),
                message: format!("{}: Invalid data found when processing input", input.display()),
            });
        }
        let audio = tokio::fs::read(input).await?;
        tokio::fs::write(output, audio).await?;
        if self.remove_input {
            tokio::fs::remove_file(input).await?;
        }
        Ok(())
    }
}
