//! Audio transcoding using FFmpeg

use crate::error::TranscodeError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Audio transcoding backend.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Read the audio track of `input` and write it as MP3 to `output`
    async fn to_mp3(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    ffmpeg_path: PathBuf,
    mp3_quality: u8,
}

impl Ffmpeg {
    pub fn new(ffmpeg_path: PathBuf, mp3_quality: u8) -> Self {
        Self {
            ffmpeg_path,
            mp3_quality: mp3_quality.min(9),
        }
    }

    fn mp3_args(&self) -> Vec<String> {
        vec![
            // Drop any video or cover stream
            "-vn".to_string(),
            "-c:a".to_string(),
            "libmp3lame".to_string(),
            "-q:a".to_string(),
            self.mp3_quality.to_string(),
        ]
    }
}

#[async_trait]
impl Transcoder for Ffmpeg {
    async fn to_mp3(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        info!("Converting {} to MP3", input.display());

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(["-hide_banner", "-loglevel", "error"]);
        cmd.arg("-i").arg(input);
        cmd.args(self.mp3_args());
        cmd.arg("-y").arg(output);

        let result = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TranscodeError::FfmpegNotFound
            } else {
                TranscodeError::Io(e)
            }
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(TranscodeError::FfmpegFailed {
                code: result.status.code(),
                message: stderr.trim().to_string(),
            });
        }

        debug!("Encoded to: {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp3_args() {
        let ffmpeg = Ffmpeg::new(PathBuf::from("ffmpeg"), 2);
        assert_eq!(ffmpeg.mp3_args(), ["-vn", "-c:a", "libmp3lame", "-q:a", "2"]);
    }

    #[test]
    fn test_quality_is_clamped() {
        let ffmpeg = Ffmpeg::new(PathBuf::from("ffmpeg"), 40);
        assert_eq!(ffmpeg.mp3_quality, 9);
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let ffmpeg = Ffmpeg::new(PathBuf::from("/nonexistent/ffmpeg-binary"), 2);
        let err = ffmpeg
            .to_mp3(Path::new("in.mp4"), Path::new("out.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::FfmpegNotFound));
    }
}
