//! Configuration management for ytd

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub audio: AudioConfig,
    pub cache: CacheConfig,
    pub temp: TempConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory downloads are written to, relative to the working directory
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// LAME VBR quality, 0 (best) to 9 (smallest)
    pub mp3_quality: u8,
    /// Name of the intermediate file the audio stream is downloaded to
    pub temp_file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of resolved URLs kept for the session (0 disables caching)
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempConfig {
    /// Remove the intermediate audio file when a job fails
    pub cleanup_on_failure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            output: OutputConfig {
                directory: PathBuf::from("downloads"),
            },
            audio: AudioConfig {
                mp3_quality: 2,
                temp_file_name: "temp_audio.mp4".to_string(),
            },
            cache: CacheConfig { capacity: 8 },
            temp: TempConfig {
                cleanup_on_failure: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = Self::default_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        // YTD_OUTPUT__DIRECTORY=... maps to output.directory
        figment = figment.merge(Env::prefixed("YTD_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Location of the per-user config file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ytd/config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.mp3_quality > 9 {
            return Err(ConfigError::InvalidValue(format!(
                "audio.mp3_quality must be between 0 and 9, got {}",
                self.audio.mp3_quality
            )));
        }
        let mut components = Path::new(&self.audio.temp_file_name).components();
        let plain_name = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none();
        if !plain_name {
            return Err(ConfigError::InvalidValue(format!(
                "audio.temp_file_name must be a plain file name, got {:?}",
                self.audio.temp_file_name
            )));
        }
        Ok(())
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg")
                .map_err(|_| ConfigError::InvalidValue("ffmpeg not found in PATH".to_string()))
        }
    }
}
