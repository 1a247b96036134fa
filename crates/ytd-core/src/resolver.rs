//! Metadata resolution: URL to title, thumbnail, duration and stream variants

use crate::cache::LruCache;
use crate::error::ResolutionError;
use crate::extractor::{Extractor, Stream, VideoHandle};
use crate::model::{StreamVariant, VideoMetadata, NOT_AVAILABLE, UNKNOWN_TAG};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};
use url::Url;

pub struct Resolver {
    extractor: Arc<dyn Extractor>,
    cache: Mutex<LruCache<VideoMetadata>>,
}

impl Resolver {
    pub fn new(extractor: Arc<dyn Extractor>, cache_capacity: usize) -> Self {
        Self {
            extractor,
            cache: Mutex::new(LruCache::new(cache_capacity)),
        }
    }

    /// Resolve `url` into displayable metadata, serving repeats from the cache
    pub async fn resolve(&self, url: &str) -> Result<VideoMetadata, ResolutionError> {
        let url = validate_url(url)?;

        let cached = self.cache().get(&url);
        if let Some(cached) = cached {
            debug!("Metadata cache hit: {}", url);
            return Ok(cached);
        }

        let handle = self.extractor.fetch(&url).await?;
        let metadata = build_metadata(&url, &handle)?;

        info!(
            "Resolved \"{}\" with {} progressive variants",
            metadata.title,
            metadata.variants.len()
        );

        self.cache().insert(url, metadata.clone());
        Ok(metadata)
    }

    /// Forget the cached metadata for `url` so the next resolve refetches it
    pub fn invalidate(&self, url: &str) -> bool {
        self.cache().invalidate(url.trim())
    }

    fn cache(&self) -> MutexGuard<'_, LruCache<VideoMetadata>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Check that `input` is an absolute http(s) URL; returns it trimmed
pub fn validate_url(input: &str) -> Result<String, ResolutionError> {
    let trimmed = input.trim();
    let parsed =
        Url::parse(trimmed).map_err(|_| ResolutionError::InvalidUrl(trimmed.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ResolutionError::InvalidUrl(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

fn build_metadata(url: &str, handle: &VideoHandle) -> Result<VideoMetadata, ResolutionError> {
    let variants: Vec<StreamVariant> = handle.progressive().map(variant_from_stream).collect();

    if variants.is_empty() {
        return Err(ResolutionError::NoCompatibleStreams);
    }

    let duration = handle
        .duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| d.round() as u64)
        .unwrap_or(0);

    Ok(VideoMetadata {
        url: url.to_string(),
        title: handle.title.clone(),
        thumbnail_url: handle.thumbnail_url.clone().unwrap_or_default(),
        duration,
        variants,
    })
}

/// Describe one stream, preferring structured fields over its description line
pub fn variant_from_stream(stream: &Stream) -> StreamVariant {
    let desc = stream.description.as_str();

    let resolution = stream
        .height
        .filter(|h| *h > 0)
        .map(|h| format!("{}p", h))
        .or_else(|| parse_resolution(desc));

    let container = stream
        .container
        .clone()
        .filter(|c| !c.is_empty() && c != "none")
        .or_else(|| parse_container(desc));

    let frame_rate = stream
        .fps
        .filter(|f| f.is_finite() && *f > 0.0)
        .map(format_fps)
        .or_else(|| parse_frame_rate(desc));

    let tag = stream
        .tag
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| parse_tag(desc));

    StreamVariant {
        resolution: resolution.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        container: container.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        frame_rate: frame_rate.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        tag: tag.unwrap_or_else(|| UNKNOWN_TAG.to_string()),
    }
}

fn format_fps(fps: f64) -> String {
    if fps.fract() == 0.0 {
        format!("{}", fps as u64)
    } else {
        format!("{}", fps)
    }
}

fn capture(pattern: &str, text: &str) -> Option<String> {
    let re = regex::Regex::new(pattern).ok()?;
    let caps = re.captures(text)?;
    Some(caps.get(1)?.as_str().to_string())
}

fn parse_resolution(desc: &str) -> Option<String> {
    // "720p", "(720p60)" or a bare "1280x720"
    capture(r"\b(\d+p)", desc).or_else(|| capture(r"\b\d+x(\d+)\b", desc).map(|h| format!("{}p", h)))
}

fn parse_container(desc: &str) -> Option<String> {
    capture(r"video/(\w+)", desc)
        .or_else(|| capture(r"\b(mp4|webm|3gp|mkv|flv|mov)\b", desc))
}

fn parse_frame_rate(desc: &str) -> Option<String> {
    // "30fps", "30 fps" or the "60" of "720p60"
    capture(r"(\d+)\s?fps", desc).or_else(|| capture(r"\b\d+p(\d+)\b", desc))
}

fn parse_tag(desc: &str) -> Option<String> {
    capture(r#"itag="(\d+)""#, desc).or_else(|| capture(r"^\s*([\w-]+)\s+-\s", desc))
}
