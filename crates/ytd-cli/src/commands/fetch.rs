use anyhow::{bail, Result};
use std::path::Path;

use crate::args::SaveOptions;
use crate::ui;
use ytd_core::session::prepare_dir;
use ytd_core::{Config, DownloadJob, DownloadOutcome, Session, Target, VideoMetadata};

/// How the video stream is picked without prompting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantChoice {
    Index(usize),
    Resolution(String),
    Best,
}

impl VariantChoice {
    pub fn from_args(variant: Option<usize>, resolution: Option<String>) -> Self {
        match (variant, resolution) {
            (Some(index), _) => VariantChoice::Index(index),
            (None, Some(label)) => VariantChoice::Resolution(label),
            (None, None) => VariantChoice::Best,
        }
    }

    fn pick(&self, metadata: &VideoMetadata) -> Result<usize> {
        match self {
            VariantChoice::Index(index) => Ok(*index),
            VariantChoice::Resolution(label) => match metadata.find_resolution(label) {
                Some(index) => Ok(index),
                None => {
                    let available: Vec<&str> =
                        metadata.variants.iter().map(|v| v.resolution.as_str()).collect();
                    bail!(
                        "No {} stream available (available: {})",
                        label,
                        available.join(", ")
                    )
                }
            },
            VariantChoice::Best => Ok(metadata.best_variant().unwrap_or(0)),
        }
    }
}

pub async fn run_video(
    url: &str,
    choice: VariantChoice,
    save: &SaveOptions,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let session = Session::from_config(&config)?;

    let metadata = ui::with_spinner("Fetching video info...", session.resolve(url)).await?;
    let variant = choice.pick(&metadata)?;

    run_job(&session, &metadata, Target::Video { variant }, save, "Downloading video...").await
}

pub async fn run_audio(url: &str, save: &SaveOptions, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let session = Session::from_config(&config)?;

    let metadata = ui::with_spinner("Fetching video info...", session.resolve(url)).await?;

    run_job(&session, &metadata, Target::Audio, save, "Downloading audio...").await
}

async fn run_job(
    session: &Session,
    metadata: &VideoMetadata,
    target: Target,
    save: &SaveOptions,
    message: &'static str,
) -> Result<()> {
    let output_dir = save
        .output
        .clone()
        .unwrap_or_else(|| session.output_dir().to_path_buf());
    prepare_dir(&output_dir).await?;

    println!("{}", metadata.title);
    if let Target::Video { variant } = target {
        ui::print_variant(metadata, variant);
    }

    let job = DownloadJob::new(target, save.name.clone().unwrap_or_default(), output_dir);
    let outcome = ui::with_spinner(message, session.download(&job, metadata)).await;
    ui::report(&outcome);

    match outcome {
        DownloadOutcome::Success(_) => Ok(()),
        DownloadOutcome::Failure(reason) => bail!(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ytd_core::StreamVariant;

    fn metadata() -> VideoMetadata {
        let variant = |resolution: &str, tag: &str| StreamVariant {
            resolution: resolution.to_string(),
            container: "mp4".to_string(),
            frame_rate: "30".to_string(),
            tag: tag.to_string(),
        };
        VideoMetadata {
            url: "https://youtu.be/x".to_string(),
            title: "Sample".to_string(),
            thumbnail_url: String::new(),
            duration: 60,
            variants: vec![variant("360p", "18"), variant("720p", "22")],
        }
    }

    #[test]
    fn test_from_args() {
        assert_eq!(VariantChoice::from_args(Some(1), None), VariantChoice::Index(1));
        assert_eq!(
            VariantChoice::from_args(None, Some("720p".to_string())),
            VariantChoice::Resolution("720p".to_string())
        );
        assert_eq!(VariantChoice::from_args(None, None), VariantChoice::Best);
    }

    #[test]
    fn test_pick() {
        let metadata = metadata();
        assert_eq!(VariantChoice::Index(0).pick(&metadata).unwrap(), 0);
        assert_eq!(VariantChoice::Best.pick(&metadata).unwrap(), 1);
        assert_eq!(
            VariantChoice::Resolution("720p".to_string()).pick(&metadata).unwrap(),
            1
        );

        let err = VariantChoice::Resolution("1080p".to_string())
            .pick(&metadata)
            .unwrap_err();
        assert!(err.to_string().contains("360p, 720p"));
    }
}
