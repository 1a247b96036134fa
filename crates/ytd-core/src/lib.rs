//! ytd-core: metadata resolution and download orchestration for ytd

pub mod cache;
pub mod config;
pub mod error;
pub mod extractor;
pub mod filename;
pub mod model;
pub mod orchestrator;
pub mod resolver;
pub mod session;
pub mod transcoder;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Result, YtdError};
pub use model::{DownloadJob, DownloadOutcome, StreamVariant, Target, VideoMetadata};
pub use session::Session;
