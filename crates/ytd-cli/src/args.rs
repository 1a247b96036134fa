use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytd")]
#[command(author, version, about = "Download a video or its audio track from a URL")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Video URL to open in an interactive session (shorthand for `interactive <URL>`)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Paste URLs and choose format, resolution and file name interactively
    Interactive {
        /// Video URL to start with
        url: Option<String>,
    },

    /// Show title, length and available resolutions of a video
    Info {
        /// Video URL
        url: String,

        /// Print the resolved metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download one video stream as MP4
    Video {
        /// Video URL
        url: String,

        /// Position of the stream in the `info` listing
        #[arg(long, conflicts_with = "resolution")]
        variant: Option<usize>,

        /// Resolution label such as 720p (first match wins)
        #[arg(short, long)]
        resolution: Option<String>,

        #[command(flatten)]
        save: SaveOptions,
    },

    /// Download the best audio stream and convert it to MP3
    Audio {
        /// Video URL
        url: String,

        #[command(flatten)]
        save: SaveOptions,
    },

    /// Check that yt-dlp and FFmpeg are available
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone, Debug)]
pub struct SaveOptions {
    /// File name to save as (defaults to the video title)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output directory (defaults to the configured download directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
