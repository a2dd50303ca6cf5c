use std::path::PathBuf;

use chartcrop::chartcrop_core::{DEFAULT_CAPTION_PATTERN, DEFAULT_FOOTNOTE_PATTERN};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Crop charts and tables out of PDF reports using their captions and source lines.
#[derive(Debug, Parser)]
#[command(name = "chartcrop", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render pages, crop every chart and stitch charts split across pages
    Extract {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Directory for the cropped charts
        #[arg(short, long, value_name = "DIR", default_value = "charts")]
        output: PathBuf,

        /// Directory for rendered pages. Default: <OUTPUT>/pages
        #[arg(long, value_name = "DIR")]
        pages_dir: Option<PathBuf>,

        /// Page rendering magnification (default: 2.0)
        #[arg(long, default_value_t = 2.0)]
        zoom: f32,

        /// Margin around each crop, in page units (default: 10.0)
        #[arg(long, default_value_t = 10.0)]
        margin: f64,

        /// Delete rendered pages once their charts are cropped
        #[arg(long)]
        discard_page_images: bool,

        /// Output format for the run summary
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print detected chart regions, levels and crop boxes without rendering
    Scan {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Arguments shared by every subcommand.
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Page range (e.g. '1,3-5'). Default: all pages
    #[arg(long)]
    pub pages: Option<String>,

    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,

    /// Regular expression recognizing chart captions
    #[arg(long, value_name = "REGEX", default_value = DEFAULT_CAPTION_PATTERN)]
    pub caption_pattern: String,

    /// Regular expression recognizing source footnotes
    #[arg(long, value_name = "REGEX", default_value = DEFAULT_FOOTNOTE_PATTERN)]
    pub source_pattern: String,
}

/// Output format.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}
