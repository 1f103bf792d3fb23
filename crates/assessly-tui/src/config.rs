use std::path::PathBuf;
use std::time::Duration;

use assessly_core::DescriptionMode;
use clap::{Parser, Subcommand, ValueEnum};

pub const DEFAULT_API_BASE: &str = "https://shl-assessment-production-9508.up.railway.app";

#[derive(Debug, Parser)]
#[command(name = "assessly", about = "Assessment recommendations for a job description")]
pub struct Cli {
    /// Recommendation service base URL
    #[arg(long, env = "ASSESSLY_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    /// Request timeout in seconds
    #[arg(long, env = "ASSESSLY_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,

    /// How the description column is shown
    #[arg(
        long,
        env = "ASSESSLY_VARIANT",
        value_enum,
        default_value_t = Variant::Toggle,
        global = true
    )]
    pub variant: Variant,

    /// Append logs to this file.
    /// Without it the interactive client discards logs; one-shot commands log to stderr.
    #[arg(long, env = "ASSESSLY_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit one job description and print the recommendations
    Query {
        /// Job description; read from stdin when omitted
        text: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Check that the recommendation service is reachable
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Full description behind Read more / Read less
    Toggle,
    /// First 100 characters
    Truncate,
}

impl From<Variant> for DescriptionMode {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Toggle => DescriptionMode::Toggle,
            Variant::Truncate => DescriptionMode::Truncate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Html,
    Json,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn mode(&self) -> DescriptionMode {
        self.variant.into()
    }
}
