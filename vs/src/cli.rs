//! CLI argument parsing for versionstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vs")]
#[command(author, version, about = "Directory-based version history for edited images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the version directory and stored original for an image
    Init {
        /// Original image file
        #[arg(required = true)]
        image: PathBuf,
    },

    /// List the stored original and every version
    List {
        /// Original image file
        #[arg(required = true)]
        image: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the path of a version (0 = original)
    Path {
        /// Original image file
        #[arg(required = true)]
        image: PathBuf,

        /// Version number
        #[arg(required = true)]
        version: u32,
    },

    /// Count stored versions, not including the original
    Count {
        /// Original image file
        #[arg(required = true)]
        image: PathBuf,
    },

    /// Delete a version (the original cannot be deleted)
    Delete {
        /// Original image file
        #[arg(required = true)]
        image: PathBuf,

        /// Version number to delete
        #[arg(required = true)]
        version: u32,
    },
}

/// Output format for listing commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
