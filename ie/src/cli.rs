//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ie - edit images with natural-language instructions
#[derive(Parser)]
#[command(
    name = "ie",
    about = "Edit images with natural-language instructions and keep every version",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply an edit to the current version of an image
    Edit {
        /// Original image file
        image: PathBuf,

        /// Free-text instruction
        #[arg(short, long, default_value = "")]
        text: String,

        /// Prompt template to include (repeatable, applied in order)
        #[arg(short = 'T', long = "template", value_name = "NAME")]
        templates: Vec<String>,

        /// Requested output aspect ratio (overrides config)
        #[arg(short, long)]
        aspect_ratio: Option<String>,
    },

    /// Discard the latest version of an image
    Undo {
        /// Original image file
        image: PathBuf,
    },

    /// List stored versions of an image
    Versions {
        /// Original image file
        image: PathBuf,
    },

    /// List available prompt templates
    Prompts {
        /// Only show this category
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
}
