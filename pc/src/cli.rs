//! CLI argument parsing for promptcatalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pc")]
#[command(author, version, about = "Browse and compose image edit prompt templates", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prompts directory (overrides config)
    #[arg(short, long)]
    pub prompts_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List categories
    Categories,

    /// List templates, optionally for one category
    List {
        /// Only show this category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Print templates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a template's content
    Show {
        /// Template name (file stem)
        #[arg(required = true)]
        name: String,
    },

    /// Compose a prompt from free text and/or templates
    Compose {
        /// Free text placed before the templates
        #[arg(short, long, default_value = "")]
        text: String,

        /// Template names, in the order they should appear
        names: Vec<String>,
    },
}
