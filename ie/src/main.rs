//! imgedit - CLI entry point

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use imgedit::cli::{Cli, Command};
use imgedit::config::Config;
use imgedit::editor::create_editor;
use imgedit::session::{EditSession, SessionError, version_label};
use promptcatalog::{PromptCatalog, compose_prompt};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("imgedit")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("imgedit.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Edit {
            image,
            text,
            templates,
            aspect_ratio,
        } => cmd_edit(&config, &image, &text, &templates, aspect_ratio).await,
        Command::Undo { image } => cmd_undo(&image),
        Command::Versions { image } => cmd_versions(&image),
        Command::Prompts { category } => cmd_prompts(&config, category.as_deref()),
    }
}

async fn cmd_edit(
    config: &Config,
    image: &Path,
    text: &str,
    template_names: &[String],
    aspect_ratio: Option<String>,
) -> Result<()> {
    debug!(?image, templates = template_names.len(), "cmd_edit: called");

    let prompt = if template_names.is_empty() {
        compose_prompt::<promptcatalog::PromptTemplate>(text, &[])
    } else {
        let catalog = PromptCatalog::load(&config.prompts.dir)?;
        let templates = template_names
            .iter()
            .map(|name| catalog.get(name))
            .collect::<Result<Vec<_>, _>>()?;
        compose_prompt(text, &templates)
    };
    if prompt.trim().is_empty() {
        return Err(SessionError::EmptyPrompt.into());
    }

    config.validate()?;
    let editor = create_editor(&config.editor)?;
    let mut session = EditSession::open(image)?;

    println!("Editing {} of {}...", version_label(session.current_version()), image.display());
    let aspect_ratio = aspect_ratio.or_else(|| config.editor.aspect_ratio.clone());
    let outcome = session.apply(editor.as_ref(), &prompt, aspect_ratio).await?;

    println!(
        "{} {} saved to {}",
        "✓".green(),
        version_label(outcome.version),
        outcome.path.display().to_string().cyan()
    );
    if let Some(reply) = outcome.text {
        println!("{}", reply.dimmed());
    }
    Ok(())
}

fn cmd_undo(image: &Path) -> Result<()> {
    let mut session = EditSession::open(image)?;
    let removed = session.current_version();
    let current = session.discard()?;
    println!(
        "{} Discarded {}; now at {}",
        "✓".green(),
        version_label(removed),
        version_label(current)
    );
    Ok(())
}

fn cmd_versions(image: &Path) -> Result<()> {
    let session = EditSession::open(image)?;
    let store = session.store();

    println!("{}", store.version_dir().display().to_string().cyan());
    let mut numbers = vec![0];
    numbers.extend(store.version_numbers()?);
    for n in numbers {
        let marker = if n == session.current_version() { "*" } else { " " };
        println!(
            "{} {:<12} {}",
            marker.green(),
            version_label(n),
            store.path_for_version(n).display()
        );
    }
    Ok(())
}

fn cmd_prompts(config: &Config, category: Option<&str>) -> Result<()> {
    let catalog = PromptCatalog::load(&config.prompts.dir)?;

    let categories: Vec<&str> = match category {
        Some(c) => vec![c],
        None => catalog.categories(),
    };
    for c in categories {
        println!("{}", c.cyan().bold());
        for t in catalog.templates_in(c) {
            println!("  {:<24} {}", t.name.yellow(), t.display_name());
        }
    }
    Ok(())
}
