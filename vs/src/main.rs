use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use versionstore::VersionStore;
use versionstore::cli::{Cli, Command, OutputFormat};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    info!("versionstore starting");

    match cli.command {
        Command::Init { image } => {
            let store = VersionStore::open(&image)?;
            println!(
                "{} Version directory: {}",
                "✓".green(),
                store.version_dir().display().to_string().cyan()
            );
        }
        Command::List { image, format } => {
            let store = VersionStore::open(&image)?;
            let versions = store.list_versions()?;
            match format {
                OutputFormat::Json => {
                    let paths: Vec<String> = versions.iter().map(|p| p.to_string_lossy().to_string()).collect();
                    let json = serde_json::json!({
                        "original": image.to_string_lossy(),
                        "version_dir": store.version_dir().to_string_lossy(),
                        "versions": paths,
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                OutputFormat::Text => {
                    for path in &versions {
                        let label = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
                        println!("{:>8} {}", label.yellow(), path.display());
                    }
                }
            }
        }
        Command::Path { image, version } => {
            let store = VersionStore::open(&image)?;
            println!("{}", store.path_for_version(version).display());
        }
        Command::Count { image } => {
            let store = VersionStore::open(&image)?;
            println!("{}", store.version_count()?);
        }
        Command::Delete { image, version } => {
            let store = VersionStore::open(&image)?;
            store.delete_version(version)?;
            println!("{} Deleted version {}", "✓".green(), version);
        }
    }

    Ok(())
}
