use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;

use promptcatalog::cli::{Cli, Command};
use promptcatalog::config::Config;
use promptcatalog::{PromptCatalog, PromptTemplate, compose_prompt};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let prompts_dir = cli.prompts_dir.unwrap_or(config.prompts_dir);

    info!("promptcatalog starting");

    let catalog = PromptCatalog::load(&prompts_dir)?;

    match cli.command {
        Command::Categories => {
            for category in catalog.categories() {
                println!("{} ({})", category.cyan(), catalog.templates_in(category).len());
            }
        }
        Command::List { category, json } => {
            let templates: Vec<&PromptTemplate> = match &category {
                Some(c) => catalog.templates_in(c).iter().collect(),
                None => catalog.all_templates(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&templates)?);
            } else if templates.is_empty() {
                println!("No templates found");
            } else {
                for t in templates {
                    println!("{:<24} {:<20} {}", t.name.yellow(), t.category.dimmed(), t.display_name());
                }
            }
        }
        Command::Show { name } => {
            let template = catalog.get(&name)?;
            println!("{}", template.display_name().to_uppercase().bold());
            println!();
            println!("{}", template.content);
        }
        Command::Compose { text, names } => {
            let templates = names
                .iter()
                .map(|n| catalog.get(n))
                .collect::<Result<Vec<_>, _>>()?;
            let prompt = compose_prompt(&text, &templates);
            if prompt.trim().is_empty() {
                return Err(eyre!("Nothing to compose: give --text or at least one template name"));
            }
            println!("{}", prompt);
        }
    }

    Ok(())
}
