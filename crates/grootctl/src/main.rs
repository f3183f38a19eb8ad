//! Groot Control - CLI for the Groot Kubernetes troubleshooting assistant.
//!
//! Loads configuration, sets up logging and runs one subcommand against the
//! local knowledge base.

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, KbCommands};
use groot_shared::GrootConfig;
use tracing::debug;

fn load_config(explicit: Option<&std::path::Path>) -> Result<GrootConfig> {
    match explicit {
        Some(path) => {
            let mut config = GrootConfig::load_from_path(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => GrootConfig::load(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init(cli.log_level.as_deref(), &config.logging.level);
    debug!("{}", groot_shared::VersionInfo::current().display());

    let kb_dir = cli.kb_dir.clone().unwrap_or_else(|| config.knowledge_dir());

    match cli.command {
        Commands::Ask { query, json, ambient } => commands::ask(&query, json, ambient, &config, &kb_dir),
        Commands::Interpret { query } => commands::interpret_only(&query),
        Commands::Kb { action } => match action {
            KbCommands::Categories => commands::kb_categories(&kb_dir),
            KbCommands::Show { category } => commands::kb_show(&kb_dir, &category),
            KbCommands::Add { category, entry } => commands::kb_add(&kb_dir, &category, &entry),
        },
        Commands::BestPractices { resource_type } => commands::best_practices(&kb_dir, &resource_type),
        Commands::Config { action } => match action {
            ConfigCommands::Show => commands::config_show(&config),
            ConfigCommands::Path => commands::config_path(cli.config),
        },
    }
}
