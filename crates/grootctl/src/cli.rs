//! Command-line argument parsing.
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Groot CLI
#[derive(Parser)]
#[command(name = "grootctl")]
#[command(about = "Groot - Kubernetes troubleshooting assistant", long_about = None)]
#[command(version = groot_shared::VERSION)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (overrides ~/.config/groot/config.toml and /etc/groot/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge base directory (overrides config and $GROOT_KNOWLEDGE_DIR)
    #[arg(long, global = true)]
    pub kb_dir: Option<PathBuf>,

    /// Log filter, e.g. "info" or "groot_shared=debug" ($RUST_LOG wins)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interpret a question and suggest knowledge, commands and follow-ups
    Ask {
        /// The question, e.g. "why are my pods crashing in staging?"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        ambient: AmbientArgs,
    },

    /// Print the structured interpretation of a question as JSON
    Interpret {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Inspect or extend the knowledge base
    Kb {
        #[command(subcommand)]
        action: KbCommands,
    },

    /// List best practices for a resource type
    BestPractices {
        /// Resource type, e.g. "deployment"
        resource_type: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum KbCommands {
    /// List categories and entry counts
    Categories,

    /// Print a category's entries as JSON
    Show { category: String },

    /// Append an entry (JSON file) to a category and persist it
    Add { category: String, entry: PathBuf },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Print the user config file path
    Path,
}

/// Cluster facts for this invocation; they win over --context and config
#[derive(Args, Default)]
pub struct AmbientArgs {
    /// JSON file with cluster context (namespaces, cluster identifiers)
    #[arg(long)]
    pub context: Option<PathBuf>,

    #[arg(long)]
    pub current_namespace: Option<String>,

    /// Namespaces present in the cluster, comma separated
    #[arg(long, value_delimiter = ',')]
    pub namespaces: Vec<String>,

    #[arg(long)]
    pub cluster_name: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub zone: Option<String>,

    #[arg(long)]
    pub project_id: Option<String>,

    #[arg(long)]
    pub resource_group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_parses_ambient_flags() {
        let cli = Cli::try_parse_from([
            "grootctl",
            "ask",
            "--namespaces",
            "default,staging",
            "--zone",
            "us-central1-a",
            "pods",
            "crashing",
        ])
        .unwrap();

        match cli.command {
            Commands::Ask { query, json, ambient } => {
                assert_eq!(query, vec!["pods", "crashing"]);
                assert!(!json);
                assert_eq!(ambient.namespaces, vec!["default", "staging"]);
                assert_eq!(ambient.zone.as_deref(), Some("us-central1-a"));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_flags_after_query_are_not_query_words() {
        let cli = Cli::try_parse_from(["grootctl", "ask", "pods crashing", "--json", "--log-level", "debug"]).unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Ask { query, json, .. } => {
                assert_eq!(query, vec!["pods crashing"]);
                assert!(json);
            }
            _ => panic!("expected ask"),
        }
    }
}
