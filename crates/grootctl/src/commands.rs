//! Subcommand handlers.

use crate::cli::AmbientArgs;
use anyhow::{Context, Result};
use groot_shared::knowledge::best_practices_for;
use groot_shared::{
    interpret, AmbientContext, GrootConfig, KnowledgeEntry, KnowledgeStore, Pipeline, QueryBundle,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load the store under `dir`, materializing defaults on first use
fn open_store(dir: &Path) -> KnowledgeStore {
    let mut store = KnowledgeStore::new(dir);
    let summary = store.load();
    if !summary.materialized.is_empty() {
        info!("materialized default categories: {}", summary.materialized.join(", "));
    }
    store
}

/// Flags, then the --context file, then config
fn build_ambient(args: AmbientArgs, config: &GrootConfig) -> Result<AmbientContext> {
    let mut ambient = AmbientContext {
        current_namespace: args.current_namespace,
        namespaces: args.namespaces,
        cluster_name: args.cluster_name,
        region: args.region,
        zone: args.zone,
        project_id: args.project_id,
        resource_group: args.resource_group,
        issues: Vec::new(),
    };
    if let Some(path) = &args.context {
        ambient = ambient.merge_missing(AmbientContext::from_file(path)?);
    }
    Ok(ambient.merge_missing(AmbientContext::from_config(&config.cluster)))
}

pub fn ask(query: &[String], json: bool, args: AmbientArgs, config: &GrootConfig, kb_dir: &Path) -> Result<()> {
    let ambient = build_ambient(args, config)?;
    let pipeline = Pipeline::new(open_store(kb_dir));
    let bundle = pipeline.process(&query.join(" "), &ambient);

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else {
        print_bundle(&bundle);
    }
    Ok(())
}

fn print_list(heading: &str, items: &[String]) {
    println!("{}:", heading);
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items {
        println!("  - {}", item);
    }
}

fn print_bundle(bundle: &QueryBundle) {
    let query = &bundle.structured_query;
    let entities = &query.entities;

    println!(
        "Intent:        {}",
        query.action().map(|a| a.as_str()).unwrap_or("unknown")
    );
    println!("Resources:     {}", entities.resource_type.join(", "));
    if !entities.resource_name.is_empty() {
        println!("Names:         {}", entities.resource_name.join(", "));
    }
    if let Some(namespace) = &entities.namespace {
        println!("Namespace:     {}", namespace);
    }
    if !entities.issue_type.is_empty() {
        println!("Issues:        {}", entities.issue_type.join(", "));
    }
    if !entities.cloud_provider.is_empty() {
        println!("Cloud:         {}", entities.cloud_provider.join(", "));
    }
    println!();

    let titles: Vec<String> = bundle.retrieved_entries.iter().map(|e| e.title.clone()).collect();
    print_list("Knowledge", &titles);
    println!();

    println!("Commands:");
    if bundle.command_suggestions.is_empty() {
        println!("  (none)");
    }
    for cmd in &bundle.command_suggestions {
        println!("  # {}", cmd.description);
        println!("  {}", cmd.command);
    }

    for example in &bundle.yaml_examples {
        println!();
        println!("--- {} ---", example.title);
        print!("{}", example.body);
    }

    if !bundle.followups.is_empty() {
        println!();
        print_list("Follow-up questions", &bundle.followups);
    }
}

pub fn interpret_only(query: &[String]) -> Result<()> {
    let structured = interpret(&query.join(" "));
    println!("{}", serde_json::to_string_pretty(&structured)?);
    Ok(())
}

pub fn kb_categories(kb_dir: &Path) -> Result<()> {
    let store = open_store(kb_dir);
    for name in store.category_names() {
        println!("{:<20} {}", name, store.category(name).len());
    }
    Ok(())
}

pub fn kb_show(kb_dir: &Path, category: &str) -> Result<()> {
    let store = open_store(kb_dir);
    let entries = store.category(category);
    if entries.is_empty() {
        warn!("category {} is empty or unknown", category);
    }
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}

pub fn kb_add(kb_dir: &Path, category: &str, entry_path: &Path) -> Result<()> {
    let content = fs::read_to_string(entry_path)
        .with_context(|| format!("Failed to read {}", entry_path.display()))?;
    let entry: KnowledgeEntry = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse entry {}", entry_path.display()))?;
    let title = entry.title.clone();

    let mut store = open_store(kb_dir);
    store
        .add_entry(category, entry)
        .with_context(|| format!("Failed to add {:?} to {}", title, category))?;

    println!("Added {:?} to {} ({} entries)", title, category, store.category(category).len());
    Ok(())
}

pub fn best_practices(kb_dir: &Path, resource_type: &str) -> Result<()> {
    let store = open_store(kb_dir);
    let practices = best_practices_for(&store, resource_type);
    if practices.is_empty() {
        println!("No best practices recorded for {}", resource_type);
    }
    for entry in practices {
        println!("{}", entry.title);
        if let Some(content) = &entry.content {
            println!("  {}", content);
        }
        for reference in &entry.references {
            println!("  see {}", reference);
        }
        println!();
    }
    Ok(())
}

pub fn config_show(config: &GrootConfig) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    print!("{}", toml_string);
    Ok(())
}

pub fn config_path(explicit: Option<PathBuf>) -> Result<()> {
    let path = match explicit {
        Some(path) => path,
        None => GrootConfig::user_config_path()?,
    };
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_precedence() {
        let mut config = GrootConfig::default();
        config.cluster.cluster_name = Some("from-config".into());
        config.cluster.region = Some("us-east-1".into());

        let args = AmbientArgs {
            cluster_name: Some("from-flag".into()),
            ..Default::default()
        };
        let ambient = build_ambient(args, &config).unwrap();

        assert_eq!(ambient.cluster_name.as_deref(), Some("from-flag"));
        assert_eq!(ambient.region.as_deref(), Some("us-east-1"));
        assert_eq!(ambient.current_namespace.as_deref(), Some("default"));
    }

    #[test]
    fn test_context_file_fills_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, r#"{"current_namespace": "prod", "namespaces": ["prod", "dev"]}"#).unwrap();

        let args = AmbientArgs {
            context: Some(path),
            ..Default::default()
        };
        let ambient = build_ambient(args, &GrootConfig::default()).unwrap();
        assert_eq!(ambient.current_namespace.as_deref(), Some("prod"));
        assert_eq!(ambient.namespaces, vec!["prod", "dev"]);
    }
}
