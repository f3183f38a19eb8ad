//! Per-query orchestration.
//!
//! Interprets the query once, then runs retrieval, command synthesis and
//! follow-up generation over the same read-only interpretation and merges
//! the results into a `QueryBundle`.

use crate::ambient::AmbientContext;
use crate::commands::{examples_for, synthesize, CommandSuggestion};
use crate::error::GrootError;
use crate::followup::followups;
use crate::interpreter::interpret;
use crate::knowledge::{search, KnowledgeEntry, KnowledgeStore, YamlExample};
use crate::query::StructuredQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{debug, info};
use uuid::Uuid;

/// Fixed preamble for a conversational backend
pub const SYSTEM_PROMPT: &str = "You are Groot, an assistant specialized in Kubernetes and cloud \
infrastructure troubleshooting. Be specific and concise, give actionable recommendations, and \
explain what any command you suggest does.";

pub const AI_DISABLED_NOTICE: &str =
    "AI features are disabled. Configure a conversational backend to get prose answers.";

const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ContextMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Everything produced for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryBundle {
    pub request_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub structured_query: StructuredQuery,
    pub retrieved_entries: Vec<KnowledgeEntry>,
    pub command_suggestions: Vec<CommandSuggestion>,
    pub yaml_examples: Vec<YamlExample>,
    pub followups: Vec<String>,
}

impl QueryBundle {
    /// Context messages for a conversational backend, in the order they
    /// should precede the raw user query. Empty sections are skipped.
    pub fn context_messages(&self) -> Vec<ContextMessage> {
        let mut messages = vec![ContextMessage::system(SYSTEM_PROMPT)];

        if !self.retrieved_entries.is_empty() {
            messages.push(ContextMessage::system(render_knowledge(&self.retrieved_entries)));
        }
        if !self.command_suggestions.is_empty() {
            let mut out = String::from("Here are relevant commands that might help:\n\n");
            for cmd in &self.command_suggestions {
                let _ = writeln!(out, "Command: {}\nPurpose: {}\n", cmd.command, cmd.description);
            }
            messages.push(ContextMessage::system(out));
        }
        if !self.yaml_examples.is_empty() {
            let mut out = String::from("Here are relevant YAML examples:\n\n");
            for example in &self.yaml_examples {
                let _ = writeln!(out, "--- {} ---\n```yaml\n{}```\n", example.title, example.body);
            }
            messages.push(ContextMessage::system(out));
        }
        messages.push(ContextMessage::system(render_query_summary(&self.structured_query)));
        messages
    }
}

fn bullets(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", heading);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

fn render_knowledge(entries: &[KnowledgeEntry]) -> String {
    let mut out = String::from("Here is relevant information from the knowledge base:\n\n");
    for entry in entries {
        let _ = writeln!(out, "--- {} ---", entry.title);
        if let Some(description) = &entry.description {
            let _ = writeln!(out, "{}", description);
        }
        bullets(&mut out, "Symptoms", &entry.symptoms);
        bullets(&mut out, "Possible causes", &entry.causes);
        bullets(&mut out, "Solutions", &entry.solutions);
        if let Some(content) = &entry.content {
            let _ = writeln!(out, "{}", content);
        }
        out.push('\n');
    }
    out
}

fn joined_or_unspecified(items: &[String]) -> String {
    if items.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        items.join(", ")
    }
}

fn render_query_summary(query: &StructuredQuery) -> String {
    let entities = &query.entities;
    let needs = |flag: bool| if flag { "needs" } else { "does not need" };

    let mut out = String::from("The user's query has been parsed as follows:\n");
    let _ = writeln!(
        out,
        "- Intent: {}",
        query.action().map(|a| a.as_str()).unwrap_or(NOT_SPECIFIED)
    );
    let _ = writeln!(out, "- Resource types: {}", joined_or_unspecified(&entities.resource_type));
    let _ = writeln!(out, "- Resource names: {}", joined_or_unspecified(&entities.resource_name));
    let _ = writeln!(
        out,
        "- Namespace: {}",
        entities.namespace.as_deref().unwrap_or(NOT_SPECIFIED)
    );
    let _ = writeln!(out, "- Issue types: {}", joined_or_unspecified(&entities.issue_type));
    let _ = writeln!(out, "- Cloud providers: {}", joined_or_unspecified(&entities.cloud_provider));
    let _ = writeln!(out, "\nThe user {} code examples.", needs(query.context.requires_code));
    let _ = writeln!(
        out,
        "The user {} detailed explanations.",
        needs(query.context.requires_explanation)
    );
    out
}

/// Generative answer source fed with a bundle's context messages
pub trait ConversationalBackend: Send + Sync {
    fn respond(&self, messages: &[ContextMessage], query: &str) -> Result<String, GrootError>;
}

/// Backend used when none is configured
pub struct DisabledBackend;

impl ConversationalBackend for DisabledBackend {
    fn respond(&self, _messages: &[ContextMessage], _query: &str) -> Result<String, GrootError> {
        Ok(AI_DISABLED_NOTICE.to_string())
    }
}

/// Owns the knowledge store for the life of the process
pub struct Pipeline {
    store: KnowledgeStore,
    backend: Box<dyn ConversationalBackend>,
}

impl Pipeline {
    pub fn new(store: KnowledgeStore) -> Self {
        Self {
            store,
            backend: Box::new(DisabledBackend),
        }
    }

    pub fn with_backend(mut self, backend: Box<dyn ConversationalBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Mutable access for `add_entry`
    pub fn store_mut(&mut self) -> &mut KnowledgeStore {
        &mut self.store
    }

    /// Run every core stage for one query
    pub fn process(&self, text: &str, ambient: &AmbientContext) -> QueryBundle {
        let query = interpret(text);

        let retrieved_entries: Vec<KnowledgeEntry> = search(&self.store, &query).into_iter().cloned().collect();
        let command_suggestions = synthesize(&query, ambient);
        let yaml_examples = if query.context.requires_code {
            examples_for(query.first_resource_type().unwrap_or("pod"))
        } else {
            Vec::new()
        };
        let followups = followups(&query, ambient);

        let bundle = QueryBundle {
            request_id: Uuid::new_v4(),
            created_at: Utc::now(),
            structured_query: query,
            retrieved_entries,
            command_suggestions,
            yaml_examples,
            followups,
        };

        if bundle.structured_query.is_underspecified() {
            debug!(request_id = %bundle.request_id, "underspecified query");
        }
        info!(
            request_id = %bundle.request_id,
            entries = bundle.retrieved_entries.len(),
            commands = bundle.command_suggestions.len(),
            followups = bundle.followups.len(),
            "query processed"
        );
        bundle
    }

    /// Hand a bundle to the conversational backend
    pub fn respond(&self, bundle: &QueryBundle) -> Result<String, GrootError> {
        let mut messages = bundle.context_messages();
        messages.push(ContextMessage::user(&bundle.structured_query.original_query));
        self.backend.respond(&messages, &bundle.structured_query.original_query)
    }
}
