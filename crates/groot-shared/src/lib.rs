//! Shared core for Groot, the Kubernetes troubleshooting assistant.
//!
//! Turns a free-text operator question into a structured interpretation,
//! ranked knowledge entries, diagnostic commands and follow-up questions.
//! Everything here is deterministic; no generative backend is required.

pub mod ambient;
pub mod commands;
pub mod config;
pub mod error;
pub mod followup;
pub mod interpreter;
pub mod knowledge;
pub mod pipeline;
pub mod query;
pub mod version;

pub use ambient::AmbientContext;
pub use commands::{examples_for, synthesize, CommandSuggestion};
pub use config::GrootConfig;
pub use error::{GrootError, KnowledgeError};
pub use followup::followups;
pub use interpreter::interpret;
pub use knowledge::{search, KnowledgeEntry, KnowledgeStore, YamlExample};
pub use pipeline::{ConversationalBackend, DisabledBackend, Pipeline, QueryBundle};
pub use query::{Action, Entities, Intent, QueryContext, StructuredQuery, TimePeriod, TimeUnit};
pub use version::{VersionInfo, BUILD_DATE, GIT_SHA, VERSION};

/// Namespace used when neither the query nor the ambient context names one
pub const DEFAULT_NAMESPACE: &str = "default";
