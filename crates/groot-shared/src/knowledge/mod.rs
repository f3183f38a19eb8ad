//! Troubleshooting knowledge: entries, built-in defaults, the persisted
//! category store and query-driven retrieval.

pub mod defaults;
pub mod entry;
pub mod retrieval;
pub mod store;

pub use defaults::{default_entries, KNOWN_CATEGORIES};
pub use entry::{CategoryFile, KnowledgeEntry, YamlExample};
pub use retrieval::{best_practices_for, search, MAX_RESULTS};
pub use store::{KnowledgeStore, LoadSummary};
