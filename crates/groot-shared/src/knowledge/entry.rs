//! Knowledge entry records.
//!
//! Issue records and best-practice records share one type; fields a record
//! does not use stay empty and are omitted on disk.

use serde::{Deserialize, Serialize};

/// Tag carried by every best-practice record
pub const BEST_PRACTICE_TAG: &str = "best-practice";

/// A titled snippet, usually a resource manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YamlExample {
    pub title: String,
    #[serde(alias = "yaml")]
    pub body: String,
}

impl YamlExample {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A troubleshooting or best-practice record.
///
/// `tags` drive filtering inside a category; `resource_types` and
/// `issue_types` drive relevance ranking across categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issue_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solutions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<YamlExample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn intersects(values: &[String], filters: &[String]) -> bool {
    filters.iter().any(|f| values.contains(f))
}

impl KnowledgeEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_resource_types(mut self, types: &[&str]) -> Self {
        self.resource_types = owned(types);
        self
    }

    pub fn with_issue_types(mut self, types: &[&str]) -> Self {
        self.issue_types = owned(types);
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = owned(tags);
        self
    }

    pub fn with_symptoms(mut self, symptoms: &[&str]) -> Self {
        self.symptoms = owned(symptoms);
        self
    }

    pub fn with_causes(mut self, causes: &[&str]) -> Self {
        self.causes = owned(causes);
        self
    }

    pub fn with_solutions(mut self, solutions: &[&str]) -> Self {
        self.solutions = owned(solutions);
        self
    }

    pub fn with_commands(mut self, commands: &[&str]) -> Self {
        self.commands = owned(commands);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_example(mut self, example: YamlExample) -> Self {
        self.examples.push(example);
        self
    }

    pub fn with_references(mut self, references: &[&str]) -> Self {
        self.references = owned(references);
        self
    }

    /// Any tag equals any filter value
    pub fn tagged_with_any(&self, filters: &[String]) -> bool {
        intersects(&self.tags, filters)
    }

    pub fn covers_resource_types(&self, resource_types: &[String]) -> bool {
        intersects(&self.resource_types, resource_types)
    }

    pub fn covers_issue_types(&self, issue_types: &[String]) -> bool {
        intersects(&self.issue_types, issue_types)
    }

    pub fn is_best_practice(&self) -> bool {
        self.tags.iter().any(|t| t == BEST_PRACTICE_TAG)
    }
}

/// On-disk body of one category file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFile {
    #[serde(default)]
    pub entries: Vec<KnowledgeEntry>,
}
