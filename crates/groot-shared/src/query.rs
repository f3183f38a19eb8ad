//! Structured interpretation of an operator query.
//!
//! Produced fresh for every query by the interpreter and consumed read-only
//! by retrieval, command synthesis and follow-up generation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse operation the user wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Troubleshoot,
    Explain,
    List,
    Create,
    Delete,
    Update,
    Compare,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Troubleshoot => "troubleshoot",
            Self::Explain => "explain",
            Self::List => "list",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::Compare => "compare",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected intent. `action` is `None` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Option<Action>,
    /// Confidence in [0, 1]; 0.0 when the action was inferred or absent
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeUnit {
    /// Parse a unit word, singular or plural
    pub fn parse(word: &str) -> Option<Self> {
        match word.strip_suffix('s').unwrap_or(word) {
            "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// Time window such as "in the last 2 hours"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub value: u32,
    pub unit: TimeUnit,
}

/// Values extracted from the query text.
///
/// `resource_type`, `cloud_provider` and `issue_type` hold no duplicates and
/// keep detection order; the first resource type is the downstream default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub resource_type: Vec<String>,
    pub resource_name: Vec<String>,
    pub namespace: Option<String>,
    pub cloud_provider: Vec<String>,
    pub issue_type: Vec<String>,
    pub time_period: Option<TimePeriod>,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    pub is_question: bool,
    pub requires_explanation: bool,
    pub requires_code: bool,
    pub requires_comparison: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredQuery {
    pub original_query: String,
    pub intent: Intent,
    pub entities: Entities,
    pub context: QueryContext,
}

impl StructuredQuery {
    pub fn action(&self) -> Option<Action> {
        self.intent.action
    }

    pub fn has_resource_type(&self, resource_type: &str) -> bool {
        self.entities.resource_type.iter().any(|r| r == resource_type)
    }

    pub fn has_issue(&self, issue: &str) -> bool {
        self.entities.issue_type.iter().any(|i| i == issue)
    }

    pub fn has_cloud(&self, provider: &str) -> bool {
        self.entities.cloud_provider.iter().any(|p| p == provider)
    }

    /// First detected resource type, if any
    pub fn first_resource_type(&self) -> Option<&str> {
        self.entities.resource_type.first().map(String::as_str)
    }

    /// First extracted resource name, if any
    pub fn first_resource_name(&self) -> Option<&str> {
        self.entities.resource_name.first().map(String::as_str)
    }

    /// No action, or nothing to act on
    pub fn is_underspecified(&self) -> bool {
        self.intent.action.is_none() || self.entities.resource_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_unit_parse_strips_plural() {
        assert_eq!(TimeUnit::parse("hours"), Some(TimeUnit::Hour));
        assert_eq!(TimeUnit::parse("minute"), Some(TimeUnit::Minute));
        assert_eq!(TimeUnit::parse("months"), Some(TimeUnit::Month));
        assert_eq!(TimeUnit::parse("years"), None);
    }

    #[test]
    fn test_action_serializes_snake_case() {
        let json = serde_json::to_string(&Action::Troubleshoot).unwrap();
        assert_eq!(json, "\"troubleshoot\"");

        let intent = Intent::default();
        let json = serde_json::to_value(&intent).unwrap();
        assert!(json["action"].is_null());
    }

    #[test]
    fn test_underspecified() {
        let mut q = StructuredQuery::default();
        assert!(q.is_underspecified());

        q.intent.action = Some(Action::List);
        assert!(q.is_underspecified());

        q.entities.resource_type.push("pod".to_string());
        assert!(!q.is_underspecified());
    }
}
