//! Query interpreter: free text to StructuredQuery.
//!
//! Pattern tables are ordered `(key, phrases)` slices scanned in declaration
//! order. The first matching key wins where a single answer is needed, and
//! detection order is preserved where several are collected. All matching is
//! plain substring matching on the lower-cased text.
//!
//! Extraction order is fixed. Later steps only override earlier ones in one
//! place: a comparison phrase always forces the `compare` action.

use crate::query::{Action, StructuredQuery, TimePeriod, TimeUnit};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Intent triggers, checked in this order
pub const ACTION_PATTERNS: &[(Action, &[&str])] = &[
    (Action::Troubleshoot, &["fix", "solve", "troubleshoot", "debug", "diagnose", "resolve"]),
    (Action::Explain, &["explain", "describe", "tell me about", "what is", "how does", "why is"]),
    (Action::List, &["list", "show", "get", "find", "display"]),
    (Action::Create, &["create", "make", "deploy", "launch", "start"]),
    (Action::Delete, &["delete", "remove", "destroy", "take down"]),
    (Action::Update, &["update", "change", "modify", "edit", "patch"]),
    (Action::Compare, &["compare", "diff", "difference", "versus", "vs"]),
];

pub const RESOURCE_PATTERNS: &[(&str, &[&str])] = &[
    ("pod", &["pod", "pods", "container"]),
    ("deployment", &["deployment", "deploy", "deployments"]),
    ("service", &["service", "svc", "services"]),
    ("ingress", &["ingress", "ing", "ingresses"]),
    ("configmap", &["configmap", "cm", "config map", "configmaps"]),
    ("secret", &["secret", "secrets"]),
    ("node", &["node", "nodes", "machine", "instance"]),
    ("namespace", &["namespace", "ns", "namespaces"]),
    ("pv", &["persistent volume", "pv", "volume"]),
    ("pvc", &["persistent volume claim", "pvc", "volume claim"]),
    ("statefulset", &["statefulset", "sts", "stateful set"]),
    ("daemonset", &["daemonset", "ds", "daemon set"]),
    ("job", &["job", "jobs", "batch job"]),
    ("cronjob", &["cronjob", "cron job", "scheduled job"]),
];

pub const CLOUD_PATTERNS: &[(&str, &[&str])] = &[
    ("aws", &["aws", "amazon", "ec2", "s3", "rds", "dynamodb", "lambda"]),
    ("gcp", &["gcp", "google cloud", "gke", "cloud storage", "bigquery"]),
    ("azure", &["azure", "aks", "microsoft", "blob storage"]),
];

pub const ISSUE_PATTERNS: &[(&str, &[&str])] = &[
    ("crash", &["crash", "crashing", "crashloopbackoff", "restarting", "failing"]),
    ("network", &["network", "connectivity", "connection", "cannot connect", "unreachable"]),
    ("performance", &["slow", "performance", "latency", "throughput", "cpu", "memory"]),
    ("storage", &["storage", "volume", "disk", "persistent volume", "pv", "pvc"]),
    ("security", &["security", "permission", "rbac", "access", "unauthorized", "forbidden"]),
    ("scaling", &["scale", "scaling", "autoscale", "hpa", "vpa", "resize"]),
    ("configuration", &["config", "configuration", "misconfigured", "setting", "parameter"]),
];

const QUESTION_WORDS: &[&str] = &["what", "why", "how", "when", "where", "which", "who"];
const EXPLAIN_WORDS: &[&str] = &["what", "why", "how"];
const LIST_WORDS: &[&str] = &["where", "which", "list", "show", "find"];

const CODE_PHRASES: &[&str] = &["command", "kubectl", "code", "yaml", "script", "how to", "steps to"];
const COMPARISON_PHRASES: &[&str] = &["compare", "difference", "versus", "vs", "better", "preferred"];

/// Confidence assigned to a table-matched action
pub const TABLE_MATCH_CONFIDENCE: f32 = 0.8;

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).unwrap());

static NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:in|from|namespace|ns) ([a-zA-Z0-9-]+)").unwrap());

static TIME_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:in the last|past|previous|recent) ([0-9]+) (minutes|minute|hours|hour|days|day|weeks|week|months|month)",
    )
    .unwrap()
});

static COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:top|first|last) ([0-9]+)").unwrap());

/// "<phrase> <token>" matchers for positional name extraction, per resource type
static NAME_AFTER_PHRASE: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    RESOURCE_PATTERNS
        .iter()
        .map(|(resource, phrases)| {
            let regexes = phrases
                .iter()
                .filter_map(|p| Regex::new(&format!("{} ([a-zA-Z0-9-]+)", regex::escape(p))).ok())
                .collect();
            (*resource, regexes)
        })
        .collect()
});

/// Interpret a raw query. Never fails; unmatched input yields a null action
/// and empty entities.
pub fn interpret(text: &str) -> StructuredQuery {
    let lower = text.to_lowercase();
    let tokens = tokenize(&lower);

    let mut result = StructuredQuery {
        original_query: text.to_string(),
        ..Default::default()
    };

    result.context.is_question =
        text.trim_end().ends_with('?') || has_any_token(&tokens, QUESTION_WORDS);

    // Intent from the trigger table
    if let Some(action) = first_match(&lower, ACTION_PATTERNS) {
        result.intent.action = Some(action);
        result.intent.confidence = TABLE_MATCH_CONFIDENCE;
    }

    // Inferred intent
    if result.intent.action.is_none() {
        if result.context.is_question {
            if has_any_token(&tokens, EXPLAIN_WORDS) {
                result.intent.action = Some(Action::Explain);
                result.context.requires_explanation = true;
            } else if has_any_token(&tokens, LIST_WORDS) {
                result.intent.action = Some(Action::List);
            }
        }
        if result.intent.action.is_none() {
            if let Some(issue) = first_match(&lower, ISSUE_PATTERNS) {
                result.intent.action = Some(Action::Troubleshoot);
                result.entities.issue_type.push(issue.to_string());
            }
        }
    }

    result.entities.resource_type = all_matches(&lower, RESOURCE_PATTERNS);
    result.entities.cloud_provider = all_matches(&lower, CLOUD_PATTERNS);
    if result.entities.issue_type.is_empty() {
        result.entities.issue_type = all_matches(&lower, ISSUE_PATTERNS);
    }

    result.entities.resource_name = extract_resource_names(text, &lower, &result.entities.resource_type);

    result.entities.namespace = NAMESPACE
        .captures(&lower)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    result.context.requires_code = CODE_PHRASES.iter().any(|p| lower.contains(p));

    if COMPARISON_PHRASES.iter().any(|p| lower.contains(p)) {
        result.context.requires_comparison = true;
        result.intent.action = Some(Action::Compare);
    }

    result.entities.time_period = TIME_PERIOD.captures(&lower).and_then(|c| {
        let value = c.get(1)?.as_str().parse().ok()?;
        let unit = TimeUnit::parse(c.get(2)?.as_str())?;
        Some(TimePeriod { value, unit })
    });

    result.entities.count = COUNT
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    debug!(
        action = ?result.intent.action,
        resource_type = ?result.entities.resource_type,
        issue_type = ?result.entities.issue_type,
        namespace = ?result.entities.namespace,
        "interpreted query"
    );

    result
}

/// Split lower-cased text into word tokens
fn tokenize(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect()
}

fn has_any_token(tokens: &[&str], words: &[&str]) -> bool {
    tokens.iter().any(|t| words.contains(t))
}

/// First key whose phrases hit the text, in table order
fn first_match<K: Copy>(lower: &str, table: &[(K, &[&str])]) -> Option<K> {
    table
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| lower.contains(p)))
        .map(|(key, _)| *key)
}

/// Every key whose phrases hit the text, in table order, without duplicates
fn all_matches(lower: &str, table: &[(&str, &[&str])]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for (key, phrases) in table {
        if phrases.iter().any(|p| lower.contains(p)) && !found.iter().any(|f| f == key) {
            found.push(key.to_string());
        }
    }
    found
}

/// Quoted substrings win; otherwise take the token after a resource phrase
fn extract_resource_names(original: &str, lower: &str, resource_types: &[String]) -> Vec<String> {
    let quoted: Vec<String> = QUOTED
        .captures_iter(original)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string())
        .collect();
    if !quoted.is_empty() {
        return quoted;
    }

    let mut names = Vec::new();
    for resource_type in resource_types {
        let Some((_, regexes)) = NAME_AFTER_PHRASE.iter().find(|(r, _)| r == resource_type) else {
            continue;
        };
        for re in regexes {
            if let Some(m) = re.captures(lower).and_then(|c| c.get(1)) {
                names.push(m.as_str().to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TimeUnit;

    #[test]
    fn test_no_match_yields_empty_query() {
        let q = interpret("hello there");
        assert_eq!(q.intent.action, None);
        assert_eq!(q.intent.confidence, 0.0);
        assert!(q.entities.resource_type.is_empty());
        assert!(q.entities.resource_name.is_empty());
        assert!(q.entities.cloud_provider.is_empty());
        assert!(q.entities.issue_type.is_empty());
        assert_eq!(q.entities.namespace, None);
    }

    #[test]
    fn test_empty_input() {
        let q = interpret("");
        assert_eq!(q.intent.action, None);
        assert!(!q.context.is_question);
    }

    #[test]
    fn test_explain_question() {
        let q = interpret("what is a deployment?");
        assert_eq!(q.intent.action, Some(Action::Explain));
        assert_eq!(q.intent.confidence, TABLE_MATCH_CONFIDENCE);
        assert!(q.context.is_question);
        assert_eq!(q.entities.resource_type, vec!["deployment"]);
    }

    #[test]
    fn test_comparison_overrides_intent() {
        let q = interpret("compare deployment vs statefulset");
        assert_eq!(q.intent.action, Some(Action::Compare));
        assert!(q.context.requires_comparison);
        assert_eq!(q.entities.resource_type, vec!["deployment", "statefulset"]);

        // "show" hits the list table first, "better" still forces compare
        let q = interpret("show me which is better");
        assert_eq!(q.intent.action, Some(Action::Compare));
    }

    #[test]
    fn test_quoted_names_take_priority() {
        let q = interpret(r#"delete "my-pod" now"#);
        assert_eq!(q.intent.action, Some(Action::Delete));
        assert_eq!(q.entities.resource_name, vec!["my-pod"]);

        let q = interpret(r#"restart pod 'api-1' and pod "api-2""#);
        assert_eq!(q.entities.resource_name, vec!["api-1", "api-2"]);
    }

    #[test]
    fn test_quoted_names_keep_case() {
        let q = interpret(r#"describe "Web-Frontend""#);
        assert_eq!(q.entities.resource_name, vec!["Web-Frontend"]);
    }

    #[test]
    fn test_positional_name_extraction() {
        let q = interpret("fix secret dbpass");
        assert_eq!(q.entities.resource_type, vec!["secret"]);
        assert_eq!(q.entities.resource_name, vec!["dbpass"]);
    }

    #[test]
    fn test_inferred_troubleshoot_records_issue() {
        let q = interpret("pods crashing in staging namespace");
        assert_eq!(q.intent.action, Some(Action::Troubleshoot));
        assert_eq!(q.intent.confidence, 0.0);
        assert_eq!(q.entities.issue_type, vec!["crash"]);
        assert_eq!(q.entities.namespace.as_deref(), Some("staging"));
        assert_eq!(q.first_resource_type(), Some("pod"));
    }

    #[test]
    fn test_inferred_explain_sets_explanation_flag() {
        let q = interpret("why would a pod be evicted");
        assert_eq!(q.intent.action, Some(Action::Explain));
        assert!(q.context.requires_explanation);
    }

    #[test]
    fn test_inferred_list_from_where() {
        let q = interpret("where are the nodes?");
        assert_eq!(q.intent.action, Some(Action::List));
        assert_eq!(q.entities.resource_type, vec!["node"]);
    }

    #[test]
    fn test_is_question_by_token_or_mark() {
        assert!(interpret("nodes are ready?").context.is_question);
        assert!(interpret("who owns this").context.is_question);
        assert!(!interpret("somewhat broken").context.is_question);
    }

    #[test]
    fn test_resource_types_deduplicated_in_table_order() {
        let q = interpret("service and pod and services");
        assert_eq!(q.entities.resource_type, vec!["pod", "service"]);
    }

    #[test]
    fn test_cloud_provider_order() {
        let q = interpret("moving from azure aks to gke and eks on aws");
        assert_eq!(q.entities.cloud_provider, vec!["aws", "gcp", "azure"]);
    }

    #[test]
    fn test_time_period_and_count() {
        let q = interpret("list top 5 pods restarting in the last 3 hours");
        assert_eq!(q.entities.count, Some(5));
        let period = q.entities.time_period.unwrap();
        assert_eq!(period.value, 3);
        assert_eq!(period.unit, TimeUnit::Hour);

        let q = interpret("errors past 1 week");
        assert_eq!(q.entities.time_period.unwrap().unit, TimeUnit::Week);
    }

    #[test]
    fn test_overflowing_numbers_are_dropped() {
        let q = interpret("show top 99999999999999999999 pods");
        assert_eq!(q.entities.count, None);
    }

    #[test]
    fn test_requires_code() {
        assert!(interpret("give me the kubectl command").context.requires_code);
        assert!(interpret("how to scale a deployment").context.requires_code);
        assert!(!interpret("pods are failing").context.requires_code);
    }

    #[test]
    fn test_action_table_tie_break_is_declaration_order() {
        // "debug" (troubleshoot) and "list" both present: troubleshoot is declared first
        let q = interpret("list and debug");
        assert_eq!(q.intent.action, Some(Action::Troubleshoot));
    }
}
