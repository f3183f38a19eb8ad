//! Clarifying questions for underspecified queries.

use crate::ambient::AmbientContext;
use crate::query::{Action, StructuredQuery};

/// At most this many questions are returned
pub const MAX_FOLLOWUPS: usize = 3;

pub const ASK_RESOURCES: &str = "Which specific resources are you having issues with?";
pub const ASK_NAMESPACE: &str = "Which namespace should I focus on?";
pub const ASK_PERFORMANCE: &str = "Are you seeing high CPU usage, memory usage, or slow response times?";
pub const ASK_NETWORK: &str = "Are you having issues with internal or external connectivity?";
pub const ASK_SECURITY: &str = "Are you seeing permission errors or authentication issues?";

/// Questions in generation order, truncated to `MAX_FOLLOWUPS`
pub fn followups(query: &StructuredQuery, ambient: &AmbientContext) -> Vec<String> {
    let entities = &query.entities;
    let no_name = entities.resource_name.is_empty();
    let mut questions = Vec::new();

    if query.action() == Some(Action::Troubleshoot) && entities.resource_type.is_empty() {
        questions.push(ASK_RESOURCES.to_string());
    }
    if let Some(resource_type) = query.first_resource_type() {
        if no_name {
            questions.push(format!("Which specific {} are you interested in?", resource_type));
        }
    }
    if entities.namespace.is_none() && ambient.has_multiple_namespaces() {
        questions.push(ASK_NAMESPACE.to_string());
    }
    if query.has_issue("performance") && no_name {
        questions.push(ASK_PERFORMANCE.to_string());
    }
    if query.has_issue("network") {
        questions.push(ASK_NETWORK.to_string());
    }
    if query.has_issue("security") {
        questions.push(ASK_SECURITY.to_string());
    }

    questions.truncate(MAX_FOLLOWUPS);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_namespaces() -> AmbientContext {
        AmbientContext::new().with_namespaces(vec!["default".into(), "staging".into()])
    }

    #[test]
    fn test_nothing_to_ask() {
        let mut q = StructuredQuery::default();
        q.entities.resource_type.push("pod".into());
        q.entities.resource_name.push("web-1".into());
        assert!(followups(&q, &two_namespaces().with_namespaces(vec![])).is_empty());
    }

    #[test]
    fn test_troubleshoot_without_resource() {
        let mut q = StructuredQuery::default();
        q.intent.action = Some(Action::Troubleshoot);
        q.entities.issue_type.push("network".into());
        let questions = followups(&q, &two_namespaces());
        assert_eq!(questions, vec![ASK_RESOURCES, ASK_NAMESPACE, ASK_NETWORK]);
    }

    #[test]
    fn test_truncated_in_generation_order() {
        let mut q = StructuredQuery::default();
        q.intent.action = Some(Action::Troubleshoot);
        q.entities.resource_type.push("service".into());
        q.entities.issue_type = vec!["performance".into(), "network".into(), "security".into()];
        let questions = followups(&q, &two_namespaces());
        assert_eq!(
            questions,
            vec![
                "Which specific service are you interested in?".to_string(),
                ASK_NAMESPACE.to_string(),
                ASK_PERFORMANCE.to_string(),
            ]
        );
    }

    #[test]
    fn test_resolved_namespace_suppresses_question() {
        let mut q = StructuredQuery::default();
        q.entities.namespace = Some("staging".into());
        assert!(!followups(&q, &two_namespaces()).contains(&ASK_NAMESPACE.to_string()));
    }

    #[test]
    fn test_known_name_silences_performance_question() {
        let mut q = StructuredQuery::default();
        q.intent.action = Some(Action::Troubleshoot);
        q.entities.resource_type.push("pod".into());
        q.entities.resource_name.push("web-1".into());
        q.entities.issue_type.push("performance".into());
        assert!(followups(&q, &AmbientContext::default()).is_empty());

        q.entities.resource_name.clear();
        assert_eq!(
            followups(&q, &AmbientContext::default()),
            vec!["Which specific pod are you interested in?".to_string(), ASK_PERFORMANCE.to_string()]
        );
    }

    #[test]
    fn test_empty_quoted_name_counts_as_named() {
        let mut q = StructuredQuery::default();
        q.entities.resource_type.push("deployment".into());
        q.entities.resource_name.push(String::new());
        assert!(followups(&q, &AmbientContext::default()).is_empty());
    }
}
