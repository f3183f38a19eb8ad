//! Diagnostic command synthesis and canned manifests.
//!
//! Commands are built from fixed templates with `{slot}` markers. A value
//! the query does not resolve becomes an angle-bracket placeholder such as
//! `<pod-name>`, never an empty token.

use crate::ambient::AmbientContext;
use crate::knowledge::YamlExample;
use crate::query::{Action, StructuredQuery};
use crate::DEFAULT_NAMESPACE;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A command paired with what it is for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSuggestion {
    pub command: String,
    pub description: String,
}

impl CommandSuggestion {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

// kubectl
pub const KUBECTL_GET: &str = "kubectl get {resource_type} {resource_name} -n {namespace} {output_format}";
pub const KUBECTL_DESCRIBE: &str = "kubectl describe {resource_type} {resource_name} -n {namespace}";
pub const KUBECTL_LOGS: &str = "kubectl logs {pod_name} {container} -n {namespace} {tail} {follow}";
pub const KUBECTL_TOP: &str = "kubectl top {resource_type} {resource_name} -n {namespace}";
pub const KUBECTL_EVENTS: &str = "kubectl get events -n {namespace} --sort-by='.lastTimestamp' {field_selector}";
pub const KUBECTL_PODS_BY_STATUS: &str = "kubectl get pods -n {namespace} --sort-by='.status.phase'";
pub const KUBECTL_EXPLAIN: &str = "kubectl explain {field}";
pub const NETSHOOT_SHELL: &str = "kubectl run tmp-shell --rm -i --tty --image nicolaka/netshoot -- /bin/bash";
pub const NETSHOOT_CURL: &str =
    "kubectl run tmp-shell --rm -i --tty --image nicolaka/netshoot -- curl {service}.{namespace}.svc.cluster.local";

// AWS
pub const EKS_DESCRIBE_CLUSTER: &str = "aws eks describe-cluster --name {cluster_name}";
pub const EKS_DESCRIBE_NODEGROUP: &str =
    "aws eks describe-nodegroup --cluster-name {cluster_name} --nodegroup-name {nodegroup_name}";

// GCP
pub const GKE_DESCRIBE_CLUSTER: &str =
    "gcloud container clusters describe {cluster_name} --zone {zone} --project {project_id}";
pub const GKE_DESCRIBE_NODEPOOL: &str =
    "gcloud container node-pools describe {nodepool_name} --cluster {cluster_name} --zone {zone} --project {project_id}";

// Azure
pub const AKS_SHOW: &str = "az aks show --resource-group {resource_group} --name {cluster_name}";
pub const AKS_NODEPOOL_SHOW: &str =
    "az aks nodepool show --resource-group {resource_group} --cluster-name {cluster_name} --name {nodepool_name}";

static SLOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// Substitute `{key}` slots in one pass over the template. Inserted values
/// are never rescanned, and a token left empty by its slot is dropped.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let lookup = |key: &str| values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
    template
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(|token| {
            SLOT.replace_all(token, |caps: &Captures| {
                lookup(&caps[1]).map_or_else(|| caps[0].to_string(), str::to_string)
            })
        })
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => format!("<{}>", placeholder),
    }
}

/// "pod" -> "pods", "ingress" stays as is
fn plural(resource_type: &str) -> String {
    if resource_type.ends_with('s') {
        resource_type.to_string()
    } else {
        format!("{}s", resource_type)
    }
}

/// Values resolved once per query
struct Resolved<'a> {
    name: &'a str,
    resource_type: &'a str,
    namespace: &'a str,
}

impl<'a> Resolved<'a> {
    fn new(query: &'a StructuredQuery, ambient: &'a AmbientContext) -> Self {
        Self {
            name: query.first_resource_name().unwrap_or(""),
            resource_type: query.first_resource_type().unwrap_or("pod"),
            namespace: query
                .entities
                .namespace
                .as_deref()
                .or(ambient.current_namespace.as_deref())
                .unwrap_or(DEFAULT_NAMESPACE),
        }
    }

    fn name_or(&self, placeholder: &str) -> String {
        or_placeholder(Some(self.name), placeholder)
    }
}

/// Diagnostic commands for a query. Pure; unresolved values become placeholders.
pub fn synthesize(query: &StructuredQuery, ambient: &AmbientContext) -> Vec<CommandSuggestion> {
    let r = Resolved::new(query, ambient);
    let mut commands = match query.action() {
        Some(Action::Troubleshoot) => troubleshoot(query, &r),
        Some(Action::List) => list(&r),
        Some(Action::Explain) => explain(&r),
        _ => Vec::new(),
    };
    commands.extend(cloud_commands(query, ambient, &r));
    commands
}

fn troubleshoot(query: &StructuredQuery, r: &Resolved) -> Vec<CommandSuggestion> {
    let mut commands = Vec::new();
    let issues = &query.entities.issue_type;

    if issues.is_empty() || query.has_issue("crash") {
        if r.resource_type == "pod" {
            commands.push(CommandSuggestion::new(
                fill_template(
                    KUBECTL_LOGS,
                    &[
                        ("pod_name", &r.name_or("pod-name")),
                        ("container", ""),
                        ("namespace", r.namespace),
                        ("tail", "--tail=100"),
                        ("follow", ""),
                    ],
                ),
                "View logs for the pod to identify errors",
            ));
        }

        commands.push(CommandSuggestion::new(
            fill_template(
                KUBECTL_DESCRIBE,
                &[
                    ("resource_type", r.resource_type),
                    ("resource_name", &r.name_or(&format!("{}-name", r.resource_type))),
                    ("namespace", r.namespace),
                ],
            ),
            format!("Get detailed information about the {} including events", r.resource_type),
        ));

        let field_selector = if r.name.is_empty() {
            String::new()
        } else {
            format!("--field-selector involvedObject.name={}", r.name)
        };
        commands.push(CommandSuggestion::new(
            fill_template(
                KUBECTL_EVENTS,
                &[("namespace", r.namespace), ("field_selector", &field_selector)],
            ),
            "View recent events to identify issues",
        ));
    }

    if query.has_issue("network") {
        commands.push(CommandSuggestion::new(
            NETSHOOT_SHELL,
            "Start a temporary debugging pod with network tools",
        ));
        if r.resource_type == "service" {
            let service = r.name_or("service-name");
            commands.push(CommandSuggestion::new(
                fill_template(NETSHOOT_CURL, &[("service", &service), ("namespace", r.namespace)]),
                format!("Test connectivity to the service {}", service),
            ));
        }
    }

    if query.has_issue("performance") {
        let top_type = match r.resource_type {
            "pod" | "node" => r.resource_type,
            _ => "pod",
        };
        commands.push(CommandSuggestion::new(
            fill_template(
                KUBECTL_TOP,
                &[
                    ("resource_type", top_type),
                    ("resource_name", r.name),
                    ("namespace", r.namespace),
                ],
            ),
            "Check resource usage",
        ));
    }

    commands
}

fn list(r: &Resolved) -> Vec<CommandSuggestion> {
    let plural = plural(r.resource_type);
    let mut commands = vec![CommandSuggestion::new(
        fill_template(
            KUBECTL_GET,
            &[
                ("resource_type", &plural),
                ("resource_name", ""),
                ("namespace", r.namespace),
                ("output_format", "-o wide"),
            ],
        ),
        format!("List all {} in the {} namespace", plural, r.namespace),
    )];

    if r.resource_type == "pod" {
        commands.push(CommandSuggestion::new(
            fill_template(KUBECTL_PODS_BY_STATUS, &[("namespace", r.namespace)]),
            "List pods sorted by status",
        ));
    }
    commands
}

fn explain(r: &Resolved) -> Vec<CommandSuggestion> {
    let mut commands = vec![
        CommandSuggestion::new(
            fill_template(KUBECTL_EXPLAIN, &[("field", r.resource_type)]),
            format!("Show documentation for {} resource", r.resource_type),
        ),
        CommandSuggestion::new(
            fill_template(KUBECTL_EXPLAIN, &[("field", &format!("{}.spec", r.resource_type))]),
            format!("Show documentation for {} spec", r.resource_type),
        ),
    ];

    if !r.name.is_empty() {
        commands.push(CommandSuggestion::new(
            fill_template(
                KUBECTL_GET,
                &[
                    ("resource_type", r.resource_type),
                    ("resource_name", r.name),
                    ("namespace", r.namespace),
                    ("output_format", "-o yaml"),
                ],
            ),
            format!("Get YAML definition of the {}", r.resource_type),
        ));
    }
    commands
}

/// Provider commands; only the first of aws, gcp, azure present contributes
fn cloud_commands(query: &StructuredQuery, ambient: &AmbientContext, r: &Resolved) -> Vec<CommandSuggestion> {
    let cluster_name = or_placeholder(ambient.cluster_name.as_deref(), "cluster-name");
    let is_node = r.resource_type == "node";
    let mut commands = Vec::new();

    if query.has_cloud("aws") {
        if is_node {
            commands.push(CommandSuggestion::new(
                fill_template(
                    EKS_DESCRIBE_NODEGROUP,
                    &[
                        ("cluster_name", &cluster_name),
                        ("nodegroup_name", &r.name_or("nodegroup-name")),
                    ],
                ),
                "Get details about the EKS node group",
            ));
        }
        commands.push(CommandSuggestion::new(
            fill_template(EKS_DESCRIBE_CLUSTER, &[("cluster_name", &cluster_name)]),
            "Get details about the EKS cluster",
        ));
    } else if query.has_cloud("gcp") {
        let zone = or_placeholder(ambient.zone.as_deref(), "zone");
        let project_id = or_placeholder(ambient.project_id.as_deref(), "project-id");
        if is_node {
            commands.push(CommandSuggestion::new(
                fill_template(
                    GKE_DESCRIBE_NODEPOOL,
                    &[
                        ("nodepool_name", &r.name_or("nodepool-name")),
                        ("cluster_name", &cluster_name),
                        ("zone", &zone),
                        ("project_id", &project_id),
                    ],
                ),
                "Get details about the GKE node pool",
            ));
        }
        commands.push(CommandSuggestion::new(
            fill_template(
                GKE_DESCRIBE_CLUSTER,
                &[
                    ("cluster_name", &cluster_name),
                    ("zone", &zone),
                    ("project_id", &project_id),
                ],
            ),
            "Get details about the GKE cluster",
        ));
    } else if query.has_cloud("azure") {
        let resource_group = or_placeholder(ambient.resource_group.as_deref(), "resource-group");
        if is_node {
            commands.push(CommandSuggestion::new(
                fill_template(
                    AKS_NODEPOOL_SHOW,
                    &[
                        ("resource_group", &resource_group),
                        ("cluster_name", &cluster_name),
                        ("nodepool_name", &r.name_or("nodepool-name")),
                    ],
                ),
                "Get details about the AKS node pool",
            ));
        }
        commands.push(CommandSuggestion::new(
            fill_template(
                AKS_SHOW,
                &[("resource_group", &resource_group), ("cluster_name", &cluster_name)],
            ),
            "Get details about the AKS cluster",
        ));
    }

    commands
}

const POD_MANIFEST: &str = r#"apiVersion: v1
kind: Pod
metadata:
  name: example-pod
  labels:
    app: example
spec:
  containers:
  - name: nginx
    image: nginx:1.19
    ports:
    - containerPort: 80
    resources:
      requests:
        memory: "64Mi"
        cpu: "100m"
      limits:
        memory: "128Mi"
        cpu: "200m"
"#;

const DEPLOYMENT_MANIFEST: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: example-deployment
  labels:
    app: example
spec:
  replicas: 3
  selector:
    matchLabels:
      app: example
  template:
    metadata:
      labels:
        app: example
    spec:
      containers:
      - name: nginx
        image: nginx:1.19
        ports:
        - containerPort: 80
        resources:
          requests:
            memory: "64Mi"
            cpu: "100m"
          limits:
            memory: "128Mi"
            cpu: "200m"
"#;

const SERVICE_MANIFEST: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: example-service
spec:
  selector:
    app: example
  ports:
  - port: 80
    targetPort: 80
  type: ClusterIP
"#;

const INGRESS_MANIFEST: &str = r#"apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: example-ingress
  annotations:
    nginx.ingress.kubernetes.io/rewrite-target: /
spec:
  rules:
  - host: example.com
    http:
      paths:
      - path: /
        pathType: Prefix
        backend:
          service:
            name: example-service
            port:
              number: 80
"#;

/// Minimal manifest for a resource type, empty for types without one
pub fn examples_for(resource_type: &str) -> Vec<YamlExample> {
    let example = match resource_type {
        "pod" => YamlExample::new("Basic Pod", POD_MANIFEST),
        "deployment" => YamlExample::new("Basic Deployment", DEPLOYMENT_MANIFEST),
        "service" => YamlExample::new("Basic Service", SERVICE_MANIFEST),
        "ingress" => YamlExample::new("Basic Ingress", INGRESS_MANIFEST),
        _ => return Vec::new(),
    };
    vec![example]
}
