//! Built-in knowledge for every known category.
//!
//! Materialized on first load when a category file is missing, so the store
//! is usable with zero configuration.

use super::entry::{KnowledgeEntry, YamlExample};

pub const POD_ISSUES: &str = "pod_issues";
pub const DEPLOYMENT_ISSUES: &str = "deployment_issues";
pub const NETWORKING_ISSUES: &str = "networking_issues";
pub const STORAGE_ISSUES: &str = "storage_issues";
pub const SECURITY_ISSUES: &str = "security_issues";
pub const AWS_ISSUES: &str = "aws_issues";
pub const GCP_ISSUES: &str = "gcp_issues";
pub const AZURE_ISSUES: &str = "azure_issues";
pub const BEST_PRACTICES: &str = "best_practices";

pub const KNOWN_CATEGORIES: &[&str] = &[
    POD_ISSUES,
    DEPLOYMENT_ISSUES,
    NETWORKING_ISSUES,
    STORAGE_ISSUES,
    SECURITY_ISSUES,
    AWS_ISSUES,
    GCP_ISSUES,
    AZURE_ISSUES,
    BEST_PRACTICES,
];

/// Category holding issues for a cloud provider
pub fn provider_category(provider: &str) -> String {
    format!("{}_issues", provider)
}

/// Built-in entries for a known category, `None` for anything else
pub fn default_entries(category: &str) -> Option<Vec<KnowledgeEntry>> {
    let entries = match category {
        POD_ISSUES => pod_issues(),
        DEPLOYMENT_ISSUES => deployment_issues(),
        NETWORKING_ISSUES => networking_issues(),
        STORAGE_ISSUES => storage_issues(),
        SECURITY_ISSUES => security_issues(),
        AWS_ISSUES => aws_issues(),
        GCP_ISSUES => gcp_issues(),
        AZURE_ISSUES => azure_issues(),
        BEST_PRACTICES => best_practices(),
        _ => return None,
    };
    Some(entries)
}

fn pod_issues() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new("CrashLoopBackOff")
            .with_description("Pod is crashing and Kubernetes is repeatedly trying to restart it")
            .with_resource_types(&["pod"])
            .with_issue_types(&["crash"])
            .with_tags(&["crash", "pod", "container", "restart"])
            .with_symptoms(&[
                "Pod status shows 'CrashLoopBackOff'",
                "Pod is repeatedly restarting",
                "Container exit code is non-zero",
            ])
            .with_causes(&[
                "Application error causing the container to exit",
                "Misconfiguration in the container command or arguments",
                "Resource constraints (OOM)",
                "Liveness probe failure",
            ])
            .with_solutions(&[
                "Check container logs: `kubectl logs <pod-name> -n <namespace>`",
                "Check events: `kubectl describe pod <pod-name> -n <namespace>`",
                "Verify container command and arguments",
                "Check resource limits and increase if necessary",
                "Verify liveness probe configuration",
            ])
            .with_commands(&[
                "kubectl logs <pod-name> -n <namespace>",
                "kubectl describe pod <pod-name> -n <namespace>",
                "kubectl get events -n <namespace> --sort-by='.lastTimestamp'",
            ])
            .with_references(&[
                "https://kubernetes.io/docs/tasks/debug-application-cluster/debug-application/#debugging-pods",
            ]),
        KnowledgeEntry::new("ImagePullBackOff")
            .with_description("Kubernetes cannot pull the container image")
            .with_resource_types(&["pod"])
            .with_issue_types(&["configuration"])
            .with_tags(&["image", "pod", "container", "registry"])
            .with_symptoms(&[
                "Pod status shows 'ImagePullBackOff' or 'ErrImagePull'",
                "Pod cannot start",
                "Events show image pull errors",
            ])
            .with_causes(&[
                "Image does not exist in the registry",
                "Image tag is incorrect",
                "Registry requires authentication",
                "Network issues preventing access to the registry",
            ])
            .with_solutions(&[
                "Verify image name and tag",
                "Check if the image exists in the registry",
                "Ensure registry credentials are correct",
                "Create or update image pull secrets",
                "Check network connectivity to the registry",
            ])
            .with_commands(&[
                "kubectl describe pod <pod-name> -n <namespace>",
                "kubectl create secret docker-registry <secret-name> --docker-server=<registry> --docker-username=<username> --docker-password=<password>",
                "kubectl patch serviceaccount <sa-name> -p '{\"imagePullSecrets\": [{\"name\": \"<secret-name>\"}]}'",
            ])
            .with_references(&[
                "https://kubernetes.io/docs/concepts/containers/images/#using-a-private-registry",
            ]),
        KnowledgeEntry::new("OOMKilled")
            .with_description("Container was killed for exceeding its memory limit")
            .with_resource_types(&["pod"])
            .with_issue_types(&["crash", "performance"])
            .with_tags(&["crash", "memory", "oom", "pod", "performance"])
            .with_symptoms(&[
                "Last state shows 'OOMKilled' with exit code 137",
                "Pod restarts under load",
            ])
            .with_causes(&[
                "Memory limit lower than the working set",
                "Memory leak in the application",
            ])
            .with_solutions(&[
                "Compare usage against limits with `kubectl top pod`",
                "Raise the memory limit or fix the leak",
            ])
            .with_commands(&[
                "kubectl describe pod <pod-name> -n <namespace>",
                "kubectl top pod <pod-name> -n <namespace>",
            ])
            .with_references(&[
                "https://kubernetes.io/docs/tasks/configure-pod-container/assign-memory-resource/",
            ]),
        KnowledgeEntry::new("Pod Stuck in Pending")
            .with_description("Pod cannot be scheduled onto any node")
            .with_resource_types(&["pod"])
            .with_issue_types(&["scaling"])
            .with_tags(&["pending", "scheduling", "pod", "scaling"])
            .with_symptoms(&[
                "Pod status stays 'Pending'",
                "Events show 'FailedScheduling'",
            ])
            .with_causes(&[
                "Insufficient CPU or memory on every node",
                "Node selector, affinity or taints exclude all nodes",
                "Unbound PersistentVolumeClaim",
            ])
            .with_solutions(&[
                "Read the scheduler message in the pod events",
                "Lower resource requests or add nodes",
                "Review node selectors, affinity rules and tolerations",
            ])
            .with_commands(&[
                "kubectl describe pod <pod-name> -n <namespace>",
                "kubectl describe nodes | grep -A 5 'Allocated resources'",
            ])
            .with_references(&[
                "https://kubernetes.io/docs/concepts/scheduling-eviction/kube-scheduler/",
            ]),
    ]
}

fn deployment_issues() -> Vec<KnowledgeEntry> {
    vec![KnowledgeEntry::new("Deployment Rollout Stuck")
        .with_description("Deployment rollout is stuck and not progressing")
        .with_resource_types(&["deployment"])
        .with_issue_types(&["configuration"])
        .with_tags(&["deployment", "rollout", "stuck", "update"])
        .with_symptoms(&[
            "Deployment shows 'progressing' but never completes",
            "New pods are not being created or are stuck in pending",
            "Old pods are not being terminated",
        ])
        .with_causes(&[
            "Insufficient cluster resources",
            "Pod scheduling issues",
            "Readiness probe failures",
            "Image pull issues",
            "PVC binding issues",
        ])
        .with_solutions(&[
            "Check deployment status: `kubectl rollout status deployment/<name>`",
            "Check pod events: `kubectl get events -n <namespace>`",
            "Check readiness probe configuration",
            "Verify resource requests and limits",
            "Check PVC status if applicable",
        ])
        .with_commands(&[
            "kubectl rollout status deployment/<name> -n <namespace>",
            "kubectl get events -n <namespace> --sort-by='.lastTimestamp'",
            "kubectl describe deployment <name> -n <namespace>",
            "kubectl rollout undo deployment/<name> -n <namespace>",
        ])
        .with_references(&[
            "https://kubernetes.io/docs/concepts/workloads/controllers/deployment/#deployment-status",
        ])]
}

fn networking_issues() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new("Service Not Accessible")
            .with_description("Kubernetes service is not accessible from other pods or externally")
            .with_resource_types(&["service"])
            .with_issue_types(&["network"])
            .with_tags(&["service", "network", "connectivity", "dns"])
            .with_symptoms(&[
                "Cannot connect to service from other pods",
                "External access to service fails",
                "DNS resolution for service fails",
            ])
            .with_causes(&[
                "Service selector doesn't match pod labels",
                "Pods are not running or not ready",
                "Network policy blocking traffic",
                "Service ports don't match container ports",
                "kube-proxy issues",
                "CNI plugin issues",
            ])
            .with_solutions(&[
                "Verify service selector matches pod labels",
                "Check if pods are running and ready",
                "Verify network policies",
                "Check service and pod port configurations",
                "Test connectivity with temporary debug pod",
            ])
            .with_commands(&[
                "kubectl get svc <service-name> -n <namespace> -o yaml",
                "kubectl get pods -l <selector> -n <namespace>",
                "kubectl get networkpolicies -n <namespace>",
                "kubectl run tmp-shell --rm -i --tty --image nicolaka/netshoot -- /bin/bash",
                "kubectl exec -it <pod-name> -n <namespace> -- nslookup <service-name>",
            ])
            .with_references(&[
                "https://kubernetes.io/docs/concepts/services-networking/service/#debugging-services",
            ]),
        KnowledgeEntry::new("Ingress Not Routing Traffic")
            .with_description("Requests through the ingress never reach the backend service")
            .with_resource_types(&["ingress", "service"])
            .with_issue_types(&["network"])
            .with_tags(&["ingress", "network", "routing", "tls"])
            .with_symptoms(&[
                "404 or 503 responses from the ingress controller",
                "Ingress has no address assigned",
            ])
            .with_causes(&[
                "No ingress controller matches the ingress class",
                "Backend service name or port is wrong",
                "Host or path rules do not match the request",
            ])
            .with_solutions(&[
                "Check the ingress class and controller pods",
                "Verify backend service name and port",
                "Inspect controller logs for the rejected request",
            ])
            .with_commands(&[
                "kubectl describe ingress <ingress-name> -n <namespace>",
                "kubectl get ingressclass",
                "kubectl logs -n ingress-nginx -l app.kubernetes.io/component=controller",
            ])
            .with_references(&["https://kubernetes.io/docs/concepts/services-networking/ingress/"]),
    ]
}

fn storage_issues() -> Vec<KnowledgeEntry> {
    vec![KnowledgeEntry::new("PVC Stuck in Pending")
        .with_description("Persistent Volume Claim is stuck in pending state")
        .with_resource_types(&["pvc", "pv"])
        .with_issue_types(&["storage"])
        .with_tags(&["pvc", "storage", "volume", "pending"])
        .with_symptoms(&[
            "PVC status shows 'Pending'",
            "Pod using the PVC is stuck in 'ContainerCreating'",
            "Events show volume provisioning issues",
        ])
        .with_causes(&[
            "No storage class defined",
            "Storage class provisioner is not running",
            "Storage backend issues",
            "Insufficient capacity in storage backend",
            "Access mode conflicts",
        ])
        .with_solutions(&[
            "Check PVC status and events",
            "Verify storage class exists and is default if not specified",
            "Check storage provisioner pods",
            "Verify access modes are compatible",
            "Check storage backend capacity and health",
        ])
        .with_commands(&[
            "kubectl get pvc -n <namespace>",
            "kubectl describe pvc <pvc-name> -n <namespace>",
            "kubectl get sc",
            "kubectl get pods -n kube-system | grep provisioner",
        ])
        .with_references(&[
            "https://kubernetes.io/docs/concepts/storage/persistent-volumes/#persistentvolumeclaims",
        ])]
}

fn security_issues() -> Vec<KnowledgeEntry> {
    vec![KnowledgeEntry::new("RBAC Permission Denied")
        .with_description("Kubernetes API requests are being denied due to RBAC permissions")
        .with_resource_types(&["pod", "deployment", "serviceaccount"])
        .with_issue_types(&["security"])
        .with_tags(&["rbac", "permissions", "access", "forbidden", "serviceaccount", "security"])
        .with_symptoms(&[
            "Error messages containing 'forbidden' or 'unauthorized'",
            "Service accounts cannot access required resources",
            "Pods cannot access the Kubernetes API",
        ])
        .with_causes(&[
            "Missing Role or ClusterRole",
            "Missing RoleBinding or ClusterRoleBinding",
            "ServiceAccount not properly configured",
            "Pod not using the correct ServiceAccount",
        ])
        .with_solutions(&[
            "Check the ServiceAccount used by the pod",
            "Verify Roles and RoleBindings",
            "Create appropriate RBAC resources",
            "Use 'kubectl auth can-i' to test permissions",
        ])
        .with_commands(&[
            "kubectl get pod <pod-name> -n <namespace> -o jsonpath='{.spec.serviceAccountName}'",
            "kubectl get roles -n <namespace>",
            "kubectl get rolebindings -n <namespace>",
            "kubectl auth can-i <verb> <resource> --as=system:serviceaccount:<namespace>:<serviceaccount>",
            "kubectl create role <role-name> --verb=<verbs> --resource=<resources> -n <namespace>",
            "kubectl create rolebinding <binding-name> --role=<role-name> --serviceaccount=<namespace>:<serviceaccount> -n <namespace>",
        ])
        .with_references(&["https://kubernetes.io/docs/reference/access-authn-authz/rbac/"])]
}

fn aws_issues() -> Vec<KnowledgeEntry> {
    vec![KnowledgeEntry::new("EKS Node Group Scaling Issues")
        .with_description("EKS node group is not scaling properly")
        .with_resource_types(&["node"])
        .with_issue_types(&["scaling"])
        .with_tags(&["aws", "eks", "node", "scaling", "autoscaling"])
        .with_symptoms(&[
            "Pods remain in pending state despite high resource utilization",
            "Node group is not scaling up or down as expected",
            "Cluster Autoscaler logs show errors",
        ])
        .with_causes(&[
            "IAM permissions issues for Cluster Autoscaler",
            "ASG min/max settings are too restrictive",
            "Resource requests not set properly",
            "Cluster Autoscaler configuration issues",
            "AWS service quotas reached",
        ])
        .with_solutions(&[
            "Verify IAM permissions for Cluster Autoscaler",
            "Check ASG min/max settings",
            "Ensure pods have appropriate resource requests",
            "Check Cluster Autoscaler logs",
            "Verify AWS service quotas",
        ])
        .with_commands(&[
            "kubectl logs -n kube-system -l app=cluster-autoscaler",
            "aws eks describe-nodegroup --cluster-name <cluster-name> --nodegroup-name <nodegroup-name>",
            "aws autoscaling describe-auto-scaling-groups --auto-scaling-group-names <asg-name>",
            "kubectl get pods -A -o wide | grep Pending",
        ])
        .with_references(&["https://docs.aws.amazon.com/eks/latest/userguide/cluster-autoscaler.html"])]
}

fn gcp_issues() -> Vec<KnowledgeEntry> {
    vec![KnowledgeEntry::new("GKE Node Pool Issues")
        .with_description("GKE node pool is experiencing issues")
        .with_resource_types(&["node"])
        .with_issue_types(&["scaling", "performance"])
        .with_tags(&["gcp", "gke", "node", "scaling", "autoscaling"])
        .with_symptoms(&[
            "Nodes showing 'NotReady' status",
            "Node pool not scaling as expected",
            "High resource utilization on nodes",
        ])
        .with_causes(&[
            "Insufficient quota in GCP project",
            "Autoscaling configuration issues",
            "Node image issues",
            "Network connectivity problems",
        ])
        .with_solutions(&[
            "Check node status and events",
            "Verify GCP quotas",
            "Check autoscaling configuration",
            "Verify network connectivity",
            "Check node logs in Cloud Logging",
        ])
        .with_commands(&[
            "kubectl get nodes",
            "kubectl describe node <node-name>",
            "gcloud container clusters describe <cluster-name> --zone <zone>",
            "gcloud container node-pools describe <pool-name> --cluster <cluster-name> --zone <zone>",
        ])
        .with_references(&["https://cloud.google.com/kubernetes-engine/docs/how-to/node-auto-scaling"])]
}

fn azure_issues() -> Vec<KnowledgeEntry> {
    vec![KnowledgeEntry::new("AKS Node Issues")
        .with_description("AKS nodes are experiencing problems")
        .with_resource_types(&["node"])
        .with_issue_types(&["performance", "scaling"])
        .with_tags(&["azure", "aks", "node", "scaling"])
        .with_symptoms(&[
            "Nodes showing 'NotReady' status",
            "Node pool not scaling as expected",
            "Pods stuck in pending state",
        ])
        .with_causes(&[
            "Azure subscription quota limits",
            "VMSS issues",
            "Network security group blocking required traffic",
            "Azure CNI IP address exhaustion",
        ])
        .with_solutions(&[
            "Check node status and events",
            "Verify Azure quotas",
            "Check VMSS status",
            "Verify network security groups",
            "Check for IP address exhaustion with Azure CNI",
        ])
        .with_commands(&[
            "kubectl get nodes",
            "kubectl describe node <node-name>",
            "az aks show -g <resource-group> -n <cluster-name>",
            "az aks nodepool list -g <resource-group> --cluster-name <cluster-name>",
        ])
        .with_references(&["https://docs.microsoft.com/en-us/azure/aks/troubleshooting"])]
}

const RESOURCES_EXAMPLE: &str = "resources:
  requests:
    memory: \"128Mi\"
    cpu: \"100m\"
  limits:
    memory: \"256Mi\"
    cpu: \"200m\"
";

const PDB_EXAMPLE: &str = "apiVersion: policy/v1
kind: PodDisruptionBudget
metadata:
  name: app-pdb
spec:
  minAvailable: 2
  selector:
    matchLabels:
      app: my-app
";

fn best_practices() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new("Resource Requests and Limits")
            .with_description("Best practices for setting resource requests and limits")
            .with_resource_types(&["pod", "deployment", "statefulset", "daemonset"])
            .with_tags(&["best-practice", "resources", "performance", "stability"])
            .with_content(
                "Always set resource requests and limits for containers to ensure proper scheduling \
                 and prevent resource contention. Start with monitoring actual usage and then set \
                 requests at P90 and limits higher based on application behavior. For critical \
                 applications, set CPU requests equal to limits to prevent CPU throttling, but keep \
                 memory limits higher than requests to account for spikes.",
            )
            .with_example(YamlExample::new("Example resource configuration", RESOURCES_EXAMPLE))
            .with_references(&[
                "https://kubernetes.io/docs/concepts/configuration/manage-resources-containers/",
            ]),
        KnowledgeEntry::new("Pod Disruption Budgets")
            .with_description("Using PDBs to ensure application availability during disruptions")
            .with_resource_types(&["deployment", "statefulset"])
            .with_tags(&["best-practice", "availability", "disruption", "maintenance"])
            .with_content(
                "Use Pod Disruption Budgets (PDBs) to ensure that a minimum number of pods remain \
                 available during voluntary disruptions like node drains or cluster upgrades. This is \
                 especially important for stateful applications and critical services.",
            )
            .with_example(YamlExample::new("Example PDB configuration", PDB_EXAMPLE))
            .with_references(&["https://kubernetes.io/docs/tasks/run-application/configure-pdb/"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_category_has_defaults() {
        for category in KNOWN_CATEGORIES {
            let entries = default_entries(category).unwrap();
            assert!(!entries.is_empty(), "{} has no defaults", category);
            assert!(entries.iter().all(|e| !e.title.is_empty()));
        }
        assert!(default_entries("custom_issues").is_none());
    }

    #[test]
    fn test_provider_categories_are_known() {
        for provider in ["aws", "gcp", "azure"] {
            assert!(KNOWN_CATEGORIES.contains(&provider_category(provider).as_str()));
        }
    }

    #[test]
    fn test_best_practices_are_tagged() {
        let entries = default_entries(BEST_PRACTICES).unwrap();
        assert!(entries.iter().all(|e| e.is_best_practice()));
        assert!(entries.iter().all(|e| !e.examples.is_empty()));
    }
}
