use eksinspect_model::{ClusterResource, NodegroupResource};
use serde::Serialize;

/// The oldest Kubernetes version that passes the version control.
const MIN_MAJOR_VERSION: u32 = 1;
const MIN_MINOR_VERSION: u32 = 15;

/// Control plane log types that must all be enabled.
const AUDIT_LOG_TYPES: &[&str] = &[
    "api",
    "audit",
    "authenticator",
    "controllerManager",
    "scheduler",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub(crate) enum Outcome {
    Passed,
    Failed,
    /// The resource could not be inspected so the control was not evaluated.
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Finding {
    pub(crate) control: &'static str,
    pub(crate) title: &'static str,
    pub(crate) resource: String,
    pub(crate) outcome: Outcome,
    pub(crate) detail: String,
}

impl Finding {
    fn new(control: &Control, resource: impl Into<String>, passed: bool, detail: String) -> Self {
        Self {
            control: control.id,
            title: control.title,
            resource: resource.into(),
            outcome: if passed {
                Outcome::Passed
            } else {
                Outcome::Failed
            },
            detail,
        }
    }

    pub(crate) fn error(control: &Control, resource: impl Into<String>, detail: String) -> Self {
        Self {
            control: control.id,
            title: control.title,
            resource: resource.into(),
            outcome: Outcome::Error,
            detail,
        }
    }
}

pub(crate) struct Control {
    pub(crate) id: &'static str,
    pub(crate) title: &'static str,
}

pub(crate) const VERSION: Control = Control {
    id: "eks-1",
    title: "Cluster runs a supported Kubernetes version",
};
pub(crate) const AUDIT_LOGS: Control = Control {
    id: "eks-2",
    title: "Control plane audit logging is enabled",
};
pub(crate) const NOT_PUBLIC: Control = Control {
    id: "eks-3",
    title: "Cluster endpoint is not publicly accessible",
};
pub(crate) const SECRETS_ENCRYPTION: Control = Control {
    id: "eks-4",
    title: "Kubernetes secrets are encrypted",
};
pub(crate) const REMOTE_ACCESS: Control = Control {
    id: "eks-6",
    title: "Nodegroup remote access is restricted to source security groups",
};

/// The controls evaluated against the cluster itself.
pub(crate) const CLUSTER_CONTROLS: &[&Control] =
    &[&VERSION, &AUDIT_LOGS, &NOT_PUBLIC, &SECRETS_ENCRYPTION];

pub(crate) fn cluster_findings(cluster: &ClusterResource) -> Vec<Finding> {
    vec![
        version(cluster),
        audit_logs(cluster),
        not_public(cluster),
        secrets_encryption(cluster),
    ]
}

pub(crate) fn version(cluster: &ClusterResource) -> Finding {
    let parsed = cluster
        .major_version()
        .parse::<u32>()
        .ok()
        .zip(cluster.minor_version().parse::<u32>().ok());
    match parsed {
        Some((major, minor)) => Finding::new(
            &VERSION,
            cluster.full_name(),
            major > MIN_MAJOR_VERSION
                || (major == MIN_MAJOR_VERSION && minor >= MIN_MINOR_VERSION),
            format!(
                "version {} (minimum {}.{})",
                cluster.version(),
                MIN_MAJOR_VERSION,
                MIN_MINOR_VERSION
            ),
        ),
        None => Finding::new(
            &VERSION,
            cluster.full_name(),
            false,
            format!("version '{}' is not numeric", cluster.version()),
        ),
    }
}

pub(crate) fn audit_logs(cluster: &ClusterResource) -> Finding {
    let enabled = cluster.logs_enabled();
    let missing: Vec<&str> = AUDIT_LOG_TYPES
        .iter()
        .filter(|log_type| !enabled.iter().any(|enabled| enabled == *log_type))
        .copied()
        .collect();
    let detail = if missing.is_empty() {
        format!("enabled: {}", enabled.join(", "))
    } else {
        format!("not enabled: {}", missing.join(", "))
    };
    Finding::new(&AUDIT_LOGS, cluster.full_name(), missing.is_empty(), detail)
}

pub(crate) fn not_public(cluster: &ClusterResource) -> Finding {
    let public = cluster.is_public();
    let detail = format!(
        "public access {}, private access {}, allowed cidrs [{}]",
        cluster.endpoint_public_access(),
        cluster.endpoint_private_access(),
        cluster.public_access_cidrs().join(", ")
    );
    Finding::new(&NOT_PUBLIC, cluster.full_name(), !public, detail)
}

pub(crate) fn secrets_encryption(cluster: &ClusterResource) -> Finding {
    let encrypted = cluster.has_encryption_enabled();
    let detail = if encrypted {
        "secrets are encrypted with a KMS key".to_string()
    } else {
        "no encryption config covers secrets".to_string()
    };
    Finding::new(&SECRETS_ENCRYPTION, cluster.full_name(), encrypted, detail)
}

/// A nodegroup without remote access cannot be reached over ssh and passes. With remote access,
/// it has to be limited to source security groups.
pub(crate) fn remote_access(nodegroup: &NodegroupResource) -> Finding {
    let resource = format!("{}/{}", nodegroup.cluster_name(), nodegroup.name());
    if !nodegroup.remote_access_configured() {
        return Finding::new(
            &REMOTE_ACCESS,
            resource,
            true,
            "remote access is not configured".to_string(),
        );
    }
    let groups = nodegroup.remote_access_source_security_groups();
    let detail = if groups.is_empty() {
        "no source security groups".to_string()
    } else {
        format!("source security groups: {}", groups.join(", "))
    };
    Finding::new(
        &REMOTE_ACCESS,
        resource,
        nodegroup.has_remote_access_source_security_groups(),
        detail,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use eksinspect_model::description::{ClusterDescription, NodegroupDescription};
    use serde_json::json;

    fn cluster(value: serde_json::Value) -> ClusterResource {
        let description: ClusterDescription = serde_json::from_value(value).unwrap();
        ClusterResource::from_description(description, Some("us-west-2")).unwrap()
    }

    fn compliant() -> serde_json::Value {
        json!({
            "name": "prod",
            "arn": "arn:aws:eks:us-west-2:111122223333:cluster/prod",
            "version": "1.24",
            "status": "ACTIVE",
            "resourcesVpcConfig": {
                "endpointPublicAccess": false,
                "endpointPrivateAccess": true,
                "publicAccessCidrs": ["0.0.0.0/0"]
            },
            "logging": {
                "clusterLogging": [{
                    "types": ["api", "audit", "authenticator", "controllerManager", "scheduler"],
                    "enabled": true
                }]
            },
            "encryptionConfig": [{
                "resources": ["secrets"],
                "provider": { "keyArn": "arn:aws:kms:us-west-2:111122223333:key/abc" }
            }]
        })
    }

    #[test]
    fn compliant_cluster_passes() {
        let findings = cluster_findings(&cluster(compliant()));
        assert_eq!(findings.len(), CLUSTER_CONTROLS.len());
        for finding in findings {
            assert_eq!(finding.outcome, Outcome::Passed, "{:?}", finding);
            assert_eq!(finding.resource, "us-west-2/prod");
        }
    }

    #[test]
    fn version_compares_numerically() {
        let mut value = compliant();
        value["version"] = json!("1.9");
        assert_eq!(version(&cluster(value)).outcome, Outcome::Failed);

        let mut value = compliant();
        value["version"] = json!("1.15");
        assert_eq!(version(&cluster(value)).outcome, Outcome::Passed);

        let mut value = compliant();
        value["version"] = json!("2.0");
        assert_eq!(version(&cluster(value)).outcome, Outcome::Passed);

        let mut value = compliant();
        value["version"] = json!("latest");
        assert_eq!(version(&cluster(value)).outcome, Outcome::Failed);
    }

    #[test]
    fn missing_log_types_fail() {
        let mut value = compliant();
        value["logging"]["clusterLogging"] = json!([
            { "types": ["api", "audit"], "enabled": true },
            { "types": ["authenticator", "controllerManager", "scheduler"], "enabled": false }
        ]);
        let finding = audit_logs(&cluster(value));
        assert_eq!(finding.outcome, Outcome::Failed);
        assert_eq!(
            finding.detail,
            "not enabled: authenticator, controllerManager, scheduler"
        );
    }

    #[test]
    fn public_cluster_fails() {
        let mut value = compliant();
        value["resourcesVpcConfig"] = json!({
            "endpointPublicAccess": true,
            "endpointPrivateAccess": false,
            "publicAccessCidrs": ["0.0.0.0/0"]
        });
        assert_eq!(not_public(&cluster(value)).outcome, Outcome::Failed);
    }

    #[test]
    fn unencrypted_cluster_fails() {
        let mut value = compliant();
        value["encryptionConfig"] = json!([]);
        assert_eq!(
            secrets_encryption(&cluster(value)).outcome,
            Outcome::Failed
        );
    }

    #[test]
    fn remote_access_by_source_security_groups() {
        let nodegroup = |remote_access: serde_json::Value| {
            let description: NodegroupDescription = serde_json::from_value(json!({
                "nodegroupName": "blue",
                "nodegroupArn": "arn:aws:eks:us-west-2:111122223333:nodegroup/prod/blue/abc",
                "clusterName": "prod",
                "remoteAccess": remote_access
            }))
            .unwrap();
            NodegroupResource::from_description(description).unwrap()
        };

        let finding = remote_access(&nodegroup(json!({
            "ec2SshKey": "ops",
            "sourceSecurityGroups": ["sg-0a1b2c"]
        })));
        assert_eq!(finding.outcome, Outcome::Passed);
        assert_eq!(finding.resource, "prod/blue");
        assert_eq!(finding.detail, "source security groups: sg-0a1b2c");

        let finding = remote_access(&nodegroup(json!({ "ec2SshKey": "ops" })));
        assert_eq!(finding.outcome, Outcome::Failed);
        assert_eq!(finding.detail, "no source security groups");
    }

    #[test]
    fn nodegroup_without_remote_access_passes() {
        let description: NodegroupDescription = serde_json::from_value(json!({
            "nodegroupName": "blue",
            "nodegroupArn": "arn:aws:eks:us-west-2:111122223333:nodegroup/prod/blue/abc",
            "clusterName": "prod"
        }))
        .unwrap();
        let finding = remote_access(&NodegroupResource::from_description(description).unwrap());
        assert_eq!(finding.outcome, Outcome::Passed);
        assert_eq!(finding.detail, "remote access is not configured");
    }
}
