use crate::controls::{self, Finding, Outcome, CLUSTER_CONTROLS, REMOTE_ACCESS};
use anyhow::{ensure, Result};
use clap::Parser;
use eksinspect_model::clients::CloudClient;
use eksinspect_model::{
    ClusterParams, ClusterResource, Identifiers, NodegroupParams, NodegroupResource,
    ResourceAdapter,
};
use eksinspect_utils::impl_display_as_json;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use serde::Serialize;

/// Evaluate the reference controls against a cluster and its nodegroups.
#[derive(Debug, Parser)]
pub(crate) struct Check {
    /// The name of the cluster.
    #[clap(long = "cluster-name", short = 'c')]
    cluster_name: String,

    /// How many nodegroups to describe at once.
    #[clap(long = "concurrency", default_value = "1")]
    concurrency: usize,

    /// Exit with a non-zero status if any control did not pass.
    #[clap(long = "fail-on-findings")]
    fail_on_findings: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Report {
    cluster: String,
    passed: usize,
    failed: usize,
    errors: usize,
    findings: Vec<Finding>,
}

impl_display_as_json!(Report);

impl Report {
    fn new(cluster: String, findings: Vec<Finding>) -> Self {
        let count = |outcome: Outcome| findings.iter().filter(|f| f.outcome == outcome).count();
        Self {
            cluster,
            passed: count(Outcome::Passed),
            failed: count(Outcome::Failed),
            errors: count(Outcome::Error),
            findings,
        }
    }
}

impl Check {
    pub(crate) async fn run<C: CloudClient>(self, adapter: &ResourceAdapter<C>) -> Result<()> {
        let report = Report::new(
            self.cluster_name.clone(),
            evaluate(adapter, &self.cluster_name, self.concurrency).await,
        );
        println!("{}", report);
        ensure!(
            !self.fail_on_findings || report.failed + report.errors == 0,
            "{} controls failed and {} could not be evaluated",
            report.failed,
            report.errors
        );
        Ok(())
    }
}

/// Run every control. Failures to inspect a resource become `Error` findings rather than
/// stopping the run.
pub(crate) async fn evaluate<C: CloudClient>(
    adapter: &ResourceAdapter<C>,
    cluster_name: &str,
    concurrency: usize,
) -> Vec<Finding> {
    let mut findings = match ClusterResource::build(adapter, &ClusterParams::new(cluster_name)).await
    {
        Ok(cluster) if cluster.exists() => controls::cluster_findings(&cluster),
        Ok(cluster) => cluster_errors(cluster.full_name(), "cluster does not exist".to_string()),
        Err(e) => {
            warn!("{}", e);
            cluster_errors(cluster_name, e.to_string())
        }
    };

    let names = match adapter
        .list_nodegroup_names(&Identifiers::cluster(Some(cluster_name.to_string())))
        .await
    {
        Ok(names) => names,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => {
            warn!("{}", e);
            findings.push(Finding::error(&REMOTE_ACCESS, cluster_name, e.to_string()));
            return findings;
        }
    };
    info!("Checking {} nodegroups of '{}'", names.len(), cluster_name);

    let nodegroup_findings: Vec<Option<Finding>> = stream::iter(names)
        .map(|nodegroup_name| async move {
            let params = NodegroupParams::new(cluster_name, nodegroup_name.as_str());
            match NodegroupResource::build(adapter, &params).await {
                Ok(nodegroup) if nodegroup.exists() => Some(controls::remote_access(&nodegroup)),
                // Deleted since the listing.
                Ok(_) => None,
                Err(e) => {
                    warn!("{}", e);
                    Some(Finding::error(
                        &REMOTE_ACCESS,
                        format!("{}/{}", cluster_name, nodegroup_name),
                        e.to_string(),
                    ))
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;
    findings.extend(nodegroup_findings.into_iter().flatten());
    findings
}

fn cluster_errors(resource: &str, detail: String) -> Vec<Finding> {
    CLUSTER_CONTROLS
        .iter()
        .map(|control| Finding::error(control, resource, detail.clone()))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use eksinspect_model::clients::{CloudError, StatusCode};
    use eksinspect_model::description::{
        ClusterDescription, NodegroupDescription, NodegroupPage,
    };
    use serde_json::json;

    /// Answers for one cluster named `prod` with nodegroups `blue` and `green`. `green` is
    /// forbidden.
    struct FixedClient {
        cluster_code: Option<&'static str>,
    }

    fn service_error(code: &str, status: StatusCode) -> CloudError {
        CloudError::service(Some(code), Some(status), "fixed")
    }

    #[async_trait::async_trait]
    impl CloudClient for FixedClient {
        fn region(&self) -> Option<String> {
            Some("us-west-2".to_string())
        }

        async fn describe_cluster(&self, _: &str) -> Result<ClusterDescription, CloudError> {
            if let Some(code) = self.cluster_code {
                return Err(service_error(code, StatusCode::FORBIDDEN));
            }
            Ok(serde_json::from_value(json!({
                "name": "prod",
                "arn": "arn:aws:eks:us-west-2:111122223333:cluster/prod",
                "version": "1.13",
                "resourcesVpcConfig": { "endpointPrivateAccess": true }
            }))
            .unwrap())
        }

        async fn list_nodegroup_names(
            &self,
            _: &str,
            _: Option<String>,
        ) -> Result<NodegroupPage, CloudError> {
            Ok(NodegroupPage {
                names: vec!["blue".to_string(), "green".to_string()],
                next_token: None,
            })
        }

        async fn describe_nodegroup(
            &self,
            _: &str,
            nodegroup_name: &str,
        ) -> Result<NodegroupDescription, CloudError> {
            if nodegroup_name == "green" {
                return Err(service_error("AccessDeniedException", StatusCode::FORBIDDEN));
            }
            Ok(serde_json::from_value(json!({
                "nodegroupName": nodegroup_name,
                "nodegroupArn": "arn:aws:eks:us-west-2:111122223333:nodegroup/prod/blue/abc",
                "clusterName": "prod",
                "remoteAccess": { "ec2SshKey": "ops", "sourceSecurityGroups": ["sg-1"] }
            }))
            .unwrap())
        }
    }

    fn outcomes(findings: &[Finding]) -> Vec<(&'static str, Outcome)> {
        findings.iter().map(|f| (f.control, f.outcome)).collect()
    }

    #[tokio::test]
    async fn evaluates_cluster_and_nodegroups() {
        let adapter = ResourceAdapter::new(FixedClient { cluster_code: None });
        let findings = evaluate(&adapter, "prod", 2).await;
        assert_eq!(
            outcomes(&findings),
            vec![
                ("eks-1", Outcome::Failed),
                ("eks-2", Outcome::Failed),
                ("eks-3", Outcome::Passed),
                ("eks-4", Outcome::Failed),
                ("eks-6", Outcome::Passed),
                ("eks-6", Outcome::Error),
            ]
        );
        assert_eq!(findings[5].resource, "prod/green");

        let report = Report::new("prod".to_string(), findings);
        assert_eq!((report.passed, report.failed, report.errors), (2, 3, 1));
    }

    #[tokio::test]
    async fn unreadable_cluster_is_an_error() {
        let adapter = ResourceAdapter::new(FixedClient {
            cluster_code: Some("AccessDeniedException"),
        });
        let findings = evaluate(&adapter, "prod", 1).await;
        assert!(findings[..4]
            .iter()
            .all(|finding| finding.outcome == Outcome::Error));
    }
}
