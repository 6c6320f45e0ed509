/*!

A [`CloudClient`] that serves canned EKS responses so the resource builders can be tested without
AWS. Every call is recorded so tests can check how many round trips were made and in which order.

!*/

use eksinspect_model::clients::{CloudClient, CloudError, StatusCode};
use eksinspect_model::description::{ClusterDescription, NodegroupDescription, NodegroupPage};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct MockCloudClient {
    region: Option<String>,
    clusters: HashMap<String, Value>,
    /// Listing pages keyed by the continuation token that requests them.
    pages: HashMap<Option<String>, NodegroupPage>,
    nodegroups: HashMap<String, Value>,
    delays: HashMap<String, Duration>,
    failure: Option<(&'static str, u16)>,
    calls: Mutex<Vec<String>>,
}

impl MockCloudClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub(crate) fn cluster(mut self, name: &str, description: Value) -> Self {
        self.clusters.insert(name.to_string(), description);
        self
    }

    pub(crate) fn page(mut self, token: Option<&str>, names: &[&str], next: Option<&str>) -> Self {
        self.pages.insert(
            token.map(str::to_string),
            NodegroupPage {
                names: names.iter().map(|name| name.to_string()).collect(),
                next_token: next.map(str::to_string),
            },
        );
        self
    }

    pub(crate) fn nodegroup(mut self, name: &str, description: Value) -> Self {
        self.nodegroups.insert(name.to_string(), description);
        self
    }

    /// Make the describe call for `name` take `millis` before answering.
    pub(crate) fn delay(mut self, name: &str, millis: u64) -> Self {
        self.delays
            .insert(name.to_string(), Duration::from_millis(millis));
        self
    }

    /// Make every call fail with the given service error code and HTTP status.
    pub(crate) fn failing(mut self, code: &'static str, status: u16) -> Self {
        self.failure = Some((code, status));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), CloudError> {
        self.calls.lock().unwrap().push(call);
        match self.failure {
            Some((code, status)) => Err(CloudError::service(
                Some(code),
                StatusCode::from_u16(status).ok(),
                "injected failure",
            )),
            None => Ok(()),
        }
    }
}

fn not_found(what: &str) -> CloudError {
    CloudError::service(
        Some("ResourceNotFoundException"),
        Some(StatusCode::NOT_FOUND),
        format!("No {} found", what),
    )
}

#[async_trait::async_trait]
impl CloudClient for MockCloudClient {
    fn region(&self) -> Option<String> {
        self.region.clone()
    }

    async fn describe_cluster(&self, name: &str) -> Result<ClusterDescription, CloudError> {
        self.record(format!("describe_cluster {}", name))?;
        let value = self
            .clusters
            .get(name)
            .ok_or_else(|| not_found(&format!("cluster {}", name)))?;
        Ok(serde_json::from_value(value.clone()).unwrap())
    }

    async fn list_nodegroup_names(
        &self,
        cluster_name: &str,
        next_token: Option<String>,
    ) -> Result<NodegroupPage, CloudError> {
        self.record(format!(
            "list_nodegroups {} {}",
            cluster_name,
            next_token.as_deref().unwrap_or("-")
        ))?;
        if self.pages.is_empty() {
            return Err(not_found(&format!("cluster {}", cluster_name)));
        }
        Ok(self.pages.get(&next_token).cloned().unwrap_or_default())
    }

    async fn describe_nodegroup(
        &self,
        cluster_name: &str,
        nodegroup_name: &str,
    ) -> Result<NodegroupDescription, CloudError> {
        self.record(format!(
            "describe_nodegroup {}/{}",
            cluster_name, nodegroup_name
        ))?;
        if let Some(delay) = self.delays.get(nodegroup_name) {
            tokio::time::sleep(*delay).await;
        }
        let value = self
            .nodegroups
            .get(nodegroup_name)
            .ok_or_else(|| not_found(&format!("nodegroup {}", nodegroup_name)))?;
        Ok(serde_json::from_value(value.clone()).unwrap())
    }
}
