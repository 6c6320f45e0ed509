use serde::{Deserialize, Serialize};

/// Identifies a cluster to inspect. `cluster_name` is required; it is an `Option` so that a
/// missing value is reported as a `MissingParameter` error when the resource is built rather
/// than being papered over with a default.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterParams {
    pub cluster_name: Option<String>,

    /// The region used for the fully-qualified name. Defaults to the client's region.
    pub region: Option<String>,
}

impl ClusterParams {
    pub fn new<S: Into<String>>(cluster_name: S) -> Self {
        Self {
            cluster_name: Some(cluster_name.into()),
            region: None,
        }
    }

    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Identifies a nodegroup to inspect. Both names are required.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupParams {
    pub cluster_name: Option<String>,
    pub nodegroup_name: Option<String>,
}

impl NodegroupParams {
    pub fn new<S1, S2>(cluster_name: S1, nodegroup_name: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            cluster_name: Some(cluster_name.into()),
            nodegroup_name: Some(nodegroup_name.into()),
        }
    }
}

/// Selects the nodegroups of a cluster for listing.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupsParams {
    pub cluster_name: Option<String>,

    /// How many `DescribeNodegroup` calls may be in flight at once. Defaults to one.
    pub concurrency: Option<usize>,
}

impl NodegroupsParams {
    pub fn new<S: Into<String>>(cluster_name: S) -> Self {
        Self {
            cluster_name: Some(cluster_name.into()),
            concurrency: None,
        }
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }
}
