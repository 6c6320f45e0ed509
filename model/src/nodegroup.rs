use crate::adapter::{Identifiers, ResourceAdapter};
use crate::arn;
use crate::cluster::STATUS_ACTIVE;
use crate::clients::CloudClient;
use crate::description::{Issue, NodegroupDescription};
use crate::error::{self, ResourceKind, Result};
use crate::params::NodegroupParams;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A snapshot of one EKS managed nodegroup, flattened from a `DescribeNodegroup` response.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupResource {
    name: String,
    arn: String,
    cluster_name: String,
    version: String,
    release_version: String,
    status: String,
    created_at: Option<String>,
    node_role: Option<String>,
    ami_type: Option<String>,
    capacity_type: Option<String>,
    instance_types: Vec<String>,
    disk_size: Option<i32>,
    subnets: Vec<String>,
    labels: BTreeMap<String, String>,
    tags: BTreeMap<String, String>,
    scaling_bounds: ScalingBounds,
    autoscaling_group_name: String,
    remote_access_security_group: String,
    ssh_key: String,
    remote_access_configured: bool,
    remote_access_source_security_groups: Vec<String>,
    issues: Vec<HealthIssue>,
}

/// The scaling configuration. Bounds the service leaves out are zero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingBounds {
    pub min: i32,
    pub max: i32,
    pub desired: i32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIssue {
    pub code: Option<String>,
    pub message: Option<String>,
    pub resource_ids: Vec<String>,
}

impl NodegroupResource {
    /// Describe the nodegroup named in `params` and build its snapshot. A nodegroup that does
    /// not exist gives a snapshot with `exists() == false`.
    pub async fn build<C>(adapter: &ResourceAdapter<C>, params: &NodegroupParams) -> Result<Self>
    where
        C: CloudClient,
    {
        let identifiers =
            Identifiers::nodegroup(params.cluster_name.clone(), params.nodegroup_name.clone());
        match adapter.describe_nodegroup(&identifiers).await {
            Ok(description) => {
                let nodegroup = Self::from_description(description)?;
                info!("Inspected {}", nodegroup);
                Ok(nodegroup)
            }
            Err(e) if e.is_not_found() => {
                debug!("{}", e);
                Ok(Self {
                    name: params.nodegroup_name.clone().unwrap_or_default(),
                    cluster_name: params.cluster_name.clone().unwrap_or_default(),
                    ..Default::default()
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Flatten a describe response. The nodegroup name and arn are required.
    pub fn from_description(description: NodegroupDescription) -> Result<Self> {
        let name = match description.nodegroup_name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return error::MalformedSnafu {
                    kind: ResourceKind::Nodegroup,
                    id: description.nodegroup_arn.unwrap_or_default(),
                    what: "response is missing the nodegroup name",
                }
                .fail()
            }
        };
        let arn = match description.nodegroup_arn {
            Some(arn) => arn,
            None => {
                return error::MalformedSnafu {
                    kind: ResourceKind::Nodegroup,
                    id: name,
                    what: "response is missing the nodegroup arn",
                }
                .fail()
            }
        };

        let scaling = description.scaling_config.unwrap_or_default();
        let resources = description.resources.unwrap_or_default();
        let autoscaling_group_name = resources
            .auto_scaling_groups
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|group| group.name)
            .unwrap_or_default();
        let remote_access_security_group = resources
            .remote_access_security_group
            .unwrap_or_default();

        // Without a remote access block there is no key and no source group. With one, a missing
        // source group list means access is limited to the nodegroup's own remote access group.
        let remote_access_configured = description.remote_access.is_some();
        let (ssh_key, remote_access_source_security_groups) = match description.remote_access {
            None => (String::new(), Vec::new()),
            Some(remote_access) => {
                let groups = match remote_access.source_security_groups {
                    Some(groups) => groups,
                    None if remote_access_security_group.is_empty() => Vec::new(),
                    None => vec![remote_access_security_group.clone()],
                };
                (remote_access.ec2_ssh_key.unwrap_or_default(), groups)
            }
        };

        Ok(Self {
            name,
            arn,
            cluster_name: description.cluster_name.unwrap_or_default(),
            version: description.version.unwrap_or_default(),
            release_version: description.release_version.unwrap_or_default(),
            status: description.status.unwrap_or_default(),
            created_at: description.created_at,
            node_role: description.node_role,
            ami_type: description.ami_type,
            capacity_type: description.capacity_type,
            instance_types: description.instance_types.unwrap_or_default(),
            disk_size: description.disk_size,
            subnets: description.subnets.unwrap_or_default(),
            labels: description.labels.unwrap_or_default(),
            tags: description.tags.unwrap_or_default(),
            scaling_bounds: ScalingBounds {
                min: scaling.min_size.unwrap_or_default(),
                max: scaling.max_size.unwrap_or_default(),
                desired: scaling.desired_size.unwrap_or_default(),
            },
            autoscaling_group_name,
            remote_access_security_group,
            ssh_key,
            remote_access_configured,
            remote_access_source_security_groups,
            issues: description
                .health
                .and_then(|health| health.issues)
                .unwrap_or_default()
                .into_iter()
                .map(HealthIssue::from)
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release_version(&self) -> &str {
        &self.release_version
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn node_role(&self) -> Option<&str> {
        self.node_role.as_deref()
    }

    pub fn ami_type(&self) -> Option<&str> {
        self.ami_type.as_deref()
    }

    pub fn capacity_type(&self) -> Option<&str> {
        self.capacity_type.as_deref()
    }

    pub fn instance_types(&self) -> &[String] {
        &self.instance_types
    }

    pub fn disk_size(&self) -> Option<i32> {
        self.disk_size
    }

    pub fn subnets(&self) -> &[String] {
        &self.subnets
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn scaling_bounds(&self) -> ScalingBounds {
        self.scaling_bounds
    }

    pub fn autoscaling_min(&self) -> i32 {
        self.scaling_bounds.min
    }

    pub fn autoscaling_max(&self) -> i32 {
        self.scaling_bounds.max
    }

    pub fn autoscaling_desired(&self) -> i32 {
        self.scaling_bounds.desired
    }

    /// The first autoscaling group backing the nodegroup, empty if there is none.
    pub fn autoscaling_group_name(&self) -> &str {
        &self.autoscaling_group_name
    }

    /// Empty if the nodegroup has no remote access security group.
    pub fn remote_access_security_group(&self) -> &str {
        &self.remote_access_security_group
    }

    /// The EC2 key pair allowed to ssh into nodes. Empty when no key is configured.
    pub fn ssh_key(&self) -> &str {
        &self.ssh_key
    }

    /// Whether the nodegroup was created with a remote access block at all.
    pub fn remote_access_configured(&self) -> bool {
        self.remote_access_configured
    }

    pub fn remote_access_source_security_groups(&self) -> &[String] {
        &self.remote_access_source_security_groups
    }

    pub fn issues(&self) -> &[HealthIssue] {
        &self.issues
    }

    pub fn exists(&self) -> bool {
        arn::is_well_formed(&self.arn)
    }

    /// Autoscaling needs room to scale: a nodegroup pinned to one size, zero included, does not
    /// autoscale.
    pub fn has_autoscaling_enabled(&self) -> bool {
        self.scaling_bounds.max > self.scaling_bounds.min
    }

    pub fn has_remote_access_source_security_groups(&self) -> bool {
        !self.remote_access_source_security_groups.is_empty()
    }

    pub fn active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    pub fn healthy(&self) -> bool {
        self.issues.is_empty() && self.active()
    }
}

impl Display for NodegroupResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AWS EKS Nodegroup {}/{}", self.cluster_name, self.name)
    }
}

impl From<Issue> for HealthIssue {
    fn from(issue: Issue) -> Self {
        Self {
            code: issue.code,
            message: issue.message,
            resource_ids: issue.resource_ids.unwrap_or_default(),
        }
    }
}
