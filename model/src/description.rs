/*!

Raw describe payloads as the EKS API returns them. Every nested field is optional because the
service omits whatever is not configured; the resource models decide how absence is interpreted.

The serde layout follows the service's JSON (camelCase), so the output of
`aws eks describe-cluster` and `aws eks describe-nodegroup` deserializes directly.

!*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The body of a `DescribeCluster` response.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDescription {
    pub name: Option<String>,
    pub arn: Option<String>,
    pub created_at: Option<String>,
    pub version: Option<String>,
    pub endpoint: Option<String>,
    pub role_arn: Option<String>,
    pub resources_vpc_config: Option<VpcConfig>,
    pub logging: Option<Logging>,
    pub identity: Option<Identity>,
    pub status: Option<String>,
    pub certificate_authority: Option<CertificateAuthority>,
    pub platform_version: Option<String>,
    pub tags: Option<BTreeMap<String, String>>,
    pub encryption_config: Option<Vec<EncryptionConfig>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcConfig {
    pub subnet_ids: Option<Vec<String>>,
    pub security_group_ids: Option<Vec<String>>,
    pub cluster_security_group_id: Option<String>,
    pub vpc_id: Option<String>,
    pub endpoint_public_access: Option<bool>,
    pub endpoint_private_access: Option<bool>,
    pub public_access_cidrs: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logging {
    pub cluster_logging: Option<Vec<LogSetup>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSetup {
    pub types: Option<Vec<String>>,
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub oidc: Option<Oidc>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oidc {
    pub issuer: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateAuthority {
    pub data: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionConfig {
    pub resources: Option<Vec<String>>,
    pub provider: Option<EncryptionProvider>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionProvider {
    pub key_arn: Option<String>,
}

/// The body of a `DescribeNodegroup` response.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupDescription {
    pub nodegroup_name: Option<String>,
    pub nodegroup_arn: Option<String>,
    pub cluster_name: Option<String>,
    pub version: Option<String>,
    pub release_version: Option<String>,
    pub created_at: Option<String>,
    pub status: Option<String>,
    pub capacity_type: Option<String>,
    pub scaling_config: Option<ScalingConfig>,
    pub instance_types: Option<Vec<String>>,
    pub subnets: Option<Vec<String>>,
    pub remote_access: Option<RemoteAccess>,
    pub ami_type: Option<String>,
    pub node_role: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
    pub resources: Option<NodegroupResources>,
    pub disk_size: Option<i32>,
    pub health: Option<NodegroupHealth>,
    pub tags: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingConfig {
    pub min_size: Option<i32>,
    pub max_size: Option<i32>,
    pub desired_size: Option<i32>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAccess {
    pub ec2_ssh_key: Option<String>,
    pub source_security_groups: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupResources {
    pub auto_scaling_groups: Option<Vec<AutoScalingGroup>>,
    pub remote_access_security_group: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScalingGroup {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupHealth {
    pub issues: Option<Vec<Issue>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub code: Option<String>,
    pub message: Option<String>,
    pub resource_ids: Option<Vec<String>>,
}

/// One page of a `ListNodegroups` response.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupPage {
    #[serde(default, rename = "nodegroups")]
    pub names: Vec<String>,
    pub next_token: Option<String>,
}
