use crate::adapter::{Identifiers, ResourceAdapter};
use crate::arn;
use crate::clients::CloudClient;
use crate::description::{ClusterDescription, EncryptionConfig, LogSetup};
use crate::error::{self, ResourceKind, Result};
use crate::params::ClusterParams;
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_CREATING: &str = "CREATING";
pub const STATUS_DELETING: &str = "DELETING";
pub const STATUS_FAILED: &str = "FAILED";
pub const STATUS_UPDATING: &str = "UPDATING";

/// The CIDR that lets anyone reach a public endpoint.
pub const UNRESTRICTED_CIDR: &str = "0.0.0.0/0";

/// The resource class that envelope encryption has to cover for secrets to be encrypted at rest.
pub const SECRETS_RESOURCE: &str = "secrets";

/// A snapshot of one EKS cluster control plane, flattened from a `DescribeCluster` response.
///
/// A `ClusterResource` is built once with [`ClusterResource::build`] and never changes; inspect
/// the cluster again by building a new one.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResource {
    name: String,
    arn: String,
    full_name: String,
    version: String,
    major_version: String,
    minor_version: String,
    platform_version: Option<String>,
    status: String,
    endpoint: Option<String>,
    certificate_authority: Option<String>,
    role_arn: Option<String>,
    created_at: Option<String>,
    oidc_issuer: Option<String>,
    vpc_id: Option<String>,
    subnet_ids: Vec<String>,
    security_group_ids: Vec<String>,
    cluster_security_group_id: Option<String>,
    endpoint_public_access: bool,
    endpoint_private_access: bool,
    public_access_cidrs: Vec<String>,
    encryption_config: Vec<EncryptionEntry>,
    logging: Vec<LoggingEntry>,
    tags: BTreeMap<String, String>,
}

/// A customer managed key and the resource classes it encrypts.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionEntry {
    pub key_arn: Option<String>,
    pub resources: BTreeSet<String>,
}

/// One entry of the cluster's control plane logging configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingEntry {
    pub types: Vec<String>,
    pub enabled: Option<bool>,
}

impl ClusterResource {
    /// Describe the cluster named in `params` and build its snapshot.
    ///
    /// A cluster that does not exist is not an error: the returned snapshot has `exists() ==
    /// false`. Any other failure to fetch the cluster is returned.
    pub async fn build<C>(adapter: &ResourceAdapter<C>, params: &ClusterParams) -> Result<Self>
    where
        C: CloudClient,
    {
        let identifiers = Identifiers::cluster(params.cluster_name.clone());
        let region = params.region.clone().or_else(|| adapter.region());
        match adapter.describe_cluster(&identifiers).await {
            Ok(description) => {
                let cluster = Self::from_description(description, region.as_deref())?;
                info!("Inspected {}", cluster);
                Ok(cluster)
            }
            Err(e) if e.is_not_found() => {
                debug!("{}", e);
                Ok(Self::absent(
                    params.cluster_name.as_deref().unwrap_or_default(),
                    region.as_deref(),
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Flatten a describe response. `name` and `arn` are required; everything else defaults to
    /// empty when the response leaves it out.
    pub fn from_description(
        description: ClusterDescription,
        region: Option<&str>,
    ) -> Result<Self> {
        let name = match description.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return error::MalformedSnafu {
                    kind: ResourceKind::Cluster,
                    id: description.arn.unwrap_or_default(),
                    what: "response is missing the cluster name",
                }
                .fail()
            }
        };
        let arn = match description.arn {
            Some(arn) => arn,
            None => {
                return error::MalformedSnafu {
                    kind: ResourceKind::Cluster,
                    id: name,
                    what: "response is missing the cluster arn",
                }
                .fail()
            }
        };

        let version = description.version.unwrap_or_default();
        let (major_version, minor_version) = split_version(&version);
        let vpc = description.resources_vpc_config.unwrap_or_default();

        Ok(Self {
            full_name: full_name(region, &name),
            name,
            arn,
            major_version,
            minor_version,
            version,
            platform_version: description.platform_version,
            status: description.status.unwrap_or_default(),
            endpoint: description.endpoint,
            certificate_authority: description.certificate_authority.and_then(|ca| ca.data),
            role_arn: description.role_arn,
            created_at: description.created_at,
            oidc_issuer: description
                .identity
                .and_then(|identity| identity.oidc)
                .and_then(|oidc| oidc.issuer),
            vpc_id: vpc.vpc_id,
            subnet_ids: vpc.subnet_ids.unwrap_or_default(),
            security_group_ids: vpc.security_group_ids.unwrap_or_default(),
            cluster_security_group_id: vpc.cluster_security_group_id,
            endpoint_public_access: vpc.endpoint_public_access.unwrap_or_default(),
            endpoint_private_access: vpc.endpoint_private_access.unwrap_or_default(),
            public_access_cidrs: vpc.public_access_cidrs.unwrap_or_default(),
            encryption_config: description
                .encryption_config
                .unwrap_or_default()
                .into_iter()
                .map(EncryptionEntry::from)
                .collect(),
            logging: description
                .logging
                .and_then(|logging| logging.cluster_logging)
                .unwrap_or_default()
                .into_iter()
                .map(LoggingEntry::from)
                .collect(),
            tags: description.tags.unwrap_or_default(),
        })
    }

    /// The snapshot of a cluster the provider does not know about.
    fn absent(name: &str, region: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            full_name: full_name(region, name),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// `region/name`, or just the name when no region is known.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The text before the first `.` of the version.
    pub fn major_version(&self) -> &str {
        &self.major_version
    }

    /// The text after the last `.` of the version.
    pub fn minor_version(&self) -> &str {
        &self.minor_version
    }

    pub fn platform_version(&self) -> Option<&str> {
        self.platform_version.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn certificate_authority(&self) -> Option<&str> {
        self.certificate_authority.as_deref()
    }

    pub fn role_arn(&self) -> Option<&str> {
        self.role_arn.as_deref()
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn oidc_issuer(&self) -> Option<&str> {
        self.oidc_issuer.as_deref()
    }

    pub fn vpc_id(&self) -> Option<&str> {
        self.vpc_id.as_deref()
    }

    pub fn subnets(&self) -> &[String] {
        &self.subnet_ids
    }

    pub fn subnets_count(&self) -> usize {
        self.subnet_ids.len()
    }

    pub fn security_group_ids(&self) -> &[String] {
        &self.security_group_ids
    }

    pub fn security_groups_count(&self) -> usize {
        self.security_group_ids.len()
    }

    pub fn cluster_security_group_id(&self) -> Option<&str> {
        self.cluster_security_group_id.as_deref()
    }

    pub fn endpoint_public_access(&self) -> bool {
        self.endpoint_public_access
    }

    pub fn endpoint_private_access(&self) -> bool {
        self.endpoint_private_access
    }

    pub fn public_access_cidrs(&self) -> &[String] {
        &self.public_access_cidrs
    }

    pub fn encryption_config(&self) -> &[EncryptionEntry] {
        &self.encryption_config
    }

    pub fn logging(&self) -> &[LoggingEntry] {
        &self.logging
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn exists(&self) -> bool {
        arn::is_well_formed(&self.arn)
    }

    /// Private endpoint access wins over everything else. Without it, the cluster is public when
    /// the public endpoint is enabled or when the allow-list admits every address.
    pub fn is_public(&self) -> bool {
        if self.endpoint_private_access {
            return false;
        }
        self.endpoint_public_access
            || self
                .public_access_cidrs
                .iter()
                .any(|cidr| cidr == UNRESTRICTED_CIDR)
    }

    /// Whether any encryption config entry covers secrets.
    pub fn has_encryption_enabled(&self) -> bool {
        self.encryption_config
            .iter()
            .any(|entry| entry.resources.contains(SECRETS_RESOURCE))
    }

    /// The sorted log types of the first logging entry that is explicitly enabled.
    pub fn logs_enabled(&self) -> Vec<String> {
        self.first_logging_types(true)
    }

    /// The sorted log types of the first logging entry that is explicitly disabled.
    pub fn logs_disabled(&self) -> Vec<String> {
        self.first_logging_types(false)
    }

    // Only the first matching entry counts, entries are not merged.
    fn first_logging_types(&self, enabled: bool) -> Vec<String> {
        self.logging
            .iter()
            .find(|entry| entry.enabled == Some(enabled))
            .map(|entry| {
                let mut types = entry.types.clone();
                types.sort();
                types
            })
            .unwrap_or_default()
    }

    pub fn active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    pub fn failed(&self) -> bool {
        self.status == STATUS_FAILED
    }

    pub fn creating(&self) -> bool {
        self.status == STATUS_CREATING
    }

    pub fn deleting(&self) -> bool {
        self.status == STATUS_DELETING
    }

    pub fn updating(&self) -> bool {
        self.status == STATUS_UPDATING
    }
}

impl Display for ClusterResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AWS EKS Cluster {}", self.full_name)
    }
}

impl From<EncryptionConfig> for EncryptionEntry {
    fn from(config: EncryptionConfig) -> Self {
        Self {
            key_arn: config.provider.and_then(|provider| provider.key_arn),
            resources: config.resources.unwrap_or_default().into_iter().collect(),
        }
    }
}

impl From<LogSetup> for LoggingEntry {
    fn from(setup: LogSetup) -> Self {
        Self {
            types: setup.types.unwrap_or_default(),
            enabled: setup.enabled,
        }
    }
}

/// Split a version into the parts before the first and after the last `.`. This is not semver
/// parsing, `1.24` gives `("1", "24")`.
fn split_version(version: &str) -> (String, String) {
    let major = version.split('.').next().unwrap_or_default().to_string();
    let minor = version.split('.').last().unwrap_or_default().to_string();
    (major, minor)
}

fn full_name(region: Option<&str>, name: &str) -> String {
    match region {
        Some(region) if !region.is_empty() => format!("{}/{}", region, name),
        _ => name.to_string(),
    }
}
