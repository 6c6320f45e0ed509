use crate::adapter::{Identifiers, ResourceAdapter};
use crate::clients::CloudClient;
use crate::error::Result;
use crate::nodegroup::NodegroupResource;
use crate::params::NodegroupsParams;
use crate::table::{CollectionTable, Schema};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use tabled::Tabled;

/// `DescribeNodegroup` calls in flight at once unless the caller asks for more.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// The column names registered for nodegroup tables.
pub mod columns {
    pub const NAMES: &str = "names";
    pub const ARNS: &str = "arns";
    pub const CLUSTER_NAMES: &str = "cluster_names";
    pub const VERSIONS: &str = "versions";
    pub const RELEASE_VERSIONS: &str = "release_versions";
    pub const STATUSES: &str = "statuses";
    pub const AMI_TYPES: &str = "ami_types";
}

/// The slice of a nodegroup that listings carry.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "ARN")]
    pub arn: String,
    #[tabled(rename = "CLUSTER")]
    pub cluster_name: String,
    #[tabled(rename = "VERSION")]
    pub version: String,
    #[tabled(rename = "RELEASE")]
    pub release_version: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "AMI TYPE")]
    pub ami_type: String,
}

impl From<&NodegroupResource> for NodegroupRow {
    fn from(nodegroup: &NodegroupResource) -> Self {
        Self {
            name: nodegroup.name().to_string(),
            arn: nodegroup.arn().to_string(),
            cluster_name: nodegroup.cluster_name().to_string(),
            version: nodegroup.version().to_string(),
            release_version: nodegroup.release_version().to_string(),
            status: nodegroup.status().to_string(),
            ami_type: nodegroup.ami_type().unwrap_or_default().to_string(),
        }
    }
}

pub type NodegroupTable = CollectionTable<NodegroupRow>;

lazy_static::lazy_static! {

    static ref NODEGROUP_SCHEMA: Arc<Schema<NodegroupRow>> = Arc::new(
        Schema::new()
            .column(columns::NAMES, |row: &NodegroupRow| row.name.as_str().into())
            .column(columns::ARNS, |row: &NodegroupRow| row.arn.as_str().into())
            .column(columns::CLUSTER_NAMES, |row: &NodegroupRow| {
                row.cluster_name.as_str().into()
            })
            .column(columns::VERSIONS, |row: &NodegroupRow| row.version.as_str().into())
            .column(columns::RELEASE_VERSIONS, |row: &NodegroupRow| {
                row.release_version.as_str().into()
            })
            .column(columns::STATUSES, |row: &NodegroupRow| row.status.as_str().into())
            .column(columns::AMI_TYPES, |row: &NodegroupRow| row.ami_type.as_str().into()),
    );
}

/// The shared schema of every nodegroup table.
pub fn nodegroup_schema() -> Arc<Schema<NodegroupRow>> {
    Arc::clone(&NODEGROUP_SCHEMA)
}

impl CollectionTable<NodegroupRow> {
    /// List every nodegroup of a cluster and describe each one.
    ///
    /// All pages of the listing are fetched before the first describe call. Describe calls run
    /// up to `params.concurrency` at a time; rows keep the order of the listing either way. A
    /// nodegroup deleted between the listing and its describe call is left out, and a missing
    /// cluster gives an empty table.
    pub async fn build<C>(adapter: &ResourceAdapter<C>, params: &NodegroupsParams) -> Result<Self>
    where
        C: CloudClient,
    {
        let listing = Identifiers::cluster(params.cluster_name.clone());
        let names = match adapter.list_nodegroup_names(&listing).await {
            Ok(names) => names,
            Err(e) if e.is_not_found() => {
                debug!("{}", e);
                return Ok(Self::with_schema(Vec::new(), nodegroup_schema()));
            }
            Err(e) => return Err(e),
        };

        let concurrency = params.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1);
        let rows: Vec<Option<NodegroupRow>> = stream::iter(names)
            .map(|nodegroup_name| {
                let identifiers =
                    Identifiers::nodegroup(params.cluster_name.clone(), Some(nodegroup_name));
                async move {
                    match adapter.describe_nodegroup(&identifiers).await {
                        Ok(description) => NodegroupResource::from_description(description)
                            .map(|nodegroup| Some(NodegroupRow::from(&nodegroup))),
                        Err(e) if e.is_not_found() => {
                            debug!("Skipping nodegroup that disappeared: {}", e);
                            Ok(None)
                        }
                        Err(e) => Err(e),
                    }
                }
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        let rows: Vec<NodegroupRow> = rows.into_iter().flatten().collect();
        info!(
            "Built nodegroup table with {} rows for cluster '{}'",
            rows.len(),
            params.cluster_name.as_deref().unwrap_or_default()
        );
        Ok(Self::with_schema(rows, nodegroup_schema()))
    }
}
