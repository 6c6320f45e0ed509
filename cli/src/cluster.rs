use anyhow::{Context, Result};
use clap::Parser;
use eksinspect_model::clients::CloudClient;
use eksinspect_model::{ClusterParams, ClusterResource, ResourceAdapter};
use eksinspect_utils::json_display;

/// Describe a cluster. A cluster that does not exist is printed with `"exists": false`.
#[derive(Debug, Parser)]
pub(crate) struct Cluster {
    /// The name of the cluster.
    #[clap(long = "cluster-name", short = 'c')]
    cluster_name: String,
}

impl Cluster {
    pub(crate) async fn run<C: CloudClient>(self, adapter: &ResourceAdapter<C>) -> Result<()> {
        let cluster = ClusterResource::build(adapter, &ClusterParams::new(&self.cluster_name))
            .await
            .context(format!("Unable to inspect cluster '{}'", self.cluster_name))?;
        println!("{}", json_display(ClusterOutput::from(&cluster)));
        Ok(())
    }
}

/// The snapshot plus its derived predicates.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ClusterOutput<'a> {
    #[serde(flatten)]
    cluster: &'a ClusterResource,
    exists: bool,
    is_public: bool,
    has_encryption_enabled: bool,
    logs_enabled: Vec<String>,
    logs_disabled: Vec<String>,
}

impl<'a> From<&'a ClusterResource> for ClusterOutput<'a> {
    fn from(cluster: &'a ClusterResource) -> Self {
        Self {
            cluster,
            exists: cluster.exists(),
            is_public: cluster.is_public(),
            has_encryption_enabled: cluster.has_encryption_enabled(),
            logs_enabled: cluster.logs_enabled(),
            logs_disabled: cluster.logs_disabled(),
        }
    }
}
