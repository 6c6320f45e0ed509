use anyhow::{Context, Result};
use clap::Parser;
use eksinspect_model::clients::CloudClient;
use eksinspect_model::{NodegroupParams, NodegroupResource, ResourceAdapter};
use eksinspect_utils::json_display;
use serde::Serialize;

/// Describe a managed nodegroup. A nodegroup that does not exist is printed with
/// `"exists": false`.
#[derive(Debug, Parser)]
pub(crate) struct Nodegroup {
    /// The name of the cluster the nodegroup belongs to.
    #[clap(long = "cluster-name", short = 'c')]
    cluster_name: String,
    /// The name of the nodegroup.
    #[clap(long = "nodegroup-name", short = 'n')]
    nodegroup_name: String,
}

impl Nodegroup {
    pub(crate) async fn run<C: CloudClient>(self, adapter: &ResourceAdapter<C>) -> Result<()> {
        let params = NodegroupParams::new(&self.cluster_name, &self.nodegroup_name);
        let nodegroup = NodegroupResource::build(adapter, &params)
            .await
            .context(format!(
                "Unable to inspect nodegroup '{}' of cluster '{}'",
                self.nodegroup_name, self.cluster_name
            ))?;
        println!("{}", json_display(NodegroupOutput::from(&nodegroup)));
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodegroupOutput<'a> {
    #[serde(flatten)]
    nodegroup: &'a NodegroupResource,
    exists: bool,
    active: bool,
    healthy: bool,
    has_autoscaling_enabled: bool,
    has_remote_access_source_security_groups: bool,
}

impl<'a> From<&'a NodegroupResource> for NodegroupOutput<'a> {
    fn from(nodegroup: &'a NodegroupResource) -> Self {
        Self {
            nodegroup,
            exists: nodegroup.exists(),
            active: nodegroup.active(),
            healthy: nodegroup.healthy(),
            has_autoscaling_enabled: nodegroup.has_autoscaling_enabled(),
            has_remote_access_source_security_groups: nodegroup
                .has_remote_access_source_security_groups(),
        }
    }
}
