use anyhow::{Context, Result};
use clap::Parser;
use eksinspect_model::clients::CloudClient;
use eksinspect_model::{columns, NodegroupTable, NodegroupsParams, ResourceAdapter};
use terminal_size::{Height, Width};

/// List the managed nodegroups of a cluster.
#[derive(Debug, Parser)]
pub(crate) struct Nodegroups {
    /// The name of the cluster.
    #[clap(long = "cluster-name", short = 'c')]
    cluster_name: String,

    /// How many nodegroups to describe at once.
    #[clap(long = "concurrency", default_value = "1")]
    concurrency: usize,

    /// Only show nodegroups in these states, e.g. `ACTIVE`, `DEGRADED`.
    #[clap(long = "status")]
    status: Vec<String>,

    /// Only show nodegroups with these AMI types.
    #[clap(long = "ami-type")]
    ami_type: Vec<String>,

    /// Output the results in JSON format.
    #[clap(long = "json")]
    json: bool,
}

impl Nodegroups {
    pub(crate) async fn run<C: CloudClient>(self, adapter: &ResourceAdapter<C>) -> Result<()> {
        let params = NodegroupsParams::new(&self.cluster_name).concurrency(self.concurrency);
        let mut table = NodegroupTable::build(adapter, &params)
            .await
            .context(format!(
                "Unable to list the nodegroups of cluster '{}'",
                self.cluster_name
            ))?;
        if !self.status.is_empty() {
            table = table
                .where_in(columns::STATUSES, self.status.iter().map(String::as_str))
                .context("Unable to filter by status")?;
        }
        if !self.ami_type.is_empty() {
            table = table
                .where_in(columns::AMI_TYPES, self.ami_type.iter().map(String::as_str))
                .context("Unable to filter by AMI type")?;
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(table.rows())
                    .context("Could not create string from nodegroups.")?
            );
        } else {
            let (terminal_size::Width(width), _) =
                terminal_size::terminal_size().unwrap_or((Width(120), Height(0)));
            println!("{}", table.render_width(width as usize));
        }
        Ok(())
    }
}
