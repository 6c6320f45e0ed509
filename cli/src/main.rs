/*!

This is the command line interface for inspecting EKS clusters and their managed nodegroups.

!*/

mod check;
mod cluster;
mod controls;
mod nodegroup;
mod nodegroups;

use anyhow::{Context, Result};
use clap::Parser;
use eksinspect_model::clients::EksClient;
use eksinspect_model::ResourceAdapter;
use eksinspect_utils::aws::aws_config;
use eksinspect_utils::init_logger;
use log::LevelFilter;

/// Read-only inspection of EKS clusters and managed nodegroups.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// The AWS region to inspect. Falls back to the environment, then to `us-west-2`.
    #[clap(long = "region")]
    region: Option<String>,
    /// The arn of a role to assume for every call.
    #[clap(long = "assume-role")]
    assume_role: Option<String>,
    /// How long the assumed role session lasts, in seconds.
    #[clap(long = "assume-role-session-duration", requires = "assume-role")]
    assume_role_session_duration: Option<i32>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Describe a cluster.
    Cluster(cluster::Cluster),
    /// Describe a managed nodegroup.
    Nodegroup(nodegroup::Nodegroup),
    /// List the managed nodegroups of a cluster.
    Nodegroups(nodegroups::Nodegroups),
    /// Evaluate the reference controls against a cluster and its nodegroups.
    Check(check::Check),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(env!("CARGO_CRATE_NAME"), Some(args.log_level));
    if let Err(e) = run(args).await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = aws_config(
        &args.region,
        &args.assume_role,
        &args.assume_role_session_duration,
    )
    .await
    .context("Unable to create the aws config")?;
    let adapter = ResourceAdapter::new(EksClient::new(&config));
    match args.command {
        Command::Cluster(cluster) => cluster.run(&adapter).await,
        Command::Nodegroup(nodegroup) => nodegroup.run(&adapter).await,
        Command::Nodegroups(nodegroups) => nodegroups.run(&adapter).await,
        Command::Check(check) => check.run(&adapter).await,
    }
}
