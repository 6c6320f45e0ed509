/*!

This library inspects EKS clusters and their managed nodegroups and exposes what it finds as
immutable snapshots with derived predicates, plus a generic table for collections of resources.

```no_run
use eksinspect_model::clients::EksClient;
use eksinspect_model::{ClusterParams, ClusterResource, ResourceAdapter};
# async fn no_run(config: aws_types::SdkConfig) -> eksinspect_model::Result<()> {
let adapter = ResourceAdapter::new(EksClient::new(&config));
let cluster = ClusterResource::build(&adapter, &ClusterParams::new("prod")).await?;
if cluster.exists() && cluster.is_public() {
    println!("{} is reachable from the internet", cluster);
}
# Ok(())
# }
```

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use adapter::{Identifiers, RawResponse, ResourceAdapter};
pub use cluster::{ClusterResource, EncryptionEntry, LoggingEntry};
pub use error::{Error, ErrorKind, ResourceKind, Result};
pub use nodegroup::{HealthIssue, NodegroupResource, ScalingBounds};
pub use nodegroups::{columns, nodegroup_schema, NodegroupRow, NodegroupTable};
pub use params::{ClusterParams, NodegroupParams, NodegroupsParams};
pub use table::{Cell, CollectionTable, Schema};

mod adapter;
pub mod arn;
pub mod clients;
pub mod cluster;
pub mod description;
mod error;
pub mod nodegroup;
pub mod nodegroups;
mod params;
pub mod table;
