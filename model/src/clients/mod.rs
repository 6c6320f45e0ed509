/*!

The `CloudClient` seam between the resource models and the EKS control plane API. The production
implementation is [`EksClient`]; tests inject their own implementations.

!*/

mod cloud_error;
mod eks_client;
mod http_status_code;

pub use cloud_error::{CloudError, Failure};
pub use eks_client::EksClient;
pub use http_status_code::{HttpStatusCode, StatusCode};

use crate::description::{ClusterDescription, NodegroupDescription, NodegroupPage};

/// The calls the resource models need from the cloud provider. Implementations own
/// authentication, retries and transport; they report failures as [`CloudError`] and leave the
/// classification of those failures to the [`ResourceAdapter`](crate::ResourceAdapter).
#[async_trait::async_trait]
pub trait CloudClient: Send + Sync {
    /// The region the client talks to, if known.
    fn region(&self) -> Option<String>;

    async fn describe_cluster(&self, name: &str) -> Result<ClusterDescription, CloudError>;

    /// Fetch one page of nodegroup names. `next_token` is the continuation token returned with
    /// the previous page, `None` for the first page.
    async fn list_nodegroup_names(
        &self,
        cluster_name: &str,
        next_token: Option<String>,
    ) -> Result<NodegroupPage, CloudError>;

    async fn describe_nodegroup(
        &self,
        cluster_name: &str,
        nodegroup_name: &str,
    ) -> Result<NodegroupDescription, CloudError>;
}
