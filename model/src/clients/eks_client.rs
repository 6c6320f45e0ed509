use super::{CloudClient, CloudError, Failure, StatusCode};
use crate::description::{
    AutoScalingGroup, CertificateAuthority, ClusterDescription, EncryptionConfig,
    EncryptionProvider, Identity, Issue, LogSetup, Logging, NodegroupDescription,
    NodegroupHealth, NodegroupPage, NodegroupResources, Oidc, RemoteAccess, ScalingConfig,
    VpcConfig,
};
use aws_sdk_eks::model::{Cluster, Nodegroup};
use aws_sdk_eks::types::SdkError;
use aws_smithy_types::date_time::Format;
use aws_smithy_types::retry::ProvideErrorKind;
use aws_smithy_types::DateTime;
use aws_types::SdkConfig;
use log::{debug, trace};

/// A [`CloudClient`] backed by the AWS SDK. Retries, credentials and endpoint resolution come
/// from the `SdkConfig` it is created with.
#[derive(Clone)]
pub struct EksClient {
    client: aws_sdk_eks::Client,
    region: Option<String>,
}

impl EksClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_eks::Client::new(config),
            region: config.region().map(|region| region.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl CloudClient for EksClient {
    fn region(&self) -> Option<String> {
        self.region.clone()
    }

    async fn describe_cluster(&self, name: &str) -> Result<ClusterDescription, CloudError> {
        debug!("Calling DescribeCluster for '{}'", name);
        let cluster = self
            .client
            .describe_cluster()
            .name(name)
            .send()
            .await
            .map_err(|e| cloud_error("DescribeCluster", e))?
            .cluster
            .ok_or_else(|| {
                CloudError::new(Failure::Response, "DescribeCluster response missing cluster")
            })?;
        trace!("DescribeCluster '{}': {:?}", name, cluster);
        Ok(cluster_description(cluster))
    }

    async fn list_nodegroup_names(
        &self,
        cluster_name: &str,
        next_token: Option<String>,
    ) -> Result<NodegroupPage, CloudError> {
        debug!(
            "Calling ListNodegroups for '{}' (continuation: {})",
            cluster_name,
            next_token.is_some()
        );
        let output = self
            .client
            .list_nodegroups()
            .cluster_name(cluster_name)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| cloud_error("ListNodegroups", e))?;
        Ok(NodegroupPage {
            names: output.nodegroups.unwrap_or_default(),
            next_token: output.next_token,
        })
    }

    async fn describe_nodegroup(
        &self,
        cluster_name: &str,
        nodegroup_name: &str,
    ) -> Result<NodegroupDescription, CloudError> {
        debug!(
            "Calling DescribeNodegroup for '{}/{}'",
            cluster_name, nodegroup_name
        );
        let nodegroup = self
            .client
            .describe_nodegroup()
            .cluster_name(cluster_name)
            .nodegroup_name(nodegroup_name)
            .send()
            .await
            .map_err(|e| cloud_error("DescribeNodegroup", e))?
            .nodegroup
            .ok_or_else(|| {
                CloudError::new(
                    Failure::Response,
                    "DescribeNodegroup response missing nodegroup",
                )
            })?;
        trace!(
            "DescribeNodegroup '{}/{}': {:?}",
            cluster_name,
            nodegroup_name,
            nodegroup
        );
        Ok(nodegroup_description(nodegroup))
    }
}

/// Keep what the SDK knows about a failure (service error code and HTTP status) so the adapter
/// can classify it.
fn cloud_error<E>(operation: &str, err: SdkError<E>) -> CloudError
where
    E: ProvideErrorKind + std::error::Error + Send + Sync + 'static,
{
    let failure = match &err {
        SdkError::ServiceError(_) => Failure::Service,
        SdkError::TimeoutError(_) => Failure::Timeout,
        SdkError::DispatchFailure(_) => Failure::Dispatch,
        SdkError::ResponseError(_) => Failure::Response,
        _ => Failure::Construction,
    };
    if let SdkError::ServiceError(service_error) = &err {
        let status = StatusCode::from_u16(service_error.raw().http().status().as_u16()).ok();
        let code = service_error.err().code().map(str::to_string);
        let message = format!("{} failed: {}", operation, service_error.err());
        return CloudError::service(code, status, message).with_source(err);
    }
    let message = format!("{} failed: {}", operation, err);
    CloudError::new(failure, message).with_source(err)
}

fn date_time(value: &DateTime) -> Option<String> {
    value.fmt(Format::DateTime).ok()
}

fn cluster_description(cluster: Cluster) -> ClusterDescription {
    ClusterDescription {
        created_at: cluster.created_at.as_ref().and_then(date_time),
        name: cluster.name,
        arn: cluster.arn,
        version: cluster.version,
        endpoint: cluster.endpoint,
        role_arn: cluster.role_arn,
        resources_vpc_config: cluster.resources_vpc_config.map(|vpc| VpcConfig {
            subnet_ids: vpc.subnet_ids,
            security_group_ids: vpc.security_group_ids,
            cluster_security_group_id: vpc.cluster_security_group_id,
            vpc_id: vpc.vpc_id,
            endpoint_public_access: Some(vpc.endpoint_public_access),
            endpoint_private_access: Some(vpc.endpoint_private_access),
            public_access_cidrs: vpc.public_access_cidrs,
        }),
        logging: cluster.logging.map(|logging| Logging {
            cluster_logging: logging.cluster_logging.map(|setups| {
                setups
                    .into_iter()
                    .map(|setup| LogSetup {
                        types: setup.types.map(|types| {
                            types
                                .iter()
                                .map(|log_type| log_type.as_str().to_string())
                                .collect()
                        }),
                        enabled: setup.enabled,
                    })
                    .collect()
            }),
        }),
        identity: cluster.identity.map(|identity| Identity {
            oidc: identity.oidc.map(|oidc| Oidc {
                issuer: oidc.issuer,
            }),
        }),
        status: cluster.status.map(|status| status.as_str().to_string()),
        certificate_authority: cluster
            .certificate_authority
            .map(|certificate| CertificateAuthority {
                data: certificate.data,
            }),
        platform_version: cluster.platform_version,
        tags: cluster.tags.map(|tags| tags.into_iter().collect()),
        encryption_config: cluster.encryption_config.map(|configs| {
            configs
                .into_iter()
                .map(|config| EncryptionConfig {
                    resources: config.resources,
                    provider: config.provider.map(|provider| EncryptionProvider {
                        key_arn: provider.key_arn,
                    }),
                })
                .collect()
        }),
    }
}

fn nodegroup_description(nodegroup: Nodegroup) -> NodegroupDescription {
    NodegroupDescription {
        created_at: nodegroup.created_at.as_ref().and_then(date_time),
        nodegroup_name: nodegroup.nodegroup_name,
        nodegroup_arn: nodegroup.nodegroup_arn,
        cluster_name: nodegroup.cluster_name,
        version: nodegroup.version,
        release_version: nodegroup.release_version,
        status: nodegroup.status.map(|status| status.as_str().to_string()),
        capacity_type: nodegroup
            .capacity_type
            .map(|capacity_type| capacity_type.as_str().to_string()),
        scaling_config: nodegroup.scaling_config.map(|scaling| ScalingConfig {
            min_size: scaling.min_size,
            max_size: scaling.max_size,
            desired_size: scaling.desired_size,
        }),
        instance_types: nodegroup.instance_types,
        subnets: nodegroup.subnets,
        remote_access: nodegroup.remote_access.map(|remote_access| RemoteAccess {
            ec2_ssh_key: remote_access.ec2_ssh_key,
            source_security_groups: remote_access.source_security_groups,
        }),
        ami_type: nodegroup.ami_type.map(|ami_type| ami_type.as_str().to_string()),
        node_role: nodegroup.node_role,
        labels: nodegroup.labels.map(|labels| labels.into_iter().collect()),
        resources: nodegroup.resources.map(|resources| NodegroupResources {
            auto_scaling_groups: resources.auto_scaling_groups.map(|groups| {
                groups
                    .into_iter()
                    .map(|group| AutoScalingGroup { name: group.name })
                    .collect()
            }),
            remote_access_security_group: resources.remote_access_security_group,
        }),
        disk_size: nodegroup.disk_size,
        health: nodegroup.health.map(|health| NodegroupHealth {
            issues: health.issues.map(|issues| {
                issues
                    .into_iter()
                    .map(|issue| Issue {
                        code: issue.code.map(|code| code.as_str().to_string()),
                        message: issue.message,
                        resource_ids: issue.resource_ids,
                    })
                    .collect()
            }),
        }),
        tags: nodegroup.tags.map(|tags| tags.into_iter().collect()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use aws_sdk_eks::error::DescribeClusterError;
    use aws_sdk_eks::model::{
        AmiTypes, AutoScalingGroup as SdkAutoScalingGroup, CapacityTypes, ClusterStatus,
        EncryptionConfig as SdkEncryptionConfig, Issue as SdkIssue, LogSetup as SdkLogSetup,
        LogType, Logging as SdkLogging, NodegroupHealth as SdkNodegroupHealth,
        NodegroupIssueCode, NodegroupResources as SdkNodegroupResources,
        NodegroupScalingConfig, NodegroupStatus, Provider, RemoteAccessConfig, VpcConfigResponse,
    };
    use aws_smithy_http::body::SdkBody;
    use aws_smithy_http::operation;

    #[test]
    fn cluster_is_flattened() {
        let cluster = Cluster::builder()
            .name("prod")
            .arn("arn:aws:eks:us-west-2:111122223333:cluster/prod")
            .version("1.24")
            .status(ClusterStatus::Active)
            .created_at(DateTime::from_secs(1_672_531_200))
            .resources_vpc_config(
                VpcConfigResponse::builder()
                    .vpc_id("vpc-1")
                    .subnet_ids("subnet-a")
                    .subnet_ids("subnet-b")
                    .endpoint_public_access(true)
                    .endpoint_private_access(false)
                    .public_access_cidrs("0.0.0.0/0")
                    .build(),
            )
            .logging(
                SdkLogging::builder()
                    .cluster_logging(
                        SdkLogSetup::builder()
                            .types(LogType::Api)
                            .types(LogType::ControllerManager)
                            .enabled(true)
                            .build(),
                    )
                    .build(),
            )
            .encryption_config(
                SdkEncryptionConfig::builder()
                    .resources("secrets")
                    .provider(
                        Provider::builder()
                            .key_arn("arn:aws:kms:us-west-2:111122223333:key/abc")
                            .build(),
                    )
                    .build(),
            )
            .tags("team", "platform")
            .build();

        let description = cluster_description(cluster);
        assert_eq!(description.name.as_deref(), Some("prod"));
        assert_eq!(description.status.as_deref(), Some("ACTIVE"));
        assert_eq!(
            description.created_at.as_deref(),
            Some("2023-01-01T00:00:00Z")
        );
        let vpc = description.resources_vpc_config.unwrap();
        assert_eq!(vpc.endpoint_public_access, Some(true));
        assert_eq!(vpc.endpoint_private_access, Some(false));
        assert_eq!(vpc.subnet_ids.unwrap(), vec!["subnet-a", "subnet-b"]);
        let setups = description.logging.unwrap().cluster_logging.unwrap();
        assert_eq!(
            setups[0].types.as_deref().unwrap(),
            ["api".to_string(), "controllerManager".to_string()]
        );
        assert_eq!(setups[0].enabled, Some(true));
        let encryption = description.encryption_config.unwrap();
        assert_eq!(encryption[0].resources.as_deref().unwrap(), ["secrets".to_string()]);
        assert_eq!(
            description.tags.unwrap().get("team").map(String::as_str),
            Some("platform")
        );
    }

    #[test]
    fn nodegroup_is_flattened() {
        let nodegroup = Nodegroup::builder()
            .nodegroup_name("blue")
            .nodegroup_arn("arn:aws:eks:us-west-2:111122223333:nodegroup/prod/blue/abc")
            .cluster_name("prod")
            .status(NodegroupStatus::Degraded)
            .ami_type(AmiTypes::BottlerocketX8664)
            .capacity_type(CapacityTypes::Spot)
            .scaling_config(
                NodegroupScalingConfig::builder()
                    .min_size(1)
                    .max_size(3)
                    .desired_size(2)
                    .build(),
            )
            .remote_access(
                RemoteAccessConfig::builder()
                    .ec2_ssh_key("ops")
                    .source_security_groups("sg-1")
                    .build(),
            )
            .resources(
                SdkNodegroupResources::builder()
                    .auto_scaling_groups(SdkAutoScalingGroup::builder().name("asg-blue").build())
                    .remote_access_security_group("sg-remote")
                    .build(),
            )
            .health(
                SdkNodegroupHealth::builder()
                    .issues(
                        SdkIssue::builder()
                            .code(NodegroupIssueCode::AsgInstanceLaunchFailures)
                            .message("launch failed")
                            .resource_ids("i-1")
                            .build(),
                    )
                    .build(),
            )
            .labels("role", "worker")
            .build();

        let description = nodegroup_description(nodegroup);
        assert_eq!(description.nodegroup_name.as_deref(), Some("blue"));
        assert_eq!(description.status.as_deref(), Some("DEGRADED"));
        assert_eq!(description.ami_type.as_deref(), Some("BOTTLEROCKET_x86_64"));
        assert_eq!(description.capacity_type.as_deref(), Some("SPOT"));
        assert!(description.created_at.is_none());
        let scaling = description.scaling_config.unwrap();
        assert_eq!(
            (scaling.min_size, scaling.max_size, scaling.desired_size),
            (Some(1), Some(3), Some(2))
        );
        let remote_access = description.remote_access.unwrap();
        assert_eq!(remote_access.ec2_ssh_key.as_deref(), Some("ops"));
        assert_eq!(
            remote_access.source_security_groups.unwrap(),
            vec!["sg-1"]
        );
        let resources = description.resources.unwrap();
        assert_eq!(
            resources.auto_scaling_groups.unwrap()[0].name.as_deref(),
            Some("asg-blue")
        );
        let issues = description.health.unwrap().issues.unwrap();
        assert_eq!(issues[0].code.as_deref(), Some("AsgInstanceLaunchFailures"));
        assert_eq!(issues[0].resource_ids.as_deref().unwrap(), ["i-1".to_string()]);
    }

    #[test]
    fn service_error_keeps_code_and_status() {
        let raw = operation::Response::new(
            http::Response::builder()
                .status(404)
                .body(SdkBody::empty())
                .unwrap(),
        );
        let err = DescribeClusterError::generic(
            aws_smithy_types::Error::builder()
                .code("ResourceNotFoundException")
                .message("No cluster found for name: prod.")
                .build(),
        );
        let cloud_error = cloud_error("DescribeCluster", SdkError::service_error(err, raw));
        assert_eq!(cloud_error.failure(), Failure::Service);
        assert_eq!(cloud_error.code(), Some("ResourceNotFoundException"));
        assert_eq!(cloud_error.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn transport_errors_keep_their_failure() {
        let timeout: SdkError<DescribeClusterError> = SdkError::timeout_error("too slow");
        let cloud_error = cloud_error("DescribeCluster", timeout);
        assert_eq!(cloud_error.failure(), Failure::Timeout);
        assert_eq!(cloud_error.code(), None);
        assert_eq!(cloud_error.status(), None);

        let construction: SdkError<DescribeClusterError> =
            SdkError::construction_failure("bad input");
        assert_eq!(
            super::cloud_error("DescribeCluster", construction).failure(),
            Failure::Construction
        );
    }
}
