pub(crate) mod mock;

use eksinspect_model::{
    ClusterParams, ClusterResource, ErrorKind, Identifiers, RawResponse, ResourceAdapter,
    ResourceKind,
};
use mock::MockCloudClient;
use serde_json::{json, Value};

const ARN: &str = "arn:aws:eks:us-west-2:111122223333:cluster/prod";

fn prod(vpc: Value) -> Value {
    json!({
        "name": "prod",
        "arn": ARN,
        "version": "1.24",
        "status": "ACTIVE",
        "platformVersion": "eks.5",
        "resourcesVpcConfig": vpc,
        "logging": { "clusterLogging": [
            { "types": ["api", "audit", "authenticator", "controllerManager", "scheduler"], "enabled": true }
        ]},
        "tags": { "team": "platform" }
    })
}

#[tokio::test]
async fn public_endpoint_open_to_the_world() {
    let adapter = ResourceAdapter::new(MockCloudClient::new().region("us-west-2").cluster(
        "prod",
        prod(json!({
            "endpointPrivateAccess": false,
            "endpointPublicAccess": true,
            "publicAccessCidrs": ["0.0.0.0/0"]
        })),
    ));
    let cluster = ClusterResource::build(&adapter, &ClusterParams::new("prod"))
        .await
        .unwrap();
    assert!(cluster.exists());
    assert!(cluster.is_public());
    assert!(cluster.active());
    assert_eq!(cluster.full_name(), "us-west-2/prod");
    assert_eq!(cluster.major_version(), "1");
    assert_eq!(cluster.minor_version(), "24");
    assert_eq!(
        cluster.logs_enabled(),
        vec!["api", "audit", "authenticator", "controllerManager", "scheduler"]
    );
    assert_eq!(cluster.tags().get("team").map(String::as_str), Some("platform"));
    assert_eq!(adapter.client().calls(), vec!["describe_cluster prod"]);
}

#[tokio::test]
async fn private_access_overrides_public_access() {
    let adapter = ResourceAdapter::new(MockCloudClient::new().cluster(
        "prod",
        prod(json!({
            "endpointPrivateAccess": true,
            "endpointPublicAccess": true,
            "publicAccessCidrs": ["0.0.0.0/0"]
        })),
    ));
    let cluster = ClusterResource::build(&adapter, &ClusterParams::new("prod"))
        .await
        .unwrap();
    assert!(!cluster.is_public());
}

#[tokio::test]
async fn region_parameter_wins_over_client_region() {
    let adapter = ResourceAdapter::new(
        MockCloudClient::new()
            .region("us-west-2")
            .cluster("prod", prod(json!({}))),
    );
    let cluster = ClusterResource::build(&adapter, &ClusterParams::new("prod").region("eu-west-1"))
        .await
        .unwrap();
    assert_eq!(cluster.full_name(), "eu-west-1/prod");
}

#[tokio::test]
async fn missing_cluster_does_not_exist() {
    let adapter = ResourceAdapter::new(MockCloudClient::new().region("us-west-2"));
    let cluster = ClusterResource::build(&adapter, &ClusterParams::new("gone"))
        .await
        .unwrap();
    assert!(!cluster.exists());
    assert_eq!(cluster.name(), "gone");
    assert!(cluster.subnets().is_empty());
    assert!(!cluster.has_encryption_enabled());
}

#[tokio::test]
async fn missing_cluster_name_never_reaches_the_client() {
    let adapter = ResourceAdapter::new(MockCloudClient::new());
    for params in [
        ClusterParams::default(),
        ClusterParams {
            cluster_name: Some(String::new()),
            region: None,
        },
    ] {
        let err = ClusterResource::build(&adapter, &params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
    }
    assert!(adapter.client().calls().is_empty());
}

#[tokio::test]
async fn adapter_failures_propagate() {
    for (code, status, kind) in [
        ("AccessDeniedException", 403, ErrorKind::Unauthorized),
        ("ThrottlingException", 400, ErrorKind::Throttled),
        ("ServerException", 500, ErrorKind::Transient),
        ("InvalidParameterException", 400, ErrorKind::Rejected),
    ] {
        let adapter = ResourceAdapter::new(
            MockCloudClient::new()
                .cluster("prod", prod(json!({})))
                .failing(code, status),
        );
        let err = ClusterResource::build(&adapter, &ClusterParams::new("prod"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), kind, "{}", code);
        assert_eq!(adapter.client().calls().len(), 1);
    }
}

#[tokio::test]
async fn response_without_arn_is_malformed() {
    let adapter = ResourceAdapter::new(
        MockCloudClient::new().cluster("prod", json!({ "name": "prod", "version": "1.24" })),
    );
    let err = ClusterResource::build(&adapter, &ClusterParams::new("prod"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn fetch_by_kind() {
    let adapter = ResourceAdapter::new(MockCloudClient::new().cluster("prod", prod(json!({}))));
    let response = adapter
        .fetch(
            ResourceKind::Cluster,
            &Identifiers::cluster(Some("prod".to_string())),
        )
        .await
        .unwrap();
    match response {
        RawResponse::Cluster(description) => assert_eq!(description.arn.as_deref(), Some(ARN)),
        other => panic!("unexpected response {:?}", other),
    }
    let err = adapter
        .fetch(ResourceKind::Nodegroup, &Identifiers::cluster(Some("prod".to_string())))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingParameter);
}
