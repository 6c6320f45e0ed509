use crate::clients::{CloudClient, CloudError, Failure, HttpStatusCode, StatusCode};
use crate::description::{ClusterDescription, NodegroupDescription};
use crate::error::{self, Error, ResourceKind, Result};
use log::{debug, info};
use snafu::IntoError;
use std::collections::HashSet;

const NOT_FOUND_CODES: &[&str] = &["ResourceNotFoundException", "NotFoundException"];

const UNAUTHORIZED_CODES: &[&str] = &[
    "AccessDeniedException",
    "UnauthorizedException",
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "ExpiredTokenException",
];

const THROTTLED_CODES: &[&str] = &[
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
];

const TRANSIENT_CODES: &[&str] = &["ServerException", "ServiceUnavailableException"];

/// The identifiers a fetch may need. Which ones are required depends on the [`ResourceKind`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Identifiers {
    pub cluster_name: Option<String>,
    pub nodegroup_name: Option<String>,
}

impl Identifiers {
    pub fn cluster(cluster_name: Option<String>) -> Self {
        Self {
            cluster_name,
            nodegroup_name: None,
        }
    }

    pub fn nodegroup(cluster_name: Option<String>, nodegroup_name: Option<String>) -> Self {
        Self {
            cluster_name,
            nodegroup_name,
        }
    }

    fn cluster_name(&self, kind: ResourceKind) -> Result<&str> {
        required(kind, "cluster_name", &self.cluster_name)
    }

    fn nodegroup_name(&self, kind: ResourceKind) -> Result<&str> {
        required(kind, "nodegroup_name", &self.nodegroup_name)
    }
}

/// An empty string is as good as no value for an identifier.
fn required<'a>(kind: ResourceKind, parameter: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => error::MissingParameterSnafu { kind, parameter }.fail(),
    }
}

/// What a fetch returns, by kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RawResponse {
    Cluster(ClusterDescription),
    Nodegroup(NodegroupDescription),
    /// Every nodegroup name of a cluster, across all pages, in listing order.
    NodegroupNames(Vec<String>),
}

/// Wraps a [`CloudClient`], checks identifiers before any call is made, and translates the
/// client's failures into the crate's [`Error`] taxonomy. Nothing is retried here; retries are
/// the client's business.
pub struct ResourceAdapter<C> {
    client: C,
}

impl<C> ResourceAdapter<C>
where
    C: CloudClient,
{
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn region(&self) -> Option<String> {
        self.client.region()
    }

    /// Fetch the raw description of a resource of `kind`.
    pub async fn fetch(&self, kind: ResourceKind, identifiers: &Identifiers) -> Result<RawResponse> {
        match kind {
            ResourceKind::Cluster => self
                .describe_cluster(identifiers)
                .await
                .map(RawResponse::Cluster),
            ResourceKind::Nodegroup => self
                .describe_nodegroup(identifiers)
                .await
                .map(RawResponse::Nodegroup),
            ResourceKind::NodegroupListing => self
                .list_nodegroup_names(identifiers)
                .await
                .map(RawResponse::NodegroupNames),
        }
    }

    pub async fn describe_cluster(&self, identifiers: &Identifiers) -> Result<ClusterDescription> {
        let kind = ResourceKind::Cluster;
        let name = identifiers.cluster_name(kind)?;
        self.client
            .describe_cluster(name)
            .await
            .map_err(|e| classify(kind, name, e))
    }

    pub async fn describe_nodegroup(
        &self,
        identifiers: &Identifiers,
    ) -> Result<NodegroupDescription> {
        let kind = ResourceKind::Nodegroup;
        let cluster_name = identifiers.cluster_name(kind)?;
        let nodegroup_name = identifiers.nodegroup_name(kind)?;
        self.client
            .describe_nodegroup(cluster_name, nodegroup_name)
            .await
            .map_err(|e| classify(kind, &format!("{}/{}", cluster_name, nodegroup_name), e))
    }

    /// List every nodegroup name of a cluster, following continuation tokens until the service
    /// stops returning one.
    pub async fn list_nodegroup_names(&self, identifiers: &Identifiers) -> Result<Vec<String>> {
        let kind = ResourceKind::NodegroupListing;
        let cluster_name = identifiers.cluster_name(kind)?;
        let mut names = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut next_token = None;
        let mut pages = 0;
        loop {
            let page = self
                .client
                .list_nodegroup_names(cluster_name, next_token)
                .await
                .map_err(|e| classify(kind, cluster_name, e))?;
            pages += 1;
            debug!(
                "Page {} of nodegroups for '{}' has {} names",
                pages,
                cluster_name,
                page.names.len()
            );
            names.extend(page.names);
            match page.next_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        return error::MalformedSnafu {
                            kind,
                            id: cluster_name,
                            what: format!("continuation token '{}' was returned twice", token),
                        }
                        .fail();
                    }
                    next_token = Some(token);
                }
                _ => break,
            }
        }
        info!(
            "Found {} nodegroups for cluster '{}' in {} pages",
            names.len(),
            cluster_name,
            pages
        );
        Ok(names)
    }
}

/// Map a [`CloudError`] onto the error taxonomy. Service errors are classified by their error
/// code first and their HTTP status second.
pub(crate) fn classify(kind: ResourceKind, id: &str, source: CloudError) -> Error {
    let id = id.to_string();
    match source.failure() {
        Failure::Timeout | Failure::Dispatch => {
            return error::TransientSnafu { kind, id }.into_error(source)
        }
        Failure::Response => {
            return error::MalformedSnafu {
                kind,
                id,
                what: source.to_string(),
            }
            .build()
        }
        Failure::Construction => return error::RejectedSnafu { kind, id }.into_error(source),
        Failure::Service => {}
    }

    let code = source.code().unwrap_or_default();
    if NOT_FOUND_CODES.contains(&code) || source.is_status_code(StatusCode::NOT_FOUND) {
        error::NotFoundSnafu { kind, id }.into_error(source)
    } else if UNAUTHORIZED_CODES.contains(&code)
        || source.is_status_code(StatusCode::UNAUTHORIZED)
        || source.is_status_code(StatusCode::FORBIDDEN)
    {
        error::UnauthorizedSnafu { kind, id }.into_error(source)
    } else if THROTTLED_CODES.contains(&code)
        || source.is_status_code(StatusCode::TOO_MANY_REQUESTS)
    {
        error::ThrottledSnafu { kind, id }.into_error(source)
    } else if TRANSIENT_CODES.contains(&code)
        || source
            .status_code()
            .map(|status| status.is_server_error())
            .unwrap_or_default()
    {
        error::TransientSnafu { kind, id }.into_error(source)
    } else {
        error::RejectedSnafu { kind, id }.into_error(source)
    }
}
