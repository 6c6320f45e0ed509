use crate::clients::CloudError;
use snafu::Snafu;
use std::fmt::{Display, Formatter};

/// The `Result` type returned by the resource builders, the adapter and the tables.
pub type Result<T> = std::result::Result<T, Error>;

/// The failures a resource fetch can end with. Everything other than `NotFound` means the
/// resource could not be inspected, which is different from a resource that was inspected and
/// found to be non-compliant.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Missing required parameter '{}' for {}", parameter, kind))]
    MissingParameter {
        kind: ResourceKind,
        parameter: String,
    },

    #[snafu(display("{} '{}' was not found: {}", kind, id, source))]
    NotFound {
        kind: ResourceKind,
        id: String,
        source: CloudError,
    },

    #[snafu(display("Not authorized to inspect {} '{}': {}", kind, id, source))]
    Unauthorized {
        kind: ResourceKind,
        id: String,
        source: CloudError,
    },

    #[snafu(display("Request for {} '{}' was throttled: {}", kind, id, source))]
    Throttled {
        kind: ResourceKind,
        id: String,
        source: CloudError,
    },

    #[snafu(display("Transient failure while fetching {} '{}': {}", kind, id, source))]
    Transient {
        kind: ResourceKind,
        id: String,
        source: CloudError,
    },

    #[snafu(display("Request for {} '{}' was rejected: {}", kind, id, source))]
    Rejected {
        kind: ResourceKind,
        id: String,
        source: CloudError,
    },

    #[snafu(display("Response for {} '{}' is malformed: {}", kind, id, what))]
    Malformed {
        kind: ResourceKind,
        id: String,
        what: String,
    },

    #[snafu(display("Column '{}' is not registered, known columns: {:?}", column, known))]
    UnknownColumn { column: String, known: Vec<String> },
}

impl Error {
    /// The kind of failure without its payload, for callers that only need to branch on it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingParameter { .. } => ErrorKind::MissingParameter,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Unauthorized { .. } => ErrorKind::Unauthorized,
            Error::Throttled { .. } => ErrorKind::Throttled,
            Error::Transient { .. } => ErrorKind::Transient,
            Error::Rejected { .. } => ErrorKind::Rejected,
            Error::Malformed { .. } => ErrorKind::Malformed,
            Error::UnknownColumn { .. } => ErrorKind::UnknownColumn,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    MissingParameter,
    NotFound,
    Unauthorized,
    Throttled,
    Transient,
    Rejected,
    Malformed,
    UnknownColumn,
}

/// The kinds of resources the adapter knows how to fetch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Cluster,
    Nodegroup,
    NodegroupListing,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Cluster => write!(f, "cluster"),
            ResourceKind::Nodegroup => write!(f, "nodegroup"),
            ResourceKind::NodegroupListing => write!(f, "nodegroup listing"),
        }
    }
}
