use super::StatusCode;
use std::fmt::{Display, Formatter};

/// How a call to the cloud provider failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Failure {
    /// The service answered with an error.
    Service,
    /// The request timed out.
    Timeout,
    /// The request could not be sent, or the connection broke.
    Dispatch,
    /// A response arrived but could not be parsed.
    Response,
    /// The request could not be built.
    Construction,
}

/// The error type returned by [`CloudClient`](super::CloudClient) implementations. It carries
/// what the provider told us (an error code and an HTTP status for service errors) without
/// deciding what that means for the inspection.
#[derive(Debug)]
pub struct CloudError {
    failure: Failure,
    code: Option<String>,
    status: Option<StatusCode>,
    message: String,
    inner: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl CloudError {
    /// An error answered by the service, e.g. `ResourceNotFoundException`.
    pub fn service<S1, S2>(code: Option<S1>, status: Option<StatusCode>, message: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            failure: Failure::Service,
            code: code.map(Into::into),
            status,
            message: message.into(),
            inner: None,
        }
    }

    /// An error that happened before or instead of a service answer.
    pub fn new<S>(failure: Failure, message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            failure,
            code: None,
            status: None,
            message: message.into(),
            inner: None,
        }
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.inner = Some(source.into());
        self
    }

    pub fn failure(&self) -> Failure {
        self.failure
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for CloudError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.code, self.status) {
            (Some(code), Some(status)) => write!(f, "{} ({}): {}", code, status, self.message),
            (Some(code), None) => write!(f, "{}: {}", code, self.message),
            (None, Some(status)) => write!(f, "{}: {}", status, self.message),
            (None, None) => write!(f, "{:?} failure: {}", self.failure, self.message),
        }
    }
}

impl std::error::Error for CloudError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .as_ref()
            .map(|inner| inner.as_ref() as &(dyn std::error::Error + 'static))
    }
}
