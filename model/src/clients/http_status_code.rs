use super::CloudError;
pub use http::StatusCode;

pub trait HttpStatusCode {
    fn status_code(&self) -> Option<StatusCode>;

    fn is_status_code(&self, status_code: StatusCode) -> bool {
        self.status_code()
            .map(|some| some == status_code)
            .unwrap_or_default()
    }
}

impl HttpStatusCode for CloudError {
    fn status_code(&self) -> Option<StatusCode> {
        self.status()
    }
}
