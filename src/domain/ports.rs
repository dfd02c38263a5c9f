use crate::domain::model::{CsrfToken, SubmitOutcome, UploadForm};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn csrf_cookie_name(&self) -> &str;
    fn csrf_header_name(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}

/// Sends a filled form to the upload endpoint.
///
/// `Ok(SubmitOutcome::Rejected)` carries field-level validation errors and is
/// recoverable; `Err` is reserved for transport and protocol failures.
#[async_trait]
pub trait FormSubmitter: Send + Sync {
    async fn submit(&self, form: &UploadForm, csrf: Option<&CsrfToken>) -> Result<SubmitOutcome>;
}
