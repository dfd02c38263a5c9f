use crate::domain::model::{
    CsrfToken, FieldErrors, FileSource, SubmitOutcome, UploadForm, FILE_FIELD,
};
use crate::domain::ports::{ConfigProvider, FormSubmitter};
use crate::utils::error::{AssistError, Result};
use async_trait::async_trait;
use reqwest::header::{COOKIE, REFERER};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// The `errors` member of a JSON object body, when present and not null.
/// Its shape is checked by the caller so an unexpected layout is never
/// mistaken for success.
fn error_payload(body: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(mut obj) => obj.remove("errors").filter(|v| !v.is_null()),
        _ => None,
    }
}

/// Posts the upload form as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
    csrf_cookie_name: String,
    csrf_header_name: String,
}

impl HttpSubmitter {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    pub fn with_client<C: ConfigProvider + ?Sized>(client: Client, config: &C) -> Self {
        Self {
            client,
            endpoint: config.endpoint().to_string(),
            csrf_cookie_name: config.csrf_cookie_name().to_string(),
            csrf_header_name: config.csrf_header_name().to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn build_multipart(&self, form: &UploadForm) -> Result<Form> {
        let mut multipart = Form::new();
        for (name, value) in form.text_fields() {
            multipart = multipart.text(name, value.to_string());
        }

        if let Some(file) = &form.userfile {
            let bytes = match &file.source {
                FileSource::Bytes(bytes) => bytes.clone(),
                FileSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        AssistError::MissingFile {
                            path: path.display().to_string(),
                        }
                    } else {
                        AssistError::IoError(e)
                    }
                })?,
            };
            tracing::debug!("Attaching '{}' ({} bytes)", file.name, bytes.len());
            multipart = multipart.part(FILE_FIELD, Part::bytes(bytes).file_name(file.name.clone()));
        }

        Ok(multipart)
    }
}

#[async_trait]
impl FormSubmitter for HttpSubmitter {
    async fn submit(&self, form: &UploadForm, csrf: Option<&CsrfToken>) -> Result<SubmitOutcome> {
        let multipart = self.build_multipart(form).await?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(REFERER, &self.endpoint)
            .multipart(multipart);

        match csrf {
            Some(token) => {
                request = request
                    .header(self.csrf_header_name.as_str(), token.as_str())
                    .header(
                        COOKIE,
                        format!(
                            "{}={}",
                            self.csrf_cookie_name,
                            urlencoding::encode(token.as_str())
                        ),
                    );
            }
            None => tracing::warn!("Submitting without a CSRF token"),
        }

        tracing::info!("Submitting upload form to {}", self.endpoint);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Upload response status: {}", status);

        let body = response.text().await?;

        if let Some(errors) = error_payload(&body) {
            let errors = serde_json::from_value::<FieldErrors>(errors).map_err(|e| {
                tracing::error!("Unreadable 'errors' payload from {}: {}", self.endpoint, e);
                AssistError::SerializationError(e)
            })?;
            tracing::info!("Server rejected {} field(s)", errors.len());
            return Ok(SubmitOutcome::Rejected(errors));
        }

        if !status.is_success() {
            return Err(AssistError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(SubmitOutcome::Success(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_detection() {
        assert!(error_payload(r#"{"errors": {"trans_num": []}}"#).is_some());
        assert!(error_payload(r#"{"errors": {"trans_num": ["too short"]}}"#).is_some());
        assert!(error_payload(r#"{"errors": null}"#).is_none());
        assert!(error_payload(r#"{"status": "ok"}"#).is_none());
        assert!(error_payload("Success! 12345678901234 uploaded.").is_none());
        assert!(error_payload(r#"["errors"]"#).is_none());
    }
}
