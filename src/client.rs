//! Companion client for the generate endpoint: uploads the template and
//! data file, decodes JSON error bodies on failure, and returns the raw
//! ZIP bundle on success.

use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::generate::models::OutputFormat;
use crate::ErrorBody;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Server(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A file to upload: name plus contents.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Issue the multipart generate request. Non-2xx responses are turned into
/// a descriptive failure from the server's JSON error body, falling back to
/// a generic message with the status code.
pub async fn generate(
    base_url: &str,
    template: FileUpload,
    data: FileUpload,
    output_format: Option<OutputFormat>,
) -> Result<Vec<u8>, ClientError> {
    let mut url = format!("{}/api/generate", base_url.trim_end_matches('/'));
    if let Some(format) = output_format {
        url.push_str("?outputFormat=");
        url.push_str(format.as_str());
    }

    let form = Form::new()
        .part(
            "template",
            Part::bytes(template.bytes).file_name(template.filename),
        )
        .part("data", Part::bytes(data.bytes).file_name(data.filename));

    let response = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => describe_error(&body, status.as_u16()),
            Err(_) => format!("Request failed: {}", status.as_u16()),
        };
        return Err(ClientError::Server(message));
    }

    Ok(response.bytes().await?.to_vec())
}

fn describe_error(body: &ErrorBody, status: u16) -> String {
    if !body.error.is_empty() {
        body.error.clone()
    } else if let Some(detail) = body.detail.as_ref().filter(|d| !d.is_empty()) {
        detail.clone()
    } else {
        format!("Request failed: {status}")
    }
}
