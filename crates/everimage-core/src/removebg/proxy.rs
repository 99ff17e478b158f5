//! Server side of background removal.
//!
//! The handler validates the upload, forwards it to a segmentation service
//! through [`Upstream`] and turns the outcome into a [`ProxyResponse`].
//! Failures are responses with a JSON `{"error": ...}` body, never `Err`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::removebg::RemoveBgConfig;

/// A file field of a multipart upload.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Incoming request: the `image` form field, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemoveBgRequest {
    pub image: Option<UploadedFile>,
}

/// What is sent to the segmentation service.
#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamRequest {
    pub endpoint: String,
    /// Always `"auto"`.
    pub size: String,
    pub image_file: UploadedFile,
    /// Sent as `X-Api-Key`; empty when no key is configured.
    pub api_key: String,
}

impl UpstreamRequest {
    /// `Content-Type` header for [`multipart_body`](Self::multipart_body).
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={boundary}")
    }

    /// The form the segmentation service expects: a `size` field followed
    /// by the `image_file` upload.
    pub fn multipart_body(&self, boundary: &str) -> Vec<u8> {
        let file = &self.image_file;
        let mut body = Vec::with_capacity(file.bytes.len() + 512);
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"size\"\r\n\r\n{}\r\n",
                self.size
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image_file\"; \
                 filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.name.replace('"', "_"),
                file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        body
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// The remote segmentation service.
pub trait Upstream {
    fn remove_background(
        &self,
        request: &UpstreamRequest,
    ) -> std::result::Result<UpstreamResponse, UpstreamError>;
}

#[derive(Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ProxyResponse {
    pub fn json_error(status: u16, message: impl Into<String>) -> Self {
        let body = serde_json::to_vec(&ErrorBody {
            error: message.into(),
        })
        .unwrap_or_default();
        Self {
            status,
            content_type: "application/json".into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body,
        }
    }

    pub fn png(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "image/png".into(),
            headers: vec![
                ("Content-Type".into(), "image/png".into()),
                ("Content-Length".into(), body.len().to_string()),
            ],
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `error` field of a JSON error body.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .map(|b| b.error)
    }
}

/// Handle `POST /api/remove-bg`.
pub fn handle_remove_bg(
    request: &RemoveBgRequest,
    upstream: &dyn Upstream,
    config: &RemoveBgConfig,
) -> ProxyResponse {
    let Some(image) = &request.image else {
        return ProxyResponse::json_error(400, "No image provided");
    };

    let upstream_request = UpstreamRequest {
        endpoint: config.endpoint.clone(),
        size: "auto".into(),
        image_file: image.clone(),
        api_key: config.resolve_api_key(),
    };

    match upstream.remove_background(&upstream_request) {
        Ok(response) if response.is_success() => {
            info!(
                file = %image.name,
                input_bytes = image.bytes.len(),
                output_bytes = response.body.len(),
                "Background removed"
            );
            ProxyResponse::png(response.body)
        }
        Ok(response) => {
            error!(
                status = response.status,
                body = %String::from_utf8_lossy(&response.body),
                "Remove.bg API error"
            );
            ProxyResponse::json_error(
                response.status,
                format!("Failed to remove background: {}", response.status),
            )
        }
        Err(e) => {
            error!(error = %e, "Error removing background");
            ProxyResponse::json_error(500, "Failed to remove background")
        }
    }
}
