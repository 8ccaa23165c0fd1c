//! SaaS client: the single point of entry for all calls to the resume SaaS API.
//!
//! Gateway operations never touch reqwest directly; they describe a `SaasRequest`
//! and hand it to a `Transport`. `HttpTransport` is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::errors::GatewayError;

pub const DEFAULT_API_BASE: &str = "https://saas.api.yoo-ai.com";

pub const BUILD_RESUME_PATH: &str = "/resumes/build-resume";
pub const MATCH_PATH: &str = "/resumes/match";
pub const INFO_PATH: &str = "/resumes/info";
pub const WRITE_PATH: &str = "/resumes/write-resume";
pub const RECOGNIZE_PATH: &str = "/resumes/cv-recognize";
pub const JD_ANALYSE_PATH: &str = "/resumes/jd-analyse";
pub const RESUME_STYLE_PATH: &str = "/resumes/resume-style";

/// Ceiling for text generation, matching, and recognition calls.
pub const TEXT_TIMEOUT: Duration = Duration::from_secs(120);
/// Ceiling for style and analysis calls.
pub const STYLE_TIMEOUT: Duration = Duration::from_secs(60);

const ERROR_PREVIEW_CHARS: usize = 200;

/// One binary upload part.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: &'static str,
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded`
    Form(Vec<(&'static str, String)>),
    /// `multipart/form-data` with text fields and one file part.
    Multipart {
        fields: Vec<(&'static str, String)>,
        file: FilePart,
    },
}

/// A single POST against the SaaS API.
#[derive(Debug, Clone)]
pub struct SaasRequest {
    pub path: &'static str,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl SaasRequest {
    pub fn form(path: &'static str, fields: Vec<(&'static str, String)>, timeout: Duration) -> Self {
        Self {
            path,
            body: RequestBody::Form(fields),
            timeout,
        }
    }

    /// Looks up a text field by name, for either body kind.
    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&str> {
        let fields = match &self.body {
            RequestBody::Form(fields) => fields,
            RequestBody::Multipart { fields, .. } => fields,
        };
        fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Performs one authenticated POST and returns the raw response body.
///
/// Implementations map transport faults to `GatewayError::RemoteCall`,
/// non-2xx statuses to `GatewayError::Status`, and expired deadlines to
/// `GatewayError::Timeout`. Decoding is the caller's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: SaasRequest, bearer: &str) -> Result<Bytes, GatewayError>;
}

/// reqwest-backed transport. A client is built per call with that call's
/// timeout and dropped when the call returns.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base: String,
}

impl HttpTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    fn client(timeout: Duration) -> Result<Client, GatewayError> {
        Client::builder()
            .user_agent(concat!("resume-gateway/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(GatewayError::RemoteCall)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: SaasRequest, bearer: &str) -> Result<Bytes, GatewayError> {
        let timeout = request.timeout;
        let client = Self::client(timeout)?;
        let url = format!("{}{}", self.base, request.path);

        let builder = client.post(&url).bearer_auth(bearer);
        let builder = match request.body {
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart { fields, file } => {
                let mut form = Form::new();
                for (key, value) in fields {
                    form = form.text(key, value);
                }
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(file.content_type)
                    .map_err(GatewayError::RemoteCall)?;
                builder.multipart(form.part(file.field, part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        debug!("POST {} -> {}", request.path, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        response.bytes().await.map_err(|e| classify(e, timeout))
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout { after: timeout }
    } else {
        GatewayError::RemoteCall(err)
    }
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(ERROR_PREVIEW_CHARS).collect();
    out.push('…');
    out
}
