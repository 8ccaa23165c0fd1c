// Resume tool gateway: one method per tool, each a single POST against the SaaS API.
// All HTTP goes through saas_client::Transport; nothing here touches reqwest.

pub mod encoding;
pub mod envelope;
pub mod params;
pub mod prompts;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::GatewayError;
use crate::saas_client::{
    FilePart, RequestBody, SaasRequest, Transport, BUILD_RESUME_PATH, INFO_PATH, JD_ANALYSE_PATH,
    MATCH_PATH, RECOGNIZE_PATH, RESUME_STYLE_PATH, STYLE_TIMEOUT, TEXT_TIMEOUT, WRITE_PATH,
};

pub use envelope::ToolOutput;
use params::{
    AnalyseParams, BuildResumeParams, InfoParams, MatchParams, RecognizeParams, StyleParams,
    WriteParams,
};

const UPLOAD_FIELD: &str = "file";
const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// The SaaS API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty or whitespace-only key.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Maps each resume tool to one request/response cycle.
///
/// The credential is fixed at construction and checked at the start of
/// every network-bound operation.
#[derive(Clone)]
pub struct ResumeGateway {
    credential: Option<Credential>,
    transport: Arc<dyn Transport>,
}

impl ResumeGateway {
    pub fn new(credential: Option<Credential>, transport: Arc<dyn Transport>) -> Self {
        Self {
            credential,
            transport,
        }
    }

    /// `check`: the configured key as-is, for diagnostics. No network call.
    pub fn check_credential(&self) -> Option<&str> {
        self.credential.as_ref().map(Credential::expose)
    }

    fn require_credential(&self) -> Result<&Credential, GatewayError> {
        self.credential
            .as_ref()
            .ok_or_else(GatewayError::missing_credential)
    }

    /// Sends one request bounded by its own ceiling and decodes the JSON body.
    async fn send(
        &self,
        credential: &Credential,
        request: SaasRequest,
    ) -> Result<serde_json::Value, GatewayError> {
        let ceiling = request.timeout;
        let path = request.path;
        debug!("POST {path} (timeout {ceiling:?})");

        let body = tokio::time::timeout(ceiling, self.transport.post(request, credential.expose()))
            .await
            .map_err(|_| GatewayError::Timeout { after: ceiling })??;

        serde_json::from_slice(&body).map_err(GatewayError::Decode)
    }

    /// `build_resume`: generate a resume document from a free-text query.
    pub async fn build_resume(&self, params: BuildResumeParams) -> Result<ToolOutput, GatewayError> {
        let credential = self.require_credential()?;
        let request = SaasRequest::form(BUILD_RESUME_PATH, params.to_form(), TEXT_TIMEOUT);
        let body = self.send(credential, request).await?;
        Ok(envelope::unwrap_body(body))
    }

    /// `match`: score a resume against a job; the body carries the analysis id.
    pub async fn match_resume(&self, params: MatchParams) -> Result<ToolOutput, GatewayError> {
        let credential = self.require_credential()?;
        let request = SaasRequest::form(MATCH_PATH, params.to_form(), TEXT_TIMEOUT);
        let body = self.send(credential, request).await?;
        Ok(envelope::unwrap_body(body))
    }

    /// `info`: fetch the report for an analysis id produced by `match`.
    pub async fn info(&self, params: InfoParams) -> Result<ToolOutput, GatewayError> {
        let credential = self.require_credential()?;
        let request = SaasRequest::form(INFO_PATH, params.to_form(), TEXT_TIMEOUT);
        let body = self.send(credential, request).await?;
        Ok(envelope::unwrap_body(body))
    }

    /// `write`: polish, expand, refine, continue, or compose resume text.
    pub async fn write(&self, params: WriteParams) -> Result<ToolOutput, GatewayError> {
        let credential = self.require_credential()?;
        let request = SaasRequest::form(WRITE_PATH, params.to_form(), TEXT_TIMEOUT);
        let body = self.send(credential, request).await?;
        Ok(envelope::unwrap_body(body))
    }

    /// `recognize`: upload a resume file and return its parsed `data.tagInfo`.
    ///
    /// The file is read completely before the request is issued.
    pub async fn recognize(&self, params: RecognizeParams) -> Result<ToolOutput, GatewayError> {
        let credential = self.require_credential()?;
        let file = read_upload(&params.file).await?;
        info!("Uploading {} ({} bytes)", file.file_name, file.bytes.len());

        let request = SaasRequest {
            path: RECOGNIZE_PATH,
            body: RequestBody::Multipart {
                fields: Vec::new(),
                file,
            },
            timeout: TEXT_TIMEOUT,
        };
        let body = self.send(credential, request).await?;
        envelope::unwrap_field(body, "data.tagInfo")
    }

    /// `analyse`: rewrite recognized resume data against a job description.
    pub async fn analyse(&self, params: AnalyseParams) -> Result<ToolOutput, GatewayError> {
        let credential = self.require_credential()?;
        let request = SaasRequest::form(JD_ANALYSE_PATH, params.to_form(), STYLE_TIMEOUT);
        let body = self.send(credential, request).await?;
        envelope::unwrap_field(body, "data")
    }

    /// `analyse_data` prompt: the same rewrite expressed as an instruction for
    /// the caller's own model. Local only.
    pub fn analyse_prompt(&self, params: &AnalyseParams) -> ToolOutput {
        ToolOutput::Message(prompts::render_analyse_prompt(&params.recognize_data, &params.jd))
    }

    /// `resume_style_write`: render a styled resume and return its `data.url`.
    pub async fn resume_style_write(&self, params: StyleParams) -> Result<ToolOutput, GatewayError> {
        let credential = self.require_credential()?;
        debug!("Rendering resume in {} with {} modules", params.color, params.modules.len());
        let fields = params
            .to_form()
            .map_err(invalid_modules)?;
        let request = SaasRequest::form(RESUME_STYLE_PATH, fields, STYLE_TIMEOUT);
        let body = self.send(credential, request).await?;
        envelope::unwrap_field(body, "data.url")
    }
}

/// Request-side `modules` encoding failures are argument errors.
fn invalid_modules(err: serde_json::Error) -> GatewayError {
    GatewayError::InvalidArguments(format!("modules: {err}"))
}

async fn read_upload(path: &Path) -> Result<FilePart, GatewayError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| GatewayError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| UPLOAD_FIELD.to_string());

    Ok(FilePart {
        field: UPLOAD_FIELD,
        file_name,
        content_type: UPLOAD_CONTENT_TYPE,
        bytes,
    })
}
