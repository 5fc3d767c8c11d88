use reqwest::multipart::{Form, Part};
use reqwest::{Body, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio_util::io::ReaderStream;

use crate::document::{Document, DocumentId, PendingFile};
use crate::upload::{self, ProgressFn};

/// Every way a backend call can fail, one variant per operation. The message
/// is what lands in the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Failed to fetch PDFs: {0}")]
    Fetch(String),
    #[error("Failed to summarize: {0}")]
    Summarize(String),
    #[error("Failed to get answer: {0}")]
    Qa(String),
}

/// What `/upload` hands back. Only the identifier is relied on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    #[serde(alias = "id")]
    pub pdf_id: DocumentId,
    #[serde(default)]
    pub chunks: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SummarizeRequest {
    pdf_id: DocumentId,
}

#[derive(Debug, Serialize)]
struct QaRequest<'a> {
    pdf_id: DocumentId,
    question: &'a str,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Streams `file` to `/upload` as multipart field `file`, reporting bytes
    /// read into the request body through `progress`.
    pub async fn upload_document(
        &self,
        file: &PendingFile,
        progress: ProgressFn,
    ) -> Result<UploadReceipt, ApiError> {
        let handle = tokio::fs::File::open(&file.path)
            .await
            .map_err(|e| ApiError::Upload(format!("cannot open {}: {}", file.name, e)))?;
        let total = handle.metadata().await.ok().map(|meta| meta.len());

        tracing::info!(file = %file.name, bytes = ?total, "uploading document");

        let body = Body::wrap_stream(upload::counted(ReaderStream::new(handle), total, progress));
        let part = match total {
            Some(len) => Part::stream_with_length(body, len),
            None => Part::stream(body),
        }
        .file_name(file.name.clone())
        .mime_str("application/pdf")
        .map_err(|e| ApiError::Upload(e.to_string()))?;

        let request = self
            .client
            .post(self.url("/upload"))
            .multipart(Form::new().part("file", part));

        let receipt: UploadReceipt = fetch_json(request, ApiError::Upload).await?;
        tracing::info!(file = %file.name, id = %receipt.pdf_id, "upload accepted");
        Ok(receipt)
    }

    pub async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let documents: Vec<Document> =
            fetch_json(self.client.get(self.url("/pdfs")), ApiError::Fetch).await?;
        tracing::debug!(count = documents.len(), "fetched document list");
        Ok(documents)
    }

    /// Returns the `summary` field, or the whole body serialized when the
    /// backend answered without one.
    pub async fn request_summary(&self, id: DocumentId) -> Result<String, ApiError> {
        let request = self
            .client
            .post(self.url("/summarize"))
            .json(&SummarizeRequest { pdf_id: id });
        let body: Value = fetch_json(request, ApiError::Summarize).await?;
        Ok(text_field_or_body(&body, "summary"))
    }

    pub async fn ask_question(&self, id: DocumentId, question: &str) -> Result<String, ApiError> {
        let request = self.client.post(self.url("/qa")).json(&QaRequest {
            pdf_id: id,
            question,
        });
        let body: Value = fetch_json(request, ApiError::Qa).await?;
        Ok(text_field_or_body(&body, "answer"))
    }
}

async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    fail: fn(String) -> ApiError,
) -> Result<T, ApiError> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(error = %e, "request failed to complete");
        fail(e.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, url = %response.url(), "backend rejected request");
        return Err(fail(format!("server returned {}", status)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| fail(format!("invalid response body: {}", e)))
}

fn text_field_or_body(body: &Value, field: &str) -> String {
    match body.get(field) {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => body.to_string(),
    }
}
