/// Document download and text extraction client
use std::cell::Cell;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use wasm_bindgen_futures::spawn_local;

use crate::config::ExtractionConfig;
use crate::error::SummarizerError;

/// Body returned by the extraction service; extra fields are ignored
#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    text: String,
}

#[derive(Debug, Clone)]
pub struct ExtractionClient {
    http: reqwest::Client,
    config: ExtractionConfig,
}

impl ExtractionClient {
    pub fn new(config: ExtractionConfig) -> ExtractionClient {
        ExtractionClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// GET the source document as raw bytes
    pub async fn download_document(&self, download_url: &str) -> Result<Vec<u8>, SummarizerError> {
        let response = self
            .http
            .get(download_url)
            .send()
            .await
            .map_err(|e| SummarizerError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizerError::Download(format!(
                "{} returned {}",
                download_url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SummarizerError::Download(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// POST the document as a multipart upload and return the extracted text
    pub async fn extract_text(&self, document: Vec<u8>) -> Result<String, SummarizerError> {
        let part = Part::bytes(document)
            .file_name(self.config.file_name.clone())
            .mime_str(&self.config.mime_type)
            .map_err(|e| SummarizerError::Extraction(format!("invalid mime type: {}", e)))?;
        let form = Form::new().part(self.config.field_name.clone(), part);

        let response = self
            .http
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SummarizerError::Extraction(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizerError::Extraction(format!(
                "{} returned {}",
                self.config.endpoint, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SummarizerError::Extraction(e.to_string()))?;

        parse_extraction_body(&body)
    }

    pub async fn fetch_and_extract(&self, download_url: &str) -> Result<String, SummarizerError> {
        let document = self.download_document(download_url).await?;
        log::debug!("Downloaded {} bytes from {}", document.len(), download_url);
        self.extract_text(document).await
    }

    /// Fire-and-forget extraction
    ///
    /// `on_loading(true)` runs before the task is spawned, `on_loading(false)`
    /// runs when it settles and right before `on_result`. Not cancellable.
    pub fn spawn_fetch_and_extract<L, R>(&self, download_url: String, on_loading: L, on_result: R)
    where
        L: Fn(bool) + 'static,
        R: FnOnce(Result<String, SummarizerError>) + 'static,
    {
        let client = self.clone();
        on_loading(true);

        spawn_local(async move {
            client.settle_with(&download_url, on_loading, on_result).await;
        });
    }

    /// Run one extraction and report it through the callbacks
    ///
    /// Calls `on_loading(false)` then `on_result`, on success and failure alike.
    pub async fn settle_with<L, R>(&self, download_url: &str, on_loading: L, on_result: R)
    where
        L: Fn(bool),
        R: FnOnce(Result<String, SummarizerError>),
    {
        let outcome = self.fetch_and_extract(download_url).await;
        if let Err(e) = &outcome {
            log::error!("Extraction failed for {}: {}", download_url, e);
        }

        on_loading(false);
        on_result(outcome);
    }
}

fn parse_extraction_body(body: &str) -> Result<String, SummarizerError> {
    serde_json::from_str::<ExtractionResponse>(body)
        .map(|response| response.text)
        .map_err(|e| SummarizerError::MalformedResponse(e.to_string()))
}

/// Hands out extraction generations; only the latest one may write results
#[derive(Debug, Default)]
pub struct ExtractionTracker {
    current: Cell<u64>,
}

impl ExtractionTracker {
    pub fn begin(&self) -> u64 {
        let next = self.current.get() + 1;
        self.current.set(next);
        next
    }

    pub fn current(&self) -> u64 {
        self.current.get()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current.get() == generation
    }
}
