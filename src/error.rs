/// Error types for Hub Summarizer
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummarizerError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid identifiers in {url} (course: {course_id:?}, resource: {resource_id:?})")]
    InvalidIdentifier {
        url: String,
        course_id: Option<String>,
        resource_id: Option<String>,
    },

    #[error("document download failed: {0}")]
    Download(String),

    #[error("extraction request failed: {0}")]
    Extraction(String),

    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),

    #[error("failed to install controller in tab {tab_id}: {reason}")]
    Install { tab_id: i32, reason: String },

    #[error("page context error: {0}")]
    Page(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
