/// Configuration for Hub Summarizer
///
/// Every constant the add-on relies on lives here with a default that targets
/// the BCIT Learning Hub. The JS side may override any subset of fields.
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::SummarizerError;

pub const COURSE_ID_PLACEHOLDER: &str = "{course_id}";
pub const RESOURCE_ID_PLACEHOLDER: &str = "{resource_id}";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub locator: LocatorConfig,
    pub extraction: ExtractionConfig,
    pub ui: UiConfig,
}

/// URL shape of a content-viewer resource page
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub base_url: String,
    pub valid_path_lengths: Vec<usize>,
    pub course_segment: usize,
    pub resource_segment: usize,
    pub download_template: String,
}

/// Where and how the document is sent for text extraction
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub endpoint: String,
    pub field_name: String,
    pub file_name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub summary_file_name: String,
    pub stylesheets: Vec<Stylesheet>,
    pub bottom: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stylesheet {
    pub id: String,
    pub href: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        LocatorConfig {
            base_url: "https://learn.bcit.ca/d2l/le/content/".to_string(),
            valid_path_lengths: vec![3, 4],
            course_segment: 3,
            resource_segment: 5,
            download_template: "https://learn.bcit.ca/d2l/le/content/{course_id}/topics/files/download/{resource_id}/DirectFileTopicDownload".to_string(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            endpoint: "http://localhost:3000/buffer-to-text".to_string(),
            field_name: "file".to_string(),
            file_name: "doc.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            summary_file_name: "summary.txt".to_string(),
            stylesheets: vec![
                Stylesheet {
                    id: "bootstrap-css".to_string(),
                    href: "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css"
                        .to_string(),
                },
                Stylesheet {
                    id: "bootstrap-icons".to_string(),
                    href: "https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.1/font/bootstrap-icons.css"
                        .to_string(),
                },
            ],
            bottom: "20px".to_string(),
            right: "20px".to_string(),
        }
    }
}

impl SummarizerConfig {
    /// Build a config from a JS options object; `undefined` and `null` mean defaults
    pub fn from_js(options: JsValue) -> Result<Self, SummarizerError> {
        if options.is_undefined() || options.is_null() {
            return Ok(SummarizerConfig::default());
        }

        let config: SummarizerConfig = serde_wasm_bindgen::from_value(options)
            .map_err(|e| SummarizerError::Config(format!("failed to parse options: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SummarizerError> {
        let locator = &self.locator;

        if locator.base_url.is_empty() {
            return Err(SummarizerError::Config("base_url is empty".to_string()));
        }
        if locator.valid_path_lengths.is_empty() {
            return Err(SummarizerError::Config(
                "valid_path_lengths is empty".to_string(),
            ));
        }
        if !locator.download_template.contains(COURSE_ID_PLACEHOLDER)
            || !locator.download_template.contains(RESOURCE_ID_PLACEHOLDER)
        {
            return Err(SummarizerError::Config(format!(
                "download_template must contain {} and {}",
                COURSE_ID_PLACEHOLDER, RESOURCE_ID_PLACEHOLDER
            )));
        }
        if self.extraction.endpoint.is_empty() {
            return Err(SummarizerError::Config("extraction endpoint is empty".to_string()));
        }

        Ok(())
    }
}
