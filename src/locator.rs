/// Resource page recognition and download URL derivation
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::config::{COURSE_ID_PLACEHOLDER, LocatorConfig, RESOURCE_ID_PLACEHOLDER};
use crate::error::SummarizerError;

static NUMERIC_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Course and resource identifiers taken from a content-viewer URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    course_id: String,
    resource_id: String,
}

impl ResourceReference {
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceLocator {
    config: LocatorConfig,
}

impl ResourceLocator {
    pub fn new(config: LocatorConfig) -> ResourceLocator {
        ResourceLocator { config }
    }

    /// Cheap shape check on the raw URL string
    ///
    /// Algorithm:
    /// 1. URL must start with the configured base
    /// 2. Take the remainder, strip one trailing "/"
    /// 3. Split on "/" and drop empty segments
    /// 4. Match if the segment count is one of the valid lengths (3 or 4)
    ///
    /// Examples:
    /// - https://learn.bcit.ca/d2l/le/content/111/222/333 → true
    /// - https://learn.bcit.ca/d2l/le/content/111/viewContent/222/View → true
    /// - https://learn.bcit.ca/d2l/le/content/111/Home → false
    pub fn classify(&self, url: &str) -> bool {
        let Some(remainder) = url.strip_prefix(self.config.base_url.as_str()) else {
            return false;
        };

        let path = remainder.strip_suffix('/').unwrap_or(remainder);
        let segment_count = path.split('/').filter(|s| !s.is_empty()).count();

        self.config.valid_path_lengths.contains(&segment_count)
    }

    /// Parse the URL and pull the course and resource ids from fixed path positions
    ///
    /// Segments are counted from the start of the path (empty segments dropped),
    /// so for `/d2l/le/content/123/viewContent/456/View` the course id is `123`
    /// and the resource id is `456`.
    pub fn extract_reference(&self, url: &str) -> Result<ResourceReference, SummarizerError> {
        let parsed = Url::parse(url).map_err(|e| SummarizerError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|split| split.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let course_id = segments.get(self.config.course_segment).copied();
        let resource_id = segments.get(self.config.resource_segment).copied();

        match (course_id, resource_id) {
            (Some(course_id), Some(resource_id)) if is_valid_id(course_id) && is_valid_id(resource_id) => {
                Ok(ResourceReference {
                    course_id: course_id.to_string(),
                    resource_id: resource_id.to_string(),
                })
            }
            _ => Err(SummarizerError::InvalidIdentifier {
                url: url.to_string(),
                course_id: course_id.map(str::to_string),
                resource_id: resource_id.map(str::to_string),
            }),
        }
    }

    /// Substitute the ids into the download template
    pub fn download_url(&self, reference: &ResourceReference) -> String {
        self.config
            .download_template
            .replace(COURSE_ID_PLACEHOLDER, &reference.course_id)
            .replace(RESOURCE_ID_PLACEHOLDER, &reference.resource_id)
    }

    /// Classify, extract and build in one step
    pub fn download_url_for(&self, url: &str) -> Option<String> {
        if !self.classify(url) {
            return None;
        }

        self.extract_reference(url)
            .ok()
            .map(|reference| self.download_url(&reference))
    }
}

fn is_valid_id(id: &str) -> bool {
    NUMERIC_ID.is_match(id)
}
