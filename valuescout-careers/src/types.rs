use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One core value as shown on the careers page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreValueEntry {
    pub headline: String,
    pub description: String,
}

impl CoreValueEntry {
    pub fn new(headline: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            description: description.into(),
        }
    }
}

/// The persisted result of one extraction run.
///
/// Both counters are derived from `core_values`; build it with
/// [`ExtractionResult::from_entries`] so they cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub core_values: Vec<CoreValueEntry>,
    pub exclamation_marks_count: usize,
    pub total_values_extracted: usize,
}

impl ExtractionResult {
    pub fn from_entries(core_values: Vec<CoreValueEntry>) -> Self {
        let exclamation_marks_count = crate::extract::count_exclamation_marks(&core_values);
        let total_values_extracted = core_values.len();
        Self {
            core_values,
            exclamation_marks_count,
            total_values_extracted,
        }
    }
}

/// How an image file came to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// Fetched over HTTP from the element's address.
    Downloaded { url: String },
    /// Rendered snapshot of the element itself.
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedImage {
    pub headline: String,
    pub path: PathBuf,
    pub source: ImageSource,
}
