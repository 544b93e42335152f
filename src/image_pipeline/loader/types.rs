//! Loader output types

use std::path::PathBuf;

use crate::image_pipeline::common::types::{Dpi, PageImage};

/// A matching file that could not be turned into a page
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything the loader produced for one folder
#[derive(Debug, Clone, Default)]
pub struct LoadedBatch {
    /// Decoded pages in file-name order
    pub pages: Vec<PageImage>,
    /// DPI applied to every page of the output
    pub dpi: Dpi,
    /// Matching files that failed to decode or convert
    pub skipped: Vec<SkippedFile>,
}

impl LoadedBatch {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
