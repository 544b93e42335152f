//! Pipeline conversions module
//!
//! This module contains the orchestration that turns a folder of images into
//! one multi-page TIFF, and the report describing each run.

mod folder_to_tiff;
pub mod report;

#[cfg(test)]
mod tests;

pub use folder_to_tiff::FolderToTiffPipeline;
pub use report::{PipelineStage, ProcessReport, StageTiming, StageTimings};
