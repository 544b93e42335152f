//! Image processing pipeline module
//!
//! This module provides a structured approach to folder-to-TIFF conversion,
//! with separate modules for loading, color normalization, TIFF writing and
//! conversion orchestration.

pub mod color;
pub mod common;
pub mod conversions;
pub mod loader;
pub mod tiff;

pub use common::{
    ColorSpace,
    ConversionError,
    Dpi,
    PageImage,
    Result,
};

pub use loader::{
    CodecPageReader,
    DpiStrategy,
    FolderLoader,
    LoadedBatch,
    PageReader,
    SkippedFile,
};

pub use self::tiff::{
    ConversionConfig,
    ConversionConfigBuilder,
    MultiPageWriter,
    StandardTiffWriter,
    TiffCompression,
    TiffConverter,
    WriteOptions,
    WriteOutcome,
};

pub use conversions::{
    FolderToTiffPipeline,
    PipelineStage,
    ProcessReport,
};
