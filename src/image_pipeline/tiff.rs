//! TIFF writing module
//!
//! This module provides multi-page TIFF writing with lossless and JPEG
//! compression, and the converter that saves a page collection to disk.

mod converter;
mod standard_tiff_writer;
pub mod types;
mod writer;

pub use converter::TiffConverter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{
    ConversionConfig, ConversionConfigBuilder, DEFAULT_QUALITY, TiffCompression, WriteOptions,
    WriteOutcome, validate_quality,
};
pub use writer::MultiPageWriter;
