//! Common utilities module
//!
//! This module contains the error type and the page/DPI types shared by the
//! loader, the TIFF writer and the pipeline.

pub mod error;
pub mod types;

pub use error::{ConversionError, Result};
pub use types::{ColorSpace, Dpi, PageImage};
