//! Folder of JPEG/PNG images to one multi-page TIFF.

pub mod config;
pub mod image_pipeline;
pub mod logger;
