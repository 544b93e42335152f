//! Folder loading module
//!
//! This module turns a folder of JPEG/PNG files into color-normalized pages
//! and resolves the single DPI value used for the whole output.

mod codec_reader;
mod dpi;
mod folder_loader;
pub mod metadata;
mod reader;
pub mod types;

pub use codec_reader::CodecPageReader;
pub use dpi::DpiStrategy;
pub use folder_loader::{FolderLoader, SUPPORTED_EXTENSIONS, is_supported_file_name};
pub use reader::PageReader;
pub use types::{LoadedBatch, SkippedFile};
