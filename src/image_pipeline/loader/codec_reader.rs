//! Page reader backed by the `image` crate.
//!
//! Decodes JPEG and PNG files, picks up their resolution metadata and
//! normalizes the pixels into the requested color space.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};
use tracing::debug;

use crate::image_pipeline::color::convert_color;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::{ColorSpace, PageImage};
use crate::image_pipeline::loader::metadata::read_dpi;
use crate::image_pipeline::loader::reader::PageReader;

/// Reader for the formats this crate accepts as input: JPEG and PNG.
///
/// The format is sniffed from the file contents, so a PNG saved with a
/// `.jpg` name still decodes. Other formats are rejected even if the
/// codec library could read them.
pub struct CodecPageReader;

impl PageReader for CodecPageReader {
    fn read_page(&self, path: &Path, data: &[u8], color_space: ColorSpace) -> Result<PageImage> {
        debug!("Decoding {}, {} bytes", path.display(), data.len());

        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ConversionError::DecodeError(format!("{}: {}", path.display(), e)))?;

        match reader.format() {
            Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => {}
            Some(other) => {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{}: {:?}",
                    path.display(),
                    other
                )));
            }
            None => {
                return Err(ConversionError::DecodeError(format!(
                    "{}: unrecognized image data",
                    path.display()
                )));
            }
        }

        let decoded = reader
            .decode()
            .map_err(|e| ConversionError::DecodeError(format!("{}: {}", path.display(), e)))?;

        let dpi = read_dpi(data);
        let pixels = convert_color(decoded, color_space)?;

        debug!(
            width = pixels.width,
            height = pixels.height,
            dpi = ?dpi,
            "Decoded page"
        );

        Ok(PageImage {
            source: path.to_path_buf(),
            width: pixels.width,
            height: pixels.height,
            color_space,
            data: pixels.data,
            dpi,
        })
    }
}
