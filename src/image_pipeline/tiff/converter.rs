use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::PageImage;
use crate::image_pipeline::tiff::standard_tiff_writer::StandardTiffWriter;
use crate::image_pipeline::tiff::types::{WriteOptions, WriteOutcome};
use crate::image_pipeline::tiff::writer::MultiPageWriter;

/// Saves a page collection as one multi-page file
pub struct TiffConverter<W: MultiPageWriter> {
    writer: W,
}

impl TiffConverter<StandardTiffWriter> {
    pub fn new() -> Self {
        Self {
            writer: StandardTiffWriter,
        }
    }
}

impl Default for TiffConverter<StandardTiffWriter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: MultiPageWriter> TiffConverter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `pages` to `output_path`, one page each, in order.
    ///
    /// An empty collection writes nothing and returns
    /// [`WriteOutcome::EmptyBatch`]. The file is created only after encoding
    /// succeeded; an existing file at `output_path` is overwritten.
    #[instrument(skip(self, pages, output_path), fields(pages = pages.len(), output = %output_path.display()))]
    pub fn save(&self, pages: &[PageImage], output_path: &Path, options: &WriteOptions) -> Result<WriteOutcome> {
        if pages.is_empty() {
            warn!("No images to convert, {} was not written", output_path.display());
            return Ok(WriteOutcome::EmptyBatch);
        }

        let mut buffer = Vec::new();
        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_pages(pages, &mut buffer, options)?;
        }

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(output_path, &buffer).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        info!(
            "Images successfully saved to {} ({} page(s), {} bytes)",
            output_path.display(),
            pages.len(),
            buffer.len()
        );

        Ok(WriteOutcome::Written {
            pages: pages.len(),
            bytes: buffer.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::types::{ColorSpace, Dpi};
    use crate::image_pipeline::tiff::types::TiffCompression;
    use std::path::PathBuf;

    fn rgb_page(width: u32, height: u32) -> PageImage {
        PageImage {
            source: PathBuf::from("p.png"),
            width,
            height,
            color_space: ColorSpace::Rgb,
            data: vec![200; (width * height * 3) as usize],
            dpi: None,
        }
    }

    fn options() -> WriteOptions {
        WriteOptions {
            compression: TiffCompression::Lzw,
            quality: 30,
            dpi: Dpi::DEFAULT,
        }
    }

    #[test]
    fn test_empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.tif");

        let outcome = TiffConverter::new().save(&[], &output, &options()).unwrap();

        assert_eq!(outcome, WriteOutcome::EmptyBatch);
        assert!(!output.exists());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.tif");
        std::fs::write(&output, b"stale").unwrap();

        let outcome = TiffConverter::new()
            .save(&[rgb_page(4, 4), rgb_page(2, 2)], &output, &options())
            .unwrap();

        let written = std::fs::read(&output).unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Written {
                pages: 2,
                bytes: written.len() as u64
            }
        );
        assert!(written.starts_with(b"II*\0") || written.starts_with(b"MM\0*"));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("out.tif");

        let result = TiffConverter::new().save(&[rgb_page(2, 2)], &output, &options());
        assert!(matches!(result, Err(ConversionError::OutputWriteError(_))));
    }

    #[test]
    fn test_encode_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.tif");
        let mut opts = options();
        opts.compression = TiffCompression::Jpeg;
        opts.quality = 0;

        let result = TiffConverter::new().save(&[rgb_page(2, 2)], &output, &opts);
        assert!(matches!(result, Err(ConversionError::InvalidQuality(0))));
        assert!(!output.exists());
    }
}
