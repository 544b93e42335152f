//! Command-line configuration.
//!
//! Every option can also be set through a `TIFF_STACK_` environment
//! variable:
//!
//! - `TIFF_STACK_INPUT` - Folder with the source images (default: testImages)
//! - `TIFF_STACK_OUTPUT` - Output TIFF path (default: output_compressed.tif)
//! - `TIFF_STACK_COMPRESSION` - none, lzw, deflate, deflate_fast, deflate_best, packbits or jpeg (default: jpeg)
//! - `TIFF_STACK_QUALITY` - JPEG quality 1-100 (default: 30)
//! - `TIFF_STACK_COLOR_SPACE` - RGB, YCbCr or L (default: YCbCr)
//! - `TIFF_STACK_DPI_STRATEGY` - first-found, last-found, most-common or fixed (default: last-found)
//! - `TIFF_STACK_DEFAULT_DPI` - DPI used without metadata, `100` or `100x100` (default: 100x100)
//! - `TIFF_STACK_FAIL_ON_EMPTY` - Fail when no image could be loaded (default: false)

use std::path::PathBuf;

use clap::Parser;

use crate::image_pipeline::{ColorSpace, ConversionConfig, Dpi, DpiStrategy, TiffCompression};
use crate::image_pipeline::tiff::DEFAULT_QUALITY;

/// Default folder scanned for images.
pub const DEFAULT_INPUT: &str = "testImages";

/// Default output file.
pub const DEFAULT_OUTPUT: &str = "output_compressed.tif";

/// Bundle a folder of JPEG/PNG images into one multi-page TIFF.
#[derive(Parser, Debug, Clone)]
#[command(name = "tiff-stack")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Folder containing the input images.
    #[arg(short, long, default_value = DEFAULT_INPUT, env = "TIFF_STACK_INPUT")]
    pub input: PathBuf,

    /// Path of the TIFF file to create (overwritten if it exists).
    #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "TIFF_STACK_OUTPUT")]
    pub output: PathBuf,

    /// Compression codec for every page.
    #[arg(short, long, default_value = "jpeg", env = "TIFF_STACK_COMPRESSION")]
    pub compression: TiffCompression,

    /// JPEG quality, lower values give smaller files. Ignored by lossless codecs.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100),
        env = "TIFF_STACK_QUALITY"
    )]
    pub quality: u8,

    /// Color space the pages are converted to.
    #[arg(long, default_value = "YCbCr", env = "TIFF_STACK_COLOR_SPACE")]
    pub color_space: ColorSpace,

    /// How the output DPI is chosen when images disagree.
    #[arg(long, default_value = "last-found", env = "TIFF_STACK_DPI_STRATEGY")]
    pub dpi_strategy: DpiStrategy,

    /// DPI used when no image carries resolution metadata.
    #[arg(long, default_value = "100x100", env = "TIFF_STACK_DEFAULT_DPI")]
    pub default_dpi: Dpi,

    /// Fail instead of warning when no image could be loaded.
    #[arg(long, default_value_t = false, env = "TIFF_STACK_FAIL_ON_EMPTY")]
    pub fail_on_empty: bool,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    pub fn conversion_config(&self) -> ConversionConfig {
        ConversionConfig::builder()
            .compression(self.compression)
            .quality(self.quality)
            .color_space(self.color_space)
            .dpi_strategy(self.dpi_strategy)
            .default_dpi(self.default_dpi)
            .fail_on_empty(self.fail_on_empty)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_batch_job() {
        let config = Config::try_parse_from(["tiff-stack"]).unwrap();
        assert_eq!(config.input, PathBuf::from("testImages"));
        assert_eq!(config.output, PathBuf::from("output_compressed.tif"));
        assert_eq!(config.compression, TiffCompression::Jpeg);
        assert_eq!(config.quality, 30);
        assert_eq!(config.color_space, ColorSpace::YCbCr);
        assert_eq!(config.dpi_strategy, DpiStrategy::LastFound);
        assert_eq!(config.default_dpi, Dpi::new(100, 100));
        assert!(!config.fail_on_empty);
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "tiff-stack",
            "--input",
            "scans",
            "-o",
            "book.tif",
            "--compression",
            "lzw",
            "--quality",
            "95",
            "--color-space",
            "RGB",
            "--dpi-strategy",
            "most-common",
            "--default-dpi",
            "300x200",
            "--fail-on-empty",
        ])
        .unwrap();

        let conversion = config.conversion_config();
        assert_eq!(config.input, PathBuf::from("scans"));
        assert_eq!(config.output, PathBuf::from("book.tif"));
        assert_eq!(conversion.compression, TiffCompression::Lzw);
        assert_eq!(conversion.quality, 95);
        assert_eq!(conversion.color_space, ColorSpace::Rgb);
        assert_eq!(conversion.dpi_strategy, DpiStrategy::MostCommon);
        assert_eq!(conversion.default_dpi, Dpi::new(300, 200));
        assert!(conversion.fail_on_empty);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::try_parse_from(["tiff-stack", "--quality", "0"]).is_err());
        assert!(Config::try_parse_from(["tiff-stack", "--quality", "101"]).is_err());
        assert!(Config::try_parse_from(["tiff-stack", "--compression", "webp"]).is_err());
        assert!(Config::try_parse_from(["tiff-stack", "--color-space", "CMYK"]).is_err());
    }
}
