//! TIFF conversion configuration types

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::{ColorSpace, Dpi};
use crate::image_pipeline::loader::DpiStrategy;

/// Quality used when none is configured
pub const DEFAULT_QUALITY: u8 = 30;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// PackBits run-length encoding
    Packbits,
    /// Each page stored as a JPEG stream, honours `quality` (default)
    #[default]
    Jpeg,
}

impl TiffCompression {
    /// Whether `quality` affects the output
    pub fn is_lossy(self) -> bool {
        matches!(self, TiffCompression::Jpeg)
    }

    pub fn name(self) -> &'static str {
        match self {
            TiffCompression::None => "none",
            TiffCompression::Lzw => "lzw",
            TiffCompression::DeflateFast => "deflate_fast",
            TiffCompression::DeflateBalanced => "deflate",
            TiffCompression::DeflateBest => "deflate_best",
            TiffCompression::Packbits => "packbits",
            TiffCompression::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for TiffCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TiffCompression {
    type Err = ConversionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "none" | "raw" | "uncompressed" => Ok(TiffCompression::None),
            "lzw" | "tiff_lzw" => Ok(TiffCompression::Lzw),
            "deflate_fast" => Ok(TiffCompression::DeflateFast),
            "deflate" | "zip" | "tiff_adobe_deflate" => Ok(TiffCompression::DeflateBalanced),
            "deflate_best" => Ok(TiffCompression::DeflateBest),
            "packbits" => Ok(TiffCompression::Packbits),
            "jpeg" | "jpg" => Ok(TiffCompression::Jpeg),
            other => Err(ConversionError::UnsupportedFormat(format!(
                "compression '{other}'"
            ))),
        }
    }
}

/// Checks that a JPEG quality lies in 1..=100.
pub fn validate_quality(quality: u8) -> Result<u8> {
    if (1..=100).contains(&quality) {
        Ok(quality)
    } else {
        Err(ConversionError::InvalidQuality(quality))
    }
}

/// Parameters of one TIFF write, passed by value to the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub compression: TiffCompression,
    /// JPEG quality, ignored by lossless codecs
    pub quality: u8,
    /// Resolution stamped on every page
    pub dpi: Dpi,
}

/// Result of a save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A file was written
    Written { pages: usize, bytes: u64 },
    /// There was nothing to write, no file was created
    EmptyBatch,
}

/// Configuration for folder to TIFF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// JPEG quality (1-100), lower values give smaller files
    pub quality: u8,
    /// Color space every page is converted to
    pub color_space: ColorSpace,
    /// How per-image DPI metadata becomes the batch DPI
    pub dpi_strategy: DpiStrategy,
    /// DPI used when no image carries metadata
    pub default_dpi: Dpi,
    /// Whether an empty batch is an error instead of a warning
    pub fail_on_empty: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::Jpeg,
            quality: DEFAULT_QUALITY,
            color_space: ColorSpace::YCbCr,
            dpi_strategy: DpiStrategy::LastFound,
            default_dpi: Dpi::DEFAULT,
            fail_on_empty: false,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        validate_quality(self.quality)?;
        Ok(())
    }

    /// Write parameters for a batch resolved to `dpi`.
    pub fn write_options(&self, dpi: Dpi) -> WriteOptions {
        WriteOptions {
            compression: self.compression,
            quality: self.quality,
            dpi,
        }
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    compression: Option<TiffCompression>,
    quality: Option<u8>,
    color_space: Option<ColorSpace>,
    dpi_strategy: Option<DpiStrategy>,
    default_dpi: Option<Dpi>,
    fail_on_empty: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = Some(color_space);
        self
    }

    pub fn dpi_strategy(mut self, strategy: DpiStrategy) -> Self {
        self.dpi_strategy = Some(strategy);
        self
    }

    pub fn default_dpi(mut self, dpi: Dpi) -> Self {
        self.default_dpi = Some(dpi);
        self
    }

    pub fn fail_on_empty(mut self, fail: bool) -> Self {
        self.fail_on_empty = Some(fail);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            compression: self.compression.unwrap_or(default.compression),
            quality: self.quality.unwrap_or(default.quality),
            color_space: self.color_space.unwrap_or(default.color_space),
            dpi_strategy: self.dpi_strategy.unwrap_or(default.dpi_strategy),
            default_dpi: self.default_dpi.unwrap_or(default.default_dpi),
            fail_on_empty: self.fail_on_empty.unwrap_or(default.fail_on_empty),
        }
    }
}
