//! Page and resolution types shared across the pipeline

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::image_pipeline::common::error::ConversionError;

/// Pixel model pages are normalized into before they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Interleaved R, G, B samples
    Rgb,
    /// Interleaved Y, Cb, Cr samples (full range, JFIF coefficients)
    #[default]
    YCbCr,
    /// Single 8-bit luminance sample
    Luma,
}

impl ColorSpace {
    /// Samples stored per pixel
    pub fn channels(self) -> usize {
        match self {
            ColorSpace::Rgb | ColorSpace::YCbCr => 3,
            ColorSpace::Luma => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::YCbCr => "YCbCr",
            ColorSpace::Luma => "L",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ColorSpace::Rgb),
            "ycbcr" => Ok(ColorSpace::YCbCr),
            "l" | "luma" | "gray" | "grey" => Ok(ColorSpace::Luma),
            other => Err(ConversionError::UnsupportedFormat(format!(
                "color space '{other}'"
            ))),
        }
    }
}

/// Resolution in dots per inch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dpi {
    pub x: u32,
    pub y: u32,
}

impl Dpi {
    pub const DEFAULT: Dpi = Dpi { x: 100, y: 100 };

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Rounds fractional densities to whole dots per inch.
    ///
    /// Returns `None` when either axis is zero, negative or not finite, which
    /// callers treat the same as missing metadata.
    pub fn from_f64(x: f64, y: f64) -> Option<Self> {
        let round = |v: f64| -> Option<u32> {
            let r = v.round();
            (r.is_finite() && r >= 1.0 && r <= u32::MAX as f64).then_some(r as u32)
        };
        Some(Self {
            x: round(x)?,
            y: round(y)?,
        })
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

impl FromStr for Dpi {
    type Err = ConversionError;

    /// Accepts `300` or `300x200`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConversionError::UnsupportedFormat(format!("DPI value '{s}'"));
        let parse = |v: &str| v.trim().parse::<u32>().ok().filter(|&n| n > 0);

        match s.split_once(['x', 'X']) {
            Some((x, y)) => Ok(Dpi::new(
                parse(x).ok_or_else(invalid)?,
                parse(y).ok_or_else(invalid)?,
            )),
            None => {
                let v = parse(s).ok_or_else(invalid)?;
                Ok(Dpi::new(v, v))
            }
        }
    }
}

/// A decoded image after color-space conversion, ready to become one TIFF page
#[derive(Debug, Clone)]
pub struct PageImage {
    /// File the page was decoded from
    pub source: PathBuf,
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// Color space of `data`
    pub color_space: ColorSpace,
    /// Interleaved 8-bit samples, `width * height * channels` long
    pub data: Vec<u8>,
    /// Resolution embedded in the source file, if any
    pub dpi: Option<Dpi>,
}

impl PageImage {
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.color_space.channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_space_parsing() {
        assert_eq!("RGB".parse::<ColorSpace>().unwrap(), ColorSpace::Rgb);
        assert_eq!("YCbCr".parse::<ColorSpace>().unwrap(), ColorSpace::YCbCr);
        assert_eq!("ycbcr".parse::<ColorSpace>().unwrap(), ColorSpace::YCbCr);
        assert_eq!("L".parse::<ColorSpace>().unwrap(), ColorSpace::Luma);
        assert!("CMYK".parse::<ColorSpace>().is_err());
    }

    #[test]
    fn test_dpi_parsing() {
        assert_eq!("300".parse::<Dpi>().unwrap(), Dpi::new(300, 300));
        assert_eq!("300x150".parse::<Dpi>().unwrap(), Dpi::new(300, 150));
        assert_eq!("72X72".parse::<Dpi>().unwrap(), Dpi::new(72, 72));
        assert!("0".parse::<Dpi>().is_err());
        assert!("abc".parse::<Dpi>().is_err());
        assert!("300x".parse::<Dpi>().is_err());
    }

    #[test]
    fn test_dpi_rounding() {
        assert_eq!(Dpi::from_f64(299.7, 72.2), Some(Dpi::new(300, 72)));
        assert_eq!(Dpi::from_f64(0.0, 72.0), None);
        assert_eq!(Dpi::from_f64(f64::NAN, 72.0), None);
        assert_eq!(Dpi::from_f64(-5.0, 72.0), None);
    }
}
