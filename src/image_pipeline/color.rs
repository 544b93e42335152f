//! Color-space normalization of decoded images
//!
//! YCbCr uses the full-range ITU-R BT.601 coefficients from the JFIF
//! specification, the same model JPEG encoders use internally.

use image::DynamicImage;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::ColorSpace;

/// Interleaved 8-bit samples produced by [`convert_color`]
#[derive(Debug, Clone)]
pub struct ConvertedPixels {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Converts a decoded image into the requested color space.
///
/// Alpha channels are dropped and high bit-depth sources are reduced to
/// 8 bits per sample.
pub fn convert_color(image: DynamicImage, color_space: ColorSpace) -> Result<ConvertedPixels> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ConversionError::InvalidDimensions(width, height));
    }

    debug!(
        "Converting {}x{} {:?} image to {}",
        width,
        height,
        image.color(),
        color_space
    );

    let data = match color_space {
        ColorSpace::Rgb => image.into_rgb8().into_raw(),
        ColorSpace::Luma => image.into_luma8().into_raw(),
        ColorSpace::YCbCr => {
            let mut data = image.into_rgb8().into_raw();
            for px in data.chunks_exact_mut(3) {
                let ycc = rgb_to_ycbcr([px[0], px[1], px[2]]);
                px.copy_from_slice(&ycc);
            }
            data
        }
    };

    let expected = width as usize * height as usize * color_space.channels();
    if data.len() != expected {
        return Err(ConversionError::ColorConversionError(format!(
            "expected {} samples for {}x{} {}, got {}",
            expected,
            width,
            height,
            color_space,
            data.len()
        )));
    }

    Ok(ConvertedPixels {
        width,
        height,
        data,
    })
}

pub fn rgb_to_ycbcr([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    [clamp_u8(y), clamp_u8(cb), clamp_u8(cr)]
}

pub fn ycbcr_to_rgb([y, cb, cr]: [u8; 3]) -> [u8; 3] {
    let y = y as f32;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;
    let r = y + 1.402 * cr;
    let g = y - 0.344_136 * cb - 0.714_136 * cr;
    let b = y + 1.772 * cb;
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
