//! Resolution metadata extraction from JPEG and PNG containers.
//!
//! JPEG files are checked for a JFIF APP0 density first and fall back to the
//! EXIF `XResolution`/`YResolution` tags. PNG files carry resolution in the
//! `pHYs` chunk. Anything that cannot be interpreted as dots per inch is
//! reported as missing.

use std::io::Cursor;

use exif::{In, Reader, Tag, Value};
use tracing::{debug, trace};

use crate::image_pipeline::common::types::Dpi;

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

const CM_PER_INCH: f64 = 2.54;
const INCH_PER_METER: f64 = 0.0254;

/// Reads the embedded resolution of a JPEG or PNG file.
pub fn read_dpi(data: &[u8]) -> Option<Dpi> {
    if data.starts_with(PNG_SIGNATURE) {
        png_dpi(data)
    } else if data.starts_with(&JPEG_SOI) {
        jfif_dpi(data).or_else(|| exif_dpi(data))
    } else {
        None
    }
}

/// Density from the JFIF APP0 segment, if its units are absolute.
pub fn jfif_dpi(data: &[u8]) -> Option<Dpi> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            // fill byte
            0xFF => {
                pos += 1;
                continue;
            }
            // standalone markers
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            // start of scan or end of image
            0xDA | 0xD9 => return None,
            _ => {}
        }

        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if len < 2 {
            return None;
        }
        let body = data.get(pos + 4..pos + 2 + len)?;

        if marker == 0xE0 && body.len() >= 12 && body.starts_with(b"JFIF\0") {
            let units = body[7];
            let x = u16::from_be_bytes([body[8], body[9]]) as f64;
            let y = u16::from_be_bytes([body[10], body[11]]) as f64;
            trace!(units, x, y, "JFIF density");
            return match units {
                1 => Dpi::from_f64(x, y),
                2 => Dpi::from_f64(x * CM_PER_INCH, y * CM_PER_INCH),
                _ => None,
            };
        }

        pos += 2 + len;
    }
    None
}

/// Resolution from EXIF tags embedded in the container.
pub fn exif_dpi(data: &[u8]) -> Option<Dpi> {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(e) => {
            trace!("No readable EXIF block: {}", e);
            return None;
        }
    };

    let rational = |tag: Tag| -> Option<f64> {
        let field = exif.get_field(tag, In::PRIMARY)?;
        match &field.value {
            Value::Rational(v) if !v.is_empty() && v[0].denom != 0 => Some(v[0].to_f64()),
            _ => None,
        }
    };

    let x = rational(Tag::XResolution)?;
    let y = rational(Tag::YResolution).unwrap_or(x);
    let unit = exif
        .get_field(Tag::ResolutionUnit, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(2);

    debug!(x, y, unit, "EXIF resolution");
    match unit {
        3 => Dpi::from_f64(x * CM_PER_INCH, y * CM_PER_INCH),
        _ => Dpi::from_f64(x, y),
    }
}

/// Density from the PNG `pHYs` chunk when expressed in pixels per metre.
pub fn png_dpi(data: &[u8]) -> Option<Dpi> {
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= data.len() {
        let len = u32::from_be_bytes(data[pos..pos + 4].try_into().ok()?) as usize;
        let kind = &data[pos + 4..pos + 8];
        let body = data.get(pos + 8..(pos + 8).checked_add(len)?)?;

        match kind {
            b"pHYs" if body.len() >= 9 => {
                let x = u32::from_be_bytes(body[0..4].try_into().ok()?) as f64;
                let y = u32::from_be_bytes(body[4..8].try_into().ok()?) as f64;
                trace!(unit = body[8], x, y, "pHYs chunk");
                return match body[8] {
                    1 => Dpi::from_f64(x * INCH_PER_METER, y * INCH_PER_METER),
                    _ => None,
                };
            }
            // pHYs must precede the image data
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        // length, type, body, crc
        pos += 12 + len;
    }
    None
}
