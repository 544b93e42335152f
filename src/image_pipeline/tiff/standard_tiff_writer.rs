use std::io::{Cursor, Seek, Write};

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use tiff::encoder::colortype::{self, ColorType};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, ImageEncoder, Rational, TiffEncoder, TiffKind};
use tiff::tags::{PhotometricInterpretation, ResolutionUnit, Tag};
use tracing::debug;

use crate::image_pipeline::color::ycbcr_to_rgb;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::{ColorSpace, Dpi, PageImage};
use crate::image_pipeline::tiff::types::{TiffCompression, WriteOptions, validate_quality};
use crate::image_pipeline::tiff::writer::MultiPageWriter;

/// `Compression` tag value for JPEG streams (TIFF Technical Note 2)
const COMPRESSION_JPEG: u16 = 7;
const YCBCR_SUBSAMPLING: u16 = 530;
const PLANAR_CHUNKY: u16 = 1;

/// Writes every page as its own directory of one classic TIFF file.
///
/// The file is assembled in memory and handed to `output` in a single write.
pub struct StandardTiffWriter;

impl MultiPageWriter for StandardTiffWriter {
    fn write_pages(&self, pages: &[PageImage], output: &mut dyn Write, options: &WriteOptions) -> Result<()> {
        debug!(
            "Encoding {} page(s), compression={}, quality={}, dpi={}",
            pages.len(),
            options.compression,
            options.quality,
            options.dpi
        );

        for page in pages {
            check_page(page)?;
        }

        let mut buffer = Vec::new();
        {
            let encoder = TiffEncoder::new(Cursor::new(&mut buffer)).map_err(encode_error)?;

            match tiff_compression(options.compression) {
                Some(compression) => {
                    let mut encoder = encoder.with_compression(compression);
                    for page in pages {
                        write_raster_page(&mut encoder, page, options.dpi)?;
                    }
                }
                None => {
                    let quality = validate_quality(options.quality)?;
                    let mut encoder = encoder;
                    for page in pages {
                        write_jpeg_page(&mut encoder, page, options.dpi, quality)?;
                    }
                }
            }
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

fn encode_error(e: impl std::fmt::Display) -> ConversionError {
    ConversionError::EncodeError(e.to_string())
}

fn check_page(page: &PageImage) -> Result<()> {
    if page.width == 0 || page.height == 0 {
        return Err(ConversionError::InvalidDimensions(page.width, page.height));
    }
    if page.data.len() != page.expected_len() {
        return Err(ConversionError::EncodeError(format!(
            "{}: expected {} samples, got {}",
            page.source.display(),
            page.expected_len(),
            page.data.len()
        )));
    }
    Ok(())
}

/// Codec handled by the `tiff` encoder itself; `None` for JPEG.
fn tiff_compression(compression: TiffCompression) -> Option<Compression> {
    match compression {
        TiffCompression::None => Some(Compression::Uncompressed),
        TiffCompression::Lzw => Some(Compression::Lzw),
        TiffCompression::DeflateFast => Some(Compression::Deflate(DeflateLevel::Fast)),
        TiffCompression::DeflateBalanced => Some(Compression::Deflate(DeflateLevel::Balanced)),
        TiffCompression::DeflateBest => Some(Compression::Deflate(DeflateLevel::Best)),
        TiffCompression::Packbits => Some(Compression::Packbits),
        TiffCompression::Jpeg => None,
    }
}

fn rational(v: u32) -> Rational {
    Rational { n: v, d: 1 }
}

fn set_resolution<W, C, K>(image: &mut ImageEncoder<'_, W, C, K>, dpi: Dpi)
where
    W: Write + Seek,
    C: ColorType,
    K: TiffKind,
{
    image.resolution_unit(ResolutionUnit::Inch);
    image.x_resolution(rational(dpi.x));
    image.y_resolution(rational(dpi.y));
}

fn write_raster_page<W: Write + Seek>(encoder: &mut TiffEncoder<W>, page: &PageImage, dpi: Dpi) -> Result<()> {
    debug!("Writing {}x{} {} page", page.width, page.height, page.color_space);

    match page.color_space {
        ColorSpace::Rgb => {
            let mut image = encoder
                .new_image::<colortype::RGB8>(page.width, page.height)
                .map_err(encode_error)?;
            set_resolution(&mut image, dpi);
            image.write_data(&page.data).map_err(encode_error)?;
        }
        ColorSpace::YCbCr => {
            // RGB8 gives the right sample layout, the photometric tag is replaced
            let mut image = encoder
                .new_image::<colortype::RGB8>(page.width, page.height)
                .map_err(encode_error)?;
            set_resolution(&mut image, dpi);
            image
                .encoder()
                .write_tag(
                    Tag::PhotometricInterpretation,
                    PhotometricInterpretation::YCbCr.to_u16(),
                )
                .map_err(encode_error)?;
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(YCBCR_SUBSAMPLING), &[1u16, 1][..])
                .map_err(encode_error)?;
            image.write_data(&page.data).map_err(encode_error)?;
        }
        ColorSpace::Luma => {
            let mut image = encoder
                .new_image::<colortype::Gray8>(page.width, page.height)
                .map_err(encode_error)?;
            set_resolution(&mut image, dpi);
            image.write_data(&page.data).map_err(encode_error)?;
        }
    }
    Ok(())
}

/// Encodes a page as a self-contained JPEG stream.
///
/// The JPEG encoder takes RGB input and stores YCbCr, so YCbCr pages are
/// converted back first.
pub(crate) fn encode_jpeg_strip(page: &PageImage, quality: u8) -> Result<Vec<u8>> {
    let mut jpeg = Vec::new();
    let result = {
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
        match page.color_space {
            ColorSpace::Rgb => {
                encoder.encode(&page.data, page.width, page.height, ExtendedColorType::Rgb8)
            }
            ColorSpace::YCbCr => {
                let rgb: Vec<u8> = page
                    .data
                    .chunks_exact(3)
                    .flat_map(|px| ycbcr_to_rgb([px[0], px[1], px[2]]))
                    .collect();
                encoder.encode(&rgb, page.width, page.height, ExtendedColorType::Rgb8)
            }
            ColorSpace::Luma => {
                encoder.encode(&page.data, page.width, page.height, ExtendedColorType::L8)
            }
        }
    };
    result.map_err(|e| ConversionError::EncodeError(format!("{}: {}", page.source.display(), e)))?;

    Ok(jpeg)
}

fn write_jpeg_page<W: Write + Seek>(
    encoder: &mut TiffEncoder<W>,
    page: &PageImage,
    dpi: Dpi,
    quality: u8,
) -> Result<()> {
    let strip = encode_jpeg_strip(page, quality)?;
    debug!(
        "Writing {}x{} {} page as {} byte JPEG strip",
        page.width,
        page.height,
        page.color_space,
        strip.len()
    );

    let (photometric, bits): (PhotometricInterpretation, &[u16]) = match page.color_space {
        ColorSpace::Rgb | ColorSpace::YCbCr => (PhotometricInterpretation::YCbCr, &[8, 8, 8]),
        ColorSpace::Luma => (PhotometricInterpretation::BlackIsZero, &[8]),
    };

    let mut dir = encoder.image_directory().map_err(encode_error)?;
    dir.write_tag(Tag::ImageWidth, page.width).map_err(encode_error)?;
    dir.write_tag(Tag::ImageLength, page.height).map_err(encode_error)?;
    dir.write_tag(Tag::BitsPerSample, bits).map_err(encode_error)?;
    dir.write_tag(Tag::Compression, COMPRESSION_JPEG).map_err(encode_error)?;
    dir.write_tag(Tag::PhotometricInterpretation, photometric.to_u16())
        .map_err(encode_error)?;
    dir.write_tag(Tag::SamplesPerPixel, bits.len() as u16)
        .map_err(encode_error)?;
    dir.write_tag(Tag::RowsPerStrip, page.height).map_err(encode_error)?;
    dir.write_tag(Tag::PlanarConfiguration, PLANAR_CHUNKY)
        .map_err(encode_error)?;
    if matches!(photometric, PhotometricInterpretation::YCbCr) {
        dir.write_tag(Tag::from_u16_exhaustive(YCBCR_SUBSAMPLING), &[1u16, 1][..])
            .map_err(encode_error)?;
    }
    dir.write_tag(Tag::XResolution, rational(dpi.x)).map_err(encode_error)?;
    dir.write_tag(Tag::YResolution, rational(dpi.y)).map_err(encode_error)?;
    dir.write_tag(Tag::ResolutionUnit, ResolutionUnit::Inch.to_u16())
        .map_err(encode_error)?;

    let offset = dir.write_data(&strip[..]).map_err(encode_error)?;
    let offset = u32::try_from(offset)
        .map_err(|_| ConversionError::EncodeError("output exceeds 4 GiB".to_string()))?;
    dir.write_tag(Tag::StripOffsets, offset).map_err(encode_error)?;
    dir.write_tag(Tag::StripByteCounts, strip.len() as u32)
        .map_err(encode_error)?;

    dir.finish().map_err(encode_error)?;
    Ok(())
}
