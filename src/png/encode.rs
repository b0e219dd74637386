use alloc::vec::Vec;

use super::{
  chunk::{write_chunk, ChunkType, PNG_SIGNATURE},
  filtering::filter_scanlines,
  ihdr::{IHDR, PNG_MAX_DIMENSION},
};
use crate::{EncodeFailure, EncodedImage, PixelFormat, PngError, PngResult, RawImage};

/// Largest payload written into a single `IDAT` chunk.
pub const IDAT_CHUNK_LIMIT: usize = 1 << 20;

/// Zlib level used for the image data.
const COMPRESSION_LEVEL: u8 = 6;

/// Encodes raw 8-bit pixels as a PNG.
///
/// * `pixels` must be exactly `width * height * format.bytes_per_pixel()`
///   bytes, rows tightly packed.
/// * Rows are written in the order given. The first row of `pixels` becomes
///   the top scanline of the PNG, there's no flipping on this side.
/// * `Rgb`, `Rgba`, `Grayscale`, and `GrayscaleAlpha` are accepted. `Palette`
///   isn't, since there's no palette to go with the indexes.
///
/// ## Failure
/// * [`PngError::SizeMismatch`] if the buffer length is wrong.
/// * [`PngError::Encode`] for a palette format or dimensions PNG can't hold.
/// * [`PngError::Alloc`] if the output can't be allocated.
pub fn encode(
  pixels: &[u8], width: u32, height: u32, format: PixelFormat,
) -> PngResult<EncodedImage> {
  if format == PixelFormat::Palette {
    log::warn!("refusing to encode indexed pixels without a palette");
    return Err(EncodeFailure::UnsupportedFormat.into());
  }
  if width == 0 || height == 0 || width > PNG_MAX_DIMENSION || height > PNG_MAX_DIMENSION {
    return Err(EncodeFailure::InvalidDimensions { width, height }.into());
  }
  let expected = format.buffer_len(width, height).unwrap_or(usize::MAX);
  if pixels.len() != expected {
    return Err(PngError::SizeMismatch { expected, actual: pixels.len() });
  }

  let ihdr = IHDR::new_8bit(width, height, format);
  let line_len = width as usize * format.bytes_per_pixel();
  let mut filtered: Vec<u8> = Vec::new();
  filter_scanlines(pixels, line_len, ihdr.filter_chunk_size(), &mut filtered)?;
  let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&filtered, COMPRESSION_LEVEL);
  drop(filtered);
  log::debug!(
    "encoding {width}x{height} {format:?}: {} raw bytes, {} compressed",
    pixels.len(),
    compressed.len()
  );

  let idat_count = compressed.len().div_ceil(IDAT_CHUNK_LIMIT);
  let mut out: Vec<u8> = Vec::new();
  out.try_reserve_exact(PNG_SIGNATURE.len() + (12 + 13) + (12 * idat_count) + compressed.len() + 12)?;
  out.extend_from_slice(&PNG_SIGNATURE);
  write_chunk(&mut out, ChunkType::IHDR, &ihdr.to_bytes())?;
  for idat in compressed.chunks(IDAT_CHUNK_LIMIT) {
    write_chunk(&mut out, ChunkType::IDAT, idat)?;
  }
  write_chunk(&mut out, ChunkType::IEND, &[])?;
  Ok(EncodedImage::from(out))
}

/// Encodes RGB pixels, 3 bytes per pixel.
#[inline]
pub fn encode_rgb(pixels: &[u8], width: u32, height: u32) -> PngResult<EncodedImage> {
  encode(pixels, width, height, PixelFormat::Rgb)
}

/// Encodes RGBA pixels, 4 bytes per pixel.
#[inline]
pub fn encode_rgba(pixels: &[u8], width: u32, height: u32) -> PngResult<EncodedImage> {
  encode(pixels, width, height, PixelFormat::Rgba)
}

/// Encodes an already validated image.
#[inline]
pub fn encode_image(image: &RawImage) -> PngResult<EncodedImage> {
  image.to_png()
}
