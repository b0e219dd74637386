use alloc::vec::Vec;

use bitfrob::u8_replicate_bits;
use miniz_oxide::inflate::{decompress_slice_iter_to_slice, TINFLStatus};

use super::{
  chunk::{ChunkType, RawChunk, RawChunkIter},
  filtering::reconstruct_in_place,
  ihdr::IHDR,
};
use crate::{
  flip_rows, DecodeFailure, ImageInfo, PixelFormat, PngError, PngResult, RawImage, RowOrder, RGB8,
  RGBA8,
};

/// Settings for [`decode_with`].
///
/// The defaults match what [`decode`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
  /// Row order of the output buffer. Defaults to [`RowOrder::BottomUp`],
  /// which mirrors the rows relative to the PNG.
  pub row_order: RowOrder,
  /// Images wider or taller than this are refused before anything is
  /// allocated. Defaults to no limit: an image too big to hold in memory
  /// still fails, but with [`PngError::Alloc`].
  pub max_dimension: u32,
  /// Check the CRC of every chunk and the Adler-32 of the image data.
  /// Defaults to `true`.
  pub verify_checksums: bool,
}
impl Default for DecodeOptions {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl DecodeOptions {
  pub const DEFAULT_MAX_DIMENSION: u32 = u32::MAX;

  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      row_order: RowOrder::BottomUp,
      max_dimension: Self::DEFAULT_MAX_DIMENSION,
      verify_checksums: true,
    }
  }
  #[inline]
  #[must_use]
  pub const fn row_order(mut self, row_order: RowOrder) -> Self {
    self.row_order = row_order;
    self
  }
  #[inline]
  #[must_use]
  pub const fn max_dimension(mut self, max_dimension: u32) -> Self {
    self.max_dimension = max_dimension;
    self
  }
  #[inline]
  #[must_use]
  pub const fn verify_checksums(mut self, verify_checksums: bool) -> Self {
    self.verify_checksums = verify_checksums;
    self
  }
}

/// Reads the header of a PNG without touching the image data.
///
/// Only the signature and the first chunk are looked at, and nothing is
/// allocated, so this is cheap enough to call just to size a buffer or to
/// check that some bytes are a PNG at all.
///
/// ## Failure
/// * The bytes don't start with the PNG signature.
/// * The stream ends before a full `IHDR` chunk.
/// * The first chunk isn't `IHDR`, has a bad CRC, or has illegal values.
pub fn inspect(png: &[u8]) -> PngResult<ImageInfo> {
  read_header(png, true).map(|(ihdr, _)| ihdr.info())
}

/// Decodes a PNG to 8-bit RGB or RGBA with the default [`DecodeOptions`].
///
/// Whatever the PNG stores (grayscale, palette, 16-bit, and so on) is
/// converted to `output_format`. The rows of the output are mirrored, so the
/// bottom row of the picture comes first; use [`decode_with`] and
/// [`RowOrder::TopDown`] to keep PNG order.
///
/// The width and height of the returned image come from the PNG header.
#[inline]
pub fn decode(png: &[u8], output_format: PixelFormat) -> PngResult<RawImage> {
  decode_with(png, output_format, &DecodeOptions::default())
}

/// Decodes a PNG to RGB, 3 bytes per pixel.
#[inline]
pub fn decode_rgb(png: &[u8]) -> PngResult<RawImage> {
  decode(png, PixelFormat::Rgb)
}

/// Decodes a PNG to RGBA, 4 bytes per pixel.
#[inline]
pub fn decode_rgba(png: &[u8]) -> PngResult<RawImage> {
  decode(png, PixelFormat::Rgba)
}

/// Decodes a PNG to 8-bit RGB or RGBA.
///
/// ## Failure
/// * [`PngError::Decode`] when `output_format` isn't `Rgb` or `Rgba`, when the
///   bytes aren't a valid PNG, or when the PNG uses something this crate
///   doesn't decode (interlacing).
/// * [`PngError::Alloc`] when a buffer can't be allocated.
///
/// Nothing partial is ever returned.
pub fn decode_with(
  png: &[u8], output_format: PixelFormat, options: &DecodeOptions,
) -> PngResult<RawImage> {
  if !matches!(output_format, PixelFormat::Rgb | PixelFormat::Rgba) {
    return Err(DecodeFailure::UnsupportedOutputFormat.into());
  }
  let verify = options.verify_checksums;
  let (ihdr, chunks) = read_header(png, verify)?;
  log::debug!("decoding {ihdr:?} to {output_format:?}");
  if ihdr.width > options.max_dimension || ihdr.height > options.max_dimension {
    log::warn!("{}x{} is over the {} pixel limit", ihdr.width, ihdr.height, options.max_dimension);
    return Err(DecodeFailure::DimensionsTooLarge { width: ihdr.width, height: ihdr.height }.into());
  }
  if ihdr.is_interlaced {
    log::warn!("interlaced PNG data can't be decoded");
    return Err(DecodeFailure::Interlaced.into());
  }

  let aux = scan_chunks(chunks.clone(), verify)?;
  let palette: &[RGB8] = if ihdr.color_type == PixelFormat::Palette {
    match aux.palette {
      Some(palette) => palette,
      None => {
        log::warn!("indexed PNG without a PLTE chunk");
        return Err(DecodeFailure::MissingPalette.into());
      }
    }
  } else {
    &[]
  };
  let transparency = Transparency::new(ihdr, aux.trns);

  // Inflate. The temporary buffer lives only until the pixels are converted.
  let line_len = ihdr.bytes_per_scanline().ok_or(PngError::Alloc)?;
  let zlib_len = ihdr.zlib_decompression_requirement().ok_or(PngError::Alloc)?;
  let mut zlib_buffer: Vec<u8> = Vec::new();
  zlib_buffer.try_reserve_exact(zlib_len)?;
  zlib_buffer.resize(zlib_len, 0);
  let idat = chunks
    .take_while(|c| c.chunk_ty != ChunkType::IEND)
    .filter(|c| c.chunk_ty == ChunkType::IDAT)
    .map(|c| c.data);
  match decompress_slice_iter_to_slice(&mut zlib_buffer, idat, true, !verify) {
    Ok(count) if count < zlib_len => {
      log::warn!("image data inflated to {count} bytes, expected {zlib_len}");
      return Err(DecodeFailure::Truncated.into());
    }
    Ok(_) => (),
    Err(TINFLStatus::Adler32Mismatch) => return Err(DecodeFailure::ChecksumMismatch.into()),
    Err(TINFLStatus::FailedCannotMakeProgress | TINFLStatus::NeedsMoreInput) => {
      return Err(DecodeFailure::Truncated.into())
    }
    Err(status) => {
      log::warn!("inflating image data failed: {status:?}");
      return Err(DecodeFailure::Zlib.into());
    }
  }
  reconstruct_in_place(&mut zlib_buffer, line_len, ihdr.filter_chunk_size())?;

  // Convert into the final buffer.
  let out_len = output_format.buffer_len(ihdr.width, ihdr.height).ok_or(PngError::Alloc)?;
  let mut pixels: Vec<u8> = Vec::new();
  pixels.try_reserve_exact(out_len)?;
  let keep_alpha = output_format == PixelFormat::Rgba;
  for line in zlib_buffer.chunks_exact(line_len + 1) {
    let line = &line[1..];
    for x in 0..ihdr.width as usize {
      let RGBA8 { r, g, b, a } = pixel_to_rgba8(ihdr, line, x, palette, transparency)?;
      if keep_alpha {
        pixels.extend_from_slice(&[r, g, b, a]);
      } else {
        pixels.extend_from_slice(&[r, g, b]);
      }
    }
  }
  drop(zlib_buffer);
  debug_assert_eq!(pixels.len(), out_len);

  if options.row_order == RowOrder::BottomUp {
    flip_rows(&mut pixels, ihdr.width, ihdr.height, output_format.bytes_per_pixel());
  }
  Ok(RawImage::from_parts_unchecked(pixels, ihdr.width, ihdr.height, output_format))
}

/// Checks the signature and parses the first chunk as the header.
///
/// Also hands back the chunk iterator, positioned after the header.
fn read_header(png: &[u8], verify: bool) -> PngResult<(IHDR, RawChunkIter<'_>)> {
  let mut chunks = RawChunkIter::from_png_bytes(png)?;
  let first = chunks.next().ok_or(DecodeFailure::Truncated)?;
  if first.chunk_ty != ChunkType::IHDR {
    log::warn!("first chunk is {:?}, not IHDR", first.chunk_ty);
    return Err(DecodeFailure::MissingHeader.into());
  }
  if verify && !first.crc_matches() {
    return Err(DecodeFailure::ChecksumMismatch.into());
  }
  Ok((IHDR::try_from(first.data)?, chunks))
}

/// The chunks, other than the header, that affect how pixels come out.
#[derive(Debug, Clone, Copy, Default)]
struct AuxChunks<'b> {
  palette: Option<&'b [RGB8]>,
  trns: Option<&'b [u8]>,
}

/// Walks every chunk up to `IEND`, checking CRCs and picking out the
/// palette and transparency. The first of each is the one that's used.
fn scan_chunks(chunks: RawChunkIter<'_>, verify: bool) -> PngResult<AuxChunks<'_>> {
  let mut aux = AuxChunks::default();
  let mut saw_idat = false;
  let mut saw_iend = false;
  for chunk in chunks {
    if verify && !chunk.crc_matches() {
      log::warn!("CRC mismatch on {:?}", chunk.chunk_ty);
      return Err(DecodeFailure::ChecksumMismatch.into());
    }
    match chunk.chunk_ty {
      ChunkType::IEND => {
        saw_iend = true;
        break;
      }
      ChunkType::IDAT => saw_idat = true,
      ChunkType::PLTE if aux.palette.is_none() => aux.palette = Some(parse_palette(chunk)?),
      ChunkType::tRNS if aux.trns.is_none() => aux.trns = Some(chunk.data),
      ChunkType::IHDR => return Err(DecodeFailure::BadHeader.into()),
      other => log::debug!("skipping {other:?} chunk"),
    }
  }
  if !saw_iend {
    return Err(DecodeFailure::Truncated.into());
  }
  if !saw_idat {
    return Err(DecodeFailure::MissingImageData.into());
  }
  Ok(aux)
}

fn parse_palette(chunk: RawChunk<'_>) -> PngResult<&[RGB8]> {
  match bytemuck::try_cast_slice::<u8, RGB8>(chunk.data) {
    Ok(entries) if !entries.is_empty() && entries.len() <= 256 => Ok(entries),
    _ => Err(DecodeFailure::MissingPalette.into()),
  }
}

/// What the `tRNS` chunk means for this image's color type.
#[derive(Debug, Clone, Copy)]
enum Transparency<'b> {
  None,
  /// Gray sample value (at the stored bit depth) that is fully transparent.
  Gray(u16),
  /// RGB sample values (at the stored bit depth) that are fully transparent.
  Rgb([u16; 3]),
  /// Alpha for each palette index, missing entries are opaque.
  Palette(&'b [u8]),
}
impl<'b> Transparency<'b> {
  fn new(ihdr: IHDR, trns: Option<&'b [u8]>) -> Self {
    let Some(data) = trns else { return Self::None };
    match (ihdr.color_type, data) {
      (PixelFormat::Grayscale, [y0, y1]) => Self::Gray(u16::from_be_bytes([*y0, *y1])),
      (PixelFormat::Rgb, [r0, r1, g0, g1, b0, b1]) => Self::Rgb([
        u16::from_be_bytes([*r0, *r1]),
        u16::from_be_bytes([*g0, *g1]),
        u16::from_be_bytes([*b0, *b1]),
      ]),
      (PixelFormat::Palette, alphas) => Self::Palette(alphas),
      (color_type, _) => {
        log::debug!("ignoring tRNS of {} bytes for {color_type:?}", data.len());
        Self::None
      }
    }
  }
}

/// Reads channel `i` of a scanline at the stored bit depth.
///
/// Sub-byte samples are packed high bits first.
#[inline]
fn sample(line: &[u8], i: usize, bit_depth: u8) -> u16 {
  match bit_depth {
    16 => u16::from_be_bytes([line[2 * i], line[2 * i + 1]]),
    8 => u16::from(line[i]),
    _ => {
      let depth = bit_depth as usize;
      let bit = i * depth;
      let shift = 8 - depth - (bit % 8);
      let mask = (1_u8 << depth) - 1;
      u16::from((line[bit / 8] >> shift) & mask)
    }
  }
}

/// Scales a stored sample to 8 bits.
#[inline]
fn to_u8(value: u16, bit_depth: u8) -> u8 {
  match bit_depth {
    16 => (value >> 8) as u8,
    8 => value as u8,
    _ => u8_replicate_bits(u32::from(bit_depth), value as u8),
  }
}

fn pixel_to_rgba8(
  ihdr: IHDR, line: &[u8], x: usize, palette: &[RGB8], transparency: Transparency<'_>,
) -> PngResult<RGBA8> {
  let depth = ihdr.bit_depth;
  let channels = ihdr.color_type.channel_count();
  let s = |c: usize| sample(line, x * channels + c, depth);
  Ok(match ihdr.color_type {
    PixelFormat::Grayscale => {
      let y = s(0);
      let a = match transparency {
        Transparency::Gray(key) if key == y => 0,
        _ => 255,
      };
      RGBA8::gray(to_u8(y, depth), a)
    }
    PixelFormat::GrayscaleAlpha => RGBA8::gray(to_u8(s(0), depth), to_u8(s(1), depth)),
    PixelFormat::Rgb => {
      let rgb = [s(0), s(1), s(2)];
      let a = match transparency {
        Transparency::Rgb(key) if key == rgb => 0,
        _ => 255,
      };
      RGBA8 { r: to_u8(rgb[0], depth), g: to_u8(rgb[1], depth), b: to_u8(rgb[2], depth), a }
    }
    PixelFormat::Rgba => RGBA8 {
      r: to_u8(s(0), depth),
      g: to_u8(s(1), depth),
      b: to_u8(s(2), depth),
      a: to_u8(s(3), depth),
    },
    PixelFormat::Palette => {
      let index = s(0) as u8;
      let RGB8 { r, g, b } =
        *palette.get(usize::from(index)).ok_or(DecodeFailure::PaletteIndexOutOfRange(index))?;
      let a = match transparency {
        Transparency::Palette(alphas) => alphas.get(usize::from(index)).copied().unwrap_or(255),
        _ => 255,
      };
      RGBA8 { r, g, b, a }
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sample_packing() {
    let line = [0b1011_0010, 0xAB, 0xCD];
    assert_eq!(sample(&line, 0, 1), 1);
    assert_eq!(sample(&line, 1, 1), 0);
    assert_eq!(sample(&line, 7, 1), 0);
    assert_eq!(sample(&line, 6, 1), 1);
    assert_eq!(sample(&line, 0, 2), 0b10);
    assert_eq!(sample(&line, 3, 2), 0b10);
    assert_eq!(sample(&line, 1, 4), 0b0010);
    assert_eq!(sample(&line, 2, 8), 0xCD);
    assert_eq!(sample(&line, 1, 8), 0xAB);
    assert_eq!(sample(&line[1..], 0, 16), 0xABCD);
  }

  #[test]
  fn test_to_u8_scaling() {
    assert_eq!(to_u8(1, 1), 255);
    assert_eq!(to_u8(0, 1), 0);
    assert_eq!(to_u8(0b10, 2), 0b1010_1010);
    assert_eq!(to_u8(0xF, 4), 0xFF);
    assert_eq!(to_u8(0x7, 4), 0x77);
    assert_eq!(to_u8(0xABCD, 16), 0xAB);
    assert_eq!(to_u8(200, 8), 200);
  }

  #[test]
  fn test_options_builder() {
    let o = DecodeOptions::new()
      .row_order(RowOrder::TopDown)
      .max_dimension(64)
      .verify_checksums(false);
    assert_eq!(o.row_order, RowOrder::TopDown);
    assert_eq!(o.max_dimension, 64);
    assert!(!o.verify_checksums);
    assert_eq!(DecodeOptions::default(), DecodeOptions::new());
    assert_eq!(DecodeOptions::default().row_order, RowOrder::BottomUp);
    assert_eq!(DecodeOptions::default().max_dimension, u32::MAX);
  }
}
