use crate::{DecodeFailure, ImageInfo, PixelFormat};

/// Largest width or height that PNG allows.
pub const PNG_MAX_DIMENSION: u32 = i32::MAX as u32;

/// Image Header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PixelFormat,
  /// if the image data is stored interlaced.
  ///
  /// please don't make new interlaced images, they're terrible.
  pub is_interlaced: bool,
}
impl IHDR {
  /// Header for an 8-bit, non-interlaced image.
  #[inline]
  #[must_use]
  pub const fn new_8bit(width: u32, height: u32, color_type: PixelFormat) -> Self {
    Self { width, height, bit_depth: 8, color_type, is_interlaced: false }
  }

  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Filters work on bytes, with the "left" byte being one whole pixel back,
  /// or one byte back when pixels are smaller than a byte.
  #[inline]
  #[must_use]
  pub const fn filter_chunk_size(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Packed bytes of one scanline, without the filter byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(&self) -> Option<usize> {
    // sub-byte pixels can leave a partial byte on the end, so round up
    match self.bits_per_pixel().checked_mul(self.width as usize) {
      Some(bits) => Some(bits / 8 + (bits % 8 != 0) as usize),
      None => None,
    }
  }

  /// Gets the buffer size required to hold the inflated image data of a
  /// non-interlaced image: one filter byte plus one scanline, per row.
  #[inline]
  #[must_use]
  pub const fn zlib_decompression_requirement(&self) -> Option<usize> {
    match self.bytes_per_scanline() {
      Some(line) => (line + 1).checked_mul(self.height as usize),
      None => None,
    }
  }

  /// The 13 data bytes of this header's chunk.
  #[must_use]
  pub fn to_bytes(&self) -> [u8; 13] {
    let mut out = [0_u8; 13];
    out[0..4].copy_from_slice(&self.width.to_be_bytes());
    out[4..8].copy_from_slice(&self.height.to_be_bytes());
    out[8] = self.bit_depth;
    out[9] = self.color_type.code();
    // compression method and filter method are both always 0
    out[12] = self.is_interlaced as u8;
    out
  }

  #[inline]
  #[must_use]
  pub const fn info(&self) -> ImageInfo {
    ImageInfo {
      width: self.width,
      height: self.height,
      color_type: self.color_type,
      bit_depth: self.bit_depth,
      is_interlaced: self.is_interlaced,
    }
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = DecodeFailure;
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        let width = u32::from_be_bytes([*w0, *w1, *w2, *w3]);
        let height = u32::from_be_bytes([*h0, *h1, *h2, *h3]);
        if width == 0 || height == 0 || width > PNG_MAX_DIMENSION || height > PNG_MAX_DIMENSION {
          return Err(DecodeFailure::BadHeader);
        }
        if *compression_method != 0 || *filter_method != 0 {
          return Err(DecodeFailure::BadHeader);
        }
        Ok(Self {
          width,
          height,
          bit_depth: match *color_type {
            0 if [1, 2, 4, 8, 16].contains(bit_depth) => *bit_depth,
            2 if [8, 16].contains(bit_depth) => *bit_depth,
            3 if [1, 2, 4, 8].contains(bit_depth) => *bit_depth,
            4 if [8, 16].contains(bit_depth) => *bit_depth,
            6 if [8, 16].contains(bit_depth) => *bit_depth,
            _ => return Err(DecodeFailure::BadHeader),
          },
          color_type: PixelFormat::try_from(*color_type).map_err(|_| DecodeFailure::BadHeader)?,
          is_interlaced: match interlace_method {
            0 => false,
            1 => true,
            _ => return Err(DecodeFailure::BadHeader),
          },
        })
      }
      _ => Err(DecodeFailure::BadHeader),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_header_bytes_round_trip() {
    let ihdr = IHDR::new_8bit(640, 480, PixelFormat::Rgba);
    let bytes = ihdr.to_bytes();
    assert_eq!(bytes, [0, 0, 2, 128, 0, 0, 1, 224, 8, 6, 0, 0, 0]);
    assert_eq!(IHDR::try_from(&bytes[..]), Ok(ihdr));
  }

  #[test]
  fn test_header_rejects_bad_fields() {
    let good = IHDR::new_8bit(1, 1, PixelFormat::Rgb).to_bytes();
    let with = |i: usize, v: u8| {
      let mut b = good;
      b[i] = v;
      IHDR::try_from(&b[..])
    };
    // zero width
    assert_eq!(with(3, 0), Err(DecodeFailure::BadHeader));
    // RGB can't be 4 bits
    assert_eq!(with(8, 4), Err(DecodeFailure::BadHeader));
    // no color type 5
    assert_eq!(with(9, 5), Err(DecodeFailure::BadHeader));
    assert_eq!(with(10, 1), Err(DecodeFailure::BadHeader));
    assert_eq!(with(11, 1), Err(DecodeFailure::BadHeader));
    assert_eq!(with(12, 2), Err(DecodeFailure::BadHeader));
    assert_eq!(with(12, 1).map(|h| h.is_interlaced), Ok(true));
    assert_eq!(IHDR::try_from(&good[..12]), Err(DecodeFailure::BadHeader));
  }

  #[test]
  fn test_scanline_sizes() {
    let mut ihdr = IHDR::new_8bit(3, 2, PixelFormat::Rgb);
    assert_eq!(ihdr.bytes_per_scanline(), Some(9));
    assert_eq!(ihdr.zlib_decompression_requirement(), Some(20));
    assert_eq!(ihdr.filter_chunk_size(), 3);
    ihdr.color_type = PixelFormat::Grayscale;
    ihdr.bit_depth = 1;
    ihdr.width = 9;
    assert_eq!(ihdr.bytes_per_scanline(), Some(2));
    assert_eq!(ihdr.filter_chunk_size(), 1);
    ihdr.color_type = PixelFormat::Rgba;
    ihdr.bit_depth = 16;
    assert_eq!(ihdr.filter_chunk_size(), 8);
  }
}
