#![forbid(unsafe_code)]

//! Owned image values that pass across the codec boundary.

use core::ops::Deref;

use alloc::vec::Vec;

use crate::{flip_rows, PixelFormat, PngError, PngResult};

/// An owned raw raster: 8 bits per channel, rows tightly packed.
///
/// The buffer length always equals `width * height * bytes_per_pixel`, which
/// [`RawImage::new`] checks. Decoding hands you a new one, encoding borrows
/// one, and nothing else keeps a reference to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawImage {
  width: u32,
  height: u32,
  format: PixelFormat,
  pixels: Vec<u8>,
}
impl RawImage {
  /// Wraps a pixel buffer, checking that its length fits the dimensions.
  pub fn new(pixels: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> PngResult<Self> {
    // a length that overflows can't match any real buffer
    let expected = format.buffer_len(width, height).unwrap_or(usize::MAX);
    if pixels.len() != expected {
      return Err(PngError::SizeMismatch { expected, actual: pixels.len() });
    }
    Ok(Self { width, height, format, pixels })
  }

  /// Only for buffers that were sized from the dimensions in the first place.
  #[inline]
  pub(crate) fn from_parts_unchecked(
    pixels: Vec<u8>, width: u32, height: u32, format: PixelFormat,
  ) -> Self {
    debug_assert_eq!(Some(pixels.len()), format.buffer_len(width, height));
    Self { width, height, format, pixels }
  }

  /// width in pixels
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }

  /// height in pixels
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }

  #[inline]
  #[must_use]
  pub const fn format(&self) -> PixelFormat {
    self.format
  }

  /// `(width, height)`
  #[inline]
  #[must_use]
  pub const fn dimensions(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.pixels
  }

  /// Gives up the image and keeps only the pixel buffer.
  #[inline]
  #[must_use]
  pub fn into_pixels(self) -> Vec<u8> {
    self.pixels
  }

  /// Gets the bytes of the pixel at the position, or `None` if the position is
  /// out of bounds.
  #[inline]
  #[must_use]
  pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
    if x < self.width && y < self.height {
      let bpp = self.format.bytes_per_pixel();
      let i = (y as usize * self.width as usize + x as usize) * bpp;
      self.pixels.get(i..i + bpp)
    } else {
      None
    }
  }

  /// Flips the image top to bottom.
  #[inline]
  pub fn vertical_flip(&mut self) {
    flip_rows(&mut self.pixels, self.width, self.height, self.format.bytes_per_pixel())
  }

  /// Encodes this image as PNG.
  #[inline]
  pub fn to_png(&self) -> PngResult<EncodedImage> {
    crate::png::encode(&self.pixels, self.width, self.height, self.format)
  }
}

/// Bytes of a PNG datastream.
///
/// The encoder makes these. Anything else that claims to be PNG can be wrapped
/// with `From<Vec<u8>>`. It derefs to `[u8]`, so a `&EncodedImage` can go
/// anywhere the decoder or the inspector wants bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EncodedImage(Vec<u8>);
impl EncodedImage {
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
  #[inline]
  #[must_use]
  pub fn into_bytes(self) -> Vec<u8> {
    self.0
  }
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
impl From<Vec<u8>> for EncodedImage {
  #[inline]
  fn from(bytes: Vec<u8>) -> Self {
    Self(bytes)
  }
}
impl Deref for EncodedImage {
  type Target = [u8];
  #[inline]
  fn deref(&self) -> &[u8] {
    &self.0
  }
}
impl AsRef<[u8]> for EncodedImage {
  #[inline]
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

/// What a PNG header says about the image, without any pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageInfo {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// the format the pixels are stored in
  pub color_type: PixelFormat,
  /// bits per channel as stored (1, 2, 4, 8, or 16)
  pub bit_depth: u8,
  /// if the image data is stored interlaced
  pub is_interlaced: bool,
}
impl ImageInfo {
  /// The stored format as its plain integer code.
  #[inline]
  #[must_use]
  pub const fn color_type_code(&self) -> u8 {
    self.color_type.code()
  }

  /// Size of the buffer that decoding to `format` would produce.
  #[inline]
  #[must_use]
  pub const fn decoded_len(&self, format: PixelFormat) -> Option<usize> {
    format.buffer_len(self.width, self.height)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec;

  #[test]
  fn test_new_checks_length() {
    assert!(RawImage::new(vec![0; 12], 2, 2, PixelFormat::Rgb).is_ok());
    assert_eq!(
      RawImage::new(vec![0; 11], 2, 2, PixelFormat::Rgb),
      Err(PngError::SizeMismatch { expected: 12, actual: 11 })
    );
    assert_eq!(
      RawImage::new(vec![0; 16], 2, 2, PixelFormat::Rgb),
      Err(PngError::SizeMismatch { expected: 12, actual: 16 })
    );
  }

  #[test]
  fn test_pixel_lookup() {
    let img = RawImage::new((0..8).collect(), 2, 2, PixelFormat::GrayscaleAlpha).unwrap();
    assert_eq!(img.pixel(1, 0), Some(&[2, 3][..]));
    assert_eq!(img.pixel(0, 1), Some(&[4, 5][..]));
    assert_eq!(img.pixel(2, 0), None);
    assert_eq!(img.pixel(0, 2), None);
  }

  #[test]
  fn test_vertical_flip() {
    let mut img = RawImage::new((0..6).collect(), 1, 2, PixelFormat::Rgb).unwrap();
    img.vertical_flip();
    assert_eq!(img.as_bytes(), &[3, 4, 5, 0, 1, 2]);
  }

  #[test]
  fn test_info_code_and_len() {
    let info = ImageInfo {
      width: 3,
      height: 2,
      color_type: PixelFormat::GrayscaleAlpha,
      bit_depth: 16,
      is_interlaced: false,
    };
    assert_eq!(info.color_type_code(), 4);
    assert_eq!(info.decoded_len(PixelFormat::Rgba), Some(24));
  }
}
