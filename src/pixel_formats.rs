//! Module for pixel formats.
//!
//! A raw pixel buffer in this crate is always 8 bits per channel, tightly
//! packed, with no padding between rows. The format decides how many channels
//! each pixel has, and so how many bytes each pixel takes:
//!
//! | Format           | Code | Channels  | Bytes/pixel |
//! |------------------|------|-----------|-------------|
//! | `Grayscale`      | 0    | 1         | 1           |
//! | `Rgb`            | 2    | 3         | 3           |
//! | `Palette`        | 3    | 1 (index) | 1           |
//! | `GrayscaleAlpha` | 4    | 2         | 2           |
//! | `Rgba`           | 6    | 4         | 4           |
//!
//! The code is the same number that PNG uses for the color type in its
//! header, so a host that only deals in plain integers can pass codes back
//! and forth without knowing about [`PixelFormat`] at all.
//!
//! ## Format Conversion
//!
//! When going from grayscale to RGB one just simply copies the gray value to
//! each of the RGB channels. When a format without alpha is given alpha, the
//! pixel is fully opaque.

use bytemuck::{Pod, Zeroable};

/// The color layouts this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PixelFormat {
  /// Greyscale
  Grayscale = 0,
  /// Red, Green, Blue
  Rgb = 2,
  /// Index into a palette of `RGB8` entries.
  Palette = 3,
  /// Greyscale + Alpha
  GrayscaleAlpha = 4,
  /// Red, Green, Blue, Alpha
  Rgba = 6,
}
impl PixelFormat {
  /// Bit depth of each channel in a raw buffer.
  pub const BIT_DEPTH: u8 = 8;

  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Grayscale => 1,
      Self::Rgb => 3,
      Self::Palette => 1,
      Self::GrayscaleAlpha => 2,
      Self::Rgba => 4,
    }
  }

  /// Bits per channel of a raw buffer in this format.
  #[inline]
  #[must_use]
  pub const fn bit_depth(self) -> u8 {
    Self::BIT_DEPTH
  }

  /// Stride of one pixel within a raw buffer.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(self) -> usize {
    (Self::BIT_DEPTH as usize / 8) * self.channel_count()
  }

  /// The stable small-integer code for this format.
  #[inline]
  #[must_use]
  pub const fn code(self) -> u8 {
    self as u8
  }

  /// If pixels of this format carry an alpha channel.
  #[inline]
  #[must_use]
  pub const fn has_alpha(self) -> bool {
    matches!(self, Self::GrayscaleAlpha | Self::Rgba)
  }

  /// Byte length of a `width` by `height` raw buffer, or `None` on overflow.
  #[inline]
  #[must_use]
  pub const fn buffer_len(self, width: u32, height: u32) -> Option<usize> {
    match (width as usize).checked_mul(height as usize) {
      Some(pixel_count) => pixel_count.checked_mul(self.bytes_per_pixel()),
      None => None,
    }
  }
}
impl TryFrom<u8> for PixelFormat {
  type Error = ();
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PixelFormat::Grayscale,
      2 => PixelFormat::Rgb,
      3 => PixelFormat::Palette,
      4 => PixelFormat::GrayscaleAlpha,
      6 => PixelFormat::Rgba,
      _ => return Err(()),
    })
  }
}
impl From<PixelFormat> for u8 {
  #[inline]
  fn from(format: PixelFormat) -> Self {
    format.code()
  }
}

/// An RGB value, 8-bits per channel.
///
/// This is the layout of a PNG palette entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// An 8-bits per channel RGBA pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl RGBA8 {
  /// A gray pixel with the given alpha.
  #[inline]
  #[must_use]
  pub const fn gray(y: u8, a: u8) -> Self {
    Self { r: y, g: y, b: y, a }
  }
}
impl From<RGB8> for RGBA8 {
  #[inline]
  fn from(RGB8 { r, g, b }: RGB8) -> Self {
    Self { r, g, b, a: 255 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [PixelFormat; 5] = [
    PixelFormat::Grayscale,
    PixelFormat::Rgb,
    PixelFormat::Palette,
    PixelFormat::GrayscaleAlpha,
    PixelFormat::Rgba,
  ];

  #[test]
  fn test_bytes_per_pixel_table() {
    let bpp: [usize; 5] = ALL.map(PixelFormat::bytes_per_pixel);
    assert_eq!(bpp, [1, 3, 1, 2, 4]);
    for f in ALL {
      assert_eq!(f.bit_depth(), 8);
      assert_eq!(f.bytes_per_pixel(), f.channel_count());
    }
  }

  #[test]
  fn test_codes_round_trip() {
    for f in ALL {
      assert_eq!(PixelFormat::try_from(f.code()), Ok(f));
    }
    for bad in [1_u8, 5, 7, 255] {
      assert!(PixelFormat::try_from(bad).is_err());
    }
  }

  #[test]
  fn test_buffer_len_overflow() {
    assert_eq!(PixelFormat::Rgba.buffer_len(2, 3), Some(24));
    assert_eq!(PixelFormat::Rgb.buffer_len(0, 3), Some(0));
    assert_eq!(PixelFormat::Rgba.buffer_len(u32::MAX, u32::MAX), None);
  }
}
