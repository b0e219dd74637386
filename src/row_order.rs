//! Vertical orientation of raw pixel rows.
//!
//! PNG stores the top scanline first. Many texture and framebuffer
//! conventions want the bottom row first instead, so the decoder mirrors the
//! rows by default. The encoder never reorders: it writes rows in whatever
//! order the caller gave them.

/// Which row of a raw buffer comes first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowOrder {
  /// Row 0 is the bottom of the image (the rows are mirrored from PNG order).
  #[default]
  BottomUp,
  /// Row 0 is the top of the image, same as PNG.
  TopDown,
}

/// Mirrors the rows of a raster in place.
///
/// Row `i` is swapped with row `height - 1 - i` for every `i < height / 2`.
/// When the height is odd the middle row stays put. Applying this twice gives
/// back the original bytes.
///
/// ## Panics
/// * If `pixels` is shorter than `width * height * bytes_per_pixel`, or that
///   size doesn't fit in `usize`.
pub fn flip_rows(pixels: &mut [u8], width: u32, height: u32, bytes_per_pixel: usize) {
  let height = height as usize;
  let needed = (width as usize).checked_mul(bytes_per_pixel).and_then(|row| {
    row.checked_mul(height).map(|total| (row, total))
  });
  let row_len = match needed {
    Some((row_len, total)) if pixels.len() >= total => row_len,
    _ => panic!("raster is smaller than its dimensions"),
  };
  for top in 0..(height / 2) {
    let bottom = height - 1 - top;
    let top_start = top * row_len;
    let bottom_start = bottom * row_len;
    for offset in 0..row_len {
      pixels.swap(top_start + offset, bottom_start + offset);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec::Vec;

  #[test]
  fn test_flip_rows_even_height() {
    let mut px: Vec<u8> = (0..8).collect();
    flip_rows(&mut px, 2, 2, 2);
    assert_eq!(px, [4, 5, 6, 7, 0, 1, 2, 3]);
  }

  #[test]
  fn test_flip_rows_odd_height_keeps_middle() {
    let mut px: Vec<u8> = (0..9).collect();
    flip_rows(&mut px, 3, 3, 1);
    assert_eq!(px, [6, 7, 8, 3, 4, 5, 0, 1, 2]);
  }

  #[test]
  fn test_flip_rows_degenerate() {
    let mut px: Vec<u8> = (0..4).collect();
    flip_rows(&mut px, 4, 1, 1);
    assert_eq!(px, [0, 1, 2, 3]);
    let mut empty: [u8; 0] = [];
    flip_rows(&mut empty, 0, 5, 4);
  }

  #[test]
  #[should_panic(expected = "raster is smaller than its dimensions")]
  fn test_flip_rows_short_buffer_panics() {
    let mut px = [0_u8; 5];
    flip_rows(&mut px, 2, 1, 3);
  }

  #[test]
  #[should_panic(expected = "raster is smaller than its dimensions")]
  fn test_flip_rows_overflowing_size_panics() {
    let mut px = [0_u8; 16];
    flip_rows(&mut px, u32::MAX, u32::MAX, usize::MAX / 2);
  }

  #[test]
  fn test_flip_rows_twice_is_identity() {
    let original: Vec<u8> = (0..(5 * 7 * 3)).map(|i| (i * 31 % 256) as u8).collect();
    let mut px = original.clone();
    flip_rows(&mut px, 5, 7, 3);
    assert_ne!(px, original);
    flip_rows(&mut px, 5, 7, 3);
    assert_eq!(px, original);
  }
}
