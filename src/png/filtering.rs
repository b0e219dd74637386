//! From the PNG spec:
//!
//! > Filters are applied to **bytes**, not to pixels, regardless of the bit
//! > depth or color type of the image.
//!
//! Every scanline in the zlib stream is one filter type byte followed by the
//! filtered bytes of that line. "Left" means one whole pixel back (or one byte
//! back for sub-byte pixels), "up" means the same byte in the previous line,
//! and anything off the edge of the image counts as 0.

use alloc::vec::Vec;

use crate::{DecodeFailure, PngResult};

/// The five adaptive filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub(crate) enum FilterType {
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl FilterType {
  pub(crate) const ALL: [Self; 5] = [Self::None, Self::Sub, Self::Up, Self::Average, Self::Paeth];
}
impl TryFrom<u8> for FilterType {
  type Error = DecodeFailure;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(DecodeFailure::UnknownFilter(other)),
    })
  }
}

/// Undoes the filtering of every line, in place.
///
/// * `data` is the whole inflated stream: `(1 + line_len) * height` bytes.
/// * `chunk` is the distance in bytes to the "left" byte.
///
/// The filter bytes are left as they were, only the line bytes change.
pub(crate) fn reconstruct_in_place(
  data: &mut [u8], line_len: usize, chunk: usize,
) -> Result<(), DecodeFailure> {
  debug_assert!(chunk > 0);
  let stride = line_len + 1;
  debug_assert_eq!(data.len() % stride, 0);
  for start in (0..data.len()).step_by(stride) {
    let (before, rest) = data.split_at_mut(start);
    let (filter_byte, line) = match rest[..stride].split_first_mut() {
      Some(split) => split,
      None => unreachable!("stride is at least 1"),
    };
    // the line above, or nothing at all on the first line
    let prev: &[u8] = if start == 0 { &[] } else { &before[start - line_len..] };
    match FilterType::try_from(*filter_byte)? {
      FilterType::None => (),
      FilterType::Sub => {
        for i in chunk..line.len() {
          line[i] = reconstruct_sub(line[i], line[i - chunk]);
        }
      }
      FilterType::Up => {
        if !prev.is_empty() {
          line.iter_mut().zip(prev.iter()).for_each(|(x, b)| *x = reconstruct_up(*x, *b));
        }
      }
      FilterType::Average => {
        for i in 0..line.len() {
          let a = if i >= chunk { line[i - chunk] } else { 0 };
          let b = prev.get(i).copied().unwrap_or(0);
          line[i] = reconstruct_average(line[i], a, b);
        }
      }
      FilterType::Paeth => {
        for i in 0..line.len() {
          let a = if i >= chunk { line[i - chunk] } else { 0 };
          let b = prev.get(i).copied().unwrap_or(0);
          let c = if i >= chunk { prev.get(i - chunk).copied().unwrap_or(0) } else { 0 };
          line[i] = reconstruct_paeth(line[i], a, b, c);
        }
      }
    }
  }
  Ok(())
}

/// Filters each line of `pixels` into `out`, picking a filter per line.
///
/// The heuristic is the usual one: for each line try all five filters and keep
/// the one whose output bytes, read as signed, have the smallest absolute sum.
pub(crate) fn filter_scanlines(
  pixels: &[u8], line_len: usize, chunk: usize, out: &mut Vec<u8>,
) -> PngResult<()> {
  debug_assert!(line_len > 0 && pixels.len() % line_len == 0);
  let line_count = pixels.len() / line_len;
  out.try_reserve(line_count * (line_len + 1))?;
  let mut candidate: Vec<u8> = Vec::new();
  candidate.try_reserve_exact(line_len)?;
  candidate.resize(line_len, 0);
  let mut best: Vec<u8> = Vec::new();
  best.try_reserve_exact(line_len)?;
  best.resize(line_len, 0);

  let mut prev: &[u8] = &[];
  for line in pixels.chunks_exact(line_len) {
    let mut best_filter = FilterType::None;
    let mut best_score = u64::MAX;
    for filter in FilterType::ALL {
      apply_filter(filter, line, prev, chunk, &mut candidate);
      let score: u64 = candidate.iter().map(|&x| u64::from((x as i8).unsigned_abs())).sum();
      if score < best_score {
        best_score = score;
        best_filter = filter;
        core::mem::swap(&mut best, &mut candidate);
      }
    }
    out.push(best_filter as u8);
    out.extend_from_slice(&best);
    prev = line;
  }
  Ok(())
}

fn apply_filter(filter: FilterType, line: &[u8], prev: &[u8], chunk: usize, out: &mut [u8]) {
  for i in 0..line.len() {
    let x = line[i];
    let a = if i >= chunk { line[i - chunk] } else { 0 };
    let b = prev.get(i).copied().unwrap_or(0);
    let c = if i >= chunk { prev.get(i - chunk).copied().unwrap_or(0) } else { 0 };
    out[i] = match filter {
      FilterType::None => x,
      FilterType::Sub => x.wrapping_sub(a),
      FilterType::Up => x.wrapping_sub(b),
      FilterType::Average => x.wrapping_sub(average(a, b)),
      FilterType::Paeth => x.wrapping_sub(paeth_predictor(a, b, c)),
    };
  }
}

/// Reconstruct Filter Type 1
///
/// * `fx` filtered X
/// * `ra` reconstructed `a`: the corresponding byte one pixel to the left.
const fn reconstruct_sub(fx: u8, ra: u8) -> u8 {
  fx.wrapping_add(ra)
}

/// Reconstruct Filter Type 2
///
/// * `fx` filtered X
/// * `rb` reconstructed `b`: The byte corresponding to this byte within the
///   previous scanline.
const fn reconstruct_up(fx: u8, rb: u8) -> u8 {
  fx.wrapping_add(rb)
}

/// Reconstruct Filter Type 3
const fn reconstruct_average(fx: u8, ra: u8, rb: u8) -> u8 {
  fx.wrapping_add(average(ra, rb))
}

/// Reconstruct Filter Type 4
///
/// * `rc` reconstructed `c`: the byte to the left of `b`.
const fn reconstruct_paeth(fx: u8, ra: u8, rb: u8, rc: u8) -> u8 {
  fx.wrapping_add(paeth_predictor(ra, rb, rc))
}

/// Floor of the mean, computed without overflow.
const fn average(a: u8, b: u8) -> u8 {
  ((a as u16 + b as u16) / 2) as u8
}

/// The Paeth filter function computes a simple linear function of the three
/// neighboring pixels (left `a`, above `b`, upper left `c`).
///
/// The output is the "predictor" of the neighboring pixel closest to the
/// computed value.
const fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
  // Note: "The calculations within the PaethPredictor function shall be
  // performed exactly, without overflow.", so this is i32 math.
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The order of these tests must not change.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec;

  #[test]
  fn test_paeth_predictor() {
    assert_eq!(paeth_predictor(0, 0, 0), 0);
    assert_eq!(paeth_predictor(10, 20, 10), 20);
    assert_eq!(paeth_predictor(20, 10, 10), 20);
    assert_eq!(paeth_predictor(255, 255, 0), 255);
    assert_eq!(paeth_predictor(3, 9, 7), 3);
  }

  #[test]
  fn test_average_does_not_overflow() {
    assert_eq!(average(255, 255), 255);
    assert_eq!(average(255, 1), 128);
  }

  #[test]
  fn test_every_filter_reconstructs() {
    // 3 lines of 2 RGB pixels
    let pixels: Vec<u8> = (0..18).map(|i: u32| (i * 47 + 13) as u8).collect();
    for filter in FilterType::ALL {
      let mut stream = Vec::new();
      let mut prev: &[u8] = &[];
      for line in pixels.chunks_exact(6) {
        let mut filtered = vec![0; 6];
        apply_filter(filter, line, prev, 3, &mut filtered);
        stream.push(filter as u8);
        stream.extend_from_slice(&filtered);
        prev = line;
      }
      reconstruct_in_place(&mut stream, 6, 3).unwrap();
      let unfiltered: Vec<u8> = stream.chunks_exact(7).flat_map(|l| l[1..].iter().copied()).collect();
      assert_eq!(unfiltered, pixels, "filter {filter:?}");
    }
  }

  #[test]
  fn test_filter_scanlines_picks_and_reconstructs() {
    // a smooth gradient, where Sub or Up beats None
    let pixels: Vec<u8> = (0..64).map(|i: u32| (i * 2) as u8).collect();
    let mut stream = Vec::new();
    filter_scanlines(&pixels, 16, 1, &mut stream).unwrap();
    assert_eq!(stream.len(), 4 * 17);
    assert!(stream.chunks_exact(17).skip(1).all(|l| l[0] != FilterType::None as u8));
    reconstruct_in_place(&mut stream, 16, 1).unwrap();
    let unfiltered: Vec<u8> = stream.chunks_exact(17).flat_map(|l| l[1..].iter().copied()).collect();
    assert_eq!(unfiltered, pixels);
  }

  #[test]
  fn test_unknown_filter_is_an_error() {
    let mut stream = vec![5, 1, 2, 3];
    assert_eq!(reconstruct_in_place(&mut stream, 3, 1), Err(DecodeFailure::UnknownFilter(5)));
  }
}
