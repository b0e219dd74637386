use core::fmt::{Debug, Write};

use alloc::vec::Vec;

use super::crc32::chunk_crc;
use crate::{DecodeFailure, PngResult};

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub const fn is_png_signature_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

/// The four byte tag naming a chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");

  /// Critical chunks have an uppercase first letter.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    self.0[0].is_ascii_uppercase()
  }
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for b in self.0 {
      f.write_char(if b.is_ascii_graphic() { b as char } else { '?' })?;
    }
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawChunk<'b> {
  pub chunk_ty: ChunkType,
  pub data: &'b [u8],
  pub declared_crc: u32,
}
impl RawChunk<'_> {
  /// The CRC computed from the chunk's type and data.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(self.chunk_ty.0, self.data)
  }

  #[inline]
  #[must_use]
  pub fn crc_matches(&self) -> bool {
    self.actual_crc() == self.declared_crc
  }
}
impl Debug for RawChunk<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("chunk_ty", &self.chunk_ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Iteration stops at the first chunk that doesn't fit in the remaining
/// bytes, so a truncated stream just looks like it ended early.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RawChunkIter<'b>(&'b [u8]);
impl<'b> RawChunkIter<'b> {
  /// Pass the full PNG bytes, the signature is checked and then skipped.
  #[inline]
  pub fn from_png_bytes(bytes: &'b [u8]) -> Result<Self, DecodeFailure> {
    match bytes.strip_prefix(&PNG_SIGNATURE[..]) {
      Some(rest) => Ok(Self(rest)),
      None => Err(DecodeFailure::BadSignature),
    }
  }

  /// Bytes not yet consumed by the iterator.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> &'b [u8] {
    self.0
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = RawChunk<'b>;
  fn next(&mut self) -> Option<Self::Item> {
    let (len_bytes, rest) = self.0.split_first_chunk::<4>()?;
    let chunk_len = u32::from_be_bytes(*len_bytes) as usize;
    let (ty_bytes, rest) = rest.split_first_chunk::<4>()?;
    if rest.len() < chunk_len {
      return None;
    }
    let (data, rest) = rest.split_at(chunk_len);
    let (crc_bytes, rest) = rest.split_first_chunk::<4>()?;
    self.0 = rest;
    Some(RawChunk {
      chunk_ty: ChunkType(*ty_bytes),
      data,
      declared_crc: u32::from_be_bytes(*crc_bytes),
    })
  }
}

/// Appends one complete chunk (length, type, data, CRC) to `out`.
pub(crate) fn write_chunk(out: &mut Vec<u8>, chunk_ty: ChunkType, data: &[u8]) -> PngResult<()> {
  debug_assert!(data.len() <= i32::MAX as usize);
  out.try_reserve(12 + data.len())?;
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(&chunk_ty.0);
  out.extend_from_slice(data);
  out.extend_from_slice(&chunk_crc(chunk_ty.0, data).to_be_bytes());
  Ok(())
}
