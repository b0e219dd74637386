use alloc::collections::TryReserveError;

use thiserror::Error;

/// Shorthand for results with a [`PngError`].
pub type PngResult<T> = Result<T, PngError>;

/// An error from the `rawpng` crate.
///
/// Every error is terminal for the call that produced it. Nothing is retried
/// internally and no partial output is ever handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PngError {
  /// The pixel buffer length doesn't match the declared width, height, and
  /// format.
  #[error("pixel buffer holds {actual} bytes but the image needs {expected}")]
  SizeMismatch { expected: usize, actual: usize },

  /// The encoder couldn't produce a PNG from the input.
  #[error("encode failure: {0}")]
  Encode(#[from] EncodeFailure),

  /// The bytes given aren't a PNG this crate can decode.
  #[error("decode failure: {0}")]
  Decode(#[from] DecodeFailure),

  /// The allocator couldn't give us enough space, or the size couldn't even
  /// be computed.
  #[error("could not allocate the output buffer")]
  Alloc,
}
impl From<TryReserveError> for PngError {
  #[inline]
  fn from(_: TryReserveError) -> Self {
    Self::Alloc
  }
}

/// Why an encode was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum EncodeFailure {
  /// Indexed color can't be encoded without a palette.
  #[error("pixel format can't be encoded")]
  UnsupportedFormat,
  /// PNG requires `1 <= width, height <= 2^31 - 1`.
  #[error("image dimensions {width}x{height} are outside what PNG allows")]
  InvalidDimensions { width: u32, height: u32 },
}

/// Why a decode (or an inspection) was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DecodeFailure {
  /// The first 8 bytes aren't the PNG signature.
  #[error("missing PNG signature")]
  BadSignature,
  /// The first chunk isn't a complete `IHDR`.
  #[error("missing IHDR chunk")]
  MissingHeader,
  /// The `IHDR` holds values that PNG doesn't allow.
  #[error("malformed IHDR chunk")]
  BadHeader,
  /// A chunk CRC or the zlib Adler-32 didn't match.
  #[error("checksum mismatch")]
  ChecksumMismatch,
  /// The data stream ended before `IEND`, or inflated to less than the image
  /// needs.
  #[error("data stream is truncated")]
  Truncated,
  /// There's no `IDAT` chunk at all.
  #[error("no image data")]
  MissingImageData,
  /// The zlib stream is corrupt.
  #[error("corrupt zlib stream")]
  Zlib,
  /// A scanline used a filter type other than 0 through 4.
  #[error("unknown scanline filter type {0}")]
  UnknownFilter(u8),
  /// Interlaced pixel data isn't supported.
  #[error("interlaced images are not supported")]
  Interlaced,
  /// An indexed color image has no `PLTE` chunk, or a malformed one.
  #[error("indexed image without a usable palette")]
  MissingPalette,
  /// A pixel referred past the end of the palette.
  #[error("palette index {0} is out of range")]
  PaletteIndexOutOfRange(u8),
  /// The image is larger than [`DecodeOptions::max_dimension`](crate::DecodeOptions::max_dimension).
  #[error("image dimensions {width}x{height} exceed the configured limit")]
  DimensionsTooLarge { width: u32, height: u32 },
  /// Decoding only produces RGB or RGBA.
  #[error("output pixel format must be RGB or RGBA")]
  UnsupportedOutputFormat,
}
