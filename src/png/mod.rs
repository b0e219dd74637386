#![forbid(unsafe_code)]

//! Module for working with PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Encoding
//!
//! Call [`encode`] (or [`encode_rgb`] / [`encode_rgba`]) with a tightly packed
//! 8-bit pixel buffer and the image dimensions. You get back the complete PNG
//! datastream: signature, `IHDR`, one or more `IDAT`, and `IEND`. Rows are
//! written in the order given.
//!
//! ## Decoding
//!
//! Call [`decode`] (or [`decode_rgb`] / [`decode_rgba`]) with the PNG bytes
//! and the format you want out. All stored formats are converted: grayscale
//! becomes gray RGB, palette indexes are looked up, sub-byte samples are
//! scaled up, 16-bit samples keep their high byte, and `tRNS` transparency
//! becomes alpha.
//!
//! **Flipping:** PNG puts the top scanline first. The decoder's output puts
//! the *bottom* row first unless [`DecodeOptions::row_order`] says otherwise.
//! Encoding doesn't flip, so a buffer that went through [`encode`] and then
//! [`decode`] comes back upside down. Decode with [`RowOrder::TopDown`] to get
//! the exact bytes back.
//!
//! ## Inspecting
//!
//! [`inspect`] reads only the header. It's how you learn the dimensions and
//! the stored format without paying for decompression.
//!
//! ## Parsing Errors
//!
//! Compared to a lenient viewer, this decoder is strict about the things that
//! affect the pixels: the signature, the header, the chunk CRCs and the zlib
//! checksum (unless [`DecodeOptions::verify_checksums`] is off), the length of
//! the image data, and the filter types. It ignores chunk ordering rules and
//! ancillary chunks it doesn't use.
//!
//! [`RowOrder::TopDown`]: crate::RowOrder::TopDown

mod chunk;
pub use chunk::*;

mod crc32;

mod decode;
pub use decode::*;

mod encode;
pub use encode::*;

mod filtering;

mod ihdr;
pub use ihdr::*;
