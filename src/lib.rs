#![no_std]

//! A small PNG codec core.
//!
//! Raw 8-bit pixel buffers go in, PNG bytes come out, and back again:
//!
//! * [`encode`] turns RGB, RGBA, grayscale, or grayscale + alpha pixels into a
//!   PNG datastream.
//! * [`decode`] turns PNG bytes into RGB or RGBA pixels, whatever the PNG
//!   stored, and mirrors the rows so that the bottom row comes first.
//! * [`inspect`] reads just the header.
//!
//! Everything happens in memory, one call at a time. There's no global state,
//! so calls on different threads don't interact.
//!
//! ```
//! use rawpng::{decode_with, encode_rgb, inspect, DecodeOptions, PixelFormat, RowOrder};
//!
//! # fn main() -> rawpng::PngResult<()> {
//! // 2x1, red then green
//! let png = encode_rgb(&[255, 0, 0, 0, 255, 0], 2, 1)?;
//! let info = inspect(&png)?;
//! assert_eq!((info.width, info.height), (2, 1));
//!
//! let opts = DecodeOptions::new().row_order(RowOrder::TopDown);
//! let image = decode_with(&png, PixelFormat::Rgba, &opts)?;
//! assert_eq!(image.as_bytes(), &[255, 0, 0, 255, 0, 255, 0, 255]);
//! # Ok(())
//! # }
//! ```

extern crate alloc;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

pub mod pixel_formats;
pub use pixel_formats::*;

mod image;
pub use image::*;

mod row_order;
pub use row_order::*;

pub mod png;
pub use png::{
  decode, decode_rgb, decode_rgba, decode_with, encode, encode_image, encode_rgb, encode_rgba,
  inspect, DecodeOptions,
};
