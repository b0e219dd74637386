use rawpng::{
  decode_rgba, encode_rgb, inspect,
  png::{RawChunkIter, PNG_SIGNATURE},
  PngError,
};

mod properties;

#[test]
fn test_RawChunkIter_no_panics() {
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = [&PNG_SIGNATURE[..], &super::rand_bytes(1024)].concat();
    for _ in RawChunkIter::from_png_bytes(&v).unwrap() {
      //
    }
  }
}

#[test]
fn test_decode_random_bytes_no_panics() {
  for _ in 0..20 {
    let v = super::rand_bytes(512);
    assert!(decode_rgba(&v).is_err());
    assert!(inspect(&v).is_err());
    // random bytes after a good signature are still rejected
    let v = [&PNG_SIGNATURE[..], &v].concat();
    let _ = inspect(&v);
    assert!(matches!(decode_rgba(&v), Err(PngError::Decode(_) | PngError::Alloc)));
  }
}

#[test]
fn test_decode_damaged_png_no_panics() {
  let pixels: Vec<u8> = (0..(8 * 8 * 3)).map(|i| (i * 7) as u8).collect();
  let png = encode_rgb(&pixels, 8, 8).unwrap();
  let header_end = PNG_SIGNATURE.len() + 12 + 13;
  for _ in 0..50 {
    let mut v = png.to_vec();
    let noise = super::rand_bytes(3);
    let at = header_end + (usize::from(noise[0]) * 256 + usize::from(noise[1])) % (v.len() - header_end);
    v[at] ^= noise[2] | 1;
    // either the damage is caught or the output is still a full image
    if let Ok(image) = decode_rgba(&v) {
      assert_eq!(image.as_bytes().len(), 8 * 8 * 4);
    }
  }
}
