use proptest::prelude::*;
use rawpng::{
  decode, decode_with, encode, flip_rows, inspect, DecodeOptions, PixelFormat, RowOrder,
};

fn image_strategy() -> impl Strategy<Value = (u32, u32, PixelFormat, Vec<u8>)> {
  (1_u32..16, 1_u32..16).prop_flat_map(|(w, h)| {
    prop_oneof![Just(PixelFormat::Rgb), Just(PixelFormat::Rgba)].prop_flat_map(move |format| {
      let len = (w * h) as usize * format.bytes_per_pixel();
      proptest::collection::vec(any::<u8>(), len).prop_map(move |data| (w, h, format, data))
    })
  })
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(32))]

  #[test]
  fn prop_top_down_round_trip_is_identity((w, h, format, data) in image_strategy()) {
    let png = encode(&data, w, h, format).unwrap();
    let opts = DecodeOptions::new().row_order(RowOrder::TopDown);
    let image = decode_with(&png, format, &opts).unwrap();
    prop_assert_eq!(image.dimensions(), (w, h));
    prop_assert_eq!(image.as_bytes(), &data[..]);
  }

  #[test]
  fn prop_default_round_trip_is_flipped((w, h, format, data) in image_strategy()) {
    let png = encode(&data, w, h, format).unwrap();
    let image = decode(&png, format).unwrap();
    let mut expected = data.clone();
    flip_rows(&mut expected, w, h, format.bytes_per_pixel());
    prop_assert_eq!(image.as_bytes(), &expected[..]);
  }

  #[test]
  fn prop_decoded_size_and_inspect_agree((w, h, format, data) in image_strategy()) {
    let png = encode(&data, w, h, format).unwrap();
    let info = inspect(&png).unwrap();
    prop_assert_eq!((info.width, info.height), (w, h));
    prop_assert_eq!(info.color_type, format);
    for out in [PixelFormat::Rgb, PixelFormat::Rgba] {
      let image = decode(&png, out).unwrap();
      prop_assert_eq!(image.as_bytes().len(), (w * h) as usize * out.bytes_per_pixel());
    }
  }

  #[test]
  fn prop_flip_twice_is_identity((w, h, format, data) in image_strategy()) {
    let mut twice = data.clone();
    flip_rows(&mut twice, w, h, format.bytes_per_pixel());
    flip_rows(&mut twice, w, h, format.bytes_per_pixel());
    prop_assert_eq!(twice, data);
  }
}
