use rawpng::{decode_rgba, inspect, png::RawChunkIter};

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let args: Vec<String> = std::env::args().collect();
  for file_arg in args[1..].iter() {
    let path = std::path::Path::new(file_arg);
    print!("Reading `{}`... ", path.display());
    let bytes = match std::fs::read(path) {
      Ok(bytes) => {
        println!("got {} bytes.", bytes.len());
        bytes
      }
      Err(e) => {
        println!("{e:?}");
        continue;
      }
    };
    let info = match inspect(&bytes) {
      Ok(info) => info,
      Err(e) => {
        println!("not a PNG we can read: {e}");
        continue;
      }
    };
    println!("{info:?}");
    if let Ok(chunks) = RawChunkIter::from_png_bytes(&bytes) {
      for (n, raw_chunk) in chunks.enumerate() {
        let crc = if raw_chunk.crc_matches() { "ok" } else { "BAD" };
        println!("{n}: {:?} ({} bytes, crc {crc})", raw_chunk.chunk_ty, raw_chunk.data.len());
      }
    }
    match decode_rgba(&bytes) {
      Ok(image) => println!(
        "decoded {}x{} RGBA, {} bytes",
        image.width(),
        image.height(),
        image.as_bytes().len()
      ),
      Err(e) => println!("decode failed: {e}"),
    }
  }
}
