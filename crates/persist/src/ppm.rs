use std::io::Write;
use std::path::Path;

use raymancer_common::PixelBuffer;

use crate::EncodeError;

/// File name of the overhead map image.
pub const OVERHEAD_MAP_FILE: &str = "out.ppm";

/// Zero-padded file name for frame `index`, e.g. `00042.ppm`.
pub fn frame_file_name(index: u32) -> String {
    format!("{index:05}.ppm")
}

/// Encode a buffer as binary PPM (`P6`), dropping the alpha channel.
pub fn encode_ppm(image: &PixelBuffer) -> Vec<u8> {
    let header = format!("P6\n{} {}\n255\n", image.width(), image.height());
    let mut bytes = Vec::with_capacity(header.len() + image.pixels().len() * 3);
    bytes.extend_from_slice(header.as_bytes());
    for rgb in image.rgb_triplets() {
        bytes.extend_from_slice(&rgb);
    }
    bytes
}

/// Encode and write a PPM file, returning the bytes written.
pub fn write_ppm(path: impl AsRef<Path>, image: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    let path = path.as_ref();
    let bytes = encode_ppm(image);
    let io_err = |source| EncodeError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut file = std::fs::File::create(path).map_err(io_err)?;
    file.write_all(&bytes).map_err(io_err)?;
    Ok(bytes)
}
