use image::{DynamicImage, ImageError, ImageFormat};
use std::io::Cursor;

/// Decode raw object bytes into an image, sniffing the format from the
/// content rather than from the object key.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(bytes)
}

/// Encode an image into the requested output format.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format)?;
    Ok(buf.into_inner())
}

/// Resolve an extension-style format name ("png", "jpeg") to a codec format.
pub fn parse_format(name: &str) -> Option<ImageFormat> {
    ImageFormat::from_extension(name)
}
