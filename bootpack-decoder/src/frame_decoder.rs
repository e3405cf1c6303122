//! Still frame decoding

use crate::Result;
use bootpack_core::frame::flatten_rgba;
use image::RgbImage;

/// Decodes an encoded still image into RGB, compositing alpha over black
pub fn decode_frame(data: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(data)?;
    Ok(flatten_rgba(&img.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_decode_png_with_alpha() {
        let mut src = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        src.put_pixel(1, 0, Rgba([10, 20, 30, 0]));
        let mut png = Vec::new();
        src.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();

        let frame = decode_frame(&png).unwrap();
        assert_eq!(frame.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(frame.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_frame(b"\x89PNG broken").unwrap_err();
        assert_eq!(err.kind(), bootpack_core::ErrorKind::Decode);
    }
}
