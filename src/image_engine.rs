//! The "image engine" named interface from spec.md §6: JPEG geometry
//! decoding and aspect-preserving resize. The original implementation
//! called out to libvips; this one calls out to the `image` crate, but
//! the trait and the error kind (`Error::Vips`) the rest of the system
//! matches on are unchanged, per SPEC_FULL.md §4.4.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::imageops::FilterType;
use image::GenericImageView;

use crate::error::{Error, Result};

pub trait ImageEngine {
    fn decode_geometry(&self, jpeg: &[u8]) -> Result<(u32, u32)>;
    fn resize_jpeg(&self, jpeg: &[u8], max_w: u16, max_h: u16) -> Result<Vec<u8>>;
}

/// Production image engine, backed by the `image` crate's JPEG codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegImageEngine;

impl ImageEngine for JpegImageEngine {
    fn decode_geometry(&self, jpeg: &[u8]) -> Result<(u32, u32)>
    {
        let img = ImageReader::with_format(Cursor::new(jpeg), image::ImageFormat::Jpeg)
            .decode()
            .map_err(|e| Error::Vips(e.to_string()))?;

        Ok(img.dimensions())
    }

    fn resize_jpeg(&self, jpeg: &[u8], max_w: u16, max_h: u16) -> Result<Vec<u8>>
    {
        let img = ImageReader::with_format(Cursor::new(jpeg), image::ImageFormat::Jpeg)
            .decode()
            .map_err(|e| Error::Vips(e.to_string()))?;

        let ratio = resize_ratio(img.width(), img.height(), max_w, max_h);
        let new_w = ((img.width() as f64) * ratio).round().max(1.0) as u32;
        let new_h = ((img.height() as f64) * ratio).round().max(1.0) as u32;

        let resized = img.resize_exact(new_w, new_h, FilterType::Lanczos3);

        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new(&mut out);
        encoder
            .encode_image(&resized)
            .map_err(|e| Error::Vips(e.to_string()))?;

        Ok(out)
    }
}

/// `min(max_w/orig_w, max_h/orig_h)`, preserving aspect ratio — the
/// ratio formula named in spec.md §4.4.
pub fn resize_ratio(orig_w: u32, orig_h: u32, max_w: u16, max_h: u16) -> f64
{
    let w_ratio = max_w as f64 / orig_w as f64;
    let h_ratio = max_h as f64 / orig_h as f64;

    w_ratio.min(h_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_jpeg(w: u32, h: u32) -> Vec<u8>
    {
        let img = image::RgbImage::from_pixel(w, h, image::Rgb([10, 20, 30]));
        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new(&mut out);
        encoder.encode_image(&image::DynamicImage::ImageRgb8(img)).unwrap();
        out
    }

    #[test]
    fn ratio_preserves_aspect_toward_the_tighter_bound()
    {
        assert_eq!(resize_ratio(1000, 500, 100, 100), 0.1);
        assert_eq!(resize_ratio(500, 1000, 100, 100), 0.1);
    }

    #[test]
    fn decode_geometry_reports_real_dimensions()
    {
        let jpeg = make_test_jpeg(40, 20);

        let (w, h) = JpegImageEngine.decode_geometry(&jpeg).unwrap();
        assert_eq!((w, h), (40, 20));
    }

    #[test]
    fn resize_jpeg_respects_bounding_box()
    {
        let jpeg = make_test_jpeg(400, 200);

        let resized = JpegImageEngine.resize_jpeg(&jpeg, 64, 64).unwrap();
        let (w, h) = JpegImageEngine.decode_geometry(&resized).unwrap();

        assert!(w <= 64 && h <= 64);
        assert_eq!(w, 64);
        assert_eq!(h, 32);
    }

    #[test]
    fn decode_geometry_rejects_garbage()
    {
        assert!(JpegImageEngine.decode_geometry(b"not a jpeg").is_err());
    }
}
