//! Variant engine — spec.md §4.4. Lazily materialises the thumbnail and
//! small resolutions of a picture on first read.

use log::debug;

use crate::container::Container;
use crate::error::{Error, Result};
use crate::image_engine::ImageEngine;
use crate::metadata::Resolution;

/// `lazily_resize` from spec.md §4.4. No-op if `r == Orig` or the slot
/// already has that resolution materialised.
pub fn lazily_resize(
    container: &mut Container,
    engine: &dyn ImageEngine,
    index: usize,
    r: Resolution,
) -> Result<()>
{
    if index >= container.table.len() {
        return Err(Error::InvalidArgument);
    }

    if !container.table[index].is_valid() {
        return Err(Error::FileNotFound);
    }

    if r == Resolution::Orig {
        return Ok(());
    }

    if container.table[index].offset_at(r) > 0 {
        return Ok(());
    }

    let orig_offset = container.table[index].offset_at(Resolution::Orig);
    let orig_size = container.table[index].size_at(Resolution::Orig);
    if orig_offset == 0 || orig_size == 0 {
        return Err(Error::FileNotFound);
    }

    let orig_bytes = container.read_blob(orig_offset, orig_size)?;

    let (max_w, max_h) = resized_bounds(container, r);
    let resized = engine.resize_jpeg(&orig_bytes, max_w, max_h)?;

    let offset = container.append_blob(&resized)?;
    container.table[index].set_blob(r, offset, resized.len() as u32);

    debug!("materialised {:?} for slot {} ({} bytes)", r, index, resized.len());

    container.write_header_and_table()
}

fn resized_bounds(container: &Container, r: Resolution) -> (u16, u16)
{
    let base = 2 * r.index();
    (container.header.res_resized[base], container.header.res_resized[base + 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_engine::JpegImageEngine;
    use crate::metadata::NON_EMPTY;
    use tempfile::NamedTempFile;

    fn make_test_jpeg(w: u32, h: u32) -> Vec<u8>
    {
        use image::codecs::jpeg::JpegEncoder;

        let img = image::RgbImage::from_pixel(w, h, image::Rgb([1, 2, 3]));
        let mut out = Vec::new();
        JpegEncoder::new(&mut out)
            .encode_image(&image::DynamicImage::ImageRgb8(img))
            .unwrap();
        out
    }

    fn container_with_one_original(jpeg: &[u8]) -> Container
    {
        let tmp = NamedTempFile::new().unwrap();
        let mut c = Container::create(tmp.path(), 1, [64, 64, 256, 256]).unwrap();

        let offset = c.append_blob(jpeg).unwrap();
        c.table[0].set_pict_id("cat");
        c.table[0].is_valid = NON_EMPTY;
        c.table[0].set_blob(Resolution::Orig, offset, jpeg.len() as u32);
        c.header.num_files = 1;
        c.write_header_and_table().unwrap();

        c
    }

    #[test]
    fn orig_is_a_noop()
    {
        let jpeg = make_test_jpeg(100, 100);
        let mut c = container_with_one_original(&jpeg);

        lazily_resize(&mut c, &JpegImageEngine, 0, Resolution::Orig).unwrap();

        assert_eq!(c.table[0].offset_at(Resolution::Orig), c.table[0].offset_at(Resolution::Orig));
    }

    #[test]
    fn materialises_small_once_and_is_idempotent()
    {
        let jpeg = make_test_jpeg(400, 200);
        let mut c = container_with_one_original(&jpeg);

        let len_before = c.file_len().unwrap();

        lazily_resize(&mut c, &JpegImageEngine, 0, Resolution::Small).unwrap();

        let offset = c.table[0].offset_at(Resolution::Small);
        let size = c.table[0].size_at(Resolution::Small);
        assert!(offset > 0 && size > 0);

        let len_after_first = c.file_len().unwrap();
        assert!(len_after_first > len_before);

        lazily_resize(&mut c, &JpegImageEngine, 0, Resolution::Small).unwrap();
        let len_after_second = c.file_len().unwrap();

        assert_eq!(len_after_first, len_after_second);
        assert_eq!(c.table[0].offset_at(Resolution::Small), offset);
    }

    #[test]
    fn missing_original_is_file_not_found()
    {
        let tmp = NamedTempFile::new().unwrap();
        let mut c = Container::create(tmp.path(), 1, [64, 64, 256, 256]).unwrap();
        c.table[0].set_pict_id("cat");
        c.table[0].is_valid = NON_EMPTY;

        assert!(matches!(
            lazily_resize(&mut c, &JpegImageEngine, 0, Resolution::Small),
            Err(Error::FileNotFound)
        ));
    }
}
