//! List / introspection — spec.md §4.7. Human-readable dump and a
//! machine-readable `{"Pictures": [...]}` JSON listing.

use std::fmt::Write as _;

use serde_json::json;

use crate::container::Container;

/// Renders the header and every valid slot, in the format the original
/// `print_header`/`print_metadata` pair produced.
pub fn format_stdout(container: &Container) -> String
{
    let mut out = String::new();
    let header = &container.header;

    let _ = writeln!(out, "*****************************************");
    let _ = writeln!(out, "**********DATABASE HEADER START**********");
    let _ = writeln!(out, "DB NAME: {}", header.db_name_str());
    let _ = writeln!(out, "VERSION: {}", header.db_version);
    let _ = writeln!(out, "IMAGE COUNT: {}\t\tMAX IMAGES: {}", header.num_files, header.max_files);
    let _ = writeln!(
        out,
        "THUMBNAIL: {} x {}\tSMALL: {} x {}",
        header.res_resized[0], header.res_resized[1], header.res_resized[2], header.res_resized[3]
    );
    let _ = writeln!(out, "***********DATABASE HEADER END***********");
    let _ = writeln!(out, "*****************************************");

    if header.num_files == 0 {
        let _ = writeln!(out, "<< empty database >>");
        return out;
    }

    for slot in container.table.iter().filter(|s| s.is_valid()) {
        let _ = writeln!(out, "PICTURE ID: {}", slot.pict_id_str());
        let _ = writeln!(out, "SHA: {}", hex(&slot.sha));
        let _ = writeln!(out, "VALID: {}", slot.is_valid);
        let _ = writeln!(
            out,
            "OFFSET ORIG. : {}\t\tSIZE ORIG. : {}",
            slot.offset[2], slot.size[2]
        );
        let _ = writeln!(
            out,
            "OFFSET THUMB.: {}\t\tSIZE THUMB.: {}",
            slot.offset[0], slot.size[0]
        );
        let _ = writeln!(
            out,
            "OFFSET SMALL : {}\t\tSIZE SMALL : {}",
            slot.offset[1], slot.size[1]
        );
        let _ = writeln!(out, "ORIGINAL: {} x {}", slot.res_orig[0], slot.res_orig[1]);
        let _ = writeln!(out, "*****************************************");
    }

    out
}

/// `{"Pictures": [id, id, ...]}`, in index order. An empty database
/// still yields `{"Pictures":[]}` (spec.md §9 Open Question 2).
pub fn format_json(container: &Container) -> String
{
    let ids: Vec<String> = container
        .table
        .iter()
        .filter(|s| s.is_valid())
        .map(|s| s.pict_id_str())
        .collect();

    json!({ "Pictures": ids }).to_string()
}

fn hex(bytes: &[u8]) -> String
{
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
        let _ = write!(acc, "{:02x}", b);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Sha256Engine;
    use crate::image_engine::JpegImageEngine;
    use crate::pipeline::insert;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_database_lists_as_empty_json_array()
    {
        let tmp = NamedTempFile::new().unwrap();
        let c = Container::create(tmp.path(), 2, [64, 64, 256, 256]).unwrap();

        assert_eq!(format_json(&c), r#"{"Pictures":[]}"#);
        assert!(format_stdout(&c).contains("empty database"));
    }

    #[test]
    fn lists_valid_ids_in_index_order()
    {
        use image::codecs::jpeg::JpegEncoder;

        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]));
        let mut jpeg = Vec::new();
        JpegEncoder::new(&mut jpeg).encode_image(&image::DynamicImage::ImageRgb8(img)).unwrap();

        let tmp = NamedTempFile::new().unwrap();
        let mut c = Container::create(tmp.path(), 2, [64, 64, 256, 256]).unwrap();
        insert(&mut c, &Sha256Engine, &JpegImageEngine, &jpeg, "cat").unwrap();

        assert_eq!(format_json(&c), r#"{"Pictures":["cat"]}"#);
        assert!(format_stdout(&c).contains("PICTURE ID: cat"));
    }
}
