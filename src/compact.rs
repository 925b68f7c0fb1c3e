//! Compactor — spec.md §4.6. Rebuilds a container into a fresh file
//! containing only live content, reclaiming space orphaned by deletes
//! and by compaction interruption.

use std::fs;
use std::path::Path;

use log::info;

use crate::container::Container;
use crate::digest::DigestEngine;
use crate::error::Result;
use crate::image_engine::ImageEngine;
use crate::metadata::Resolution;
use crate::pipeline::insert;

/// Rebuilds `src_path` into `tmp_path`, then renames `tmp_path` onto
/// `src_path`. A `rename`-over strategy is used instead of the
/// original's `remove`-then-`rename`: cheaper, and still leaves a valid
/// container on disk no matter where a crash interrupts it, per
/// SPEC_FULL.md §4.6.
pub fn compact<P: AsRef<Path>>(
    src_path: P,
    tmp_path: P,
    digest: &dyn DigestEngine,
    image: &dyn ImageEngine,
) -> Result<()>
{
    let mut src = Container::open(src_path.as_ref())?;

    let mut dst = Container::create(tmp_path.as_ref(), src.header.max_files, src.header.res_resized)?;

    let mut dst_index = 0usize;
    let mut seen = 0u32;
    let mut src_index = 0usize;

    while src_index < src.table.len() && seen < src.header.num_files {
        let slot = src.table[src_index];

        if slot.is_valid() {
            let orig = src.read_blob(slot.offset_at(Resolution::Orig), slot.size_at(Resolution::Orig))?;
            insert(&mut dst, digest, image, &orig, &slot.pict_id_str())?;

            for r in [Resolution::Thumb, Resolution::Small] {
                let has_src = slot.size_at(r) > 0 && slot.offset_at(r) > 0;
                let has_dst = dst.table[dst_index].size_at(r) > 0 && dst.table[dst_index].offset_at(r) > 0;

                if has_src && !has_dst {
                    let bytes = src.read_blob(slot.offset_at(r), slot.size_at(r))?;
                    let offset = dst.append_blob(&bytes)?;
                    dst.table[dst_index].set_blob(r, offset, bytes.len() as u32);
                }
            }

            dst.write_header_and_table()?;

            seen += 1;
            dst_index += 1;
        }

        src_index += 1;
    }

    dst.header.db_version = src.header.db_version + 1;
    dst.write_header_and_table()?;

    fs::rename(tmp_path.as_ref(), src_path.as_ref())?;

    info!(
        "compacted {} -> {} ({} live slots)",
        src_path.as_ref().display(),
        src_path.as_ref().display(),
        dst_index
    );

    Ok(())
}
