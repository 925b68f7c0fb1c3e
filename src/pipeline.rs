//! Insert/Delete/Read pipeline — spec.md §4.5. Orchestrates slot
//! reservation, digest computation, deduplication, variant fetch/
//! creation and tombstoning on top of the lower-level modules.

use log::info;

use crate::container::Container;
use crate::dedup::{dedup_new_slot, DedupOutcome};
use crate::digest::DigestEngine;
use crate::error::{Error, Result};
use crate::image_engine::ImageEngine;
use crate::metadata::{MetadataSlot, Resolution, NON_EMPTY};
use crate::variant::lazily_resize;

/// Inserts `bytes` under logical id `id`.
///
/// Per SPEC_FULL.md §4.5 (resolving spec.md §9 Open Question 3):
/// `num_files` is only incremented once every fallible step — digest,
/// dedup, geometry decode — has already succeeded, so a failed insert
/// never leaves an inflated count behind.
pub fn insert(
    container: &mut Container,
    digest: &dyn DigestEngine,
    image: &dyn ImageEngine,
    bytes: &[u8],
    id: &str,
) -> Result<()>
{
    if container.header.num_files >= container.header.max_files {
        return Err(Error::FullDatabase);
    }

    let index = container
        .table
        .iter()
        .position(|slot| !slot.is_valid())
        .ok_or(Error::FullDatabase)?;

    let mut slot = MetadataSlot::default();
    slot.set_pict_id(id);
    slot.sha = digest.sha256(bytes);
    slot.size[Resolution::Orig.index()] = bytes.len() as u32;
    slot.is_valid = NON_EMPTY;
    container.table[index] = slot;

    let outcome = match dedup_new_slot(container, index) {
        Ok(o) => o,
        Err(e) => {
            container.table[index] = MetadataSlot::default();
            return Err(e);
        }
    };

    let (width, height) = match image.decode_geometry(bytes) {
        Ok(wh) => wh,
        Err(e) => {
            container.table[index] = MetadataSlot::default();
            return Err(e);
        }
    };
    container.table[index].res_orig = [width, height];

    container.header.num_files += 1;

    let persisted = match outcome {
        DedupOutcome::Unique => {
            let append = container.append_blob(bytes).and_then(|offset| {
                container.table[index].set_blob(Resolution::Orig, offset, bytes.len() as u32);
                container.write_header_and_table()
            });
            append
        }
        DedupOutcome::Aliased => container.write_header_and_table(),
    };

    if let Err(e) = persisted {
        container.header.num_files -= 1;
        container.table[index] = MetadataSlot::default();
        return Err(e);
    }

    info!("inserted '{}' ({} bytes, {:?})", id, bytes.len(), outcome);

    Ok(())
}

/// Deletes the valid slot with matching `pict_id`. Does not consult
/// dedup — aliased slots are independent and unaffected.
pub fn delete(container: &mut Container, id: &str) -> Result<()>
{
    let index = container
        .table
        .iter()
        .position(|slot| slot.is_valid() && slot.pict_id_str() == id)
        .ok_or(Error::FileNotFound)?;

    container.table[index] = MetadataSlot::default();
    container.header.num_files -= 1;
    container.header.db_version += 1;

    container.write_header_and_table()?;

    info!("deleted '{}'", id);

    Ok(())
}

/// Reads a picture's bytes at resolution `r`, creating the variant on
/// demand if it is not yet materialised.
pub fn read(container: &mut Container, image: &dyn ImageEngine, id: &str, r: Resolution) -> Result<Vec<u8>>
{
    let index = container
        .table
        .iter()
        .position(|slot| slot.is_valid() && slot.pict_id_str() == id)
        .ok_or(Error::FileNotFound)?;

    if r == Resolution::Orig && container.table[index].offset_at(Resolution::Orig) == 0 {
        return Err(Error::FileNotFound);
    }

    if container.table[index].offset_at(r) == 0 {
        lazily_resize(container, image, index, r)?;
    }

    let offset = container.table[index].offset_at(r);
    let size = container.table[index].size_at(r);

    container.read_blob(offset, size)
}
