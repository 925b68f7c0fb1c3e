//! Deduplicator — spec.md §4.3. Enforces `pict_id` uniqueness among
//! valid slots and aliases an inserted slot's blob offsets from the
//! first content-identical valid slot found in index order.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::metadata::Resolution;

/// Outcome of a dedup pass over a freshly reserved slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// No content match: the slot's `offset[ORIG]` was reset to 0 so the
    /// caller knows to append the original bytes itself.
    Unique,
    /// A content match was found and all three resolutions' offsets/
    /// sizes were copied from the matching slot into this one.
    Aliased,
}

/// `dedup_new_slot` from spec.md §4.3. `index` must be a currently valid
/// slot (the caller has already populated `pict_id` and `sha`).
pub fn dedup_new_slot(container: &mut Container, index: usize) -> Result<DedupOutcome>
{
    if index >= container.table.len() {
        return Err(Error::InvalidArgument);
    }

    let to_check = container.table[index];

    for j in 0..container.table.len() {
        if j == index {
            continue;
        }

        let other = &container.table[j];
        if !other.is_valid() {
            continue;
        }

        if other.pict_id_str() == to_check.pict_id_str() {
            return Err(Error::DuplicateId);
        }

        if other.sha == to_check.sha {
            let offsets = other.offset;
            let sizes = other.size;

            let slot = &mut container.table[index];
            for r in Resolution::ALL {
                slot.set_blob(r, offsets[r.index()], sizes[r.index()]);
            }

            return Ok(DedupOutcome::Aliased);
        }
    }

    container.table[index].set_blob(Resolution::Orig, 0, container.table[index].size_at(Resolution::Orig));

    Ok(DedupOutcome::Unique)
}
