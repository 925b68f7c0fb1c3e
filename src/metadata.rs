use serde::{Deserialize, Serialize};

use crate::array::Array;
use crate::error::{Error, Result};
use crate::header::MAX_PIC_ID;

pub const EMPTY: u16 = 0;
pub const NON_EMPTY: u16 = 1;

/// `pict_id` field width on disk, including the NUL terminator.
pub const PIC_ID_LEN: usize = MAX_PIC_ID + 1;

/// A resolution at which a picture's blob may be materialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Thumb = 0,
    Small = 1,
    Orig = 2,
}

pub const NB_RES: usize = 3;

impl Resolution {
    pub const ALL: [Resolution; NB_RES] = [Resolution::Thumb, Resolution::Small, Resolution::Orig];

    pub fn index(self) -> usize
    {
        self as usize
    }

    pub fn from_index(idx: usize) -> Result<Self>
    {
        match idx {
            0 => Ok(Resolution::Thumb),
            1 => Ok(Resolution::Small),
            2 => Ok(Resolution::Orig),
            _ => Err(Error::InvalidArgument),
        }
    }

    /// Accepts the original tool's resolution-name synonyms.
    pub fn from_name(name: &str) -> Result<Self>
    {
        match name {
            "thumb" | "thumbnail" => Ok(Resolution::Thumb),
            "small" => Ok(Resolution::Small),
            "orig" | "original" => Ok(Resolution::Orig),
            _ => Err(Error::InvalidArgument),
        }
    }

    pub fn suffix(self) -> &'static str
    {
        match self {
            Resolution::Thumb => "thumb",
            Resolution::Small => "small",
            Resolution::Orig => "orig",
        }
    }
}

/// Fixed-width on-disk metadata slot, one per possible picture.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataSlot {
    pub pict_id: Array<u8, PIC_ID_LEN>,
    pub sha: [u8; 32],
    /// `(width, height)` of the original image.
    pub res_orig: [u32; 2],
    pub size: [u32; NB_RES],
    pub offset: [u64; NB_RES],
    pub is_valid: u16,
    pub unused_16: u16,
}

impl Default for MetadataSlot {
    fn default() -> Self
    {
        Self {
            pict_id: Array::default(),
            sha: [0u8; 32],
            res_orig: [0, 0],
            size: [0; NB_RES],
            offset: [0; NB_RES],
            is_valid: EMPTY,
            unused_16: 0,
        }
    }
}

impl MetadataSlot {
    pub fn is_valid(&self) -> bool
    {
        self.is_valid == NON_EMPTY
    }

    pub fn pict_id_str(&self) -> String
    {
        let bytes = &self.pict_id.0;
        let nul = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        String::from_utf8_lossy(&bytes[..nul]).into_owned()
    }

    /// `pict_id = id`, truncated to `MAX_PIC_ID` bytes and NUL-terminated.
    /// Unconditional, like the original's `strncpy` — no length or
    /// emptiness check here; a CLI layer that wants to reject those
    /// up front does so before calling into the core.
    pub fn set_pict_id(&mut self, id: &str)
    {
        let bytes = id.as_bytes();
        let copy_len = bytes.len().min(MAX_PIC_ID);

        self.pict_id = Array::default();
        self.pict_id.0[..copy_len].copy_from_slice(&bytes[..copy_len]);
    }

    pub fn size_at(&self, r: Resolution) -> u32
    {
        self.size[r.index()]
    }

    pub fn offset_at(&self, r: Resolution) -> u64
    {
        self.offset[r.index()]
    }

    pub fn set_blob(&mut self, r: Resolution, offset: u64, size: u32)
    {
        self.offset[r.index()] = offset;
        self.size[r.index()] = size;
    }

    /// Invariant 3 of the spec: `size == 0 <=> offset == 0`, per resolution.
    pub fn offsets_coherent(&self) -> bool
    {
        (0..NB_RES).all(|i| (self.size[i] == 0) == (self.offset[i] == 0))
    }
}
