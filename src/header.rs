use serde::{Deserialize, Serialize};

use crate::array::Array;
use crate::error::{Error, Result};

/// Magic text written into every freshly created container's `db_name`.
pub const CAT_TXT: &str = "EPFL PictDB binary";

/// Max length (without NUL) of `db_name`.
pub const MAX_DB_NAME: usize = 31;
/// Max length (without NUL) of a picture id.
pub const MAX_PIC_ID: usize = 127;
/// Inclusive upper bound on `max_files`, both at `create` and at `open`.
pub const MAX_CAPACITY: u32 = 100_000;
pub const MAX_THUMB_RES: u16 = 128;
pub const MAX_SMALL_RES: u16 = 512;
/// `db_name` field width on disk, including the NUL terminator.
pub const DB_NAME_LEN: usize = MAX_DB_NAME + 1;

/// Fixed-width on-disk header. Little-endian, no implicit padding: read
/// and written through bincode's fixint encoding so the layout is the
/// compatibility contract, not an implementation detail.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub db_name: Array<u8, DB_NAME_LEN>,
    pub db_version: u32,
    pub num_files: u32,
    pub max_files: u32,
    /// `(thumb_w, thumb_h, small_w, small_h)`.
    pub res_resized: [u16; 4],
    pub unused_32: u32,
    pub unused_64: u64,
}

impl Header {
    pub fn new(max_files: u32, res_resized: [u16; 4]) -> Result<Self>
    {
        if max_files == 0 || max_files > MAX_CAPACITY {
            return Err(Error::MaxFiles);
        }

        let (thumb_w, thumb_h, small_w, small_h) =
            (res_resized[0], res_resized[1], res_resized[2], res_resized[3]);

        if thumb_w == 0 || thumb_h == 0 || small_w == 0 || small_h == 0 {
            return Err(Error::Resolutions);
        }
        if thumb_w > MAX_THUMB_RES || thumb_h > MAX_THUMB_RES {
            return Err(Error::Resolutions);
        }
        if small_w > MAX_SMALL_RES || small_h > MAX_SMALL_RES {
            return Err(Error::Resolutions);
        }

        let mut db_name = Array::default();
        for (slot, byte) in db_name.0.iter_mut().zip(CAT_TXT.as_bytes()) {
            *slot = *byte;
        }

        Ok(Self {
            db_name,
            db_version: 0,
            num_files: 0,
            max_files,
            res_resized,
            unused_32: 0,
            unused_64: 0,
        })
    }

    pub fn db_name_str(&self) -> String
    {
        let bytes = &self.db_name.0;
        let nul = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        String::from_utf8_lossy(&bytes[..nul]).into_owned()
    }
}

/// Creation parameters the CLI's `create` flags map onto 1:1, validated
/// against the same bounds `Header::new` enforces.
#[derive(Debug, Clone, Copy)]
pub struct CreateConfig {
    pub max_files: u32,
    pub thumb_res: (u16, u16),
    pub small_res: (u16, u16),
}

impl CreateConfig {
    pub fn res_resized(&self) -> [u16; 4]
    {
        [self.thumb_res.0, self.thumb_res.1, self.small_res.0, self.small_res.1]
    }

    /// Builds the on-disk `Header` this config describes, running the
    /// same bound checks `Header::new` always runs.
    pub fn to_header(&self) -> Result<Header>
    {
        Header::new(self.max_files, self.res_resized())
    }
}
