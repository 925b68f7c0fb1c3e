//! Container I/O — spec.md §4.1. The fixed-layout binary file: header,
//! metadata slot array, then appended blobs. Bincode's fixint encoding
//! gives the on-disk little-endian, fixed-width layout the file format
//! contract (spec.md §6) requires, the same encoding the teacher crate
//! uses for its own on-disk structures (`filesys/e2fs/mod.rs`).

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use bincode::Options;
use log::{debug, info};

use crate::error::{Error, Result};
use crate::header::{CreateConfig, Header, MAX_CAPACITY};
use crate::metadata::MetadataSlot;

fn bincode_opts() -> impl bincode::Options
{
    bincode::DefaultOptions::new().with_fixint_encoding().allow_trailing_bytes()
}

/// An open container: one file handle plus the in-memory header and
/// metadata table it was read from (or just created with).
#[derive(Debug)]
pub struct Container {
    file: File,
    pub header: Header,
    pub table: Vec<MetadataSlot>,
}

impl Container {
    /// Creates a new container with `max_files` empty slots and the two
    /// resized geometries, and persists the initial header + table.
    pub fn create<P: AsRef<Path>>(path: P, max_files: u32, res_resized: [u16; 4]) -> Result<Self>
    {
        let header = Header::new(max_files, res_resized)?;
        let table = vec![MetadataSlot::default(); max_files as usize];

        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(path.as_ref())
            .map_err(Error::Io)?;

        info!(
            "creating container {} (max_files={}, thumb={}x{}, small={}x{})",
            path.as_ref().display(),
            max_files,
            res_resized[0],
            res_resized[1],
            res_resized[2],
            res_resized[3]
        );

        let mut container = Self { file, header, table };
        container.write_header_and_table()?;

        Ok(container)
    }

    /// Creates a new container from a [`CreateConfig`] — the entry point
    /// the CLI's `create` flags map onto 1:1.
    pub fn create_from_config<P: AsRef<Path>>(path: P, config: &CreateConfig) -> Result<Self>
    {
        Self::create(path, config.max_files, config.res_resized())
    }

    /// Opens an existing container, reading the header then the full
    /// metadata table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self>
    {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path.as_ref())
            .map_err(Error::Io)?;

        let opts = bincode_opts();

        let header: Header = opts
            .deserialize_from(&mut file)
            .map_err(|_| Error::Io(std::io::Error::from(std::io::ErrorKind::UnexpectedEof)))?;

        if header.max_files > MAX_CAPACITY {
            return Err(Error::MaxFiles);
        }

        let mut table = Vec::with_capacity(header.max_files as usize);
        for _ in 0..header.max_files {
            let slot: MetadataSlot = opts
                .deserialize_from(&mut file)
                .map_err(|_| Error::Io(std::io::Error::from(std::io::ErrorKind::UnexpectedEof)))?;
            table.push(slot);
        }

        info!("opened container {} (num_files={})", path.as_ref().display(), header.num_files);

        Ok(Self { file, header, table })
    }

    /// Repositions to offset 0 and writes the header followed by the
    /// full metadata table. The sole on-disk durability primitive — the
    /// caller must invoke this after every state-changing operation.
    pub fn write_header_and_table(&mut self) -> Result<()>
    {
        self.file.seek(SeekFrom::Start(0)).map_err(Error::Io)?;

        let opts = bincode_opts();

        let header_bytes = opts.serialize(&self.header).map_err(|_| Error::Internal)?;
        self.file.write_all(&header_bytes).map_err(Error::Io)?;

        for slot in &self.table {
            let slot_bytes = opts.serialize(slot).map_err(|_| Error::Internal)?;
            self.file.write_all(&slot_bytes).map_err(Error::Io)?;
        }

        self.file.flush().map_err(Error::Io)?;

        Ok(())
    }

    /// Appends `bytes` at the end of the file, returning the offset at
    /// which writing began.
    pub fn append_blob(&mut self, bytes: &[u8]) -> Result<u64>
    {
        let offset = self.file.seek(SeekFrom::End(0)).map_err(Error::Io)?;
        self.file.write_all(bytes).map_err(Error::Io)?;

        debug!("appended {} bytes at offset {}", bytes.len(), offset);

        Ok(offset)
    }

    /// Reads exactly `len` bytes starting at `offset`.
    pub fn read_blob(&mut self, offset: u64, len: u32) -> Result<Vec<u8>>
    {
        if offset == 0 || len == 0 {
            return Err(Error::FileNotFound);
        }

        self.file.seek(SeekFrom::Start(offset)).map_err(Error::Io)?;

        let mut buf = vec![0u8; len as usize];
        self.file.read_exact(&mut buf).map_err(Error::Io)?;

        Ok(buf)
    }

    /// Current total file length, used by the compactor and by tests
    /// asserting no-growth on dedup/re-read.
    pub fn file_len(&self) -> Result<u64>
    {
        self.file.metadata().map(|m| m.len()).map_err(Error::Io)
    }

    /// Idempotent: safe to call more than once, and safe on a
    /// partially-initialised container.
    pub fn close(self)
    {
        drop(self);
    }
}
