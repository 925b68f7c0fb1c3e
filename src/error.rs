//! Stable, numeric error taxonomy shared by every layer of the crate.
//!
//! The ordinals mirror `original_source/error.h`'s `enum error_codes` so a
//! `pictdb` CLI exit code means the same thing a `pictDBM` exit code did.

use thiserror::Error;

/// A core or CLI-layer failure, convertible to a stable exit code via [`Error::as_code`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("allocation failed")]
    OutOfMemory,

    #[error("not enough arguments")]
    NotEnoughArguments,

    #[error("invalid filename")]
    InvalidFilename,

    #[error("invalid command")]
    InvalidCommand,

    #[error("invalid argument")]
    InvalidArgument,

    #[error("invalid max_files number")]
    MaxFiles,

    #[error("invalid resolution(s)")]
    Resolutions,

    #[error("invalid picture id")]
    InvalidPicId,

    #[error("full database")]
    FullDatabase,

    #[error("file not found")]
    FileNotFound,

    #[error("not implemented")]
    NotImplemented,

    #[error("existing picture id")]
    DuplicateId,

    #[error("image engine error: {0}")]
    Vips(String),

    #[error("unable to start listener")]
    Bind,

    #[error("internal error")]
    Internal,

    #[error("invalid or missing parameter")]
    InvalidParam,

    #[error("debug")]
    Debug,
}

impl Error {
    /// The stable numeric code, matching `original_source/error.h` ordinals.
    pub fn as_code(&self) -> i32
    {
        match self {
            Error::Io(_) => 1,
            Error::OutOfMemory => 2,
            Error::NotEnoughArguments => 3,
            Error::InvalidFilename => 4,
            Error::InvalidCommand => 5,
            Error::InvalidArgument => 6,
            Error::MaxFiles => 7,
            Error::Resolutions => 8,
            Error::InvalidPicId => 9,
            Error::FullDatabase => 10,
            Error::FileNotFound => 11,
            Error::NotImplemented => 12,
            Error::DuplicateId => 13,
            Error::Vips(_) => 14,
            Error::Bind => 15,
            Error::Internal => 16,
            Error::InvalidParam => 17,
            Error::Debug => 18,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn codes_match_original_ordinals()
    {
        assert_eq!(Error::FullDatabase.as_code(), 10);
        assert_eq!(Error::DuplicateId.as_code(), 13);
        assert_eq!(Error::Vips(String::new()).as_code(), 14);
    }
}
