use thiserror::Error;

/// Errors produced by disk, partition and shell operations.
#[derive(Debug, Error)]
pub enum DiskError {
    /// Missing, malformed or out-of-range parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Underlying file open/create/read/write/resize failure.
    #[error("disk I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image is shorter than the MBR record or its bytes cannot be decoded.
    #[error("cannot decode MBR: {0}")]
    Decode(String),

    #[error("no free partition slot left")]
    NoFreeSlot,

    #[error("a partition named '{0}' already exists")]
    DuplicateName(String),

    #[error("not enough space: requested {requested} bytes, {used} of {total} bytes in use")]
    InsufficientSpace { requested: i64, used: i64, total: i64 },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("report failed: {0}")]
    Report(String),
}

pub type Result<T> = std::result::Result<T, DiskError>;
