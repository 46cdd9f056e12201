//! Filesystem error types.
//!
//! Every recoverable failure is an [`FsError`]: the operation that failed,
//! the display path of the node involved, and an [`ErrorKind`]. The shape
//! follows OS path errors so results can be compared against a real
//! filesystem.

use std::io;
use strum::Display;
use thiserror::Error;

/// Operation tag carried by every [`FsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Op {
    /// Node construction (name validation).
    New,
    /// Path resolution.
    Open,
    /// Path resolution through a [`DirView`](crate::DirView).
    #[strum(serialize = "openat")]
    OpenAt,
    /// Immediate child lookup through a [`DirView`](crate::DirView).
    #[strum(serialize = "statat")]
    StatAt,
    /// Directory listing on a node.
    #[strum(serialize = "readdir")]
    ReadDir,
    /// Directory listing through a [`DirView`](crate::DirView).
    #[strum(serialize = "readdirent")]
    ReadDirent,
    /// Whole-file read by name.
    ReadFile,
    /// Attaching a node to a directory.
    AddFile,
    Read,
    Write,
    Seek,
    Truncate,
    /// Recursive listing.
    List,
}

/// What went wrong.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed name or path, negative size or offset.
    #[error("invalid argument")]
    InvalidArgument,

    /// Path segment or child does not exist.
    #[error("file does not exist")]
    NotFound,

    /// A child with the same name is already attached.
    #[error("file already exists")]
    AlreadyExists,

    /// The node is already a child of some directory.
    #[error("entry already has a parent")]
    AlreadyAttached,

    /// Expected a directory.
    #[error("not a directory")]
    NotADirectory,

    /// Expected a file.
    #[error("is a directory")]
    IsADirectory,

    /// Operation not allowed in the node's current mode.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// No more bytes or entries. `read` is how many were produced before
    /// running out.
    #[error("end of data after {read}")]
    EndOfData { read: usize },

    /// Storage for the requested size could not be reserved.
    #[error("buffer too large: cannot allocate {requested} bytes")]
    TooLarge { requested: usize },

    /// Failure reported by an external reader or writer.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Filesystem error: operation, path and kind.
#[derive(Debug, Error)]
#[error("{op} {path}: {kind}")]
pub struct FsError {
    pub op: Op,
    pub path: String,
    pub kind: ErrorKind,
}

impl FsError {
    pub fn new(op: Op, path: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            op,
            path: path.into(),
            kind,
        }
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(op: Op, path: impl Into<String>) -> Self {
        Self::new(op, path, ErrorKind::InvalidArgument)
    }

    /// Create a NotFound error.
    pub fn not_found(op: Op, path: impl Into<String>) -> Self {
        Self::new(op, path, ErrorKind::NotFound)
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(op: Op, path: impl Into<String>) -> Self {
        Self::new(op, path, ErrorKind::AlreadyExists)
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(op: Op, path: impl Into<String>) -> Self {
        Self::new(op, path, ErrorKind::NotADirectory)
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(op: Op, path: impl Into<String>) -> Self {
        Self::new(op, path, ErrorKind::IsADirectory)
    }

    /// Returns true for the end-of-data signal, which is not a failure.
    pub fn is_end_of_data(&self) -> bool {
        matches!(self.kind, ErrorKind::EndOfData { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }
}

/// Convert FsError to std::io::Error for compatibility.
impl From<FsError> for io::Error {
    fn from(e: FsError) -> Self {
        let kind = match e.kind {
            ErrorKind::Io(inner) => return inner,
            ErrorKind::InvalidArgument => io::ErrorKind::InvalidInput,
            ErrorKind::NotFound => io::ErrorKind::NotFound,
            ErrorKind::AlreadyExists => io::ErrorKind::AlreadyExists,
            ErrorKind::AlreadyAttached => io::ErrorKind::InvalidInput,
            ErrorKind::NotADirectory => io::ErrorKind::NotADirectory,
            ErrorKind::IsADirectory => io::ErrorKind::IsADirectory,
            ErrorKind::InvalidOperation(_) => io::ErrorKind::InvalidInput,
            ErrorKind::EndOfData { .. } => io::ErrorKind::UnexpectedEof,
            ErrorKind::TooLarge { .. } => io::ErrorKind::OutOfMemory,
        };
        io::Error::new(kind, e)
    }
}

/// Filesystem result type.
pub type FsResult<T> = Result<T, FsError>;
