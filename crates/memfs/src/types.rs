//! Core filesystem types.
//!
//! Metadata snapshots, directory entries and the construction options for
//! file nodes. All of them serialize, so callers can embed them in their own
//! config files.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Logical size every directory reports.
pub const DIR_SIZE: u64 = 4096;

/// Default permissions of a new file.
pub const DEFAULT_FILE_PERM: u32 = 0o600;

/// Default permissions of a new directory.
pub const DEFAULT_DIR_PERM: u32 = 0o700;

/// Append flag accepted by [`FileOptions::with_flag`]. Same value as
/// `O_APPEND` on Linux.
pub const O_APPEND: i32 = 0o2000;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// Permission and type bits of a node.
///
/// The low nine bits are Unix permissions; [`FileMode::DIR`] marks a
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileMode(u32);

impl FileMode {
    /// Directory type bit.
    pub const DIR: u32 = 1 << 31;

    /// Permission bits mask.
    pub const PERM: u32 = 0o777;

    /// Mode of a regular file with the given permissions.
    pub fn file(perm: u32) -> Self {
        Self(perm & Self::PERM)
    }

    /// Mode of a directory with the given permissions.
    pub fn dir(perm: u32) -> Self {
        Self(Self::DIR | (perm & Self::PERM))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn perm(&self) -> u32 {
        self.0 & Self::PERM
    }

    pub fn is_dir(&self) -> bool {
        self.0 & Self::DIR != 0
    }

    pub fn file_type(&self) -> FileType {
        if self.is_dir() {
            FileType::Directory
        } else {
            FileType::File
        }
    }
}

/// Metadata snapshot of a node.
///
/// Sizes are taken at the time of the call. Modification time is always the
/// Unix epoch; nodes do not track time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Base name (empty for a root directory).
    pub name: String,
    /// Content length for files, [`DIR_SIZE`] for directories.
    pub size: u64,
    /// Permission and type bits.
    pub mode: FileMode,
}

impl FileInfo {
    pub fn kind(&self) -> FileType {
        self.mode.file_type()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        !self.mode.is_dir()
    }

    /// Always the zero instant.
    pub fn mtime(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH
    }

    /// Backend specific data. In-memory nodes have none.
    pub fn sys(&self) -> Option<&dyn std::any::Any> {
        None
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry type.
    pub kind: FileType,
    /// Size at the time of listing.
    pub size: u64,
    /// Permission and type bits.
    pub mode: FileMode,
}

impl DirEntry {
    /// Metadata this entry was built from.
    pub fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            size: self.size,
            mode: self.mode,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

impl From<FileInfo> for DirEntry {
    fn from(info: FileInfo) -> Self {
        Self {
            kind: info.kind(),
            name: info.name,
            size: info.size,
            mode: info.mode,
        }
    }
}

/// Options applied when a file node is constructed.
///
/// Fields missing from a deserialized config take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOptions {
    /// Initial cursor. Must not exceed the initial content length.
    pub offset: usize,
    /// Every write lands at the end of the content.
    pub append: bool,
    /// Raw open flags; only [`O_APPEND`] is honored.
    pub flag: i32,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial cursor.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Enable append mode.
    pub fn append(mut self) -> Self {
        self.append = true;
        self
    }

    /// Set raw open flags.
    pub fn with_flag(mut self, flag: i32) -> Self {
        self.flag = flag;
        self
    }

    /// Returns true if writes are forced to the end of the content.
    pub fn append_mode(&self) -> bool {
        self.append || self.flag & O_APPEND != 0
    }
}
