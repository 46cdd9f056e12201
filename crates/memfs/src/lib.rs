//! In-memory files and directories with `std::io` semantics.
//!
//! A stand-in for a disk filesystem in tests and sandboxes: file nodes hold
//! growable byte content with a cursor, directory nodes hold named children,
//! and every failure is reported with an operation tag and a path the way an
//! OS path error would be, so behavior can be compared against real files.
//!
//! # Layout
//!
//! |------------------|-----------------------------------------------------|
//! | Type             | Purpose                                             |
//! |------------------|-----------------------------------------------------|
//! | [`MemFs`]        | Arena owning every node; builds and walks trees      |
//! | [`NodeId`]       | Copyable handle of a node in its arena              |
//! | [`Buffer`]       | Growable byte store behind a file node              |
//! | [`FileHandle`]   | Content I/O on one node, `Read`/`Write`/`Seek`      |
//! | [`PathResolver`] | Validates and walks relative slash paths            |
//! | [`DirView`]      | `openat`-style lookups relative to a directory      |
//! | [`FsError`]      | Operation, path and [`ErrorKind`] of a failure      |
//! |------------------|-----------------------------------------------------|
//!
//! # Example
//!
//! ```
//! use std::io::SeekFrom;
//! use memfs::{FileOptions, MemFs};
//!
//! let mut fs = MemFs::new();
//! let root = fs.new_root();
//! let notes = fs.new_file("notes.txt", FileOptions::new()).unwrap();
//! fs.add_file(root, notes).unwrap();
//!
//! let mut file = fs.file(notes);
//! file.write(&[0, 1, 2, 3]).unwrap();
//! file.seek(SeekFrom::End(-2)).unwrap();
//! file.write(&[4, 5]).unwrap();
//!
//! assert_eq!(fs.read_file(root, "notes.txt").unwrap(), vec![0, 1, 4, 5]);
//! ```
//!
//! Nothing here is synchronized; wrap the arena in a lock to share it.

pub mod buffer;
pub mod error;
mod handle;
pub mod node;
pub mod path;
mod tree;
pub mod types;
mod view;

pub use buffer::{Buffer, MIN_READ, SMALL_BUFFER_SIZE};
pub use error::{ErrorKind, FsError, FsResult, Op};
pub use handle::FileHandle;
pub use node::{Node, NodeId};
pub use path::PathResolver;
pub use tree::MemFs;
pub use types::{
    DEFAULT_DIR_PERM, DEFAULT_FILE_PERM, DIR_SIZE, DirEntry, FileInfo, FileMode, FileOptions,
    FileType, O_APPEND,
};
pub use view::DirView;
