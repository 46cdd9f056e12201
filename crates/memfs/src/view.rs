//! Read-only view of one directory.
//!
//! [`DirView`] narrows a tree down to four lookups relative to a directory
//! and reports failures the way `openat(2)`/`fstatat(2)` based code sees
//! them, so callers can treat it like a directory of a real filesystem.

use crate::error::{FsError, FsResult, Op};
use crate::node::NodeId;
use crate::path::{PathResolver, join};
use crate::tree::MemFs;
use crate::types::{DirEntry, FileInfo};

/// Lookups relative to a directory of a [`MemFs`].
#[derive(Debug, Clone, Copy)]
pub struct DirView<'a> {
    fs: &'a MemFs,
    dir: NodeId,
}

impl<'a> DirView<'a> {
    pub(crate) fn new(fs: &'a MemFs, dir: NodeId) -> Self {
        Self { fs, dir }
    }

    /// Directory this view is rooted at.
    pub fn dir(&self) -> NodeId {
        self.dir
    }

    /// Resolve a relative path. Missing entries fail with NotFound tagged
    /// `openat`.
    pub fn open(&self, name: &str) -> FsResult<NodeId> {
        let result = PathResolver::resolve(self.fs, self.dir, name);
        result.map_err(|mut e| {
            if e.is_not_found() {
                e.op = Op::OpenAt;
            }
            e
        })
    }

    /// Every entry of the directory at `name`, in name order.
    ///
    /// Unlike [`MemFs::read_dir`] this does not page and leaves the
    /// directory's listing cursor alone.
    pub fn read_dir(&self, name: &str) -> FsResult<Vec<DirEntry>> {
        let id = self.open(name)?;
        let Some(entries) = self.fs.node(id).entries() else {
            let path = join(self.fs.node(self.dir).name(), name);
            return Err(FsError::not_a_directory(Op::ReadDirent, path));
        };
        let fs = self.fs;
        Ok(entries.values().map(|&id| fs.node(id).entry()).collect())
    }

    /// Metadata of the immediate child `name`. Paths are not walked.
    pub fn stat(&self, name: &str) -> FsResult<FileInfo> {
        self.fs
            .child(self.dir, name)
            .map(|id| self.fs.stat(id))
            .ok_or_else(|| FsError::not_found(Op::StatAt, name))
    }

    /// Copy of the content of the file at `name`.
    pub fn read_file(&self, name: &str) -> FsResult<Vec<u8>> {
        let id = self.open(name)?;
        self.fs.content(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{DIR_SIZE, FileOptions};

    fn tree() -> (MemFs, NodeId) {
        let mut fs = MemFs::new();
        let root = fs.new_root();
        let dir = fs.new_directory("dir").unwrap();
        let opts = FileOptions::new();
        let file = fs.file_with("file", b"content".to_vec(), opts).unwrap();
        let nested = fs.file_with("nested", b"deep".to_vec(), opts).unwrap();
        fs.add_file(root, dir).unwrap();
        fs.add_file(root, file).unwrap();
        fs.add_file(dir, nested).unwrap();
        (fs, root)
    }

    #[test]
    fn test_open() {
        let (fs, root) = tree();
        let view = fs.view(root).unwrap();
        let nested = view.open("dir/nested").unwrap();
        assert_eq!(fs.path(nested), "dir/nested");
        assert_eq!(view.open(".").unwrap(), root);
    }

    #[test]
    fn test_open_not_found() {
        let (fs, root) = tree();
        let view = fs.view(root).unwrap();
        let err = view.open("not-existing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.op, Op::OpenAt);
        assert_eq!(err.to_string(), "openat not-existing: file does not exist");
    }

    #[test]
    fn test_open_invalid_keeps_op() {
        let (fs, root) = tree();
        let view = fs.view(root).unwrap();
        let err = view.open("/abs").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidArgument));
        assert_eq!(err.op, Op::Open);
    }

    #[test]
    fn test_read_dir() {
        let (fs, root) = tree();
        let view = fs.view(root).unwrap();
        let entries = view.read_dir(".").unwrap();
        let names: Vec<String> = entries.into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["dir", "file"]);

        let entries = view.read_dir("dir").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "nested");
        assert_eq!(entries[0].size, 4);

        // Stateless: a second listing sees the same entries.
        assert_eq!(view.read_dir(".").unwrap().len(), 2);
    }

    #[test]
    fn test_read_dir_on_file() {
        let (fs, root) = tree();
        let dir = fs.child(root, "dir").unwrap();
        let view = fs.view(dir).unwrap();
        let err = view.read_dir("nested").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NotADirectory));
        assert_eq!(err.op, Op::ReadDirent);
        assert_eq!(err.path, "dir/nested");
    }

    #[test]
    fn test_read_dir_empty() {
        let mut fs = MemFs::new();
        let root = fs.new_root();
        assert!(fs.view(root).unwrap().read_dir(".").unwrap().is_empty());
    }

    #[test]
    fn test_stat() {
        let (fs, root) = tree();
        let view = fs.view(root).unwrap();
        let info = view.stat("file").unwrap();
        assert_eq!(info.name, "file");
        assert_eq!(info.size, 7);
        assert_eq!(view.stat("dir").unwrap().size, DIR_SIZE);

        let err = view.stat("dir/nested").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.op, Op::StatAt);
        assert_eq!(err.path, "dir/nested");
    }

    #[test]
    fn test_read_file() {
        let (fs, root) = tree();
        let view = fs.view(root).unwrap();
        assert_eq!(view.read_file("dir/nested").unwrap(), b"deep");
        let err = view.read_file("dir").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IsADirectory));
        assert_eq!(view.read_file("missing").unwrap_err().op, Op::OpenAt);
    }
}
