//! Node arena and tree operations.
//!
//! [`MemFs`] owns every node it creates. Nodes start out unattached; a
//! directory adopts a node through [`MemFs::add_file`], which is the only way
//! to build a tree. There is no detach, delete or rename.

use tracing::debug;

use crate::buffer::{Buffer, MIN_READ};
use crate::error::{ErrorKind, FsError, FsResult, Op};
use crate::handle::FileHandle;
use crate::node::{Node, NodeBody, NodeId};
use crate::path::{PathResolver, join};
use crate::types::{
    DEFAULT_DIR_PERM, DEFAULT_FILE_PERM, DirEntry, FileInfo, FileMode, FileOptions,
};
use crate::view::DirView;

/// Arena of in-memory files and directories.
///
/// Not synchronized. Share it between threads behind a lock.
#[derive(Debug, Default)]
pub struct MemFs {
    nodes: Vec<Node>,
}

impl MemFs {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create a nameless root directory.
    pub fn new_root(&mut self) -> NodeId {
        let mode = FileMode::dir(DEFAULT_DIR_PERM);
        self.insert(Node::directory(String::new(), mode))
    }

    /// Create an empty file with [`MIN_READ`] bytes of storage.
    ///
    /// # Panics
    ///
    /// If `opts.offset` is not zero.
    pub fn new_file(&mut self, name: &str, opts: FileOptions) -> FsResult<NodeId> {
        self.insert_file(name, Buffer::with_capacity(MIN_READ), opts)
    }

    /// Create a file holding `content`.
    ///
    /// The vector's spare capacity is kept, so an empty vector with a large
    /// capacity presizes the file for writing.
    ///
    /// # Panics
    ///
    /// If `opts.offset` is beyond the end of `content`.
    pub fn file_with(
        &mut self,
        name: &str,
        content: Vec<u8>,
        opts: FileOptions,
    ) -> FsResult<NodeId> {
        self.insert_file(name, Buffer::from_vec(content), opts)
    }

    fn insert_file(
        &mut self,
        name: &str,
        mut buffer: Buffer,
        opts: FileOptions,
    ) -> FsResult<NodeId> {
        Self::check_name(name)?;
        assert!(
            opts.offset <= buffer.len(),
            "initial offset {} beyond content length {}",
            opts.offset,
            buffer.len()
        );
        buffer.set_offset(opts.offset);
        buffer.set_append(opts.append_mode());
        let mode = FileMode::file(DEFAULT_FILE_PERM);
        Ok(self.insert(Node::file(name.to_string(), mode, buffer)))
    }

    /// Create an empty directory.
    pub fn new_directory(&mut self, name: &str) -> FsResult<NodeId> {
        Self::check_name(name)?;
        let mode = FileMode::dir(DEFAULT_DIR_PERM);
        Ok(self.insert(Node::directory(name.to_string(), mode)))
    }

    fn check_name(name: &str) -> FsResult<()> {
        if !PathResolver::is_valid_name(name) {
            return Err(FsError::invalid_argument(Op::New, name));
        }
        Ok(())
    }

    /// Node behind `id`.
    ///
    /// # Panics
    ///
    /// If `id` was issued by another arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Attach `child` to the directory `dir` under the child's name.
    ///
    /// A node can be attached once. Roots cannot be attached, and neither can
    /// a directory below itself.
    #[tracing::instrument(skip(self), name = "memfs.add_file")]
    pub fn add_file(&mut self, dir: NodeId, child: NodeId) -> FsResult<()> {
        let parent = self.node(dir);
        let node = self.node(child);
        if !parent.is_dir() {
            let path = join(parent.name(), node.name());
            return Err(FsError::not_a_directory(Op::Open, path));
        }
        if node.parent().is_some() {
            let kind = ErrorKind::AlreadyAttached;
            return Err(FsError::new(Op::AddFile, self.path(child), kind));
        }
        if node.name().is_empty() || self.is_within(dir, child) {
            return Err(FsError::invalid_argument(Op::AddFile, self.path(child)));
        }
        let name = node.name().to_string();
        if parent.child(&name).is_some() {
            let path = join(&self.path(dir), &name);
            return Err(FsError::already_exists(Op::AddFile, path));
        }

        if let NodeBody::Directory { entries, .. } = &mut self.node_mut(dir).body {
            entries.insert(name, child);
        }
        self.node_mut(child).set_parent(dir);
        debug!(path = %self.path(child), "node attached");
        Ok(())
    }

    /// Returns true if `id` is `ancestor` or lies below it.
    fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.node(cur).parent();
        }
        false
    }

    /// Next `n` entries of `dir` in name order, all remaining when `n` is 0.
    ///
    /// Successive calls continue where the previous one stopped. Once every
    /// entry has been handed out, and right away for an empty directory, the
    /// call fails with [`ErrorKind::EndOfData`].
    pub fn read_dir(&mut self, dir: NodeId, n: usize) -> FsResult<Vec<DirEntry>> {
        let (ids, end) = match &self.node(dir).body {
            NodeBody::Directory { entries, cursor } => {
                let cursor = *cursor;
                if cursor >= entries.len() {
                    return Err(FsError::new(
                        Op::ReadDir,
                        self.path(dir),
                        ErrorKind::EndOfData { read: 0 },
                    ));
                }
                let end = match n {
                    0 => entries.len(),
                    n => cursor.saturating_add(n).min(entries.len()),
                };
                let ids: Vec<NodeId> = entries
                    .values()
                    .skip(cursor)
                    .take(end - cursor)
                    .copied()
                    .collect();
                (ids, end)
            }
            NodeBody::File(_) => {
                return Err(FsError::not_a_directory(Op::ReadDir, self.path(dir)));
            }
        };
        if let NodeBody::Directory { cursor, .. } = &mut self.node_mut(dir).body {
            *cursor = end;
        }
        Ok(ids.into_iter().map(|id| self.node(id).entry()).collect())
    }

    /// Metadata snapshot of `id`.
    pub fn stat(&self, id: NodeId) -> FileInfo {
        self.node(id).stat()
    }

    /// Display path: names from the top-most ancestor down to `id`, joined
    /// with `/`. A nameless root contributes nothing.
    pub fn path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.node(cur);
            if !node.name().is_empty() {
                names.push(node.name());
            }
            current = node.parent();
        }
        names.reverse();
        names.join("/")
    }

    /// Immediate child of `dir` named `name`.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.node(dir).child(name)
    }

    /// Resolve a relative path below `dir`.
    pub fn open(&self, dir: NodeId, path: &str) -> FsResult<NodeId> {
        PathResolver::resolve(self, dir, path)
    }

    /// Recursive listing of `dir`, one path per line: `.` first, then every
    /// entry in pre-order with children in name order.
    ///
    /// ```
    /// use memfs::{FileOptions, MemFs};
    ///
    /// let mut fs = MemFs::new();
    /// let root = fs.new_root();
    /// let dir = fs.new_directory("dir").unwrap();
    /// let file = fs.new_file("file", FileOptions::new()).unwrap();
    /// fs.add_file(root, dir).unwrap();
    /// fs.add_file(dir, file).unwrap();
    ///
    /// assert_eq!(fs.list(root).unwrap(), ".\ndir\ndir/file\n");
    /// ```
    pub fn list(&self, dir: NodeId) -> FsResult<String> {
        if !self.node(dir).is_dir() {
            return Err(FsError::not_a_directory(Op::List, self.path(dir)));
        }
        let mut out = String::from(".\n");
        self.walk(dir, "", &mut out);
        Ok(out)
    }

    fn walk(&self, dir: NodeId, prefix: &str, out: &mut String) {
        let Some(entries) = self.node(dir).entries() else {
            return;
        };
        for (name, &id) in entries {
            let path = join(prefix, name);
            out.push_str(&path);
            out.push('\n');
            self.walk(id, &path, out);
        }
    }

    /// Copy of the content of the file at `path` below `dir`. Cursors are
    /// not touched.
    pub fn read_file(&self, dir: NodeId, path: &str) -> FsResult<Vec<u8>> {
        if !self.node(dir).is_dir() {
            return Err(FsError::not_a_directory(Op::ReadFile, self.path(dir)));
        }
        let id = self.open(dir, path)?;
        self.content(id)
    }

    pub(crate) fn content(&self, id: NodeId) -> FsResult<Vec<u8>> {
        self.node(id)
            .buffer()
            .map(|buf| buf.as_slice().to_vec())
            .ok_or_else(|| FsError::is_a_directory(Op::Read, self.path(id)))
    }

    /// Content I/O on `id`.
    pub fn file(&mut self, id: NodeId) -> FileHandle<'_> {
        FileHandle::new(self, id)
    }

    /// Restricted view of the directory `dir`, `None` for a file.
    pub fn view(&self, dir: NodeId) -> Option<DirView<'_>> {
        self.node(dir).is_dir().then(|| DirView::new(self, dir))
    }
}
