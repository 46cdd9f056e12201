//! Nodes of the in-memory tree.
//!
//! A node is either a file holding a [`Buffer`] or a directory holding a
//! name-sorted map of child ids. Nodes never own each other directly; the
//! [`MemFs`](crate::MemFs) arena owns every node and directories refer to
//! their children by [`NodeId`].

use std::collections::BTreeMap;

use crate::buffer::Buffer;
use crate::types::{DIR_SIZE, DirEntry, FileInfo, FileMode, FileType};

/// Handle of a node in the arena that created it.
///
/// Ids are only meaningful for the [`MemFs`](crate::MemFs) that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Kind-specific part of a node.
#[derive(Debug, Clone)]
pub(crate) enum NodeBody {
    File(Buffer),
    Directory {
        entries: BTreeMap<String, NodeId>,
        /// Entries already handed out by `read_dir`.
        cursor: usize,
    },
}

/// File or directory.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    mode: FileMode,
    /// Set once when attached, never cleared.
    parent: Option<NodeId>,
    pub(crate) body: NodeBody,
}

impl Node {
    pub(crate) fn file(name: String, mode: FileMode, buffer: Buffer) -> Self {
        Self {
            name,
            mode,
            parent: None,
            body: NodeBody::File(buffer),
        }
    }

    pub(crate) fn directory(name: String, mode: FileMode) -> Self {
        Self {
            name,
            mode,
            parent: None,
            body: NodeBody::Directory {
                entries: BTreeMap::new(),
                cursor: 0,
            },
        }
    }

    /// Base name. Empty for a root directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Directory this node is attached to.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    pub fn kind(&self) -> FileType {
        match self.body {
            NodeBody::File(_) => FileType::File,
            NodeBody::Directory { .. } => FileType::Directory,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind().is_dir()
    }

    /// Content length for files, [`DIR_SIZE`] for directories.
    pub fn size(&self) -> u64 {
        match &self.body {
            NodeBody::File(buf) => buf.len() as u64,
            NodeBody::Directory { .. } => DIR_SIZE,
        }
    }

    /// Metadata snapshot with the size taken now.
    pub fn stat(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            size: self.size(),
            mode: self.mode,
        }
    }

    pub(crate) fn entry(&self) -> DirEntry {
        DirEntry {
            name: self.name.clone(),
            kind: self.kind(),
            size: self.size(),
            mode: self.mode,
        }
    }

    /// File content store, `None` for directories.
    pub fn buffer(&self) -> Option<&Buffer> {
        match &self.body {
            NodeBody::File(buf) => Some(buf),
            NodeBody::Directory { .. } => None,
        }
    }

    pub(crate) fn buffer_mut(&mut self) -> Option<&mut Buffer> {
        match &mut self.body {
            NodeBody::File(buf) => Some(buf),
            NodeBody::Directory { .. } => None,
        }
    }

    /// Children by name, `None` for files.
    pub fn entries(&self) -> Option<&BTreeMap<String, NodeId>> {
        match &self.body {
            NodeBody::File(_) => None,
            NodeBody::Directory { entries, .. } => Some(entries),
        }
    }

    pub(crate) fn child(&self, name: &str) -> Option<NodeId> {
        self.entries()?.get(name).copied()
    }
}
