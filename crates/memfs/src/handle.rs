//! Content I/O on a single node.
//!
//! A [`FileHandle`] borrows the arena mutably for as long as it lives and
//! forwards every content operation to the node's [`Buffer`]. Directory
//! nodes reject them with [`ErrorKind::IsADirectory`]; growing a directory
//! is accepted and does nothing.
//!
//! The handle also implements [`Read`], [`Write`] and [`Seek`], so it can be
//! driven by anything written against those traits. Through the traits the
//! end-of-data signal becomes `Ok(0)`.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::buffer::{Buffer, BufferResult};
use crate::error::{ErrorKind, FsError, FsResult, Op};
use crate::node::NodeId;
use crate::tree::MemFs;
use crate::types::FileInfo;

/// Open file on a [`MemFs`] node.
#[derive(Debug)]
pub struct FileHandle<'a> {
    fs: &'a mut MemFs,
    id: NodeId,
}

impl<'a> FileHandle<'a> {
    pub(crate) fn new(fs: &'a mut MemFs, id: NodeId) -> Self {
        Self { fs, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Run `f` against the file buffer, tagging failures with `op` and the
    /// node's path.
    fn with_buffer<T>(
        &mut self,
        op: Op,
        f: impl FnOnce(&mut Buffer) -> BufferResult<T>,
    ) -> FsResult<T> {
        let id = self.id;
        let result = match self.fs.node_mut(id).buffer_mut() {
            Some(buf) => f(buf),
            None => Err(ErrorKind::IsADirectory),
        };
        let fs = &*self.fs;
        result.map_err(|kind| FsError::new(op, fs.path(id), kind))
    }

    fn buffer(&self) -> Option<&Buffer> {
        self.fs.node(self.id).buffer()
    }

    pub fn write(&mut self, p: &[u8]) -> FsResult<usize> {
        self.with_buffer(Op::Write, |buf| buf.write(p))
    }

    pub fn write_str(&mut self, s: &str) -> FsResult<usize> {
        self.write(s.as_bytes())
    }

    pub fn write_byte(&mut self, b: u8) -> FsResult<()> {
        self.with_buffer(Op::Write, |buf| buf.write_byte(b))
    }

    /// Write at `off` without moving the cursor. Fails in append mode.
    pub fn write_at(&mut self, p: &[u8], off: u64) -> FsResult<usize> {
        self.with_buffer(Op::Write, |buf| buf.write_at(p, off))
    }

    pub fn read(&mut self, p: &mut [u8]) -> FsResult<usize> {
        self.with_buffer(Op::Read, |buf| buf.read(p))
    }

    pub fn read_byte(&mut self) -> FsResult<u8> {
        self.with_buffer(Op::Read, |buf| buf.read_byte())
    }

    /// Read at `off` without moving the cursor. A short read fails with
    /// [`ErrorKind::EndOfData`] carrying the count copied.
    pub fn read_at(&mut self, p: &mut [u8], off: u64) -> FsResult<usize> {
        self.with_buffer(Op::Read, |buf| buf.read_at(p, off))
    }

    /// Pull everything `r` produces into the file at the cursor.
    #[tracing::instrument(skip(self, r), fields(id = ?self.id), name = "memfs.read_from")]
    pub fn read_from<R: Read + ?Sized>(&mut self, r: &mut R) -> FsResult<u64> {
        self.with_buffer(Op::Write, |buf| buf.read_from(r))
    }

    /// Push the bytes from the cursor to the end into `w`.
    pub fn write_to<W: Write + ?Sized>(&mut self, w: &mut W) -> FsResult<u64> {
        self.with_buffer(Op::Write, |buf| buf.write_to(w))
    }

    pub fn seek(&mut self, pos: SeekFrom) -> FsResult<u64> {
        self.with_buffer(Op::Seek, |buf| buf.seek(pos))
    }

    /// Move the cursor to the start, returning its previous value.
    pub fn seek_start(&mut self) -> FsResult<u64> {
        self.with_buffer(Op::Seek, |buf| Ok(buf.seek_start()))
    }

    /// Move the cursor to the end, returning its previous value.
    pub fn seek_end(&mut self) -> FsResult<u64> {
        self.with_buffer(Op::Seek, |buf| Ok(buf.seek_end()))
    }

    pub fn truncate(&mut self, size: i64) -> FsResult<()> {
        self.with_buffer(Op::Truncate, |buf| buf.truncate(size))
    }

    /// Reserve room for `n` more bytes. No-op on a directory.
    pub fn grow(&mut self, n: usize) -> FsResult<()> {
        if self.fs.node(self.id).is_dir() {
            return Ok(());
        }
        self.with_buffer(Op::Write, |buf| buf.grow(n))
    }

    /// Take the content out of the file. The file is left empty with no
    /// storage; a directory yields nothing.
    pub fn release(&mut self) -> Vec<u8> {
        self.fs
            .node_mut(self.id)
            .buffer_mut()
            .map(Buffer::release)
            .unwrap_or_default()
    }

    /// Bytes from the cursor to the end as text; the cursor moves to the end.
    /// Empty for a directory.
    pub fn remaining_string(&mut self) -> String {
        self.fs
            .node_mut(self.id)
            .buffer_mut()
            .map(Buffer::remaining_string)
            .unwrap_or_default()
    }

    pub fn offset(&self) -> usize {
        self.buffer().map_or(0, Buffer::offset)
    }

    pub fn len(&self) -> usize {
        self.buffer().map_or(0, Buffer::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer().map_or(0, Buffer::capacity)
    }

    pub fn stat(&self) -> FileInfo {
        self.fs.stat(self.id)
    }

    /// Close the handle. The cursor goes back to zero and the content stays.
    pub fn close(self) {
        if let Some(buf) = self.fs.node_mut(self.id).buffer_mut() {
            buf.set_offset(0);
        }
    }
}

impl Read for FileHandle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match FileHandle::read(self, buf) {
            Ok(n) => Ok(n),
            Err(e) if e.is_end_of_data() => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

impl Write for FileHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FileHandle::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FileHandle<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        FileHandle::seek(self, pos).map_err(io::Error::from)
    }
}
