//! Growable byte store backing file nodes.
//!
//! A [`Buffer`] keeps its storage as a zero-filled `Vec<u8>` whose length is
//! the capacity, and tracks the logical length and the cursor separately.
//! Every byte past the logical length is zero, so growing back into a
//! truncated or never-written region can only ever expose zeros.
//!
//! Growth follows the amortized policy of `bytes.Buffer`: a request that
//! fits in the current storage only moves the logical length; otherwise the
//! storage is reallocated to twice its capacity plus the request.

use std::cmp;
use std::io::{self, Read, SeekFrom, Write};

use tracing::trace;

use crate::error::ErrorKind;

/// Capacity allocated when a buffer without storage receives a small write.
pub const SMALL_BUFFER_SIZE: usize = 64;

/// Capacity of a new empty file, and the space reserved for each fill in
/// [`Buffer::read_from`].
pub const MIN_READ: usize = 512;

/// Buffer operations fail with a bare [`ErrorKind`]; the owning node adds
/// the operation tag and path.
pub type BufferResult<T> = Result<T, ErrorKind>;

/// Growable byte content with a read/write cursor.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    /// Backing storage. `data.len()` is the capacity.
    data: Vec<u8>,
    /// Logical length.
    len: usize,
    /// Cursor. May point past `len` after a seek.
    off: usize,
    /// Writes always go to the end.
    append: bool,
}

impl Buffer {
    /// Create a buffer without storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with `cap` bytes of zeroed storage.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            data: vec![0; cap],
            ..Self::default()
        }
    }

    /// Take ownership of `content`. The vector's spare capacity becomes the
    /// buffer's spare capacity, so a vector with a length of zero and a
    /// large capacity presizes the buffer for writing.
    pub fn from_vec(mut content: Vec<u8>) -> Self {
        let len = content.len();
        let cap = content.capacity();
        content.resize(cap, 0);
        Self {
            data: content,
            len,
            off: 0,
            append: false,
        }
    }

    /// Current cursor.
    pub fn offset(&self) -> usize {
        self.off
    }

    /// Logical length.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total storage reserved.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn is_append(&self) -> bool {
        self.append
    }

    pub fn set_append(&mut self, append: bool) {
        self.append = append;
    }

    /// Content bytes, independent of the cursor.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub(crate) fn set_offset(&mut self, off: usize) {
        self.off = off;
    }

    /// Write `p` at the cursor (at the end in append mode) and advance the
    /// cursor past it. Always writes all of `p`.
    pub fn write(&mut self, p: &[u8]) -> BufferResult<usize> {
        if self.append {
            self.off = self.len;
        }
        if p.is_empty() {
            return Ok(0);
        }
        self.reserve(self.off, p.len())?;
        let end = self.off + p.len();
        self.data[self.off..end].copy_from_slice(p);
        self.off = end;
        self.len = cmp::max(self.len, end);
        Ok(p.len())
    }

    pub fn write_byte(&mut self, b: u8) -> BufferResult<()> {
        self.write(&[b]).map(|_| ())
    }

    /// Write `p` at `off` without touching the cursor.
    ///
    /// Rejected in append mode. Storage that has to grow to reach `off`
    /// is reallocated directly, the gap up to `off` reads as zeros.
    pub fn write_at(&mut self, p: &[u8], off: u64) -> BufferResult<usize> {
        if self.append {
            return Err(ErrorKind::InvalidOperation(
                "write_at on a file opened in append mode",
            ));
        }
        if p.is_empty() {
            return Ok(0);
        }
        let off = usize::try_from(off).map_err(|_| ErrorKind::TooLarge {
            requested: usize::MAX,
        })?;
        let end = off.checked_add(p.len()).ok_or(ErrorKind::TooLarge {
            requested: usize::MAX,
        })?;
        if end > self.capacity() {
            self.grow_storage(end - self.len, end)?;
        }
        self.data[off..end].copy_from_slice(p);
        self.len = cmp::max(self.len, end);
        Ok(p.len())
    }

    /// Copy up to `p.len()` bytes from the cursor and advance it.
    ///
    /// Fails with [`ErrorKind::EndOfData`] when nothing is left and `p` is
    /// not empty.
    pub fn read(&mut self, p: &mut [u8]) -> BufferResult<usize> {
        if p.is_empty() {
            return Ok(0);
        }
        if self.off >= self.len {
            return Err(ErrorKind::EndOfData { read: 0 });
        }
        let n = cmp::min(p.len(), self.len - self.off);
        p[..n].copy_from_slice(&self.data[self.off..self.off + n]);
        self.off += n;
        Ok(n)
    }

    pub fn read_byte(&mut self) -> BufferResult<u8> {
        if self.off >= self.len {
            return Err(ErrorKind::EndOfData { read: 0 });
        }
        let b = self.data[self.off];
        self.off += 1;
        Ok(b)
    }

    /// Copy bytes starting at `off` into `p` without touching the cursor.
    ///
    /// A short read copies what is available and reports it through
    /// [`ErrorKind::EndOfData`].
    pub fn read_at(&self, p: &mut [u8], off: u64) -> BufferResult<usize> {
        if p.is_empty() {
            return Ok(0);
        }
        let off = usize::try_from(off).unwrap_or(usize::MAX);
        if off >= self.len {
            return Err(ErrorKind::EndOfData { read: 0 });
        }
        let n = cmp::min(p.len(), self.len - off);
        p[..n].copy_from_slice(&self.data[off..off + n]);
        if n < p.len() {
            return Err(ErrorKind::EndOfData { read: n });
        }
        Ok(n)
    }

    /// Pull bytes from `r` until it is exhausted, writing them at the cursor
    /// (at the end in append mode). Returns the number of bytes pulled.
    ///
    /// Each fill hands the reader the spare storage past the content as a
    /// scratch area. Whatever the reader leaves there beyond the bytes it
    /// reports is zeroed before the area is excluded again.
    pub fn read_from<R: Read + ?Sized>(&mut self, r: &mut R) -> BufferResult<u64> {
        if self.append {
            self.off = self.len;
        }
        let mut total = 0u64;
        loop {
            let len = self.len;
            let start = cmp::max(self.off, len);
            self.reserve(start, MIN_READ)?;
            let scratch_end = len + (self.capacity() - start);

            let n = match r.read(&mut self.data[len..scratch_end]) {
                Ok(n) => cmp::min(n, scratch_end - len),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    self.data[len..scratch_end].fill(0);
                    continue;
                }
                Err(e) => {
                    self.data[len..scratch_end].fill(0);
                    return Err(ErrorKind::Io(e));
                }
            };
            if n == 0 {
                self.data[len..scratch_end].fill(0);
                break;
            }

            if self.off != len {
                self.data.copy_within(len..len + n, self.off);
                if self.off > len {
                    let gap_end = cmp::min(self.off, scratch_end);
                    self.data[len..gap_end].fill(0);
                }
            }
            let end = self.off + n;
            let new_len = cmp::max(len, end);
            if new_len < scratch_end {
                self.data[new_len..scratch_end].fill(0);
            }
            self.off = end;
            self.len = new_len;
            total += n as u64;
        }
        Ok(total)
    }

    /// Push the bytes from the cursor to the end into `w`, advancing the
    /// cursor by what `w` accepted.
    pub fn write_to<W: Write + ?Sized>(&mut self, w: &mut W) -> BufferResult<u64> {
        let mut total = 0u64;
        while self.off < self.len {
            match w.write(&self.data[self.off..self.len]) {
                Ok(0) => return Err(ErrorKind::Io(io::ErrorKind::WriteZero.into())),
                Ok(n) => {
                    let n = cmp::min(n, self.len - self.off);
                    self.off += n;
                    total += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ErrorKind::Io(e)),
            }
        }
        Ok(total)
    }

    /// Move the cursor. The result may point past the end but not before
    /// the start.
    pub fn seek(&mut self, pos: SeekFrom) -> BufferResult<u64> {
        let target = match pos {
            SeekFrom::Start(n) => i128::from(n),
            SeekFrom::Current(delta) => self.off as i128 + i128::from(delta),
            SeekFrom::End(delta) => self.len as i128 + i128::from(delta),
        };
        if target < 0 {
            return Err(ErrorKind::InvalidArgument);
        }
        self.off = usize::try_from(target).map_err(|_| ErrorKind::InvalidArgument)?;
        Ok(self.off as u64)
    }

    /// Move the cursor to the start, returning where it was.
    pub fn seek_start(&mut self) -> u64 {
        std::mem::replace(&mut self.off, 0) as u64
    }

    /// Move the cursor to the end, returning where it was.
    pub fn seek_end(&mut self) -> u64 {
        std::mem::replace(&mut self.off, self.len) as u64
    }

    /// Resize the content to `size` bytes.
    ///
    /// Shrinking zeroes the discarded tail; extending exposes zeros. The
    /// cursor only moves in append mode, where it follows the new end.
    pub fn truncate(&mut self, size: i64) -> BufferResult<()> {
        let size = usize::try_from(size).map_err(|_| ErrorKind::InvalidArgument)?;
        if size < self.len {
            self.data[size..self.len].fill(0);
        } else if size > self.capacity() {
            self.grow_storage(size - self.len, size)?;
        }
        self.len = size;
        if self.append {
            self.off = self.len;
        }
        Ok(())
    }

    /// Guarantee room for `n` more bytes past the content without another
    /// allocation. Does not change the length.
    pub fn grow(&mut self, n: usize) -> BufferResult<()> {
        let needed = self.len.checked_add(n).ok_or(ErrorKind::TooLarge {
            requested: usize::MAX,
        })?;
        if needed <= self.capacity() {
            return Ok(());
        }
        self.reallocate(needed)
    }

    /// Hand the content out and leave the buffer empty with no storage.
    pub fn release(&mut self) -> Vec<u8> {
        let mut data = std::mem::take(&mut self.data);
        data.truncate(self.len);
        self.len = 0;
        self.off = 0;
        trace!(len = data.len(), "buffer released");
        data
    }

    /// Bytes from the cursor to the end as text; the cursor moves to the end.
    pub fn remaining_string(&mut self) -> String {
        let start = cmp::min(self.off, self.len);
        let s = String::from_utf8_lossy(&self.data[start..self.len]).into_owned();
        self.off = self.len;
        s
    }

    /// Make sure `n` bytes fit between `from` and the end of storage.
    fn reserve(&mut self, from: usize, n: usize) -> BufferResult<()> {
        let needed = from.checked_add(n).ok_or(ErrorKind::TooLarge {
            requested: usize::MAX,
        })?;
        if needed <= self.capacity() {
            return Ok(());
        }
        self.grow_storage(n, needed)
    }

    /// Reallocate to twice the capacity plus `n`, and never below `min`.
    fn grow_storage(&mut self, n: usize, min: usize) -> BufferResult<()> {
        let cap = self.capacity();
        let new_cap = if cap == 0 && min <= SMALL_BUFFER_SIZE {
            SMALL_BUFFER_SIZE
        } else {
            cap.checked_mul(2)
                .and_then(|c| c.checked_add(n))
                .map(|c| cmp::max(c, min))
                .ok_or(ErrorKind::TooLarge { requested: min })?
        };
        self.reallocate(new_cap)
    }

    fn reallocate(&mut self, new_cap: usize) -> BufferResult<()> {
        let old_cap = self.capacity();
        self.data
            .try_reserve_exact(new_cap - old_cap)
            .map_err(|_| ErrorKind::TooLarge { requested: new_cap })?;
        self.data.resize(new_cap, 0);
        trace!(old_cap, new_cap, "buffer storage grown");
        Ok(())
    }
}
