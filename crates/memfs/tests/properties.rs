//! Model-based property tests for file content.
//!
//! Every action runs against a file node and against a plain `Vec<u8>` model
//! of the content and cursor. After each step both must agree, which also
//! proves that bytes never written read back as zero.

use std::io::{self, Read, SeekFrom};

use memfs::{ErrorKind, FileOptions, MemFs, NodeId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Write(Vec<u8>),
    WriteAt(Vec<u8>, u64),
    Seek(SeekFrom),
    Truncate(i64),
    ReadFrom(Vec<u8>, usize),
    Read(usize),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Action::Write),
        (prop::collection::vec(any::<u8>(), 0..64), 0u64..2048)
            .prop_map(|(p, off)| Action::WriteAt(p, off)),
        (0u64..2048).prop_map(|n| Action::Seek(SeekFrom::Start(n))),
        (-256i64..256).prop_map(|d| Action::Seek(SeekFrom::Current(d))),
        (-256i64..256).prop_map(|d| Action::Seek(SeekFrom::End(d))),
        (-4i64..2048).prop_map(Action::Truncate),
        (prop::collection::vec(any::<u8>(), 0..1200), 1usize..300)
            .prop_map(|(src, chunk)| Action::ReadFrom(src, chunk)),
        (0usize..128).prop_map(Action::Read),
    ]
}

/// Reader that hands out `chunk` bytes per call and scribbles over the rest
/// of the destination.
struct Chunked<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        buf.fill(0xEE);
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Reference behavior of a file node.
#[derive(Debug)]
struct Model {
    content: Vec<u8>,
    off: usize,
    append: bool,
}

impl Model {
    fn write(&mut self, p: &[u8]) {
        if self.append {
            self.off = self.content.len();
        }
        if p.is_empty() {
            return;
        }
        self.put(p, self.off);
        self.off += p.len();
    }

    fn put(&mut self, p: &[u8], at: usize) {
        let end = at + p.len();
        if self.content.len() < end {
            self.content.resize(end, 0);
        }
        self.content[at..end].copy_from_slice(p);
    }

    fn seek(&mut self, pos: SeekFrom) -> bool {
        let target = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::Current(d) => self.off as i64 + d,
            SeekFrom::End(d) => self.content.len() as i64 + d,
        };
        if target < 0 {
            return false;
        }
        self.off = target as usize;
        true
    }

    fn read(&mut self, n: usize) -> Option<Vec<u8>> {
        if n == 0 {
            return Some(Vec::new());
        }
        if self.off >= self.content.len() {
            return None;
        }
        let end = (self.off + n).min(self.content.len());
        let out = self.content[self.off..end].to_vec();
        self.off = end;
        Some(out)
    }
}

fn apply(
    fs: &mut MemFs,
    id: NodeId,
    model: &mut Model,
    action: &Action,
) -> Result<(), TestCaseError> {
    let mut file = fs.file(id);
    match action {
        Action::Write(p) => {
            prop_assert_eq!(file.write(p).unwrap(), p.len());
            model.write(p);
        }
        Action::WriteAt(p, off) => {
            let result = file.write_at(p, *off);
            if model.append {
                prop_assert!(matches!(result.unwrap_err().kind, ErrorKind::InvalidOperation(_)));
            } else {
                prop_assert_eq!(result.unwrap(), p.len());
                if !p.is_empty() {
                    model.put(p, *off as usize);
                }
            }
        }
        Action::Seek(pos) => {
            let result = file.seek(*pos);
            if model.seek(*pos) {
                prop_assert_eq!(result.unwrap(), model.off as u64);
            } else {
                prop_assert!(matches!(result.unwrap_err().kind, ErrorKind::InvalidArgument));
            }
        }
        Action::Truncate(size) => {
            let result = file.truncate(*size);
            if *size < 0 {
                prop_assert!(matches!(result.unwrap_err().kind, ErrorKind::InvalidArgument));
            } else {
                result.unwrap();
                model.content.resize(*size as usize, 0);
                if model.append {
                    model.off = model.content.len();
                }
            }
        }
        Action::ReadFrom(src, chunk) => {
            let mut reader = Chunked {
                data: src,
                chunk: *chunk,
            };
            prop_assert_eq!(file.read_from(&mut reader).unwrap(), src.len() as u64);
            model.write(src);
        }
        Action::Read(n) => {
            let mut dst = vec![0u8; *n];
            match model.read(*n) {
                Some(expected) => {
                    let got = file.read(&mut dst).unwrap();
                    prop_assert_eq!(&dst[..got], expected.as_slice());
                }
                None => prop_assert!(file.read(&mut dst).unwrap_err().is_end_of_data()),
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_file_matches_model(
        append in any::<bool>(),
        initial in prop::collection::vec(any::<u8>(), 0..32),
        actions in prop::collection::vec(action(), 1..40),
    ) {
        let mut fs = MemFs::new();
        let opts = FileOptions { append, ..FileOptions::default() };
        let id = fs.file_with("file", initial.clone(), opts).unwrap();
        let mut model = Model { content: initial, off: 0, append };

        for action in &actions {
            apply(&mut fs, id, &mut model, action)?;
            let buf = fs.node(id).buffer().unwrap();
            prop_assert_eq!(buf.as_slice(), model.content.as_slice(), "after {:?}", action);
            prop_assert_eq!(buf.offset(), model.off, "after {:?}", action);
            prop_assert!(buf.capacity() >= buf.len());
        }
    }

    #[test]
    fn prop_unwritten_bytes_stay_zero(
        writes in prop::collection::vec(
            (0u64..1024, prop::collection::vec(1u8..=255, 1..32)),
            1..24,
        ),
    ) {
        let mut fs = MemFs::new();
        let id = fs.new_file("file", FileOptions::new()).unwrap();
        let mut written = vec![false; 2048];
        let mut highest = 0usize;

        let mut file = fs.file(id);
        for (off, bytes) in &writes {
            file.seek(SeekFrom::Start(*off)).unwrap();
            file.write(bytes).unwrap();
            let start = *off as usize;
            written[start..start + bytes.len()].fill(true);
            highest = highest.max(start + bytes.len());
        }

        let content = fs.read_file_from(id);
        prop_assert!(content.len() >= highest);
        for (i, &b) in content.iter().enumerate() {
            if !written[i] {
                prop_assert_eq!(b, 0, "byte {} was never written", i);
            }
        }
    }

    #[test]
    fn prop_shrink_then_extend_exposes_zeros(
        content in prop::collection::vec(1u8..=255, 1..256),
        keep in 0usize..256,
        extend in 0usize..1024,
    ) {
        let keep = keep.min(content.len());
        let mut fs = MemFs::new();
        let opts = FileOptions::new();
        let id = fs.file_with("file", content.clone(), opts).unwrap();

        let mut file = fs.file(id);
        file.truncate(keep as i64).unwrap();
        file.truncate((keep + extend) as i64).unwrap();

        let got = fs.read_file_from(id);
        prop_assert_eq!(&got[..keep], &content[..keep]);
        prop_assert!(got[keep..].iter().all(|&b| b == 0));
    }
}

trait ContentExt {
    fn read_file_from(&mut self, id: NodeId) -> Vec<u8>;
}

impl ContentExt for MemFs {
    /// Whole content through the `Read` impl, cursor restored to the start.
    fn read_file_from(&mut self, id: NodeId) -> Vec<u8> {
        let mut file = self.file(id);
        file.seek_start().unwrap();
        let mut out = Vec::new();
        file.read_to_end(&mut out).unwrap();
        file.seek_start().unwrap();
        out
    }
}
