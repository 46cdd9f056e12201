//! Path validation and resolution.
//!
//! Paths are relative and slash separated: no leading or trailing slash, no
//! empty segments, no `.` or `..` segments. The lone path `.` names the
//! directory resolution starts from.

use crate::error::{FsError, FsResult, Op};
use crate::node::NodeId;
use crate::tree::MemFs;

/// Walks relative paths through a [`MemFs`] tree.
pub struct PathResolver;

impl PathResolver {
    /// Returns true if `path` is a well-formed relative path.
    ///
    /// ```
    /// use memfs::PathResolver;
    ///
    /// assert!(PathResolver::is_valid_path("dir/file"));
    /// assert!(PathResolver::is_valid_path("."));
    /// assert!(!PathResolver::is_valid_path("/dir"));
    /// assert!(!PathResolver::is_valid_path("dir//file"));
    /// assert!(!PathResolver::is_valid_path("dir/../file"));
    /// ```
    pub fn is_valid_path(path: &str) -> bool {
        if path == "." {
            return true;
        }
        path.split('/').all(is_valid_segment)
    }

    /// Returns true if `name` can name a node: a valid path of exactly one
    /// segment, other than `.`.
    pub fn is_valid_name(name: &str) -> bool {
        name != "." && !name.contains('/') && Self::is_valid_path(name)
    }

    /// Split a valid path into segments. `.` yields no segments.
    pub fn split_path(path: &str) -> FsResult<Vec<&str>> {
        if !Self::is_valid_path(path) {
            return Err(FsError::invalid_argument(Op::Open, path));
        }
        if path == "." {
            return Ok(Vec::new());
        }
        Ok(path.split('/').collect())
    }

    /// Resolve `path` starting at `root`.
    ///
    /// A missing segment fails with NotFound naming that segment, so the
    /// error points at where the walk stopped. Walking through a file finds
    /// nothing below it.
    pub fn resolve(fs: &MemFs, root: NodeId, path: &str) -> FsResult<NodeId> {
        let mut current = root;
        for segment in Self::split_path(path)? {
            current = fs
                .node(current)
                .child(segment)
                .ok_or_else(|| FsError::not_found(Op::Open, segment))?;
        }
        Ok(current)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}

/// Join two display path parts, skipping an empty head.
pub(crate) fn join(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head}/{tail}"),
    }
}
