//! RemotePath - the browse location on the remote tree

use crate::{FsError, Result};

/// Separator between segments on the wire
pub const SEPARATOR: char = '/';

/// A location in the remote tree as an ordered list of segments
///
/// Features:
/// - Root is the empty sequence
/// - Every segment is non-empty and free of the separator
/// - Values are replaced, never mutated: every operation returns a new path
/// - Wire form: segments joined by `/`, no trailing separator, root
///   serializes to the empty string. A path parsed from an absolute entry
///   keeps its leading `/` and passes it on to its descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RemotePath {
    segments: Vec<String>,
    /// Serialize with a leading separator
    rooted: bool,
}

impl RemotePath {
    /// The root of the tree
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a full path as the backend reports it
    ///
    /// Trailing and repeated separators are tolerated, as are `.` pieces;
    /// all of them normalize away. A leading separator is remembered.
    pub fn parse(full_path: &str) -> Self {
        let segments: Vec<String> = full_path
            .split(SEPARATOR)
            .filter(|piece| !piece.is_empty() && *piece != ".")
            .map(str::to_string)
            .collect();

        let rooted = !segments.is_empty() && full_path.starts_with(SEPARATOR);
        Self { segments, rooted }
    }

    /// Append `child` as the last segment
    pub fn descend(&self, child: &str) -> Result<Self> {
        if matches!(child, "" | "." | "..") || child.contains(SEPARATOR) {
            return Err(FsError::InvalidSegment(child.to_string()));
        }

        let mut segments = self.segments.clone();
        segments.push(child.to_string());
        Ok(Self {
            segments,
            rooted: self.rooted,
        })
    }

    /// Truncate to the first `depth` segments
    pub fn ancestor(&self, depth: usize) -> Result<Self> {
        if depth > self.len() {
            return Err(FsError::IndexOutOfRange { depth, len: self.len() });
        }

        Ok(self.truncated(depth))
    }

    /// The enclosing location, or `None` at the root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            None
        } else {
            Some(self.truncated(self.segments.len() - 1))
        }
    }

    fn truncated(&self, depth: usize) -> Self {
        if depth == 0 {
            return Self::root();
        }

        Self {
            segments: self.segments[..depth].to_vec(),
            rooted: self.rooted,
        }
    }

    /// Normalize a directory entry from a listing of this path
    ///
    /// Entries containing the separator are full paths; anything else is a
    /// child name relative to `self`.
    pub fn resolve_directory(&self, entry: &str) -> Result<Self> {
        if entry.contains(SEPARATOR) {
            let path = Self::parse(entry);
            if path.is_root() || path.segments.iter().any(|s| s == "..") {
                return Err(FsError::InvalidSegment(entry.to_string()));
            }
            Ok(path)
        } else {
            self.descend(entry)
        }
    }

    /// Form sent to the listing endpoint
    pub fn to_wire_string(&self) -> String {
        let joined = self.segments.join("/");
        if self.rooted {
            format!("{}{}", SEPARATOR, joined)
        } else {
            joined
        }
    }

    /// Segments in order, for breadcrumbs; empty at the root
    pub fn display_segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.is_empty()
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}
