//! Filesystem metadata boundary: stat, directory enumeration, symlink
//! target resolution.

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use thiserror::Error;

use crate::status::ErrorCategory;

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Regular,
    Directory,
    Symlink,
    Other,
}

/// Immutable metadata snapshot for one entry, taken at listing time.
///
/// Snapshots are never cached; every visit re-fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    pub kind: EntryKind,
    /// Raw st_mode bits; only the rwx triplets are rendered.
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    /// Modification time, seconds since the epoch.
    pub mtime: i64,
}

impl EntryMetadata {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    fn from_std(md: &fs::Metadata) -> Self {
        let ft = md.file_type();
        let kind = if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::Regular
        } else if ft.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        };
        Self {
            kind,
            mode: md.mode(),
            nlink: md.nlink(),
            uid: md.uid(),
            gid: md.gid(),
            size: md.size(),
            mtime: md.mtime(),
        }
    }
}

/// A failed filesystem operation, classified for exit-status accumulation.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct FsError {
    category: ErrorCategory,
    #[source]
    source: io::Error,
}

impl FsError {
    pub fn category(&self) -> ErrorCategory {
        self.category
    }
}

impl From<io::Error> for FsError {
    fn from(source: io::Error) -> Self {
        let category = match source.kind() {
            io::ErrorKind::NotFound => ErrorCategory::NotFound,
            io::ErrorKind::PermissionDenied => ErrorCategory::PermissionDenied,
            _ => ErrorCategory::OtherSystem,
        };
        Self { category, source }
    }
}

/// Abstraction over filesystem queries so the lister can be driven against
/// a mock in tests.
///
/// Failures are surfaced to the caller and never retried here.
pub trait MetadataProvider {
    /// Fetch metadata for `path` without following a final symlink
    /// (lstat semantics).
    fn stat(&self, path: &Path) -> Result<EntryMetadata, FsError>;

    /// Raw entry names of `dir` in enumeration order, `.` and `..`
    /// included.
    fn list_entries(&self, dir: &Path) -> Result<Vec<String>, FsError>;

    /// Resolve the target a symlink points at.
    fn read_link_target(&self, path: &Path) -> Result<String, FsError>;
}

/// [`MetadataProvider`] backed by the operating system.
pub struct OsMetadataProvider;

impl MetadataProvider for OsMetadataProvider {
    fn stat(&self, path: &Path) -> Result<EntryMetadata, FsError> {
        let md = fs::symlink_metadata(path)?;
        Ok(EntryMetadata::from_std(&md))
    }

    fn list_entries(&self, dir: &Path) -> Result<Vec<String>, FsError> {
        // std::fs::read_dir omits the dot entries readdir(3) yields, so they
        // are restored here; listing and recursion treat them specially.
        let mut names = vec![".".to_string(), "..".to_string()];
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }

    fn read_link_target(&self, path: &Path) -> Result<String, FsError> {
        let target = fs::read_link(path)?;
        Ok(target.to_string_lossy().to_string())
    }
}
