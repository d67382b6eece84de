//! Filesystem backends for target access
//!
//! Probes never touch `std::fs` directly. They open targets through a
//! [`TargetFs`], which lets the same evaluation run against the real device
//! tree, a staging directory, or an in-memory image.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

/// Readable, seekable view of a target
pub trait TargetReader: Read + Seek {}

impl<T: Read + Seek + ?Sized> TargetReader for T {}

/// Read-only access to target resources
pub trait TargetFs: Send + Sync {
    /// Open a target for reading
    ///
    /// # Errors
    /// Returns the underlying I/O error (missing file, permission, ...)
    fn open(&self, path: &Path) -> io::Result<Box<dyn TargetReader + '_>>;
}

/// Host filesystem, optionally re-rooted
///
/// With a root, absolute target paths are resolved below it, so
/// `/dev/mmcblk0p2` becomes `<root>/dev/mmcblk0p2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsFs {
    root: Option<PathBuf>,
}

impl OsFs {
    /// Host filesystem as-is
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Host filesystem below `root`
    #[inline]
    #[must_use]
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Map a target path onto the host
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            None => path.to_path_buf(),
            Some(root) => root.join(path.strip_prefix("/").unwrap_or(path)),
        }
    }
}

impl TargetFs for OsFs {
    fn open(&self, path: &Path) -> io::Result<Box<dyn TargetReader + '_>> {
        let file = File::open(self.resolve(path))?;
        Ok(Box::new(file))
    }
}

/// In-memory filesystem
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemFs {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemFs {
    /// Create empty filesystem
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Add a file (builder style)
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Remove a file
    pub fn remove(&mut self, path: &Path) -> bool {
        self.files.remove(path).is_some()
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl TargetFs for MemFs {
    fn open(&self, path: &Path) -> io::Result<Box<dyn TargetReader + '_>> {
        let contents = self.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file", path.display()),
            )
        })?;
        Ok(Box::new(Cursor::new(contents.as_slice())))
    }
}
