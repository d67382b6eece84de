//! Whole-target digest computation

use crate::fs::TargetFs;
use iid_metadata::Sha256Digest;
use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;

/// Compute the SHA-256 digest of a target's current content
///
/// The target is streamed, never loaded whole.
///
/// # Errors
/// Returns error if the target cannot be opened or read
pub fn compute_digest(fs: &dyn TargetFs, path: &Path) -> io::Result<Sha256Digest> {
    let mut reader = fs.open(path)?;
    let mut hasher = Sha256::new();
    let bytes = io::copy(&mut reader, &mut hasher)?;
    tracing::trace!("hashed {} bytes of {}", bytes, path.display());
    Ok(Sha256Digest::from_hasher(hasher))
}
