//! IID Metadata
//!
//! Update metadata as the install-if-different engine sees it.
//!
//! # Core Concepts
//!
//! - [`UpdateObject`]: One artifact with its install mode and target
//! - [`Directive`]: The decoded `install-if-different` value (digest or pattern)
//! - [`PatternSpec`]: How to find a version token inside a target
//! - [`UpdatePackage`]: A metadata document with per-installation-set object lists
//! - [`Sha256Digest`]: Typed SHA-256 digest with hex rendering
//!
//! # Example
//!
//! ```rust
//! use iid_metadata::{Directive, UpdateObject};
//!
//! let object = UpdateObject::from_json(
//!     r#"{"mode": "raw", "target": "/dev/sda1", "install-if-different": "abc123"}"#,
//! )?;
//! assert_eq!(object.install_if_different, Some(Directive::digest("abc123")));
//! # Ok::<(), iid_metadata::MetadataError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod digest;
mod directive;
mod error;
mod object;
mod package;

// Re-exports
pub use digest::{DigestError, Sha256Digest};
pub use directive::{
    CustomPattern, Directive, KnownPattern, PatternCheck, PatternSpec, SHA256SUM_KEYWORD,
};
pub use error::MetadataError;
pub use object::UpdateObject;
pub use package::{SupportedHardware, UpdatePackage};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
