//! IID Probe
//!
//! Read-only inspection of installed targets.
//!
//! # Core Concepts
//!
//! - [`TargetFs`]: Backend the probes read targets through ([`OsFs`], [`MemFs`])
//! - [`compute_digest`]: Whole-target SHA-256
//! - [`Matcher`]: Validated pattern that extracts a version token
//! - [`kernel_version`]: Release string of a Linux kernel image
//!
//! # Architecture
//!
//! ```text
//! PatternSpec ──Matcher::new──→ Matcher ──capture(fs, path)──→ "2.0.0" | ""
//!                   │
//!                   └── None (invalid spec: never scanned)
//! ```
//!
//! # Example
//!
//! ```rust
//! use iid_metadata::PatternSpec;
//! use iid_probe::{Matcher, MemFs};
//! use std::path::Path;
//!
//! let fs = MemFs::new().with_file("/etc/version", b"version=2.0.0\n".to_vec());
//! let matcher = Matcher::new(&PatternSpec::regexp("version=([0-9.]+)")).unwrap();
//! assert_eq!(matcher.capture(&fs, Path::new("/etc/version"))?, "2.0.0");
//! # Ok::<(), std::io::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod digest;
mod fs;
mod kernel;
mod limits;
mod pattern;

// Re-exports
pub use digest::compute_digest;
pub use fs::{MemFs, OsFs, TargetFs, TargetReader};
pub use kernel::{kernel_version, ImageFormat};
pub use limits::ProbeLimits;
pub use pattern::{Matcher, ScanWindow, UBOOT_PATTERN};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
