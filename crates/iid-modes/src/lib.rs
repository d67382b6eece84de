//! IID Modes
//!
//! Resolves an object's install mode and answers one question about it:
//! can this mode name the resource it currently has installed?
//!
//! # Core Concepts
//!
//! - [`ModeRegistry`]: Mode identifier → handler factory
//! - [`ModeHandler`]: Resolved mode for one object
//! - [`TargetGetter`]: Optional capability naming the installed resource
//!
//! # Example
//!
//! ```rust
//! use iid_metadata::UpdateObject;
//! use iid_modes::ModeRegistry;
//!
//! let registry = ModeRegistry::with_defaults();
//! let object = UpdateObject::new("raw").with_target("/dev/mmcblk0p2");
//! let handler = registry.resolve(&object)?;
//! assert!(handler.target_getter().is_some());
//! # Ok::<(), iid_modes::ModeError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builtin;
mod error;
mod handler;
mod registry;

// Re-exports
pub use builtin::{DeviceMode, OpaqueMode, OPAQUE_MODES, TARGET_MODES};
pub use error::ModeError;
pub use handler::{ModeHandler, TargetGetter};
pub use registry::{ModeFactory, ModeRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
