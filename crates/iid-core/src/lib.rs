//! IID Core
//!
//! Decides, per update object, whether installation must actually happen.
//!
//! # Core Concepts
//!
//! - [`Engine`]: Resolves the object's mode and runs the requested comparison
//! - [`Decision`]: Install or skip, with the reason it was reached
//! - [`DecisionError`]: Terminal failure for one object; never a decision
//! - [`EngineConfig`]: Probe limits and batch parallelism
//!
//! # Example
//!
//! ```rust
//! use iid_core::{Decision, Engine, SkipReason};
//! use iid_metadata::{Directive, PatternSpec, UpdateObject};
//! use iid_modes::ModeRegistry;
//! use iid_probe::MemFs;
//! use std::sync::Arc;
//!
//! let fs = MemFs::new().with_file("/dev/mmcblk0p2", b"version=2.0.0\n".to_vec());
//! let engine = Engine::new(ModeRegistry::with_defaults(), Arc::new(fs));
//!
//! let object = UpdateObject::new("raw")
//!     .with_target("/dev/mmcblk0p2")
//!     .with_directive(Directive::pattern("2.0.0", PatternSpec::regexp("version=([0-9.]+)")));
//!
//! assert_eq!(engine.evaluate(&object)?, Decision::Skip(SkipReason::VersionMatch));
//! assert!(!engine.proceed(&object)?);
//! # Ok::<(), iid_core::DecisionError>(())
//! ```

#![warn(unreachable_pub)]

// Core modules
mod config;
mod decision;
mod engine;
mod error;

// Re-exports
pub use config::EngineConfig;
pub use decision::{Decision, InstallReason, SkipReason};
pub use engine::Engine;
pub use error::{DecisionError, ErrorKind, Operation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use iid_metadata::{Directive, UpdatePackage};
    use iid_modes::ModeRegistry;
    use iid_probe::MemFs;
    use std::sync::Arc;

    #[test]
    fn decoded_metadata_flows_through_engine() {
        let package = UpdatePackage::parse(
            br#"{
                "version": "1.0",
                "objects": [[
                    {"mode": "raw", "filename": "a", "target": "/dev/a", "install-if-different": "x"},
                    {"mode": "raw", "filename": "b", "target": "/dev/b", "install-if-different": true}
                ]]
            }"#,
        )
        .unwrap();
        let objects = package.objects(0).unwrap();
        assert!(matches!(
            objects[1].install_if_different,
            Some(Directive::Unrecognized(_))
        ));

        let fs = MemFs::new()
            .with_file("/dev/a", b"a".to_vec())
            .with_file("/dev/b", b"b".to_vec());
        let engine = Engine::new(ModeRegistry::with_defaults(), Arc::new(fs));
        let results = engine.evaluate_all(objects);

        assert!(results[0].as_ref().unwrap().proceed());
        assert_eq!(
            results[1].as_ref().unwrap_err().kind(),
            ErrorKind::UnrecognizedDirectiveFormat
        );
    }
}
