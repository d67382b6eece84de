//! Install mode handler traits
//!
//! A [`ModeHandler`] is the resolved form of an object's `mode`. Only some
//! modes can say what is currently installed; those expose a
//! [`TargetGetter`] through [`ModeHandler::target_getter`]. Callers query the
//! capability instead of downcasting.

use std::fmt::Debug;
use std::path::Path;

/// Capability: name the resource currently installed by a mode
pub trait TargetGetter: Send + Sync {
    /// Path of the installed resource (device node or file)
    fn target(&self) -> &Path;
}

/// Resolved install mode for one object
pub trait ModeHandler: Send + Sync + Debug {
    /// Mode identifier as written in metadata
    fn mode(&self) -> &str;

    /// Target capability, when the mode has one
    ///
    /// Default implementation reports no capability.
    fn target_getter(&self) -> Option<&dyn TargetGetter> {
        None
    }
}
