//! Built-in install modes
//!
//! Modes that write straight to a device node (`raw`, `flash`, `test`) can
//! name what is installed. Modes that unpack into a mounted filesystem or
//! drive an external tool cannot, and always reinstall.

use crate::error::ModeError;
use crate::handler::{ModeHandler, TargetGetter};
use iid_metadata::UpdateObject;
use std::path::{Path, PathBuf};

/// Modes exposing their target
pub const TARGET_MODES: &[&str] = &["raw", "flash", "test"];

/// Modes without a comparable target
pub const OPAQUE_MODES: &[&str] = &["copy", "tarball", "ubifs", "imxkobs", "zephyr"];

/// Mode writing to a device node named by the object's `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMode {
    mode: &'static str,
    target: PathBuf,
}

impl DeviceMode {
    /// Build handler from object metadata
    ///
    /// # Errors
    /// Returns [`ModeError::MissingTarget`] if the object has no `target`
    pub fn from_object(mode: &'static str, object: &UpdateObject) -> Result<Self, ModeError> {
        let target = object
            .target()
            .ok_or(ModeError::MissingTarget { mode })?
            .to_path_buf();
        Ok(Self { mode, target })
    }
}

impl TargetGetter for DeviceMode {
    fn target(&self) -> &Path {
        &self.target
    }
}

impl ModeHandler for DeviceMode {
    fn mode(&self) -> &str {
        self.mode
    }

    fn target_getter(&self) -> Option<&dyn TargetGetter> {
        Some(self)
    }
}

/// Mode with no notion of installed content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpaqueMode {
    mode: &'static str,
}

impl OpaqueMode {
    /// Create handler for `mode`
    #[inline]
    #[must_use]
    pub const fn new(mode: &'static str) -> Self {
        Self { mode }
    }
}

impl ModeHandler for OpaqueMode {
    fn mode(&self) -> &str {
        self.mode
    }
}

pub(crate) fn raw(object: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
    Ok(Box::new(DeviceMode::from_object("raw", object)?))
}

pub(crate) fn flash(object: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
    Ok(Box::new(DeviceMode::from_object("flash", object)?))
}

pub(crate) fn test(object: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
    Ok(Box::new(DeviceMode::from_object("test", object)?))
}

pub(crate) fn copy(_: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
    Ok(Box::new(OpaqueMode::new("copy")))
}

pub(crate) fn tarball(_: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
    Ok(Box::new(OpaqueMode::new("tarball")))
}

pub(crate) fn ubifs(_: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
    Ok(Box::new(OpaqueMode::new("ubifs")))
}

pub(crate) fn imxkobs(_: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
    Ok(Box::new(OpaqueMode::new("imxkobs")))
}

pub(crate) fn zephyr(_: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
    Ok(Box::new(OpaqueMode::new("zephyr")))
}
