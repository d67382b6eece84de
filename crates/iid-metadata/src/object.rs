//! Update object model
//!
//! An [`UpdateObject`] describes one artifact of an update package: which
//! install mode applies it, where it goes, and whether installation may be
//! skipped when the target already holds the same content.

use crate::directive::{Directive, SHA256SUM_KEYWORD};
use crate::error::MetadataError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One artifact to apply to the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateObject {
    /// Install mode identifier (`raw`, `copy`, `flash`, ...)
    pub mode: String,

    /// Artifact file name inside the package
    #[serde(default)]
    pub filename: String,

    /// Digest of the artifact payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256sum: Option<String>,

    /// Device node or file the mode writes to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    /// Kind of target (`device`, `mtdname`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,

    /// Payload size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Skip installation when the target already matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_if_different: Option<Directive>,
}

impl UpdateObject {
    /// Create object for the given mode
    #[inline]
    #[must_use]
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            filename: String::new(),
            sha256sum: None,
            target: None,
            target_type: None,
            size: None,
            install_if_different: None,
        }
    }

    /// Decode a single object from JSON
    ///
    /// # Errors
    /// Returns error if the document is not a valid object description
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set file name
    #[inline]
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set payload digest
    #[inline]
    #[must_use]
    pub fn with_sha256sum(mut self, sha256sum: impl Into<String>) -> Self {
        self.sha256sum = Some(sha256sum.into());
        self
    }

    /// Set target path
    #[inline]
    #[must_use]
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set install-if-different directive
    #[inline]
    #[must_use]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.install_if_different = Some(directive);
        self
    }

    /// Name used to identify the object in diagnostics
    #[must_use]
    pub fn label(&self) -> &str {
        if self.filename.is_empty() {
            &self.mode
        } else {
            &self.filename
        }
    }

    /// Target path, if the object declares one
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Resolve the digest a digest directive refers to
    ///
    /// The `sha256sum` keyword stands for the object's own payload digest.
    #[must_use]
    pub fn expected_digest<'a>(&'a self, declared: &'a str) -> &'a str {
        match (declared, self.sha256sum.as_deref()) {
            (SHA256SUM_KEYWORD, Some(own)) => own,
            _ => declared,
        }
    }
}
