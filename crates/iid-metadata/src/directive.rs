//! Install-if-different directive model
//!
//! The `install-if-different` key of an update object carries one of two
//! shapes on the wire:
//!
//! ```text
//! "install-if-different": "<sha256 hex>"                      → Directive::Digest
//! "install-if-different": { "version": "2.0.0",
//!                            "pattern": "linux-kernel" }      → Directive::Pattern
//! "install-if-different": { "version": "2.0.0",
//!                            "pattern": { "regexp": "...",
//!                                         "seek": 1024,
//!                                         "buffer-size": 512 } }
//! ```
//!
//! The shape is decided once, here, while the metadata is decoded. Values
//! that match neither shape are kept as [`Directive::Unrecognized`] so the
//! rest of the document still decodes and only that object fails later.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Digest directive keyword referring to the object's own `sha256sum`
pub const SHA256SUM_KEYWORD: &str = "sha256sum";

/// Decoded install-if-different directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Compare the whole-target SHA-256 digest with this hex string
    Digest(String),

    /// Extract a version from the target and compare it
    Pattern(PatternCheck),

    /// Present, but neither a string nor a well-formed pattern object
    Unrecognized(Value),
}

impl Directive {
    /// Create a digest directive
    #[inline]
    #[must_use]
    pub fn digest(expected: impl Into<String>) -> Self {
        Self::Digest(expected.into())
    }

    /// Create a pattern directive
    #[inline]
    #[must_use]
    pub fn pattern(version: impl Into<String>, pattern: PatternSpec) -> Self {
        Self::Pattern(PatternCheck {
            version: version.into(),
            pattern,
        })
    }

    /// Classify a raw JSON value
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(expected) => Self::Digest(expected),
            Value::Object(_) => match PatternCheck::deserialize(&value) {
                Ok(check) => Self::Pattern(check),
                Err(_) => Self::Unrecognized(value),
            },
            other => Self::Unrecognized(other),
        }
    }

    /// Short name of the directive shape, for diagnostics
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Digest(_) => "digest",
            Self::Pattern(_) => "pattern",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}

impl<'de> Deserialize<'de> for Directive {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Serialize for Directive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Digest(expected) => serializer.serialize_str(expected),
            Self::Pattern(check) => check.serialize(serializer),
            Self::Unrecognized(value) => value.serialize(serializer),
        }
    }
}

/// Version comparison request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCheck {
    /// Version the object installs
    pub version: String,
    /// How to locate the installed version inside the target
    pub pattern: PatternSpec,
}

/// Where and how to look for a version token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    /// Built-in pattern selected by name
    Known(KnownPattern),
    /// User supplied regular expression with scan bounds
    Custom(CustomPattern),
}

impl PatternSpec {
    /// Create a custom pattern scanning the whole target
    #[must_use]
    pub fn regexp(regexp: impl Into<String>) -> Self {
        Self::Custom(CustomPattern::new(regexp))
    }
}

/// Built-in patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnownPattern {
    /// Linux kernel image (uImage, bzImage, zImage or raw Image)
    LinuxKernel,
    /// U-Boot or U-Boot SPL binary
    UBoot,
}

/// Custom regular expression pattern
///
/// `regexp` must contain exactly one capture group; the captured text is the
/// installed version. The scan covers `buffer_size` bytes starting at
/// `seek`, or everything after `seek` when `buffer_size` is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CustomPattern {
    /// Match rule
    pub regexp: String,
    /// Byte offset where the scan starts
    #[serde(default)]
    pub seek: u64,
    /// Number of bytes to scan, zero for "until the end"
    #[serde(default)]
    pub buffer_size: u64,
}

impl CustomPattern {
    /// Create pattern with no scan bounds
    #[inline]
    #[must_use]
    pub fn new(regexp: impl Into<String>) -> Self {
        Self {
            regexp: regexp.into(),
            seek: 0,
            buffer_size: 0,
        }
    }

    /// Start scanning at `seek`
    #[inline]
    #[must_use]
    pub fn with_seek(mut self, seek: u64) -> Self {
        self.seek = seek;
        self
    }

    /// Scan at most `buffer_size` bytes
    #[inline]
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: u64) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}
