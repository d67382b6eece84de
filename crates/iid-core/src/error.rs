//! Error types for the decision engine
//!
//! Every error names the object and the mode it was raised for. Benign
//! outcomes (no target support, unusable pattern, no version found) are
//! decisions, not errors.

use iid_modes::ModeError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Terminal failure evaluating one object
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// Mode identifier not registered
    #[error("object '{object}': unknown install mode '{mode}'")]
    UnknownMode {
        /// Label of the object being evaluated
        object: String,
        /// Install mode of the object
        mode: String,
    },

    /// Mode writes to a target but the object names none
    #[error("object '{object}': mode '{mode}' requires a target")]
    MissingTarget {
        /// Label of the object being evaluated
        object: String,
        /// Install mode of the object
        mode: String,
    },

    /// Directive is neither a digest string nor a pattern object
    #[error("object '{object}' ({mode}): unknown install-if-different format")]
    UnrecognizedDirectiveFormat {
        /// Label of the object being evaluated
        object: String,
        /// Install mode of the object
        mode: String,
    },

    /// Target could not be read
    #[error(
        "object '{}' ({}): failed to {} '{}'",
        .object,
        .mode,
        .operation,
        .target.display()
    )]
    TargetUnreadable {
        /// Label of the object being evaluated
        object: String,
        /// Install mode of the object
        mode: String,
        /// Path that failed
        target: PathBuf,
        /// What was being done with it
        operation: Operation,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl DecisionError {
    pub(crate) fn from_mode(object: &str, err: ModeError) -> Self {
        match err {
            ModeError::UnknownMode(mode) => Self::UnknownMode {
                object: object.to_string(),
                mode,
            },
            ModeError::MissingTarget { mode } => Self::MissingTarget {
                object: object.to_string(),
                mode: mode.to_string(),
            },
        }
    }

    /// Field-less classification, for matching
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownMode { .. } => ErrorKind::UnknownMode,
            Self::MissingTarget { .. } => ErrorKind::MissingTarget,
            Self::UnrecognizedDirectiveFormat { .. } => ErrorKind::UnrecognizedDirectiveFormat,
            Self::TargetUnreadable { .. } => ErrorKind::TargetUnreadable,
        }
    }

    /// Object the error was raised for
    #[must_use]
    pub fn object(&self) -> &str {
        match self {
            Self::UnknownMode { object, .. }
            | Self::MissingTarget { object, .. }
            | Self::UnrecognizedDirectiveFormat { object, .. }
            | Self::TargetUnreadable { object, .. } => object,
        }
    }

    /// Mode of the object the error was raised for
    #[must_use]
    pub fn mode(&self) -> &str {
        match self {
            Self::UnknownMode { mode, .. }
            | Self::MissingTarget { mode, .. }
            | Self::UnrecognizedDirectiveFormat { mode, .. }
            | Self::TargetUnreadable { mode, .. } => mode,
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`DecisionError::UnknownMode`]
    UnknownMode,
    /// See [`DecisionError::MissingTarget`]
    MissingTarget,
    /// See [`DecisionError::UnrecognizedDirectiveFormat`]
    UnrecognizedDirectiveFormat,
    /// See [`DecisionError::TargetUnreadable`]
    TargetUnreadable,
}

impl ErrorKind {
    /// Stable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownMode => "unknown-mode",
            Self::MissingTarget => "missing-target",
            Self::UnrecognizedDirectiveFormat => "unrecognized-directive-format",
            Self::TargetUnreadable => "target-unreadable",
        }
    }
}

/// Probe that failed to read a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Whole-target digest
    Digest,
    /// Version pattern scan
    PatternScan,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Digest => "compute digest of",
            Self::PatternScan => "scan",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn decision_error_display() {
        let err = DecisionError::UnknownMode {
            object: "rootfs.img".to_string(),
            mode: "squashfs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "object 'rootfs.img': unknown install mode 'squashfs'"
        );

        let err = DecisionError::UnrecognizedDirectiveFormat {
            object: "u-boot.bin".to_string(),
            mode: "flash".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "object 'u-boot.bin' (flash): unknown install-if-different format"
        );
    }

    #[test]
    fn unreadable_keeps_source() {
        let err = DecisionError::TargetUnreadable {
            object: "rootfs.img".to_string(),
            mode: "raw".to_string(),
            target: PathBuf::from("/dev/sda1"),
            operation: Operation::Digest,
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            err.to_string(),
            "object 'rootfs.img' (raw): failed to compute digest of '/dev/sda1'"
        );
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("gone"));
        assert_eq!(err.kind(), ErrorKind::TargetUnreadable);
        assert_eq!(err.kind().code(), "target-unreadable");
        assert_eq!(err.object(), "rootfs.img");
        assert_eq!(err.mode(), "raw");
    }

    #[test]
    fn mode_errors_gain_object() {
        let err = DecisionError::from_mode("a.img", ModeError::MissingTarget { mode: "raw" });
        assert_eq!(err.kind(), ErrorKind::MissingTarget);
        assert_eq!(err.to_string(), "object 'a.img': mode 'raw' requires a target");

        let err = DecisionError::from_mode("a.img", ModeError::UnknownMode("nope".to_string()));
        assert_eq!(err.kind(), ErrorKind::UnknownMode);
        assert_eq!(err.mode(), "nope");
    }
}
