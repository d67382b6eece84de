//! Decision outcomes
//!
//! A [`Decision`] keeps the reason it was reached. Callers that only need
//! the install signal use [`Decision::proceed`]; the reason tells a
//! confirmed match apart from a check that could not say anything.

use serde::Serialize;
use std::fmt;

/// Outcome of evaluating one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "reason", rename_all = "kebab-case")]
pub enum Decision {
    /// Write the object to its target
    Install(InstallReason),
    /// Leave the target as it is
    Skip(SkipReason),
}

/// Why an object must be installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum InstallReason {
    /// Mode cannot name what is installed
    NoTargetSupport,
    /// Object carries no install-if-different directive
    NotRequested,
    /// Target digest differs from the declared one
    DigestMismatch {
        /// Digest of the installed target, lowercase hex
        found: String,
    },
    /// Target version differs from the declared one
    VersionMismatch {
        /// Version captured from the installed target
        found: String,
    },
}

/// Why an object may be skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum SkipReason {
    /// Target digest equals the declared one
    DigestMatch,
    /// Target version equals the declared one
    VersionMatch,
    /// Pattern unusable; nothing to compare
    InvalidPattern,
    /// Pattern found no version in the target
    VersionNotFound,
}

impl Decision {
    /// Whether installation must happen
    #[inline]
    #[must_use]
    pub const fn proceed(&self) -> bool {
        matches!(self, Self::Install(_))
    }

    /// Skip reached without comparing anything
    #[inline]
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            Self::Skip(SkipReason::InvalidPattern | SkipReason::VersionNotFound)
        )
    }

    /// `install` or `skip`
    #[inline]
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Skip(_) => "skip",
        }
    }

    /// Stable reason code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Install(reason) => reason.code(),
            Self::Skip(reason) => reason.code(),
        }
    }
}

impl InstallReason {
    /// Stable reason code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoTargetSupport => "no-target-support",
            Self::NotRequested => "not-requested",
            Self::DigestMismatch { .. } => "digest-mismatch",
            Self::VersionMismatch { .. } => "version-mismatch",
        }
    }
}

impl SkipReason {
    /// Stable reason code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DigestMatch => "digest-match",
            Self::VersionMatch => "version-match",
            Self::InvalidPattern => "invalid-pattern",
            Self::VersionNotFound => "version-not-found",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install(reason) => write!(f, "install: {reason}"),
            Self::Skip(reason) => write!(f, "skip: {reason}"),
        }
    }
}

impl fmt::Display for InstallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTargetSupport => f.write_str("mode does not support install-if-different"),
            Self::NotRequested => f.write_str("no install-if-different directive"),
            Self::DigestMismatch { found } => write!(f, "target digest is {found}"),
            Self::VersionMismatch { found } => write!(f, "installed version is {found}"),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DigestMatch => "target digest matches",
            Self::VersionMatch => "installed version matches",
            Self::InvalidPattern => "pattern is unusable",
            Self::VersionNotFound => "no version found in target",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn proceed_only_for_install() {
        assert!(Decision::Install(InstallReason::NotRequested).proceed());
        assert!(!Decision::Skip(SkipReason::DigestMatch).proceed());
        assert!(!Decision::Skip(SkipReason::VersionNotFound).proceed());
    }

    #[test]
    fn indeterminate_skips() {
        assert!(Decision::Skip(SkipReason::InvalidPattern).is_indeterminate());
        assert!(Decision::Skip(SkipReason::VersionNotFound).is_indeterminate());
        assert!(!Decision::Skip(SkipReason::VersionMatch).is_indeterminate());
        assert!(!Decision::Install(InstallReason::NoTargetSupport).is_indeterminate());
    }

    #[test]
    fn decision_display() {
        let decision = Decision::Install(InstallReason::VersionMismatch {
            found: "1.9.0".to_string(),
        });
        assert_eq!(decision.to_string(), "install: installed version is 1.9.0");
        assert_eq!(decision.action(), "install");
        assert_eq!(decision.code(), "version-mismatch");

        let decision = Decision::Skip(SkipReason::DigestMatch);
        assert_eq!(decision.to_string(), "skip: target digest matches");
    }

    #[test]
    fn decision_serialize() {
        let decision = Decision::Install(InstallReason::DigestMismatch {
            found: "abc".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            json!({"action": "install", "reason": {"code": "digest-mismatch", "found": "abc"}})
        );

        let decision = Decision::Skip(SkipReason::InvalidPattern);
        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            json!({"action": "skip", "reason": {"code": "invalid-pattern"}})
        );
    }
}
