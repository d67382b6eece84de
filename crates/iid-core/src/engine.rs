//! Install-if-different decision engine
//!
//! Evaluation runs as a fixed sequence per object:
//!
//! ```text
//! resolve mode ──unknown──→ Err(UnknownMode)
//!      │
//! target getter? ──no──→ Install(NoTargetSupport)
//!      │
//! directive ──absent──────→ Install(NotRequested)
//!      ├──digest──────→ compute digest ──→ DigestMatch | DigestMismatch
//!      ├──pattern─────→ Matcher::new ──None──→ Skip(InvalidPattern)
//!      │                     └──capture──→ VersionNotFound | VersionMatch | VersionMismatch
//!      └──unrecognized──→ Err(UnrecognizedDirectiveFormat)
//! ```
//!
//! Reading the target is the only side effect. Nothing is cached between
//! calls.

use crate::config::EngineConfig;
use crate::decision::{Decision, InstallReason, SkipReason};
use crate::error::{DecisionError, Operation};
use iid_metadata::{Directive, PatternCheck, UpdateObject};
use iid_modes::ModeRegistry;
use iid_probe::{compute_digest, Matcher, TargetFs};
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Decides whether objects must be installed
///
/// Holds no mutable state, so one engine can serve concurrent callers.
#[derive(Clone)]
pub struct Engine {
    registry: ModeRegistry,
    fs: Arc<dyn TargetFs>,
    config: EngineConfig,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create engine reading targets through `fs`
    #[inline]
    #[must_use]
    pub fn new(registry: ModeRegistry, fs: Arc<dyn TargetFs>) -> Self {
        Self {
            registry,
            fs,
            config: EngineConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get mode registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    /// Evaluate one object
    ///
    /// # Errors
    /// - [`DecisionError::UnknownMode`] / [`DecisionError::MissingTarget`] if the mode cannot be resolved
    /// - [`DecisionError::UnrecognizedDirectiveFormat`] if the directive has neither known shape
    /// - [`DecisionError::TargetUnreadable`] if the target cannot be read
    pub fn evaluate(&self, object: &UpdateObject) -> Result<Decision, DecisionError> {
        let label = object.label();
        tracing::info!("Checking install-if-different support for '{}'", label);

        let result = self.decide(object);
        match &result {
            Ok(decision) => tracing::debug!("'{}': {}", label, decision),
            Err(e) => tracing::error!("{}", e),
        }
        result
    }

    /// Evaluate one object, reduced to the install signal
    ///
    /// # Errors
    /// Same as [`Engine::evaluate`]; an error always means "do not proceed"
    #[inline]
    pub fn proceed(&self, object: &UpdateObject) -> Result<bool, DecisionError> {
        self.evaluate(object).map(|decision| decision.proceed())
    }

    /// Evaluate independent objects
    ///
    /// Results are in input order. Objects run on the rayon pool unless
    /// parallel evaluation is disabled.
    #[must_use]
    pub fn evaluate_all(&self, objects: &[UpdateObject]) -> Vec<Result<Decision, DecisionError>> {
        tracing::info!("Evaluating {} objects", objects.len());
        if self.config.parallel {
            objects.par_iter().map(|object| self.evaluate(object)).collect()
        } else {
            objects.iter().map(|object| self.evaluate(object)).collect()
        }
    }

    fn decide(&self, object: &UpdateObject) -> Result<Decision, DecisionError> {
        let label = object.label();
        let handler = self
            .registry
            .resolve(object)
            .map_err(|e| DecisionError::from_mode(label, e))?;

        let Some(getter) = handler.target_getter() else {
            tracing::info!(
                "'{}' mode doesn't support install-if-different",
                handler.mode()
            );
            return Ok(Decision::Install(InstallReason::NoTargetSupport));
        };
        tracing::info!("'{}' mode supports install-if-different", handler.mode());

        let target = getter.target();
        tracing::debug!("Comparing '{}' against {}", label, target.display());

        match &object.install_if_different {
            None => {
                tracing::info!("No install-if-different directive. Installing");
                Ok(Decision::Install(InstallReason::NotRequested))
            }
            Some(Directive::Digest(declared)) => {
                self.check_digest(object, target, object.expected_digest(declared))
            }
            Some(Directive::Pattern(check)) => self.check_pattern(object, target, check),
            Some(Directive::Unrecognized(_)) => Err(DecisionError::UnrecognizedDirectiveFormat {
                object: label.to_string(),
                mode: object.mode.clone(),
            }),
        }
    }

    fn check_digest(
        &self,
        object: &UpdateObject,
        target: &Path,
        expected: &str,
    ) -> Result<Decision, DecisionError> {
        tracing::info!("Checking sha256sum");
        let found = compute_digest(&*self.fs, target)
            .map_err(|source| unreadable(object, target, Operation::Digest, source))?;

        tracing::debug!("Target digest {} ({})", found.short(), target.display());

        if found.matches_hex(expected) {
            tracing::info!("Sha256sums match. No need to install");
            Ok(Decision::Skip(SkipReason::DigestMatch))
        } else {
            tracing::info!("Sha256sums don't match. Installing");
            Ok(Decision::Install(InstallReason::DigestMismatch {
                found: found.to_string(),
            }))
        }
    }

    fn check_pattern(
        &self,
        object: &UpdateObject,
        target: &Path,
        check: &PatternCheck,
    ) -> Result<Decision, DecisionError> {
        tracing::info!("Checking pattern");
        let Some(matcher) = Matcher::new(&check.pattern) else {
            tracing::warn!("Unusable pattern for '{}'. Not installing", object.label());
            return Ok(Decision::Skip(SkipReason::InvalidPattern));
        };

        let captured = matcher
            .with_limits(self.config.probe_limits)
            .capture(&*self.fs, target)
            .map_err(|source| unreadable(object, target, Operation::PatternScan, source))?;
        tracing::debug!("Captured version '{}' from {}", captured, target.display());

        if captured.is_empty() {
            tracing::warn!(
                "No version found in {}. Not installing",
                target.display()
            );
            Ok(Decision::Skip(SkipReason::VersionNotFound))
        } else if captured == check.version {
            tracing::info!("Version match. No need to install");
            Ok(Decision::Skip(SkipReason::VersionMatch))
        } else {
            tracing::info!("Version mismatch. Installing");
            Ok(Decision::Install(InstallReason::VersionMismatch { found: captured }))
        }
    }
}

fn unreadable(
    object: &UpdateObject,
    target: &Path,
    operation: Operation,
    source: std::io::Error,
) -> DecisionError {
    DecisionError::TargetUnreadable {
        object: object.label().to_string(),
        mode: object.mode.clone(),
        target: target.to_path_buf(),
        operation,
        source,
    }
}
