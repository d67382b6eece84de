//! Engine configuration

use iid_probe::ProbeLimits;

/// Decision engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bounds for built-in probes
    pub probe_limits: ProbeLimits,
    /// Evaluate batches on the rayon pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            probe_limits: ProbeLimits::default(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With probe limits
    #[inline]
    #[must_use]
    pub fn with_probe_limits(mut self, limits: ProbeLimits) -> Self {
        self.probe_limits = limits;
        self
    }

    /// With parallel batch evaluation on or off
    #[inline]
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
