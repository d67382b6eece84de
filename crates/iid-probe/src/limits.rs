//! Resource bounds for probes

/// Bounds applied while probing a target
///
/// Custom patterns bound their own scan with `seek`/`buffer-size`; these
/// limits cover work the built-in probes do on their own behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeLimits {
    /// Maximum bytes read from a target by a built-in pattern
    pub max_scan_bytes: u64,
    /// Maximum bytes inflated from one compressed kernel payload
    pub max_decompressed_bytes: u64,
}

impl ProbeLimits {
    /// Default read bound (64 MiB)
    pub const DEFAULT_MAX_SCAN_BYTES: u64 = 64 * 1024 * 1024;

    /// Default inflate bound (64 MiB)
    pub const DEFAULT_MAX_DECOMPRESSED_BYTES: u64 = 64 * 1024 * 1024;

    /// Create limits with defaults
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_scan_bytes: Self::DEFAULT_MAX_SCAN_BYTES,
            max_decompressed_bytes: Self::DEFAULT_MAX_DECOMPRESSED_BYTES,
        }
    }

    /// Set read bound
    #[inline]
    #[must_use]
    pub const fn with_max_scan_bytes(mut self, bytes: u64) -> Self {
        self.max_scan_bytes = bytes;
        self
    }

    /// Set inflate bound
    #[inline]
    #[must_use]
    pub const fn with_max_decompressed_bytes(mut self, bytes: u64) -> Self {
        self.max_decompressed_bytes = bytes;
        self
    }
}

impl Default for ProbeLimits {
    fn default() -> Self {
        Self::new()
    }
}
