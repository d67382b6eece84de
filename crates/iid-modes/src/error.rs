//! Error types for mode resolution

/// Errors raised while resolving an object's install mode
#[derive(Debug, thiserror::Error)]
pub enum ModeError {
    /// No handler registered under this identifier
    #[error("unknown install mode: '{0}'")]
    UnknownMode(String),

    /// Mode writes to a target but the object names none
    #[error("mode '{mode}' requires a target")]
    MissingTarget {
        /// Mode identifier
        mode: &'static str,
    },
}
