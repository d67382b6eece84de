//! Error types for metadata decoding

/// Errors raised while decoding update metadata
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Document is not valid JSON or does not match the schema
    #[error("invalid update metadata: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested installation set does not exist
    #[error("installation set {set} not present (package has {available})")]
    MissingInstallationSet { set: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_error_display() {
        let err = MetadataError::MissingInstallationSet {
            set: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "installation set 2 not present (package has 1)"
        );
    }
}
