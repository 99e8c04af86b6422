//! Error types.
//!
//! The error surface is deliberately tiny: the engine performs no I/O
//! and has no external failure modes, so the only reportable condition
//! is a configuration the animation cannot run with, surfaced
//! synchronously at construction time.

use thiserror::Error;

/// Errors surfaced by typewriter construction and reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypewriterError {
    /// The supplied configuration cannot produce an animation
    /// (currently: an empty phrase sequence).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_message() {
        let err = TypewriterError::InvalidConfiguration("phrase sequence is empty".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: phrase sequence is empty"
        );
    }
}
