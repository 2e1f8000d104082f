//! Error taxonomy for world generation.
//!
//! Every error is fatal to the current generation attempt. Generation is
//! deterministic, so a failing seed fails the same way every time; callers
//! discard the attempt instead of retrying it.

use thiserror::Error;

/// Errors raised while generating a world.
#[derive(Debug, Error)]
pub enum WorldGenError {
    /// Reserved: every `u32` is a valid seed, so this is never produced.
    #[error("invalid seed: {0}")]
    InvalidSeed(u32),

    /// A generation parameter is outside its supported range.
    #[error("invalid configuration: `{field}` {reason}")]
    Configuration {
        field: &'static str,
        reason: String,
    },

    /// A pipeline stage observed a state that should be unreachable.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl WorldGenError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorldGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message_names_field() {
        let err = WorldGenError::config("plate_count", "must be at least 1 (got 0)");
        assert_eq!(
            err.to_string(),
            "invalid configuration: `plate_count` must be at least 1 (got 0)"
        );
    }

    #[test]
    fn test_internal_invariant_message() {
        let err = WorldGenError::InternalInvariant("empty elevation field".into());
        assert!(err.to_string().contains("empty elevation field"));
    }
}
