//! Error type shared by the math, scheduling and descriptor layers.

use thiserror::Error;

use crate::ids::ItemId;

/// Errors produced by the motion core.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    /// The 3x3 rotation/scale block has no inverse.
    #[error("matrix is singular (determinant {det})")]
    SingularMatrix { det: f64 },

    /// An operation was called in a state where it has no defined result.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A direct edit would leave the transform state non-finite.
    #[error("non-finite value for {field}")]
    NonFinite { field: &'static str },

    #[error("matrix parse error: {0}")]
    Parse(String),

    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("descriptor json: {0}")]
    Json(String),

    #[error("unknown item {0:?}")]
    UnknownItem(ItemId),
}

impl MotionError {
    /// Short category label for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::SingularMatrix { .. } | Self::Parse(_) => "math",
            Self::InvalidState(_) | Self::UnknownItem(_) => "schedule",
            Self::NonFinite { .. } => "state",
            Self::InvalidDescriptor(_) | Self::Json(_) => "descriptor",
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MotionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(MotionError::SingularMatrix { det: 0.0 }.category(), "math");
        assert_eq!(
            MotionError::InvalidState("empty".into()).category(),
            "schedule"
        );
        assert_eq!(
            MotionError::NonFinite { field: "opacity" }.to_string(),
            "non-finite value for opacity"
        );
    }

    #[test]
    fn json_errors_convert() {
        let err: MotionError = serde_json::from_str::<Vec<f64>>("[1,")
            .unwrap_err()
            .into();
        assert!(matches!(err, MotionError::Json(_)));
    }
}
