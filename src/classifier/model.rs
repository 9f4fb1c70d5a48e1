use thiserror::Error;

use crate::features::FeatureValue;

/// Failure raised by a classifier while scoring a row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("row has {actual} values, classifier expects {expected}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("column {index} holds {found}, expected a {expected} value")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("decision score is not a number")]
    NonFinite,

    #[error("classifier returned label {0}, expected 0 or 1")]
    UnexpectedLabel(i64),

    #[error("invalid probabilities: on_time={on_time}, delayed={delayed}")]
    InvalidProbabilities { on_time: f64, delayed: f64 },
}

/// A trained binary classifier over positional rows.
///
/// Implementations have no notion of column names: values arrive in the
/// order recorded alongside the model at load time. Label `0` means on time
/// and `1` means delayed; `score` returns `[p_on_time, p_delayed]`.
pub trait Classifier: Send + Sync {
    /// Short identifier for logs.
    fn kind(&self) -> &str;

    /// Number of values a row must have.
    fn input_width(&self) -> usize;

    fn classify(&self, row: &[FeatureValue]) -> Result<i64, InferenceError>;

    fn score(&self, row: &[FeatureValue]) -> Result<[f64; 2], InferenceError>;
}
