use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrdinalError>;

/// Caller-facing failures of `fit` and `predict`.
///
/// Numerical trouble inside the optimizer loop never shows up here; it is
/// absorbed by the cost function.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrdinalError {
    #[error("dataset has no samples")]
    EmptyDataset,

    #[error("feature matrix has {features} rows but {labels} labels were given")]
    SampleCountMismatch { features: usize, labels: usize },

    #[error("label {label} is outside the ordinal range, labels start at 1")]
    InvalidLabel { label: usize },

    #[error("labels are not contiguous: class {class} of 1..={classes} has no samples")]
    MissingClass { class: usize, classes: usize },

    #[error("at least two distinct classes are required")]
    SingleClass,

    #[error("expected {expected} features per sample, got {got}")]
    FeatureDimensionMismatch { expected: usize, got: usize },

    #[error("feature matrix contains NaN or infinite values")]
    NonFiniteFeatures,

    #[error("invalid hyperparameter `{name}`: {reason}")]
    InvalidHyperparameter { name: &'static str, reason: String },

    #[error("model has not been fitted")]
    NotFitted,
}
