use thiserror::Error;

/// Invariant violations when building workout records or reading split names
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Exercise name must not be empty")]
    EmptyName,

    #[error("Exercise '{exercise}' has no sets")]
    NoSets { exercise: String },

    #[error("Workout has no exercises")]
    NoExercises,

    #[error("Invalid weight: {0} (must be a finite number >= 0)")]
    InvalidWeight(f64),

    #[error("Invalid effort: {0} (RPE must be between 0 and 10)")]
    InvalidEffort(f64),

    #[error("Unknown split category: {0}")]
    UnknownSplit(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
