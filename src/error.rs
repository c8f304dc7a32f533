use thiserror::Error;

/// Errors produced by the prediction core.
///
/// Validation failures (`MissingColumn`, `InvalidInput`) map to client
/// errors at the web boundary; `ScalerNotFound` and `ModelNotTrained` mean
/// the service is not ready and a training pass is required first.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumn(Vec<String>),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("scaler parameters not found; train the model first")]
    ScalerNotFound,

    #[error("model has not been trained yet")]
    ModelNotTrained,

    #[error("insufficient data: {rows} row(s), at least {min} required")]
    InsufficientData { rows: usize, min: usize },

    #[error("least-squares system could not be solved")]
    SingularSystem,

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PredictionError>;
