use crate::domain::fields::FieldErrors;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckoutError>;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error("Action unavailable: {0}")]
    Busy(&'static str),
    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Task error: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

impl CheckoutError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }
}
