use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmortizationError {
    #[error("invalid loan parameters: {message}")]
    InvalidParameters {
        message: String,
    },

    #[error("export requires at least one column")]
    EmptyColumnOrder,

    #[error("header count mismatch: expected {expected}, provided {provided}")]
    HeaderMismatch {
        expected: usize,
        provided: usize,
    },

    #[error("export failed: {message}")]
    Export {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl From<csv::Error> for AmortizationError {
    fn from(err: csv::Error) -> Self {
        AmortizationError::Export {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AmortizationError {
    fn from(err: serde_json::Error) -> Self {
        AmortizationError::InvalidConfiguration {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AmortizationError>;
