use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadiusError {
    #[error("Failed to open input '{path}': {message}")]
    OpenInput { path: PathBuf, message: String },

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Column '{name}' has unsupported type '{type_name}'")]
    UnsupportedColumn { name: String, type_name: String },

    #[error("Failed to read column '{name}': {message}")]
    ReadColumn { name: String, message: String },

    #[error("Column length mismatch: '{name}' has {got} entries, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid binning: {0}")]
    InvalidBinning(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("PDF conversion error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RadiusResult<T> = Result<T, RadiusError>;
