//! Error types for document model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Invalid matrix dimensions: {rows}x{columns} with {len} coefficients")]
    InvalidDimensions { rows: usize, columns: usize, len: usize },

    #[error("Format not found: {0}")]
    FormatNotFound(u32),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
