//! Error types for text engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("Invalid font data: {0}")]
    InvalidFontData(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
