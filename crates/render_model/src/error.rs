//! Error types for render model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Stale scene item")]
    StaleItem,
}

pub type Result<T> = std::result::Result<T, RenderError>;
