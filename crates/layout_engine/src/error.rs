//! Error types for layout engine

use doc_model::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Unknown presentation: {0}")]
    UnknownPresentation(NodeId),

    #[error("Failed to read layout settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid layout settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Value presentation error: {0}")]
    Math(#[from] math::MathError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
