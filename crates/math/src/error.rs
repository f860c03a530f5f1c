//! Error types for the math crate

use render_model::RenderError;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while generating presentations
#[derive(Error, Debug)]
pub enum MathError {
    /// A drawable handed in for update no longer exists
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for math operations
pub type MathResult<T> = Result<T, MathError>;

/// Literal text rendered in place of a value that cannot be presented.
///
/// These are not errors of the layout pass; the failure is contained to the
/// value and made visible to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMarker {
    /// The value could not be converted to the type its renderer expects
    ConversionFailed,
    /// The value's type is not known to this layer
    UnknownType(u16),
    /// No generator is registered for the value's kind
    MissingGenerator(usize),
}

impl fmt::Display for ErrorMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversionFailed => write!(f, "* ERROR *"),
            Self::UnknownType(id) => write!(f, "*** UNKNOWN TYPE {id} ***"),
            Self::MissingGenerator(kind) => write!(f, "*** MISSING GENERATOR {kind} ***"),
        }
    }
}
