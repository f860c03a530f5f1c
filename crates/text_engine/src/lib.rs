//! Text Engine - Fonts and font metrics
//!
//! This crate describes the fonts text is drawn with and the metrics
//! collaborator layout measures text through.
//!
//! # Modules
//!
//! - `font`: Font descriptors
//! - `metrics`: The `FontMetrics` trait and a deterministic estimator
//! - `shaper`: Metrics read from a font face with rustybuzz

mod error;
mod font;
mod metrics;
mod shaper;

pub use error::*;
pub use font::*;
pub use metrics::*;
pub use shaper::*;
