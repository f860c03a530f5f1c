//! Layout Engine - Paragraph placement and the presentation tree
//!
//! This crate places presentations into the areas their parents offer:
//! - Line filling with margins, list indentation and justification
//! - List labels numbered across sibling paragraphs
//! - Text runs and typed values as leaf presentations
//! - A document view stacking paragraph areas onto pages

mod config;
mod document;
mod error;
mod numbering;
mod paragraph;
mod paragraph_base;
mod placement_line;
mod presentation;
mod text;
mod value;

pub use config::*;
pub use document::*;
pub use error::*;
pub use numbering::*;
pub use paragraph::*;
pub use paragraph_base::*;
pub use placement_line::PlacementLineData;
pub use presentation::*;
pub use text::*;
pub use value::*;
