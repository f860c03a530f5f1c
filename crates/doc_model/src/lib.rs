//! Document Model - Read-only collaborators of the presentation layer
//!
//! This crate provides the values and formats the presentation layer
//! consumes: element identifiers, typed values with safe conversions,
//! character/value formats, paragraph and list formats addressed through a
//! format table, and the ordinal text used by list labels.

mod error;
mod format;
mod format_table;
mod node_id;
mod paragraph;
mod value;
pub mod list;

pub use error::*;
pub use format::*;
pub use format_table::*;
pub use list::*;
pub use node_id::*;
pub use paragraph::*;
pub use value::*;
