//! Edit Engine - Batch updates of list formatting
//!
//! This crate applies declarative list formatting changes to ranges of
//! block formats and records each change so a host can undo it.

mod error;
mod list_format_updater;

pub use error::*;
pub use list_format_updater::*;
