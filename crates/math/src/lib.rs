//! Math Crate - Presentation generators for typed values
//!
//! This crate turns values into drawables:
//! - Numeric display policy (fixed, scientific, engineering, concise)
//! - Scalar renderers for booleans, integers, reals, complex values and text
//! - Matrix layout with row and column elision
//! - Wrapped rendering of sets and tuples, including tuples shown as strings
//! - A registry dispatching each value kind to its generator

mod composite;
mod error;
mod fields;
mod generator;
mod matrix;
mod matrix_contexts;
mod numeric;
mod registry;
mod scalar;

pub use composite::*;
pub use error::*;
pub use fields::*;
pub use generator::*;
pub use matrix::*;
pub use matrix_contexts::*;
pub use numeric::*;
pub use registry::*;
pub use scalar::*;
