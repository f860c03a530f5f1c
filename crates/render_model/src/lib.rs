//! Render Model - Drawables, scene, and the placement protocol
//!
//! This crate holds what presentations exchange while placing themselves:
//! geometry, drawable groups stored in a scene arena, the negotiation
//! protocol between parents and children, and the progress tracker that
//! lets a long pass be observed and cancelled.

mod context;
mod converter;
mod error;
mod geometry;
mod negotiator;
mod render_item;
mod scene;
mod tracker;

pub use context::*;
pub use converter::*;
pub use error::*;
pub use geometry::*;
pub use negotiator::*;
pub use render_item::*;
pub use scene::*;
pub use tracker::*;
