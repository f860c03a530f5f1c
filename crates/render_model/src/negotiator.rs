//! Parent/child space negotiation
//!
//! A child asks its parent how much room it may use, then commits the size
//! it actually chose. When an offer on a partially filled line is too small
//! the child says so, and the parent moves on to a fresh line or area before
//! the child asks again.

use crate::{PlacementContext, Size};
use doc_model::NodeId;
use serde::{Deserialize, Serialize};

/// How an offered space relates to what the parent could ever offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceQualifier {
    /// A fresh, empty area: nothing larger will ever be offered
    MaximumWidthAndHeight,
    /// An empty line: nothing wider will ever be offered
    MaximumWidth,
    /// The remainder of a partially filled line
    CurrentlyAvailable,
}

impl SpaceQualifier {
    /// Whether asking again after `area_insufficient` could yield more width
    pub fn can_grow(self) -> bool {
        self == Self::CurrentlyAvailable
    }
}

/// Space offered by a parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaOffer {
    pub size: Size,
    pub qualifier: SpaceQualifier,
}

impl AreaOffer {
    pub fn new(size: Size, qualifier: SpaceQualifier) -> Self {
        Self { size, qualifier }
    }
}

/// Whether a presentation can cheaply re-break its content.
///
/// Ordered from least to most demanding; aggregates take the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ReflowHint {
    #[default]
    NotSupported,
    SupportsReflow,
    AlwaysReflow,
}

/// Parent side of the placement protocol
pub trait PlacementNegotiator {
    /// Space available to `child` on the current line
    fn request_area(&mut self, ctx: &mut PlacementContext<'_>, child: NodeId) -> AreaOffer;

    /// Commit area `area_id` of `child` to the current line
    fn allocate_area(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        child: NodeId,
        area_id: usize,
        size: Size,
        ascent: f32,
        can_stretch: bool,
    );

    /// The last offer could not hold an item of `size`
    fn area_insufficient(&mut self, ctx: &mut PlacementContext<'_>, child: NodeId, size: Size);

    /// `child` needs a new placement pass; propagate to whoever can run one
    fn request_repositioning(&mut self, ctx: &mut PlacementContext<'_>, child: NodeId);
}
