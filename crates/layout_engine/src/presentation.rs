//! The child side of the placement protocol
//!
//! Every node of the presentation tree implements [`Presentation`]. A parent
//! asks a child to place itself with [`Presentation::recalculate_placement`],
//! handing itself in as the [`PlacementNegotiator`] the child requests space
//! from. Children register the drawable of each area they allocate in the
//! scene under `(id, area id)`, which is how the parent positions them.

use doc_model::NodeId;
use render_model::{ItemId, PlacementContext, PlacementNegotiator, Point, ReflowHint, Scene};

/// `minimum_top_spacing` value that suppresses top spacing entirely
pub const SUPPRESS_TOP_SPACING: f32 = -1.0;

/// Parameters of one placement request from a parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// The next presentation under the same parent, if any
    pub next_sibling: Option<NodeId>,
    /// Keep whitespace that would otherwise be dropped at a line start
    pub honor_leading_whitespace: bool,
    /// Spacing already owed above this presentation; negative suppresses
    /// top spacing
    pub minimum_top_spacing: f32,
    /// Multiple of the natural line height
    pub line_spacing: f32,
    /// Scale applied to every font size
    pub relative_scale: f32,
}

impl Default for PlacementRequest {
    fn default() -> Self {
        Self {
            next_sibling: None,
            honor_leading_whitespace: false,
            minimum_top_spacing: 0.0,
            line_spacing: 1.0,
            relative_scale: 1.0,
        }
    }
}

/// Result of a hit test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestArea {
    pub presentation: NodeId,
    pub area_id: usize,
    /// Distance from the query point, zero when inside the area
    pub distance: f32,
}

impl ClosestArea {
    /// The nearer of two optional hits
    pub fn nearest(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// A node of the presentation tree
pub trait Presentation {
    fn id(&self) -> NodeId;

    /// Place this presentation from scratch, requesting space from `parent`
    fn recalculate_placement(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        parent: &mut dyn PlacementNegotiator,
        request: &PlacementRequest,
    );

    /// Widen area `area_id` by `factor` of its natural width. Called by the
    /// parent after it justified a line holding the area.
    fn apply_stretch(&mut self, ctx: &mut PlacementContext<'_>, area_id: usize, factor: f32) {
        let Some(item) = ctx.scene.area_item(self.id(), area_id) else {
            return;
        };
        if let Some(group) = ctx.scene.get_mut(item) {
            group.apply_stretch(factor);
        }
    }

    /// Drawable of area `area_id`, `None` when out of range
    fn graphics_item(&self, scene: &Scene, area_id: usize) -> Option<ItemId> {
        scene.area_item(self.id(), area_id)
    }

    /// Number of areas produced by the last placement
    fn area_count(&self) -> usize;

    /// Release the drawables produced by the last placement
    fn reset_placement(&mut self, scene: &mut Scene);

    /// Release every drawable, including those of descendants
    fn remove_from_scene(&mut self, scene: &mut Scene) {
        self.reset_placement(scene);
    }

    fn reflow_hint(&self) -> ReflowHint;

    /// Nearest area of this presentation or its descendants to `point`
    fn distance_to_closest_presentation_area(&self, scene: &Scene, point: Point) -> Option<ClosestArea> {
        closest_own_area(scene, self.id(), self.area_count(), point)
    }

    /// Mark `target` as needing a new placement. Returns whether `target`
    /// is this presentation or one of its descendants, in which case this
    /// presentation is marked as well.
    fn mark_repositioning(&mut self, target: NodeId) -> bool;

    fn pending_repositioning(&self) -> bool;
}

/// Hit test over the areas `0..count` registered by `owner`
pub fn closest_own_area(scene: &Scene, owner: NodeId, count: usize, point: Point) -> Option<ClosestArea> {
    (0..count)
        .filter_map(|area_id| {
            let item = scene.area_item(owner, area_id)?;
            let rect = scene.scene_rect(item)?;
            Some(ClosestArea {
                presentation: owner,
                area_id,
                distance: rect.distance_to(point),
            })
        })
        .fold(None, |best, hit| ClosestArea::nearest(best, Some(hit)))
}

/// Schedule removal of the areas `0..count` registered by `owner`
pub fn remove_own_areas(scene: &mut Scene, owner: NodeId, count: usize) {
    for area_id in 0..count {
        if let Some(item) = scene.area_item(owner, area_id) {
            scene.schedule_removal(item);
        }
    }
}
