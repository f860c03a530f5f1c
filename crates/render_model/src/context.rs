//! Shared state threaded through a placement pass

use crate::{PlacementTracker, Scene};
use text_engine::FontMetrics;

/// Collaborators every presentation needs while placing itself
pub struct PlacementContext<'a> {
    pub scene: &'a mut Scene,
    pub tracker: &'a mut dyn PlacementTracker,
    pub metrics: &'a dyn FontMetrics,
}

impl<'a> PlacementContext<'a> {
    pub fn new(
        scene: &'a mut Scene,
        tracker: &'a mut dyn PlacementTracker,
        metrics: &'a dyn FontMetrics,
    ) -> Self {
        Self {
            scene,
            tracker,
            metrics,
        }
    }
}
