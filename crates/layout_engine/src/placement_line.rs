//! Per-line placement records

use doc_model::NodeId;
use render_model::Size;

/// One child area placed on the line being filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementLineData {
    pub child: NodeId,
    /// Index within the child's own area list
    pub area_id: usize,
    pub width: f32,
    pub height: f32,
    /// Distance from the top of the area to its baseline
    pub ascent: f32,
    /// Whether justification may widen the area
    pub can_stretch: bool,
}

impl PlacementLineData {
    pub fn new(child: NodeId, area_id: usize, size: Size, ascent: f32, can_stretch: bool) -> Self {
        Self {
            child,
            area_id,
            width: size.width,
            height: size.height,
            ascent,
            can_stretch,
        }
    }

    pub fn descent(&self) -> f32 {
        self.height - self.ascent
    }
}

/// Accumulated state of the line being filled
#[derive(Debug, Clone, Default)]
pub(crate) struct LineInProgress {
    pub records: Vec<PlacementLineData>,
    pub max_ascent: f32,
    pub max_descent: f32,
    pub consumed_width: f32,
    pub stretchable_width: f32,
}

impl LineInProgress {
    pub fn push(&mut self, record: PlacementLineData) {
        self.max_ascent = self.max_ascent.max(record.ascent);
        self.max_descent = self.max_descent.max(record.descent());
        self.consumed_width += record.width;
        if record.can_stretch {
            self.stretchable_width += record.width;
        }
        self.records.push(record);
    }

    /// Grow the line so a run of `ascent` and `descent` fits on it
    pub fn include(&mut self, ascent: f32, descent: f32) {
        self.max_ascent = self.max_ascent.max(ascent);
        self.max_descent = self.max_descent.max(descent);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count and total width of the stretchable records ending the line
    pub fn trailing_stretchable(&self) -> (usize, f32) {
        self.records
            .iter()
            .rev()
            .take_while(|record| record.can_stretch)
            .fold((0, 0.0), |(count, width), record| (count + 1, width + record.width))
    }

    /// Natural height of the line, before line spacing
    pub fn height(&self) -> f32 {
        self.max_ascent + self.max_descent
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
