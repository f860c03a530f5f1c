//! Drawable items
//!
//! A [`GraphicsGroup`] is the unit handed between presentations: a group of
//! positioned text entries with optional bracket decorations. Positions are
//! local to the group; the group itself is positioned within its parent in
//! the [`Scene`](crate::Scene).

use crate::{Point, Rect, Size};
use doc_model::Color;
use serde::{Deserialize, Serialize};
use text_engine::Font;

/// A run of text drawn at a baseline position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntry {
    pub text: String,
    pub font: Font,
    pub color: Color,
    /// Baseline start, relative to the owning group
    pub position: Point,
}

impl TextEntry {
    pub fn new(text: impl Into<String>, font: Font, position: Point) -> Self {
        Self {
            text: text.into(),
            font,
            color: Color::BLACK,
            position,
        }
    }
}

/// Bracket decoration drawn around a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BracketStyle {
    #[default]
    None,
    Parenthesis,
    Bracket,
    Brace,
    AngleBracket,
    AbsoluteValue,
}

/// A positioned group of text entries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphicsGroup {
    position: Point,
    size: Size,
    ascent: f32,
    stretch_factor: f32,
    entries: Vec<TextEntry>,
    left_bracket: BracketStyle,
    right_bracket: BracketStyle,
    bracket_rect: Rect,
    background: Option<Color>,
    deferred_depth: u32,
    pending_update: bool,
    revision: u64,
}

impl GraphicsGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group holding a single text entry on its baseline
    pub fn with_text(text: impl Into<String>, font: Font, size: Size, ascent: f32) -> Self {
        let mut group = Self::new();
        group.append_text(TextEntry::new(text, font, Point::new(0.0, ascent)));
        group.set_size(size, ascent);
        group
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        if self.position != position {
            self.position = position;
            self.changed();
        }
    }

    /// Natural size, before any stretch
    pub fn natural_size(&self) -> Size {
        self.size
    }

    /// Size including the applied stretch
    pub fn size(&self) -> Size {
        Size::new(self.size.width * (1.0 + self.stretch_factor), self.size.height)
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn set_size(&mut self, size: Size, ascent: f32) {
        self.size = size;
        self.ascent = ascent;
        self.changed();
    }

    /// Bounds within the parent's coordinate space
    pub fn bounding_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    pub fn stretch_factor(&self) -> f32 {
        self.stretch_factor
    }

    /// Widen the group to `natural width * (1 + factor)`
    pub fn apply_stretch(&mut self, factor: f32) {
        self.stretch_factor = factor.max(0.0);
        self.changed();
    }

    pub fn entries(&self) -> &[TextEntry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn append_text(&mut self, entry: TextEntry) {
        self.entries.push(entry);
        self.changed();
    }

    /// Overwrite the entry at `index`, appending when the slot does not exist
    /// yet. Used to update a group in place without reallocating entries.
    pub fn set_entry(&mut self, index: usize, entry: TextEntry) {
        match self.entries.get_mut(index) {
            Some(existing) if *existing == entry => return,
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.changed();
    }

    /// Drop entries beyond the first `count`
    pub fn truncate_entries(&mut self, count: usize) {
        if count < self.entries.len() {
            self.entries.truncate(count);
            self.changed();
        }
    }

    pub fn clear_entries(&mut self) {
        self.truncate_entries(0);
    }

    pub fn brackets(&self) -> (BracketStyle, BracketStyle) {
        (self.left_bracket, self.right_bracket)
    }

    pub fn set_brackets(&mut self, left: BracketStyle, right: BracketStyle) {
        self.left_bracket = left;
        self.right_bracket = right;
        self.changed();
    }

    pub fn bracket_rect(&self) -> Rect {
        self.bracket_rect
    }

    pub fn set_bracket_rect(&mut self, rect: Rect) {
        self.bracket_rect = rect;
        self.changed();
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
        self.changed();
    }

    /// Start a batch of updates. Batches nest; the group publishes a single
    /// revision when the outermost batch is restored.
    pub fn defer_updates(&mut self) {
        self.deferred_depth += 1;
    }

    pub fn restore_updates(&mut self) {
        debug_assert!(self.deferred_depth > 0, "restore_updates without defer_updates");
        self.deferred_depth = self.deferred_depth.saturating_sub(1);
        if self.deferred_depth == 0 && self.pending_update {
            self.pending_update = false;
            self.revision += 1;
        }
    }

    pub fn updates_deferred(&self) -> bool {
        self.deferred_depth > 0
    }

    /// Number of published updates
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn changed(&mut self) {
        if self.deferred_depth > 0 {
            self.pending_update = true;
        } else {
            self.revision += 1;
        }
    }
}
