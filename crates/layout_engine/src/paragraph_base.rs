//! Paragraph placement engine
//!
//! A paragraph is both a child of its parent and the negotiator for its own
//! children. It requests areas from its parent, fills them line by line with
//! the areas its children allocate, and hands each filled area back to the
//! parent. Lines are committed when the next item would overflow the right
//! edge; committing positions every item on the line according to the
//! paragraph's justification and baseline-aligns it.
//!
//! Stretching a justified line widens the drawables of stretchable children.
//! Those children are not reachable while one of them is placing itself, so
//! the stretch factors are queued and applied once the child placing itself
//! returns.

use crate::placement_line::{LineInProgress, PlacementLineData};
use crate::presentation::{ClosestArea, PlacementRequest, Presentation};
use doc_model::{Justification, NodeId, ParagraphFormat};
use math::text_area;
use render_model::{
    font_for, AreaOffer, GraphicsGroup, ItemId, PlacementContext, PlacementNegotiator, Point,
    ReflowHint, Scene, Size, SpaceQualifier,
};

/// Lines needing more stretch than this fraction of their stretchable width
/// are left unjustified
pub const MAXIMUM_STRETCH_FACTOR: f32 = 0.33;

const EPSILON: f32 = 1e-3;

/// Stretch factor for a justified line.
///
/// `slack` is the unused width of the line. Returns zero when nothing can
/// stretch or when the line would have to grow by more than
/// [`MAXIMUM_STRETCH_FACTOR`].
pub fn justify_factor(slack: f32, stretchable_width: f32) -> f32 {
    if stretchable_width <= 0.0 || slack <= 0.0 {
        return 0.0;
    }
    let factor = slack / stretchable_width;
    if factor > MAXIMUM_STRETCH_FACTOR {
        0.0
    } else {
        factor
    }
}

/// X coordinate of the first item of a line
pub fn line_origin(justification: Justification, line_start: f32, right_edge: f32, consumed: f32) -> f32 {
    match justification {
        Justification::Left | Justification::Justify => line_start,
        Justification::Right => right_edge - consumed,
        Justification::Center => line_start + (right_edge - line_start - consumed) / 2.0,
    }
}

// =============================================================================
// Formatting and results
// =============================================================================

/// Formatting resolved for one placement pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineLayoutFormat {
    pub paragraph: ParagraphFormat,
    /// Indentation of the list body, zero outside lists
    pub list_indentation: f32,
    /// Text of the list label drawn on the first line
    pub label: Option<String>,
}

/// A line as committed by the last placement pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommittedLine {
    /// Area of the paragraph holding the line
    pub area_id: usize,
    /// Where the line's content region begins
    pub start_x: f32,
    /// X of the first item after justification
    pub origin_x: f32,
    /// Top of the line within its area
    pub y: f32,
    pub height: f32,
    pub baseline: f32,
    pub stretch_factor: f32,
    pub items: usize,
}

#[derive(Debug, Clone, Copy)]
struct ActiveArea {
    item: ItemId,
    size: Size,
    /// The parent offered a fresh, full area
    full_offer: bool,
    lines: usize,
    first_baseline: Option<f32>,
}

#[derive(Debug, Clone, Copy)]
struct StretchRequest {
    child: NodeId,
    area_id: usize,
    factor: f32,
}

// =============================================================================
// Pass state
// =============================================================================

#[derive(Debug)]
struct PlacementState {
    owner: NodeId,
    format: LineLayoutFormat,
    relative_scale: f32,
    line_spacing: f32,
    top_spacing: f32,
    areas: Vec<ActiveArea>,
    area_open: bool,
    offer_full_area: bool,
    cursor_x: f32,
    cursor_y: f32,
    line: LineInProgress,
    line_index: usize,
    lines: Vec<CommittedLine>,
    pending_stretch: Vec<StretchRequest>,
    label_item: Option<ItemId>,
}

impl PlacementState {
    fn new(owner: NodeId) -> Self {
        Self {
            owner,
            format: LineLayoutFormat::default(),
            relative_scale: 1.0,
            line_spacing: 1.0,
            top_spacing: 0.0,
            areas: Vec::new(),
            area_open: false,
            offer_full_area: false,
            cursor_x: 0.0,
            cursor_y: 0.0,
            line: LineInProgress::default(),
            line_index: 0,
            lines: Vec::new(),
            pending_stretch: Vec::new(),
            label_item: None,
        }
    }

    fn begin(&mut self, request: &PlacementRequest) {
        self.areas.clear();
        self.area_open = false;
        self.offer_full_area = false;
        self.line.clear();
        self.line_index = 0;
        self.lines.clear();
        self.pending_stretch.clear();
        self.label_item = None;

        let paragraph = &self.format.paragraph;
        self.relative_scale = request.relative_scale;
        self.line_spacing = paragraph.line_spacing * request.line_spacing;
        self.top_spacing = if request.minimum_top_spacing < 0.0 {
            0.0
        } else {
            request.minimum_top_spacing.max(paragraph.top_spacing)
        };
        self.cursor_x = self.line_start_x();
        self.cursor_y = 0.0;
    }

    fn line_start_x(&self) -> f32 {
        let paragraph = &self.format.paragraph;
        let first_line = if self.line_index == 0 {
            paragraph.first_line_margin
        } else {
            0.0
        };
        paragraph.left_margin + first_line + self.format.list_indentation
    }

    fn current_area(&self) -> Option<&ActiveArea> {
        if self.area_open {
            self.areas.last()
        } else {
            None
        }
    }

    fn right_edge(&self) -> f32 {
        self.current_area().map_or(0.0, |area| area.size.width) - self.format.paragraph.right_margin
    }

    fn remaining_height(&self) -> f32 {
        self.current_area().map_or(0.0, |area| area.size.height) - self.cursor_y
    }
}

// =============================================================================
// Negotiator handed to children
// =============================================================================

struct LineNegotiator<'p> {
    state: &'p mut PlacementState,
    parent: &'p mut dyn PlacementNegotiator,
}

impl LineNegotiator<'_> {
    fn open_area(&mut self, ctx: &mut PlacementContext<'_>) {
        let owner = self.state.owner;
        let mut offer = self.parent.request_area(ctx, owner);
        if offer.qualifier == SpaceQualifier::CurrentlyAvailable {
            // A paragraph always starts on a line of its own
            self.parent.area_insufficient(ctx, owner, offer.size);
            offer = self.parent.request_area(ctx, owner);
        }

        let area_id = self.state.areas.len();
        let item = ctx.scene.insert(GraphicsGroup::new());
        ctx.scene.register_area(owner, area_id, item);

        let full_offer = offer.qualifier == SpaceQualifier::MaximumWidthAndHeight;
        self.state.areas.push(ActiveArea {
            item,
            size: offer.size,
            full_offer,
            lines: 0,
            first_baseline: None,
        });
        self.state.area_open = true;
        self.state.offer_full_area = full_offer;
        self.state.cursor_y = if area_id == 0 { self.state.top_spacing } else { 0.0 };
        if self.state.line.is_empty() {
            self.state.cursor_x = self.state.line_start_x();
        }

        tracing::trace!(
            paragraph = %owner,
            area_id,
            width = offer.size.width,
            height = offer.size.height,
            "paragraph area opened"
        );
    }

    /// Hand the current area back to the parent with `extra_bottom` spacing
    fn close_area(&mut self, ctx: &mut PlacementContext<'_>, extra_bottom: f32) {
        if !self.state.area_open {
            return;
        }
        self.state.area_open = false;

        let area_id = self.state.areas.len() - 1;
        let area = self.state.areas[area_id];
        let size = Size::new(area.size.width, self.state.cursor_y + extra_bottom);
        let ascent = area.first_baseline.unwrap_or(0.0);
        if let Some(group) = ctx.scene.get_mut(area.item) {
            group.set_size(size, ascent);
        }

        tracing::trace!(paragraph = %self.state.owner, area_id, height = size.height, "paragraph area closed");
        self.parent.allocate_area(ctx, self.state.owner, area_id, size, ascent, false);
    }

    /// Discard the empty current area and ask the parent for a larger one
    fn reopen_area(&mut self, ctx: &mut PlacementContext<'_>, needed: Size) {
        if let Some(area) = self.state.areas.pop() {
            ctx.scene.schedule_removal(area.item);
        }
        self.state.area_open = false;
        self.parent.area_insufficient(ctx, self.state.owner, needed);
        self.open_area(ctx);
    }

    /// Make room below the cursor for `height`. Gives up once a full area
    /// has been tried.
    fn ensure_vertical_room(&mut self, ctx: &mut PlacementContext<'_>, width: f32, height: f32) {
        for _ in 0..2 {
            if height <= self.state.remaining_height() + EPSILON {
                return;
            }
            let Some(area) = self.state.current_area().copied() else {
                return;
            };
            if area.lines > 0 {
                self.close_area(ctx, 0.0);
                self.open_area(ctx);
            } else if !area.full_offer {
                let needed = Size::new(width, self.state.cursor_y + height);
                self.reopen_area(ctx, needed);
            } else {
                tracing::debug!(paragraph = %self.state.owner, height, "line taller than a full area");
                return;
            }
        }
    }

    /// Justify and position the line in progress, then start the next one
    fn commit_line(&mut self, ctx: &mut PlacementContext<'_>) {
        if !self.state.area_open {
            self.open_area(ctx);
        }

        let label_font = font_for(&self.state.format.paragraph.font, self.state.relative_scale);
        if self.state.line_index == 0 && self.state.format.label.is_some() {
            self.state
                .line
                .include(ctx.metrics.ascent(&label_font), ctx.metrics.descent(&label_font));
        }

        let line_height = self.state.line.height() * self.state.line_spacing;
        let width = self.state.current_area().map_or(0.0, |area| area.size.width);
        self.ensure_vertical_room(ctx, width, line_height);

        let state = &mut *self.state;
        let area_id = state.areas.len() - 1;
        let area_item = state.areas[area_id].item;
        let line_start = state.line_start_x();
        let right_edge = state.right_edge();
        let justification = state.format.paragraph.justification;
        // Whitespace ending the line neither counts as content nor stretches
        let (trailing_count, trailing_width) = state.line.trailing_stretchable();
        let consumed = state.line.consumed_width - trailing_width;
        let first_trailing = state.line.records.len() - trailing_count;

        let factor = if justification == Justification::Justify {
            justify_factor(
                right_edge - line_start - consumed,
                state.line.stretchable_width - trailing_width,
            )
        } else {
            0.0
        };
        let origin_x = line_origin(justification, line_start, right_edge, consumed);
        let baseline = state.cursor_y + state.line.max_ascent;

        let mut x = origin_x;
        for (index, record) in state.line.records.iter().enumerate() {
            let stretch = if record.can_stretch && index < first_trailing {
                factor
            } else {
                0.0
            };
            if let Some(item) = ctx.scene.area_item(record.child, record.area_id) {
                ctx.scene.set_position(item, Point::new(x, baseline - record.ascent));
                ctx.scene.attach(item, area_item);
            }
            if record.can_stretch {
                state.pending_stretch.push(StretchRequest {
                    child: record.child,
                    area_id: record.area_id,
                    factor: stretch,
                });
            }
            x += record.width * (1.0 + stretch);
        }

        if state.line_index == 0 {
            if let Some(label) = state.format.label.clone() {
                let color = state.format.paragraph.font.color;
                let area = text_area(ctx, &label, &label_font, color);
                let left = state.format.paragraph.left_margin;
                ctx.scene.set_position(area.item, Point::new(left, baseline - area.ascent));
                ctx.scene.attach(area.item, area_item);
                state.label_item = Some(area.item);
            }
        }

        let area = &mut state.areas[area_id];
        area.lines += 1;
        area.first_baseline.get_or_insert(baseline);

        state.lines.push(CommittedLine {
            area_id,
            start_x: line_start,
            origin_x,
            y: state.cursor_y,
            height: line_height,
            baseline,
            stretch_factor: factor,
            items: state.line.records.len(),
        });
        tracing::trace!(
            paragraph = %state.owner,
            line = state.line_index,
            items = state.line.records.len(),
            factor,
            "line committed"
        );

        state.cursor_y += line_height;
        state.line_index += 1;
        state.line.clear();
        state.cursor_x = state.line_start_x();
    }

    /// Commit the last line and return the final area to the parent
    fn finish(&mut self, ctx: &mut PlacementContext<'_>, has_next_sibling: bool) {
        if !self.state.area_open {
            self.open_area(ctx);
        }

        if self.state.line_index == 0 && self.state.line.is_empty() {
            // An empty paragraph still occupies one line
            let font = font_for(&self.state.format.paragraph.font, self.state.relative_scale);
            self.state.line.include(ctx.metrics.ascent(&font), ctx.metrics.descent(&font));
            self.commit_line(ctx);
        } else if !self.state.line.is_empty() {
            self.commit_line(ctx);
        }

        let bottom = if has_next_sibling {
            0.0
        } else {
            self.state.format.paragraph.bottom_spacing
        };
        self.close_area(ctx, bottom);
    }
}

impl PlacementNegotiator for LineNegotiator<'_> {
    fn request_area(&mut self, ctx: &mut PlacementContext<'_>, _child: NodeId) -> AreaOffer {
        if !self.state.area_open {
            self.open_area(ctx);
        }

        let state = &mut *self.state;
        let width = (state.right_edge() - state.cursor_x).max(0.0);
        let height = state.remaining_height().max(0.0);
        let area_empty = state.current_area().is_some_and(|area| area.lines == 0);

        let qualifier = if !state.line.is_empty() {
            SpaceQualifier::CurrentlyAvailable
        } else if state.offer_full_area && area_empty {
            state.offer_full_area = false;
            SpaceQualifier::MaximumWidthAndHeight
        } else {
            SpaceQualifier::MaximumWidth
        };

        AreaOffer::new(Size::new(width, height), qualifier)
    }

    fn allocate_area(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        child: NodeId,
        area_id: usize,
        size: Size,
        ascent: f32,
        can_stretch: bool,
    ) {
        if !self.state.area_open {
            self.open_area(ctx);
        }
        if !self.state.line.is_empty() && self.state.cursor_x + size.width > self.state.right_edge() + EPSILON {
            self.commit_line(ctx);
        }

        self.state.offer_full_area = false;
        self.state
            .line
            .push(PlacementLineData::new(child, area_id, size, ascent, can_stretch));
        self.state.cursor_x += size.width;
    }

    fn area_insufficient(&mut self, ctx: &mut PlacementContext<'_>, _child: NodeId, size: Size) {
        if !self.state.line.is_empty() {
            self.commit_line(ctx);
            return;
        }
        // An empty line is as wide as it gets; only more height can help
        let width = self.state.current_area().map_or(0.0, |area| area.size.width);
        self.ensure_vertical_room(ctx, width, size.height);
    }

    fn request_repositioning(&mut self, ctx: &mut PlacementContext<'_>, _child: NodeId) {
        let owner = self.state.owner;
        self.parent.request_repositioning(ctx, owner);
    }
}

// =============================================================================
// Paragraph presentation base
// =============================================================================

/// Line filling shared by every paragraph-like presentation
pub struct ParagraphPresentationBase {
    id: NodeId,
    children: Vec<Box<dyn Presentation>>,
    state: PlacementState,
    reflow_hint: ReflowHint,
    pending_repositioning: bool,
}

impl std::fmt::Debug for ParagraphPresentationBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParagraphPresentationBase")
            .field("id", &self.id)
            .field("children", &self.children.len())
            .field("lines", &self.state.lines.len())
            .field("reflow_hint", &self.reflow_hint)
            .finish()
    }
}

impl ParagraphPresentationBase {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            children: Vec::new(),
            state: PlacementState::new(id),
            reflow_hint: ReflowHint::NotSupported,
            pending_repositioning: true,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn children(&self) -> &[Box<dyn Presentation>] {
        &self.children
    }

    pub fn push_child(&mut self, child: Box<dyn Presentation>) {
        self.children.push(child);
        self.pending_repositioning = true;
    }

    pub fn insert_child(&mut self, index: usize, child: Box<dyn Presentation>) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        self.pending_repositioning = true;
    }

    /// Detach a child, releasing its drawables
    pub fn remove_child(&mut self, scene: &mut Scene, id: NodeId) -> Option<Box<dyn Presentation>> {
        let index = self.children.iter().position(|child| child.id() == id)?;
        let mut child = self.children.remove(index);
        child.remove_from_scene(scene);
        self.pending_repositioning = true;
        Some(child)
    }

    pub fn layout_format(&self) -> &LineLayoutFormat {
        &self.state.format
    }

    pub fn set_layout_format(&mut self, format: LineLayoutFormat) {
        if self.state.format != format {
            self.state.format = format;
            self.pending_repositioning = true;
        }
    }

    /// Lines committed by the last placement pass
    pub fn lines(&self) -> &[CommittedLine] {
        &self.state.lines
    }

    pub fn area_count(&self) -> usize {
        self.state.areas.len()
    }

    /// Size of area `area_id` as handed to the parent
    pub fn area_size(&self, scene: &Scene, area_id: usize) -> Option<Size> {
        let item = self.state.areas.get(area_id)?.item;
        scene.get(item).map(GraphicsGroup::size)
    }

    /// Drawable of the list label, if one was placed
    pub fn label_item(&self) -> Option<ItemId> {
        self.state.label_item
    }

    pub fn recalculate_placement(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        parent: &mut dyn PlacementNegotiator,
        request: &PlacementRequest,
    ) {
        self.reset_placement(ctx.scene);
        tracing::debug!(paragraph = %self.id, children = self.children.len(), "paragraph placement started");

        let Self {
            children,
            state,
            reflow_hint,
            pending_repositioning,
            ..
        } = self;
        state.begin(request);

        let mut hint = ReflowHint::NotSupported;
        let mut negotiator = LineNegotiator { state, parent };
        negotiator.open_area(ctx);

        for index in 0..children.len() {
            let child_request = PlacementRequest {
                next_sibling: children.get(index + 1).map(|child| child.id()),
                honor_leading_whitespace: request.honor_leading_whitespace,
                minimum_top_spacing: request.minimum_top_spacing,
                line_spacing: request.line_spacing,
                relative_scale: request.relative_scale,
            };
            children[index].recalculate_placement(ctx, &mut negotiator, &child_request);
            hint = hint.max(children[index].reflow_hint());
            drain_stretches(ctx, children, &mut negotiator.state.pending_stretch);

            if ctx.tracker.abort_placement() {
                tracing::warn!(paragraph = %negotiator.state.owner, placed = index + 1, "paragraph placement aborted");
                hint = ReflowHint::AlwaysReflow;
                break;
            }
        }

        negotiator.finish(ctx, request.next_sibling.is_some());
        drain_stretches(ctx, children, &mut negotiator.state.pending_stretch);

        tracing::debug!(
            paragraph = %negotiator.state.owner,
            lines = negotiator.state.lines.len(),
            areas = negotiator.state.areas.len(),
            "paragraph placement finished"
        );
        *reflow_hint = hint;
        *pending_repositioning = false;
    }

    /// Release the area drawables and the list label. Idempotent.
    pub fn reset_placement(&mut self, scene: &mut Scene) {
        for area in self.state.areas.drain(..) {
            scene.schedule_removal(area.item);
        }
        if let Some(label) = self.state.label_item.take() {
            scene.schedule_removal(label);
        }
        self.state.area_open = false;
        self.state.lines.clear();
    }

    pub fn remove_from_scene(&mut self, scene: &mut Scene) {
        self.reset_placement(scene);
        for child in &mut self.children {
            child.remove_from_scene(scene);
        }
    }

    /// Maximum hint over the children seen by the last pass
    pub fn reflow_hint(&self) -> ReflowHint {
        self.reflow_hint
    }

    pub fn distance_to_closest_presentation_area(&self, scene: &Scene, point: Point) -> Option<ClosestArea> {
        let from_children = self
            .children
            .iter()
            .map(|child| child.distance_to_closest_presentation_area(scene, point))
            .fold(None, ClosestArea::nearest);
        if from_children.is_some() {
            return from_children;
        }

        crate::presentation::closest_own_area(scene, self.id, self.area_count(), point)
    }

    pub fn mark_repositioning(&mut self, target: NodeId) -> bool {
        let found = target == self.id || self.children.iter_mut().any(|child| child.mark_repositioning(target));
        if found {
            self.pending_repositioning = true;
        }
        found
    }

    pub fn pending_repositioning(&self) -> bool {
        self.pending_repositioning
    }
}

fn drain_stretches(
    ctx: &mut PlacementContext<'_>,
    children: &mut [Box<dyn Presentation>],
    pending: &mut Vec<StretchRequest>,
) {
    for request in pending.drain(..) {
        if let Some(child) = children.iter_mut().find(|child| child.id() == request.child) {
            child.apply_stretch(ctx, request.area_id, request.factor);
        }
    }
}
