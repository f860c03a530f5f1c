//! Document view
//!
//! The root of the presentation tree. It owns the scene, the format table
//! and the top-level paragraphs, and acts as the negotiator that stacks
//! paragraph areas onto pages. Repositioning requests propagate up to the
//! view, which runs a full placement pass on the next [`DocumentView::update`].

use crate::config::LayoutSettings;
use crate::numbering::{renumber, renumber_from};
use crate::paragraph::ParagraphPresentation;
use crate::presentation::{ClosestArea, PlacementRequest, Presentation};
use crate::{LayoutError, Result};
use doc_model::{FormatId, FormatTable, NodeId};
use render_model::{
    AreaOffer, GraphicsGroup, ItemId, PlacementContext, PlacementNegotiator, PlacementTracker, Point,
    Rect, ReflowHint, Scene, Size, SpaceQualifier,
};
use text_engine::FontMetrics;

const EPSILON: f32 = 1e-3;

/// Position of one paragraph area in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedArea {
    pub paragraph: NodeId,
    pub area_id: usize,
    pub page: usize,
    pub rect: Rect,
}

// =============================================================================
// Page stack
// =============================================================================

/// Negotiator stacking paragraph areas onto pages
#[derive(Debug)]
struct PageStack {
    owner: NodeId,
    page_size: Size,
    content: Rect,
    page_gap: f32,
    pages: Vec<ItemId>,
    cursor_y: f32,
    fresh: bool,
    repositioning: Vec<NodeId>,
}

impl PageStack {
    fn new(owner: NodeId, settings: &LayoutSettings) -> Self {
        let content = settings.content_size();
        Self {
            owner,
            page_size: settings.page_size(),
            content: Rect::new(settings.margins.left, settings.margins.top, content.width, content.height),
            page_gap: settings.page_gap,
            pages: Vec::new(),
            cursor_y: 0.0,
            fresh: true,
            repositioning: Vec::new(),
        }
    }

    fn reset(&mut self, scene: &mut Scene) {
        for page in self.pages.drain(..) {
            scene.schedule_removal(page);
        }
        self.cursor_y = 0.0;
        self.fresh = true;
    }

    fn new_page(&mut self, scene: &mut Scene) {
        let index = self.pages.len();
        let mut group = GraphicsGroup::new();
        group.set_position(Point::new(0.0, index as f32 * (self.page_size.height + self.page_gap)));
        group.set_size(self.page_size, 0.0);

        let item = scene.insert(group);
        scene.register_area(self.owner, index, item);
        self.pages.push(item);
        self.cursor_y = 0.0;
        self.fresh = true;
        tracing::debug!(page = index, "page opened");
    }

    fn ensure_page(&mut self, scene: &mut Scene) {
        if self.pages.is_empty() {
            self.new_page(scene);
        }
    }
}

impl PlacementNegotiator for PageStack {
    fn request_area(&mut self, ctx: &mut PlacementContext<'_>, _child: NodeId) -> AreaOffer {
        self.ensure_page(ctx.scene);
        let qualifier = if self.fresh && self.cursor_y == 0.0 {
            self.fresh = false;
            SpaceQualifier::MaximumWidthAndHeight
        } else {
            SpaceQualifier::MaximumWidth
        };
        let height = (self.content.height - self.cursor_y).max(0.0);
        AreaOffer::new(Size::new(self.content.width, height), qualifier)
    }

    fn allocate_area(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        child: NodeId,
        area_id: usize,
        size: Size,
        _ascent: f32,
        _can_stretch: bool,
    ) {
        self.ensure_page(ctx.scene);
        if self.cursor_y > 0.0 && self.cursor_y + size.height > self.content.height + EPSILON {
            self.new_page(ctx.scene);
        }

        if let (Some(item), Some(page)) = (ctx.scene.area_item(child, area_id), self.pages.last().copied()) {
            ctx.scene
                .set_position(item, Point::new(self.content.x, self.content.y + self.cursor_y));
            ctx.scene.attach(item, page);
        }
        self.cursor_y += size.height;
        self.fresh = false;
    }

    fn area_insufficient(&mut self, ctx: &mut PlacementContext<'_>, child: NodeId, size: Size) {
        tracing::debug!(paragraph = %child, height = size.height, "area insufficient, breaking page");
        self.new_page(ctx.scene);
    }

    fn request_repositioning(&mut self, _ctx: &mut PlacementContext<'_>, child: NodeId) {
        self.repositioning.push(child);
    }
}

// =============================================================================
// Document view
// =============================================================================

#[derive(Debug)]
pub struct DocumentView {
    id: NodeId,
    settings: LayoutSettings,
    formats: FormatTable,
    paragraphs: Vec<ParagraphPresentation>,
    pages: PageStack,
    scene: Scene,
    numbering_dirty: bool,
    needs_placement: bool,
    reflow_hint: ReflowHint,
}

impl DocumentView {
    pub fn new(settings: LayoutSettings, formats: FormatTable) -> Self {
        let id = NodeId::new();
        Self {
            id,
            pages: PageStack::new(id, &settings),
            settings,
            formats,
            paragraphs: Vec::new(),
            scene: Scene::new(),
            numbering_dirty: true,
            needs_placement: true,
            reflow_hint: ReflowHint::NotSupported,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Change block formats. Every paragraph is renumbered and placed again
    /// on the next update.
    pub fn edit_formats<R>(&mut self, edit: impl FnOnce(&mut FormatTable) -> R) -> R {
        let result = edit(&mut self.formats);
        for paragraph in &mut self.paragraphs {
            paragraph.numbering_mut().invalidate();
            paragraph.mark_repositioning(paragraph.id());
        }
        self.numbering_dirty = true;
        self.needs_placement = true;
        result
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn paragraphs(&self) -> &[ParagraphPresentation] {
        &self.paragraphs
    }

    pub fn paragraph(&self, id: NodeId) -> Option<&ParagraphPresentation> {
        self.paragraphs.iter().find(|paragraph| paragraph.id() == id)
    }

    fn index_of(&self, id: NodeId) -> Result<usize> {
        self.paragraphs
            .iter()
            .position(|paragraph| paragraph.id() == id)
            .ok_or(LayoutError::UnknownPresentation(id))
    }

    pub fn push_paragraph(&mut self, paragraph: ParagraphPresentation) -> NodeId {
        let index = self.paragraphs.len();
        self.insert_paragraph(index, paragraph)
    }

    /// Attach a paragraph at `index` and renumber the list run around it
    pub fn insert_paragraph(&mut self, index: usize, paragraph: ParagraphPresentation) -> NodeId {
        let index = index.min(self.paragraphs.len());
        let id = paragraph.id();
        self.paragraphs.insert(index, paragraph);
        if !self.numbering_dirty {
            let range = renumber_from(&mut self.paragraphs, index, &self.formats);
            // The run after the new paragraph may continue from it
            renumber_from(&mut self.paragraphs, range.end, &self.formats);
        }
        self.needs_placement = true;
        id
    }

    /// Detach a paragraph, releasing its drawables
    pub fn remove_paragraph(&mut self, id: NodeId) -> Result<ParagraphPresentation> {
        let index = self.index_of(id)?;
        let mut paragraph = self.paragraphs.remove(index);
        paragraph.remove_from_scene(&mut self.scene);
        self.scene.flush_removals();
        self.numbering_dirty = true;
        self.needs_placement = true;
        Ok(paragraph)
    }

    /// Point a paragraph at another block format
    pub fn set_paragraph_format(&mut self, id: NodeId, format: FormatId) -> Result<()> {
        self.formats.require(format)?;
        let index = self.index_of(id)?;
        self.paragraphs[index].set_format_id(format);
        self.numbering_dirty = true;
        self.needs_placement = true;
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.pages.pages.len()
    }

    pub fn reflow_hint(&self) -> ReflowHint {
        self.reflow_hint
    }

    /// Whether the next [`Self::update`] will run a placement pass
    pub fn needs_update(&self) -> bool {
        self.needs_placement || self.numbering_dirty
    }

    /// Mark `target` and its ancestors for repositioning. Returns whether
    /// `target` belongs to this view.
    pub fn request_repositioning(&mut self, target: NodeId) -> bool {
        let found = target == self.id
            || self
                .paragraphs
                .iter_mut()
                .any(|paragraph| paragraph.mark_repositioning(target));
        if found {
            tracing::debug!(%target, "repositioning requested");
            self.needs_placement = true;
        }
        found
    }

    /// Run a placement pass if anything asked for one
    pub fn update(&mut self, metrics: &dyn FontMetrics, tracker: &mut dyn PlacementTracker) -> bool {
        if !self.needs_update() {
            return false;
        }
        self.recalculate_placement(metrics, tracker);
        true
    }

    /// Place every paragraph from the top of the first page
    pub fn recalculate_placement(
        &mut self,
        metrics: &dyn FontMetrics,
        tracker: &mut dyn PlacementTracker,
    ) -> ReflowHint {
        let Self {
            settings,
            formats,
            paragraphs,
            pages,
            scene,
            numbering_dirty,
            ..
        } = self;

        if *numbering_dirty {
            renumber(paragraphs, formats);
            *numbering_dirty = false;
        }
        let fallback = settings.fallback_paragraph_format();
        for paragraph in paragraphs.iter_mut() {
            paragraph.resolve_format(formats, &fallback);
        }

        pages.reset(scene);
        tracing::debug!(paragraphs = paragraphs.len(), "document placement started");

        let mut ctx = PlacementContext::new(scene, tracker, metrics);
        let mut hint = ReflowHint::NotSupported;
        let mut owed_spacing = 0.0;
        for index in 0..paragraphs.len() {
            let request = PlacementRequest {
                next_sibling: paragraphs.get(index + 1).map(ParagraphPresentation::id),
                minimum_top_spacing: owed_spacing,
                relative_scale: settings.relative_scale,
                ..PlacementRequest::default()
            };
            paragraphs[index].recalculate_placement(&mut ctx, pages, &request);
            hint = hint.max(paragraphs[index].reflow_hint());
            owed_spacing = paragraphs[index].bottom_spacing();

            if ctx.tracker.abort_placement() {
                tracing::warn!(placed = index + 1, "document placement aborted");
                hint = ReflowHint::AlwaysReflow;
                break;
            }
        }

        let removed = ctx.scene.flush_removals();
        tracing::debug!(pages = pages.pages.len(), removed, "document placement finished");

        let requested: Vec<NodeId> = pages.repositioning.drain(..).collect();
        self.needs_placement = false;
        self.reflow_hint = hint;
        for target in requested {
            self.request_repositioning(target);
        }
        hint
    }

    /// Scene rectangles of every paragraph area, in document order
    pub fn placed_areas(&self) -> Vec<PlacedArea> {
        let mut placed = Vec::new();
        for paragraph in &self.paragraphs {
            for area_id in 0..paragraph.area_count() {
                let Some(item) = paragraph.graphics_item(&self.scene, area_id) else {
                    continue;
                };
                let Some(rect) = self.scene.scene_rect(item) else {
                    continue;
                };
                let page = self
                    .scene
                    .parent(item)
                    .and_then(|page| self.pages.pages.iter().position(|p| *p == page))
                    .unwrap_or(0);
                placed.push(PlacedArea {
                    paragraph: paragraph.id(),
                    area_id,
                    page,
                    rect,
                });
            }
        }
        placed
    }

    /// Nearest presentation area to a point in scene coordinates
    pub fn closest_area(&self, point: Point) -> Option<ClosestArea> {
        self.paragraphs
            .iter()
            .map(|paragraph| paragraph.distance_to_closest_presentation_area(&self.scene, point))
            .fold(None, ClosestArea::nearest)
    }
}
