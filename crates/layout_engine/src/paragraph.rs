//! Paragraph presentations
//!
//! [`ParagraphPresentation`] adds list numbering on top of the line filling
//! in [`ParagraphPresentationBase`]: before each pass its block format is
//! resolved from the format table into the margins, list indentation and
//! label text the engine lays out with.

use crate::numbering::NumberingState;
use crate::paragraph_base::{LineLayoutFormat, ParagraphPresentationBase};
use crate::presentation::{ClosestArea, PlacementRequest, Presentation};
use doc_model::{BlockFormat, FormatId, FormatTable, NodeId, ParagraphFormat};
use render_model::{PlacementContext, PlacementNegotiator, Point, ReflowHint, Scene};

#[derive(Debug)]
pub struct ParagraphPresentation {
    base: ParagraphPresentationBase,
    format_id: FormatId,
    numbering: NumberingState,
}

impl ParagraphPresentation {
    pub fn new(format_id: FormatId) -> Self {
        Self::with_id(NodeId::new(), format_id)
    }

    pub fn with_id(id: NodeId, format_id: FormatId) -> Self {
        Self {
            base: ParagraphPresentationBase::new(id),
            format_id,
            numbering: NumberingState::default(),
        }
    }

    /// Builder form of [`ParagraphPresentationBase::push_child`]
    pub fn with_child(mut self, child: impl Presentation + 'static) -> Self {
        self.base.push_child(Box::new(child));
        self
    }

    pub fn id(&self) -> NodeId {
        self.base.id()
    }

    pub fn base(&self) -> &ParagraphPresentationBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut ParagraphPresentationBase {
        &mut self.base
    }

    pub fn format_id(&self) -> FormatId {
        self.format_id
    }

    /// Point the paragraph at another block format. Numbering must be
    /// resolved again before the next pass.
    pub fn set_format_id(&mut self, format_id: FormatId) {
        self.format_id = format_id;
        self.numbering.invalidate();
        self.base.mark_repositioning(self.base.id());
    }

    pub fn numbering(&self) -> &NumberingState {
        &self.numbering
    }

    pub(crate) fn numbering_mut(&mut self) -> &mut NumberingState {
        &mut self.numbering
    }

    /// Spacing owed below the paragraph by the last resolved format
    pub fn bottom_spacing(&self) -> f32 {
        self.base.layout_format().paragraph.bottom_spacing
    }

    /// Resolve margins, list indentation and label text for the next pass.
    /// `fallback` stands in for a format missing from the table.
    pub fn resolve_format(&mut self, formats: &FormatTable, fallback: &ParagraphFormat) {
        let paragraph = match formats.get(self.format_id) {
            Some(block) => block.paragraph().clone(),
            None => {
                tracing::warn!(paragraph = %self.id(), format = self.format_id.0, "using fallback paragraph format");
                fallback.clone()
            }
        };
        let list_indentation = self
            .numbering
            .driving_format()
            .and_then(|id| formats.get(id))
            .and_then(BlockFormat::as_list)
            .map_or(0.0, |list| list.indentation);
        let label = self.numbering.label_text(formats);

        self.base.set_layout_format(LineLayoutFormat {
            paragraph,
            list_indentation,
            label,
        });
    }
}

impl Presentation for ParagraphPresentation {
    fn id(&self) -> NodeId {
        self.base.id()
    }

    fn recalculate_placement(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        parent: &mut dyn PlacementNegotiator,
        request: &PlacementRequest,
    ) {
        self.base.recalculate_placement(ctx, parent, request);
    }

    fn apply_stretch(&mut self, _ctx: &mut PlacementContext<'_>, area_id: usize, factor: f32) {
        tracing::error!(paragraph = %self.id(), area_id, factor, "paragraphs cannot be stretched");
        if cfg!(debug_assertions) {
            panic!("paragraph area {area_id} asked to stretch by {factor}");
        }
    }

    fn area_count(&self) -> usize {
        self.base.area_count()
    }

    fn reset_placement(&mut self, scene: &mut Scene) {
        self.base.reset_placement(scene);
    }

    fn remove_from_scene(&mut self, scene: &mut Scene) {
        self.base.remove_from_scene(scene);
    }

    fn reflow_hint(&self) -> ReflowHint {
        self.base.reflow_hint()
    }

    fn distance_to_closest_presentation_area(&self, scene: &Scene, point: Point) -> Option<ClosestArea> {
        self.base.distance_to_closest_presentation_area(scene, point)
    }

    fn mark_repositioning(&mut self, target: NodeId) -> bool {
        self.base.mark_repositioning(target)
    }

    fn pending_repositioning(&self) -> bool {
        self.base.pending_repositioning()
    }
}
