//! Presentation generators
//!
//! A generator knows how to draw one kind of value. Non-wrapping values
//! become a single graphics group sized to fit the space offered; wrapping
//! values (sets, tuples) are cut into fragments and handed one at a time to
//! an [`AreaPresenter`], which places each on the current line.

use crate::{FieldFonts, GeneratorRegistry, MathResult, VerticalMetrics};
use doc_model::{Value, ValueFormat};
use render_model::{AreaOffer, GraphicsGroup, ItemId, PlacementContext, ReflowHint, Size};
use text_engine::FontMetrics;

/// A value together with everything needed to present it
#[derive(Debug, Clone, Copy)]
pub struct ValueRequest<'v> {
    pub value: &'v Value,
    pub format: &'v ValueFormat,
    /// Scale applied to the format's font size
    pub relative_scale: f32,
    /// Registry used to present members of composite values
    pub registry: &'v GeneratorRegistry,
}

impl<'v> ValueRequest<'v> {
    pub fn new(value: &'v Value, format: &'v ValueFormat, registry: &'v GeneratorRegistry) -> Self {
        Self {
            value,
            format,
            relative_scale: 1.0,
            registry,
        }
    }

    pub fn with_relative_scale(mut self, relative_scale: f32) -> Self {
        self.relative_scale = relative_scale;
        self
    }

    /// Request for a member of a composite value, in the same format
    pub fn for_member(&self, member: &'v Value) -> Self {
        Self {
            value: member,
            ..*self
        }
    }

    pub fn fonts(&self, metrics: &dyn FontMetrics) -> FieldFonts {
        FieldFonts::for_format(self.format, self.relative_scale, metrics)
    }
}

/// A drawable produced for (part of) a value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationArea {
    pub item: ItemId,
    pub size: Size,
    pub ascent: f32,
}

/// Outcome of generating the fragments of a wrapping value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Complete,
    /// The tracker asked to stop; the fragments placed so far are valid
    Aborted,
}

/// Receiver of the fragments of a wrapping value
pub trait AreaPresenter {
    /// Space available for the next fragment
    fn request_area(&mut self, ctx: &mut PlacementContext<'_>) -> AreaOffer;

    /// Place a fragment on the current line
    fn place_area(&mut self, ctx: &mut PlacementContext<'_>, area: PresentationArea);

    /// The last offer could not hold a fragment of `size`
    fn area_insufficient(&mut self, ctx: &mut PlacementContext<'_>, size: Size);

    /// Forget every fragment placed so far
    fn clear_areas(&mut self, ctx: &mut PlacementContext<'_>);
}

/// Renderer for one kind of value
pub trait PresentationGenerator: Sync {
    /// Height and ascent the value will occupy, without drawing it
    fn calculate_height(&self, metrics: &dyn FontMetrics, request: &ValueRequest<'_>) -> VerticalMetrics;

    /// Draw the value into the live group `item`, fitting `maximum` where
    /// the value can adapt
    fn render(
        &self,
        ctx: &mut PlacementContext<'_>,
        item: ItemId,
        request: &ValueRequest<'_>,
        maximum: Size,
    ) -> PresentationArea;

    /// Draw the value into a new group
    fn to_graphics_item(
        &self,
        ctx: &mut PlacementContext<'_>,
        request: &ValueRequest<'_>,
        maximum: Size,
    ) -> PresentationArea {
        let item = ctx.scene.insert(GraphicsGroup::new());
        self.render(ctx, item, request, maximum)
    }

    /// Redraw the value into an existing group, keeping its identity
    fn update_graphics_item(
        &self,
        ctx: &mut PlacementContext<'_>,
        item: ItemId,
        request: &ValueRequest<'_>,
        maximum: Size,
    ) -> MathResult<PresentationArea> {
        ctx.scene.require_mut(item)?;
        Ok(self.render(ctx, item, request, maximum))
    }

    /// Whether the value is cut into fragments across lines
    fn is_wrapping(&self) -> bool {
        false
    }

    fn reflow_hint(&self) -> ReflowHint {
        ReflowHint::NotSupported
    }

    /// Produce the value's fragments through `presenter`. Unless
    /// `force_append` is set, previously placed fragments are cleared first.
    fn generate_graphics_items(
        &self,
        ctx: &mut PlacementContext<'_>,
        presenter: &mut dyn AreaPresenter,
        request: &ValueRequest<'_>,
        force_append: bool,
    ) -> GenerationStatus {
        if !force_append {
            presenter.clear_areas(ctx);
        }
        place_fragment(ctx, presenter, |ctx, maximum| {
            self.to_graphics_item(ctx, request, maximum)
        });
        GenerationStatus::Complete
    }
}

/// Ask for space, build a fragment for it and place it.
///
/// A fragment wider than a partially filled line is rebuilt once for the
/// space offered after reporting the shortfall.
pub fn place_fragment(
    ctx: &mut PlacementContext<'_>,
    presenter: &mut dyn AreaPresenter,
    mut build: impl FnMut(&mut PlacementContext<'_>, Size) -> PresentationArea,
) {
    let offer = presenter.request_area(ctx);
    let mut area = build(ctx, offer.size);

    if area.size.width > offer.size.width && offer.qualifier.can_grow() {
        presenter.area_insufficient(ctx, area.size);
        ctx.scene.schedule_removal(area.item);
        let offer = presenter.request_area(ctx);
        area = build(ctx, offer.size);
    }

    presenter.place_area(ctx, area);
}
