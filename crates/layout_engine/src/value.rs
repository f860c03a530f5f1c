//! Typed values inside paragraphs
//!
//! A [`ValuePresentation`] draws its value with the generator registered for
//! the value's kind. Wrapping generators hand their fragments to the
//! enclosing paragraph one by one; every other generator produces a single
//! area sized to the space the paragraph offers.

use crate::presentation::{remove_own_areas, PlacementRequest, Presentation};
use crate::Result;
use doc_model::{NodeId, Value, ValueFormat};
use math::{place_fragment, AreaPresenter, GenerationStatus, GeneratorRegistry, PresentationArea, ValueRequest};
use render_model::{AreaOffer, PlacementContext, PlacementNegotiator, ReflowHint, Scene, Size};

/// Adapts the parent negotiator to the fragment interface of the generators
struct NegotiatorPresenter<'p> {
    owner: NodeId,
    parent: &'p mut dyn PlacementNegotiator,
    placed: usize,
}

impl AreaPresenter for NegotiatorPresenter<'_> {
    fn request_area(&mut self, ctx: &mut PlacementContext<'_>) -> AreaOffer {
        self.parent.request_area(ctx, self.owner)
    }

    fn place_area(&mut self, ctx: &mut PlacementContext<'_>, area: PresentationArea) {
        ctx.scene.register_area(self.owner, self.placed, area.item);
        self.parent
            .allocate_area(ctx, self.owner, self.placed, area.size, area.ascent, false);
        self.placed += 1;
    }

    fn area_insufficient(&mut self, ctx: &mut PlacementContext<'_>, size: Size) {
        self.parent.area_insufficient(ctx, self.owner, size);
    }

    fn clear_areas(&mut self, ctx: &mut PlacementContext<'_>) {
        remove_own_areas(ctx.scene, self.owner, self.placed);
        self.placed = 0;
    }
}

#[derive(Debug, Clone)]
pub struct ValuePresentation {
    id: NodeId,
    value: Value,
    format: ValueFormat,
    registry: GeneratorRegistry,
    area_count: usize,
    relative_scale: f32,
    maximum: Size,
    reflow_hint: ReflowHint,
    pending_repositioning: bool,
}

impl ValuePresentation {
    pub fn new(value: Value, format: ValueFormat) -> Self {
        Self::with_registry(value, format, *GeneratorRegistry::standard())
    }

    pub fn with_registry(value: Value, format: ValueFormat, registry: GeneratorRegistry) -> Self {
        Self {
            id: NodeId::new(),
            value,
            format,
            registry,
            area_count: 0,
            relative_scale: 1.0,
            maximum: Size::zero(),
            reflow_hint: ReflowHint::NotSupported,
            pending_repositioning: true,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn format(&self) -> &ValueFormat {
        &self.format
    }

    /// Replace the value without placing it again. Call [`Self::refresh`]
    /// to redraw.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Redraw the value into its existing drawable.
    ///
    /// Returns `Ok(false)` and marks the presentation for repositioning when
    /// the new drawing cannot reuse the placed area: the value spans several
    /// areas, has no generator any more, or changed size.
    pub fn refresh(&mut self, ctx: &mut PlacementContext<'_>) -> Result<bool> {
        let item = match ctx.scene.area_item(self.id, 0) {
            Some(item) if self.area_count == 1 => item,
            _ => {
                self.pending_repositioning = true;
                return Ok(false);
            }
        };
        let old_size = ctx.scene.get(item).map(|group| group.natural_size());

        let request = ValueRequest::new(&self.value, &self.format, &self.registry).with_relative_scale(self.relative_scale);
        let area = self.registry.update_graphics_item(ctx, item, &request, self.maximum)?;

        if area.item != item {
            ctx.scene.register_area(self.id, 0, area.item);
            self.pending_repositioning = true;
            return Ok(false);
        }
        if old_size != Some(area.size) {
            tracing::debug!(value = %self.id, "value changed size, placement needed");
            self.pending_repositioning = true;
            return Ok(false);
        }
        Ok(true)
    }
}

impl Presentation for ValuePresentation {
    fn id(&self) -> NodeId {
        self.id
    }

    fn recalculate_placement(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        parent: &mut dyn PlacementNegotiator,
        request: &PlacementRequest,
    ) {
        self.reset_placement(ctx.scene);
        self.relative_scale = request.relative_scale;

        let value_request =
            ValueRequest::new(&self.value, &self.format, &self.registry).with_relative_scale(request.relative_scale);
        let mut presenter = NegotiatorPresenter {
            owner: self.id,
            parent,
            placed: 0,
        };
        let mut maximum = Size::zero();

        let hint = match self.registry.resolve(&self.value) {
            Ok(generator) if generator.is_wrapping() => {
                match generator.generate_graphics_items(ctx, &mut presenter, &value_request, false) {
                    GenerationStatus::Complete => generator.reflow_hint(),
                    GenerationStatus::Aborted => ReflowHint::AlwaysReflow,
                }
            }
            resolved => {
                let registry = self.registry;
                place_fragment(ctx, &mut presenter, |ctx, offered| {
                    maximum = offered;
                    registry.to_graphics_item(ctx, &value_request, offered)
                });
                resolved.map_or(ReflowHint::NotSupported, |generator| generator.reflow_hint())
            }
        };

        self.area_count = presenter.placed;
        self.maximum = maximum;
        self.reflow_hint = if ctx.tracker.abort_placement() {
            ReflowHint::AlwaysReflow
        } else {
            hint
        };
        self.pending_repositioning = false;
    }

    fn area_count(&self) -> usize {
        self.area_count
    }

    fn reset_placement(&mut self, scene: &mut Scene) {
        remove_own_areas(scene, self.id, self.area_count);
        self.area_count = 0;
    }

    fn reflow_hint(&self) -> ReflowHint {
        self.reflow_hint
    }

    fn mark_repositioning(&mut self, target: NodeId) -> bool {
        if target == self.id {
            self.pending_repositioning = true;
        }
        target == self.id
    }

    fn pending_repositioning(&self) -> bool {
        self.pending_repositioning
    }
}
