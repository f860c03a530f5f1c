//! Generator lookup by value kind

use crate::fields::line_metrics;
use crate::scalar::marker_area;
use crate::{
    CompositeGenerator, ErrorMarker, MathResult, MatrixGenerator, PresentationArea,
    PresentationGenerator, ScalarGenerator, ValueRequest, VerticalMetrics,
};
use doc_model::{Value, ValueKind};
use render_model::{ItemId, PlacementContext, Size};
use std::fmt;
use text_engine::FontMetrics;

static BOOLEAN: ScalarGenerator = ScalarGenerator::BOOLEAN;
static INTEGER: ScalarGenerator = ScalarGenerator::INTEGER;
static REAL: ScalarGenerator = ScalarGenerator::REAL;
static COMPLEX: ScalarGenerator = ScalarGenerator::COMPLEX;
static TEXT: ScalarGenerator = ScalarGenerator::TEXT;
static MATRIX: MatrixGenerator = MatrixGenerator;
static SET: CompositeGenerator = CompositeGenerator::SET;
static TUPLE: CompositeGenerator = CompositeGenerator::TUPLE;

const fn entry(generator: &'static dyn PresentationGenerator) -> Option<&'static dyn PresentationGenerator> {
    Some(generator)
}

static STANDARD: GeneratorRegistry = GeneratorRegistry {
    table: [
        entry(&BOOLEAN),
        entry(&INTEGER),
        entry(&REAL),
        entry(&COMPLEX),
        entry(&TEXT),
        entry(&MATRIX),
        entry(&MATRIX),
        entry(&MATRIX),
        entry(&MATRIX),
        entry(&SET),
        entry(&TUPLE),
        None,
    ],
};

/// Table of generators indexed by [`ValueKind`]
#[derive(Clone, Copy)]
pub struct GeneratorRegistry {
    table: [Option<&'static dyn PresentationGenerator>; ValueKind::COUNT],
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<ValueKind> = ValueKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.table[kind.index()].is_some())
            .collect();
        f.debug_struct("GeneratorRegistry")
            .field("registered", &registered)
            .finish()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        *Self::standard()
    }
}

impl GeneratorRegistry {
    /// Registry with no generators
    pub const fn empty() -> Self {
        Self {
            table: [None; ValueKind::COUNT],
        }
    }

    /// Registry covering every built-in value kind
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    pub fn register(&mut self, kind: ValueKind, generator: &'static dyn PresentationGenerator) {
        self.table[kind.index()] = Some(generator);
    }

    pub fn generator(&self, kind: ValueKind) -> Option<&'static dyn PresentationGenerator> {
        self.table[kind.index()]
    }

    /// Generator for `value`, or the marker to show instead
    pub fn resolve(&self, value: &Value) -> Result<&'static dyn PresentationGenerator, ErrorMarker> {
        if let Value::Opaque { type_id } = value {
            return Err(ErrorMarker::UnknownType(*type_id));
        }
        let kind = value.kind();
        self.generator(kind)
            .ok_or(ErrorMarker::MissingGenerator(kind.index()))
    }

    pub fn calculate_height(&self, metrics: &dyn FontMetrics, request: &ValueRequest<'_>) -> VerticalMetrics {
        match self.resolve(request.value) {
            Ok(generator) => generator.calculate_height(metrics, request),
            Err(_) => line_metrics(&request.fonts(metrics), metrics, false, false),
        }
    }

    /// Draw `request` into a new group, showing a marker when it has no generator
    pub fn to_graphics_item(
        &self,
        ctx: &mut PlacementContext<'_>,
        request: &ValueRequest<'_>,
        maximum: Size,
    ) -> PresentationArea {
        match self.resolve(request.value) {
            Ok(generator) => generator.to_graphics_item(ctx, request, maximum),
            Err(marker) => {
                tracing::warn!(%marker, "no presentation generator for value");
                marker_area(ctx, marker, request)
            }
        }
    }

    /// Redraw `request` into `item`. A value without a generator replaces
    /// the item with a marker.
    pub fn update_graphics_item(
        &self,
        ctx: &mut PlacementContext<'_>,
        item: ItemId,
        request: &ValueRequest<'_>,
        maximum: Size,
    ) -> MathResult<PresentationArea> {
        match self.resolve(request.value) {
            Ok(generator) => generator.update_graphics_item(ctx, item, request, maximum),
            Err(marker) => {
                ctx.scene.require_mut(item)?;
                ctx.scene.schedule_removal(item);
                Ok(marker_area(ctx, marker, request))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::ValueFormat;
    use render_model::{NullTracker, Scene};
    use text_engine::ApproximateMetrics;

    fn marker_text(registry: &GeneratorRegistry, value: &Value) -> String {
        let format = ValueFormat::default();
        let mut scene = Scene::new();
        let mut tracker = NullTracker;
        let mut ctx = PlacementContext::new(&mut scene, &mut tracker, &ApproximateMetrics);
        let request = ValueRequest::new(value, &format, registry);
        let area = registry.to_graphics_item(&mut ctx, &request, Size::new(100.0, 100.0));
        scene.get(area.item).unwrap().entries()[0].text.clone()
    }

    #[test]
    fn test_standard_covers_builtin_kinds() {
        let registry = GeneratorRegistry::standard();
        for kind in ValueKind::ALL {
            assert_eq!(
                registry.generator(kind).is_some(),
                kind != ValueKind::Opaque,
                "{kind:?}"
            );
        }
        assert!(registry.generator(ValueKind::Set).unwrap().is_wrapping());
        assert!(!registry.generator(ValueKind::RealMatrix).unwrap().is_wrapping());
    }

    #[test]
    fn test_unknown_type_marker() {
        let text = marker_text(GeneratorRegistry::standard(), &Value::Opaque { type_id: 42 });
        assert_eq!(text, "*** UNKNOWN TYPE 42 ***");
    }

    #[test]
    fn test_missing_generator_marker() {
        let registry = GeneratorRegistry::empty();
        let text = marker_text(&registry, &Value::Integer(3));
        assert_eq!(text, format!("*** MISSING GENERATOR {} ***", ValueKind::Integer.index()));
    }

    #[test]
    fn test_register_overrides() {
        let mut registry = GeneratorRegistry::empty();
        registry.register(ValueKind::Integer, &INTEGER);
        assert!(registry.generator(ValueKind::Integer).is_some());
        assert_eq!(marker_text(&registry, &Value::Integer(3)), "3");
    }
}
