//! Scalar renderers: booleans, integers, reals, complex values and text

use crate::fields::{
    boolean_coefficient, complex_coefficient, integer_coefficient, line_metrics,
    real_coefficient, text_coefficient, CoefficientData, FieldFonts, VerticalMetrics,
};
use crate::{ErrorMarker, PresentationArea, PresentationGenerator, ValueRequest};
use doc_model::{Color, ValueKind};
use render_model::{GraphicsGroup, ItemId, PlacementContext, Point, Size, TextEntry};
use text_engine::{Font, FontMetrics};

/// Renderer for a single-coefficient value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarGenerator {
    kind: ValueKind,
}

impl ScalarGenerator {
    pub const BOOLEAN: ScalarGenerator = ScalarGenerator::new(ValueKind::Boolean);
    pub const INTEGER: ScalarGenerator = ScalarGenerator::new(ValueKind::Integer);
    pub const REAL: ScalarGenerator = ScalarGenerator::new(ValueKind::Real);
    pub const COMPLEX: ScalarGenerator = ScalarGenerator::new(ValueKind::Complex);
    pub const TEXT: ScalarGenerator = ScalarGenerator::new(ValueKind::Text);

    pub const fn new(kind: ValueKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Convert and format the value, or report why it cannot be shown
    fn coefficient(
        &self,
        request: &ValueRequest<'_>,
        fonts: &FieldFonts,
        metrics: &dyn FontMetrics,
    ) -> CoefficientData {
        let value = request.value;
        let format = request.format;
        let data = match self.kind {
            ValueKind::Boolean => value
                .try_to_boolean()
                .map(|v| boolean_coefficient(v, format, fonts, metrics)),
            ValueKind::Integer => value
                .try_to_integer()
                .map(|v| integer_coefficient(v, format, fonts, metrics)),
            ValueKind::Real => value
                .try_to_real()
                .map(|v| real_coefficient(v, format, fonts, metrics)),
            ValueKind::Complex => value
                .try_to_complex()
                .map(|v| complex_coefficient(v, format, fonts, metrics)),
            ValueKind::Text => value
                .try_to_text()
                .map(|v| text_coefficient(v, fonts, metrics)),
            _ => None,
        };

        data.unwrap_or_else(|| {
            tracing::debug!(kind = ?self.kind, value = ?value.kind(), "value conversion failed");
            text_coefficient(&ErrorMarker::ConversionFailed.to_string(), fonts, metrics)
        })
    }
}

/// Metrics of a single coefficient: never shorter than a plain line
fn coefficient_metrics(
    data: &CoefficientData,
    fonts: &FieldFonts,
    metrics: &dyn FontMetrics,
) -> VerticalMetrics {
    let plain = line_metrics(fonts, metrics, false, false);
    let ascent = plain.ascent.max(data.ascent());
    let descent = plain.descent().max(data.descent());
    VerticalMetrics {
        height: ascent + descent,
        ascent,
    }
}

impl PresentationGenerator for ScalarGenerator {
    fn calculate_height(&self, metrics: &dyn FontMetrics, request: &ValueRequest<'_>) -> VerticalMetrics {
        let fonts = request.fonts(metrics);
        let data = self.coefficient(request, &fonts, metrics);
        coefficient_metrics(&data, &fonts, metrics)
    }

    fn render(
        &self,
        ctx: &mut PlacementContext<'_>,
        item: ItemId,
        request: &ValueRequest<'_>,
        _maximum: Size,
    ) -> PresentationArea {
        let fonts = request.fonts(ctx.metrics);
        let data = self.coefficient(request, &fonts, ctx.metrics);
        let line = coefficient_metrics(&data, &fonts, ctx.metrics);
        draw_coefficient(ctx, item, &data, line, fonts.color)
    }
}

/// Replace the contents of `item` with a single coefficient
pub(crate) fn draw_coefficient(
    ctx: &mut PlacementContext<'_>,
    item: ItemId,
    data: &CoefficientData,
    line: VerticalMetrics,
    color: Color,
) -> PresentationArea {
    let size = Size::new(data.width(), line.height);
    if let Some(group) = ctx.scene.get_mut(item) {
        group.defer_updates();
        let used = data.draw(group, 0, Point::new(0.0, line.ascent), color);
        group.truncate_entries(used);
        group.set_size(size, line.ascent);
        group.restore_updates();
    }
    PresentationArea {
        item,
        size,
        ascent: line.ascent,
    }
}

/// Metrics of a plain text run in `font`
pub fn text_metrics(metrics: &dyn FontMetrics, font: &Font) -> VerticalMetrics {
    VerticalMetrics {
        height: metrics.height(font),
        ascent: metrics.ascent(font),
    }
}

/// New group holding `text` on its baseline
pub fn text_area(
    ctx: &mut PlacementContext<'_>,
    text: &str,
    font: &Font,
    color: Color,
) -> PresentationArea {
    let line = text_metrics(ctx.metrics, font);
    let size = Size::new(ctx.metrics.horizontal_advance(font, text), line.height);

    let mut group = GraphicsGroup::new();
    let mut entry = TextEntry::new(text, font.clone(), Point::new(0.0, line.ascent));
    entry.color = color;
    group.append_text(entry);
    group.set_size(size, line.ascent);

    PresentationArea {
        item: ctx.scene.insert(group),
        size,
        ascent: line.ascent,
    }
}

/// New group showing `marker` in the request's base font
pub fn marker_area(
    ctx: &mut PlacementContext<'_>,
    marker: ErrorMarker,
    request: &ValueRequest<'_>,
) -> PresentationArea {
    let fonts = request.fonts(ctx.metrics);
    text_area(ctx, &marker.to_string(), &fonts.base, fonts.color)
}
