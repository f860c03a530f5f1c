//! Matrix contexts for each coefficient type, and the matrix generator

use crate::fields::{
    boolean_coefficient, complex_coefficient, integer_coefficient, line_metrics,
    real_coefficient, text_coefficient, CoefficientData,
};
use crate::matrix::{calculate_matrix_height, render_matrix, MatrixContext, MatrixContextBase};
use crate::scalar::draw_coefficient;
use crate::{ErrorMarker, PresentationArea, PresentationGenerator, ValueRequest, VerticalMetrics};
use doc_model::{Complex, Matrix, Value, ValueFormat};
use render_model::{ItemId, PlacementContext, ReflowHint, Size};
use text_engine::FontMetrics;

fn uses_superscripts(format: &ValueFormat) -> bool {
    format.style.may_use_exponent() && !format.style.is_computer()
}

pub struct BooleanMatrixContext<'a> {
    base: MatrixContextBase<'a>,
    matrix: &'a Matrix<bool>,
}

impl<'a> BooleanMatrixContext<'a> {
    pub fn new(
        matrix: &'a Matrix<bool>,
        format: &'a ValueFormat,
        relative_scale: f32,
        metrics: &'a dyn FontMetrics,
    ) -> Self {
        Self {
            base: MatrixContextBase::new(matrix.rows(), matrix.columns(), format, relative_scale, metrics),
            matrix,
        }
    }
}

impl MatrixContext for BooleanMatrixContext<'_> {
    fn base(&self) -> &MatrixContextBase<'_> {
        &self.base
    }

    fn create_coefficient(&self, row: usize, column: usize) -> CoefficientData {
        let base = &self.base;
        match self.matrix.at(row, column) {
            Some(value) => boolean_coefficient(*value, base.format, &base.fonts, base.metrics),
            None => missing_coefficient(base),
        }
    }
}

pub struct IntegerMatrixContext<'a> {
    base: MatrixContextBase<'a>,
    matrix: &'a Matrix<i64>,
}

impl<'a> IntegerMatrixContext<'a> {
    pub fn new(
        matrix: &'a Matrix<i64>,
        format: &'a ValueFormat,
        relative_scale: f32,
        metrics: &'a dyn FontMetrics,
    ) -> Self {
        Self {
            base: MatrixContextBase::new(matrix.rows(), matrix.columns(), format, relative_scale, metrics),
            matrix,
        }
    }
}

impl MatrixContext for IntegerMatrixContext<'_> {
    fn base(&self) -> &MatrixContextBase<'_> {
        &self.base
    }

    fn create_coefficient(&self, row: usize, column: usize) -> CoefficientData {
        let base = &self.base;
        match self.matrix.at(row, column) {
            Some(value) => integer_coefficient(*value, base.format, &base.fonts, base.metrics),
            None => missing_coefficient(base),
        }
    }
}

pub struct RealMatrixContext<'a> {
    base: MatrixContextBase<'a>,
    matrix: &'a Matrix<f64>,
}

impl<'a> RealMatrixContext<'a> {
    pub fn new(
        matrix: &'a Matrix<f64>,
        format: &'a ValueFormat,
        relative_scale: f32,
        metrics: &'a dyn FontMetrics,
    ) -> Self {
        Self {
            base: MatrixContextBase::new(matrix.rows(), matrix.columns(), format, relative_scale, metrics),
            matrix,
        }
    }
}

impl MatrixContext for RealMatrixContext<'_> {
    fn base(&self) -> &MatrixContextBase<'_> {
        &self.base
    }

    fn has_superscripts(&self) -> bool {
        uses_superscripts(self.base.format)
    }

    fn create_coefficient(&self, row: usize, column: usize) -> CoefficientData {
        let base = &self.base;
        match self.matrix.at(row, column) {
            Some(value) => real_coefficient(*value, base.format, &base.fonts, base.metrics),
            None => missing_coefficient(base),
        }
    }
}

pub struct ComplexMatrixContext<'a> {
    base: MatrixContextBase<'a>,
    matrix: &'a Matrix<Complex>,
}

impl<'a> ComplexMatrixContext<'a> {
    pub fn new(
        matrix: &'a Matrix<Complex>,
        format: &'a ValueFormat,
        relative_scale: f32,
        metrics: &'a dyn FontMetrics,
    ) -> Self {
        Self {
            base: MatrixContextBase::new(matrix.rows(), matrix.columns(), format, relative_scale, metrics),
            matrix,
        }
    }
}

impl MatrixContext for ComplexMatrixContext<'_> {
    fn base(&self) -> &MatrixContextBase<'_> {
        &self.base
    }

    fn has_superscripts(&self) -> bool {
        uses_superscripts(self.base.format)
    }

    fn create_coefficient(&self, row: usize, column: usize) -> CoefficientData {
        let base = &self.base;
        match self.matrix.at(row, column) {
            Some(value) => complex_coefficient(*value, base.format, &base.fonts, base.metrics),
            None => missing_coefficient(base),
        }
    }
}

fn missing_coefficient(base: &MatrixContextBase<'_>) -> CoefficientData {
    text_coefficient(
        &ErrorMarker::ConversionFailed.to_string(),
        &base.fonts,
        base.metrics,
    )
}

// =============================================================================
// Generator
// =============================================================================

/// Renderer shared by the four matrix kinds
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixGenerator;

impl MatrixGenerator {
    /// Run `f` with the context matching the value's coefficient type
    fn with_context<R>(
        request: &ValueRequest<'_>,
        metrics: &dyn FontMetrics,
        f: impl FnOnce(&dyn MatrixContext) -> R,
    ) -> Option<R> {
        let format = request.format;
        let scale = request.relative_scale;
        match request.value {
            Value::BooleanMatrix(m) => Some(f(&BooleanMatrixContext::new(m, format, scale, metrics))),
            Value::IntegerMatrix(m) => Some(f(&IntegerMatrixContext::new(m, format, scale, metrics))),
            Value::RealMatrix(m) => Some(f(&RealMatrixContext::new(m, format, scale, metrics))),
            Value::ComplexMatrix(m) => Some(f(&ComplexMatrixContext::new(m, format, scale, metrics))),
            _ => None,
        }
    }
}

impl PresentationGenerator for MatrixGenerator {
    fn calculate_height(&self, metrics: &dyn FontMetrics, request: &ValueRequest<'_>) -> VerticalMetrics {
        Self::with_context(request, metrics, calculate_matrix_height).unwrap_or_else(|| {
            line_metrics(&request.fonts(metrics), metrics, false, false)
        })
    }

    fn render(
        &self,
        ctx: &mut PlacementContext<'_>,
        item: ItemId,
        request: &ValueRequest<'_>,
        maximum: Size,
    ) -> PresentationArea {
        let metrics = ctx.metrics;
        if let Some(area) =
            Self::with_context(request, metrics, |context| render_matrix(ctx, item, context, maximum))
        {
            return area;
        }

        tracing::debug!(kind = ?request.value.kind(), "matrix generator given a non-matrix value");
        let fonts = request.fonts(metrics);
        let data = text_coefficient(&ErrorMarker::ConversionFailed.to_string(), &fonts, metrics);
        let line = line_metrics(&fonts, metrics, false, false);
        draw_coefficient(ctx, item, &data, line, fonts.color)
    }

    fn reflow_hint(&self) -> ReflowHint {
        ReflowHint::AlwaysReflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorRegistry;
    use doc_model::NumericStyle;
    use render_model::{BracketStyle, NullTracker, PlacementTracker, ProgressTracker, Scene};
    use text_engine::ApproximateMetrics;

    fn column_matrix(rows: usize) -> Value {
        Value::IntegerMatrix(Matrix::from_fn(rows, 1, |r, _| r as i64))
    }

    fn row_matrix(columns: usize) -> Value {
        Value::IntegerMatrix(Matrix::from_fn(1, columns, |_, c| c as i64))
    }

    fn render_with(
        value: &Value,
        format: &ValueFormat,
        maximum: Size,
        tracker: &mut dyn PlacementTracker,
    ) -> (Scene, PresentationArea) {
        let mut scene = Scene::new();
        let mut ctx = PlacementContext::new(&mut scene, tracker, &ApproximateMetrics);
        let request = ValueRequest::new(value, format, GeneratorRegistry::standard());
        let area = MatrixGenerator.to_graphics_item(&mut ctx, &request, maximum);
        (scene, area)
    }

    fn render(value: &Value, format: &ValueFormat, maximum: Size) -> (Scene, PresentationArea) {
        render_with(value, format, maximum, &mut NullTracker)
    }

    fn texts(scene: &Scene, item: ItemId) -> Vec<String> {
        scene
            .get(item)
            .unwrap()
            .entries()
            .iter()
            .map(|e| e.text.clone())
            .collect()
    }

    #[test]
    fn test_rows_elided_with_vertical_ellipsis() {
        let value = column_matrix(100);
        let format = ValueFormat::default();
        let (scene, area) = render(&value, &format, Size::new(1000.0, 1000.0));

        assert_eq!(
            texts(&scene, area.item),
            ["0", "1", "2", "3", "4", "\u{22EE}", "99"]
        );
        assert_eq!(area.size.height, 84.0);
        assert!((area.ascent - 39.6).abs() < 1e-4);

        let group = scene.get(area.item).unwrap();
        assert_eq!(group.brackets(), (BracketStyle::Bracket, BracketStyle::Bracket));
        assert_eq!(group.bracket_rect().height, 84.0);
    }

    #[test]
    fn test_height_budget_limits_rows() {
        let value = column_matrix(100);
        let format = ValueFormat::default();
        let (scene, area) = render(&value, &format, Size::new(1000.0, 36.0));

        assert_eq!(texts(&scene, area.item), ["0", "1", "\u{22EE}"]);
        assert_eq!(area.size.height, 36.0);
    }

    #[test]
    fn test_single_row_budget_shows_first_row() {
        let value = column_matrix(100);
        let format = ValueFormat::default();
        let (scene, area) = render(&value, &format, Size::new(1000.0, 12.0));

        assert_eq!(texts(&scene, area.item), ["0"]);
        assert_eq!(area.size.height, 12.0);
    }

    #[test]
    fn test_wide_trailing_column_leaves_single_ellipsis() {
        let value = Value::IntegerMatrix(Matrix::from_fn(1, 20, |_, c| {
            if c == 19 {
                123_456_789
            } else {
                c as i64
            }
        }));
        let format = ValueFormat::default();

        for width in [92.0, 100.0, 116.0] {
            let (scene, area) = render(&value, &format, Size::new(width, 1000.0));
            assert_eq!(
                texts(&scene, area.item),
                ["0", "1", "2", "3", "4", "\u{22EF}"],
                "width {width}"
            );
            assert!((area.size.width - 73.2).abs() < 1e-3);
        }
    }

    #[test]
    fn test_columns_elided_with_ellipsis_column() {
        let value = row_matrix(20);
        let format = ValueFormat::default();
        let (scene, area) = render(&value, &format, Size::new(1000.0, 1000.0));

        assert_eq!(
            texts(&scene, area.item),
            ["0", "1", "2", "3", "4", "\u{22EF}", "19"]
        );
        assert!((area.size.width - 91.2).abs() < 1e-3);
    }

    #[test]
    fn test_narrow_width_truncates_columns() {
        let value = row_matrix(20);
        let format = ValueFormat::default();
        let (scene, area) = render(&value, &format, Size::new(40.0, 1000.0));

        assert_eq!(texts(&scene, area.item), ["0", "\u{22EF}"]);
        assert!((area.size.width - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_diagonal_ellipsis_at_intersection() {
        let value = Value::IntegerMatrix(Matrix::from_fn(10, 10, |r, c| (r * 10 + c) as i64));
        let format = ValueFormat::default().with_rows(1, 1).with_columns(1, 1);
        let (scene, area) = render(&value, &format, Size::new(1000.0, 1000.0));

        assert_eq!(
            texts(&scene, area.item),
            ["0", "\u{22EF}", "9", "\u{22EE}", "\u{22F1}", "\u{22EE}", "90", "\u{22EF}", "99"]
        );
    }

    #[test]
    fn test_height_calculation_matches_render() {
        let value = column_matrix(100);
        let format = ValueFormat::default();
        let request = ValueRequest::new(&value, &format, GeneratorRegistry::standard());
        let height = MatrixGenerator.calculate_height(&ApproximateMetrics, &request);
        let (_, area) = render(&value, &format, Size::new(1000.0, 1000.0));
        assert_eq!(height.height, area.size.height);
        assert_eq!(height.ascent, area.ascent);
    }

    #[test]
    fn test_superscripts_grow_rows() {
        let real = Value::RealMatrix(Matrix::from_fn(2, 2, |_, _| 1.0e9));
        let format = ValueFormat::default().with_style(NumericStyle::Scientific);
        let (scene, area) = render(&real, &format, Size::new(1000.0, 1000.0));
        assert!(area.size.height > 24.0);
        assert_eq!(texts(&scene, area.item).len(), 8);
    }

    #[test]
    fn test_abort_leaves_valid_partial_matrix() {
        let value = column_matrix(100);
        let format = ValueFormat::default();
        let mut tracker = ProgressTracker::with_job_limit(2);
        let (scene, area) = render_with(&value, &format, Size::new(1000.0, 1000.0), &mut tracker);

        assert_eq!(tracker.total_jobs(), 6);
        assert_eq!(texts(&scene, area.item), ["0", "1"]);
        assert_eq!(area.size.height, 24.0);
    }

    #[test]
    fn test_update_redraws_in_place() {
        let mut scene = Scene::new();
        let mut tracker = NullTracker;
        let mut ctx = PlacementContext::new(&mut scene, &mut tracker, &ApproximateMetrics);
        let format = ValueFormat::default();

        let tall = column_matrix(100);
        let request = ValueRequest::new(&tall, &format, GeneratorRegistry::standard());
        let area = MatrixGenerator.to_graphics_item(&mut ctx, &request, Size::new(1000.0, 1000.0));

        let small = column_matrix(2);
        let request = ValueRequest::new(&small, &format, GeneratorRegistry::standard());
        let updated = MatrixGenerator
            .update_graphics_item(&mut ctx, area.item, &request, Size::new(1000.0, 1000.0))
            .unwrap();

        assert_eq!(updated.item, area.item);
        assert_eq!(texts(&scene, area.item), ["0", "1"]);
    }

    #[test]
    fn test_empty_matrix_is_bracket_pair() {
        let value = Value::IntegerMatrix(Matrix::from_fn(0, 0, |_, _| 0));
        let format = ValueFormat::default();
        let (scene, area) = render(&value, &format, Size::new(1000.0, 1000.0));
        assert!(texts(&scene, area.item).is_empty());
        assert!((area.size.width - 7.2).abs() < 1e-4);
    }
}
