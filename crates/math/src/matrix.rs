//! Matrix layout with row and column elision
//!
//! Large matrices are shown as a few leading and trailing rows and columns
//! with ellipses standing in for the rest. How many rows fit is decided by
//! the height on offer; how many columns fit is decided row by row and the
//! narrowest row wins.

use crate::fields::{line_metrics, text_coefficient, CoefficientData, FieldFonts, VerticalMetrics};
use crate::PresentationArea;
use doc_model::ValueFormat;
use render_model::{BracketStyle, GraphicsGroup, ItemId, PlacementContext, Point, Rect, Size, TextEntry};
use text_engine::FontMetrics;

const HORIZONTAL_ELLIPSIS: &str = "\u{22EF}";
const VERTICAL_ELLIPSIS: &str = "\u{22EE}";
const DIAGONAL_ELLIPSIS: &str = "\u{22F1}";

/// Split `total` entries into shown leading and trailing counts. Shows at
/// least one entry when there is any.
fn visible_span(total: usize, leading: usize, trailing: usize) -> (usize, usize) {
    if leading + trailing >= total {
        (total, 0)
    } else if leading + trailing == 0 {
        (total.min(1), 0)
    } else {
        (leading, trailing)
    }
}

// =============================================================================
// Matrix context
// =============================================================================

/// State shared by every matrix context
pub struct MatrixContextBase<'a> {
    pub format: &'a ValueFormat,
    pub fonts: FieldFonts,
    pub metrics: &'a dyn FontMetrics,
    rows: usize,
    columns: usize,
    leading_rows: usize,
    trailing_rows: usize,
    leading_columns: usize,
    trailing_columns: usize,
}

impl<'a> MatrixContextBase<'a> {
    pub fn new(
        rows: usize,
        columns: usize,
        format: &'a ValueFormat,
        relative_scale: f32,
        metrics: &'a dyn FontMetrics,
    ) -> Self {
        let (leading_rows, trailing_rows) =
            visible_span(rows, format.leading_rows, format.trailing_rows);
        let (leading_columns, trailing_columns) =
            visible_span(columns, format.leading_columns, format.trailing_columns);

        Self {
            format,
            fonts: FieldFonts::for_format(format, relative_scale, metrics),
            metrics,
            rows,
            columns,
            leading_rows,
            trailing_rows,
            leading_columns,
            trailing_columns,
        }
    }
}

/// Typed access to the coefficients of one matrix
pub trait MatrixContext {
    fn base(&self) -> &MatrixContextBase<'_>;

    /// Coefficient text for the cell at `row`, `column`
    fn create_coefficient(&self, row: usize, column: usize) -> CoefficientData;

    fn has_superscripts(&self) -> bool {
        false
    }

    fn has_subscripts(&self) -> bool {
        false
    }

    fn number_rows(&self) -> usize {
        self.base().rows
    }

    fn number_columns(&self) -> usize {
        self.base().columns
    }

    fn leading_rows(&self) -> usize {
        self.base().leading_rows
    }

    fn trailing_rows(&self) -> usize {
        self.base().trailing_rows
    }

    fn leading_columns(&self) -> usize {
        self.base().leading_columns
    }

    fn trailing_columns(&self) -> usize {
        self.base().trailing_columns
    }

    fn first_trailing_row(&self) -> usize {
        self.number_rows() - self.trailing_rows()
    }

    fn first_trailing_column(&self) -> usize {
        self.number_columns() - self.trailing_columns()
    }

    /// Height and ascent shared by every row
    fn row_metrics(&self) -> VerticalMetrics {
        let base = self.base();
        line_metrics(
            &base.fonts,
            base.metrics,
            self.has_superscripts(),
            self.has_subscripts(),
        )
    }
}

// =============================================================================
// Row planning
// =============================================================================

/// Rows actually drawn for a given height budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPlan {
    pub leading: usize,
    pub trailing: usize,
    /// Whether a row of vertical ellipses separates leading and trailing rows
    pub ellipsis: bool,
}

impl RowPlan {
    pub fn displayed_rows(&self) -> usize {
        self.leading + self.trailing + usize::from(self.ellipsis)
    }
}

/// Fit `leading` and `trailing` rows of `total` into `space_limited` rows.
///
/// Leading rows are kept in preference to trailing ones; the ellipsis row
/// counts against the budget. A single-row budget shows the first row alone.
pub fn plan_rows(total: usize, leading: usize, trailing: usize, space_limited: usize) -> RowPlan {
    let ellipsis = leading + trailing < total;
    let wanted = leading + trailing + usize::from(ellipsis);
    if wanted <= space_limited {
        return RowPlan {
            leading,
            trailing,
            ellipsis,
        };
    }

    if space_limited <= 1 {
        return RowPlan {
            leading: usize::from(total > 0),
            trailing: 0,
            ellipsis: false,
        };
    }

    let rows_to_show = space_limited - 1;
    let kept_leading = leading.min(rows_to_show).max(usize::from(total > 0));
    let kept_trailing = trailing.min(rows_to_show.saturating_sub(kept_leading));
    RowPlan {
        leading: kept_leading,
        trailing: kept_trailing,
        ellipsis: true,
    }
}

/// Matrix baseline: slightly above the vertical center
fn matrix_ascent(height: f32, row: VerticalMetrics) -> f32 {
    height / 2.0 - row.ascent / 4.0
}

/// Height and ascent of the matrix when every requested row is shown
pub fn calculate_matrix_height(context: &dyn MatrixContext) -> VerticalMetrics {
    let row = context.row_metrics();
    let plan = plan_rows(
        context.number_rows(),
        context.leading_rows(),
        context.trailing_rows(),
        usize::MAX,
    );
    let height = row.height * plan.displayed_rows().max(1) as f32;
    VerticalMetrics {
        height,
        ascent: matrix_ascent(height, row),
    }
}

// =============================================================================
// Rendering
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnSlot {
    Data(usize),
    Ellipsis,
}

fn column_slots(context: &dyn MatrixContext) -> Vec<ColumnSlot> {
    let columns = context.number_columns();
    let mut slots: Vec<ColumnSlot> = (0..context.leading_columns()).map(ColumnSlot::Data).collect();
    if context.leading_columns() + context.trailing_columns() < columns {
        slots.push(ColumnSlot::Ellipsis);
    }
    slots.extend((context.first_trailing_column()..columns).map(ColumnSlot::Data));
    slots
}

enum DisplayRow {
    Data(usize),
    Ellipsis,
}

/// Glyph text centered within the column `(x, width)`
fn draw_glyph(
    group: &mut GraphicsGroup,
    slot: usize,
    glyph: &str,
    fonts: &FieldFonts,
    metrics: &dyn FontMetrics,
    (x, width): (f32, f32),
    baseline: f32,
) -> usize {
    let advance = metrics.horizontal_advance(&fonts.base, glyph);
    let mut entry = TextEntry::new(
        glyph,
        fonts.base.clone(),
        Point::new(x + (width - advance) / 2.0, baseline),
    );
    entry.color = fonts.color;
    group.set_entry(slot, entry);
    slot + 1
}

/// Draw the matrix into `item`, eliding rows and columns that do not fit
/// `maximum`. Checks the tracker between rows; an aborted pass leaves a
/// valid matrix showing the rows built so far.
pub fn render_matrix(
    ctx: &mut PlacementContext<'_>,
    item: ItemId,
    context: &dyn MatrixContext,
    maximum: Size,
) -> PresentationArea {
    let base = context.base();
    let metrics = base.metrics;
    let fonts = &base.fonts;
    let row = context.row_metrics();
    let paren_width = metrics.horizontal_advance(&fonts.base, "(");
    let column_gap = metrics.horizontal_advance(&fonts.base, " ");
    let ellipsis_width = metrics.horizontal_advance(&fonts.base, HORIZONTAL_ELLIPSIS);

    let rows = context.number_rows();
    let slots = column_slots(context);

    if rows == 0 || slots.is_empty() {
        let size = Size::new(2.0 * paren_width, row.height);
        return finish(ctx, item, 0, size, matrix_ascent(row.height, row));
    }

    let space_limited = if row.height > 0.0 {
        ((maximum.height / row.height).floor() as usize).max(1)
    } else {
        1
    };
    let plan = plan_rows(
        rows,
        context.leading_rows(),
        context.trailing_rows(),
        space_limited,
    );
    let data_rows: Vec<usize> = (0..plan.leading).chain(rows - plan.trailing..rows).collect();

    // Build cells row by row, stopping each row once it overflows
    ctx.tracker.add_new_jobs(data_rows.len() as u64);
    let mut cells: Vec<Vec<CoefficientData>> = Vec::with_capacity(data_rows.len());
    let mut minimum_columns = slots.len();

    for &data_row in &data_rows {
        if ctx.tracker.abort_placement() {
            tracing::debug!(built = cells.len(), "matrix placement aborted");
            break;
        }

        let mut row_cells = Vec::with_capacity(slots.len());
        let mut running = 2.0 * paren_width;
        for slot in &slots {
            let cell = match slot {
                ColumnSlot::Data(column) => context.create_coefficient(data_row, *column),
                ColumnSlot::Ellipsis => text_coefficient(HORIZONTAL_ELLIPSIS, fonts, metrics),
            };
            running += cell.width() + column_gap;
            row_cells.push(cell);
            if running > maximum.width {
                break;
            }
        }

        minimum_columns = minimum_columns.min(row_cells.len());
        cells.push(row_cells);
        ctx.tracker.completed_job();
    }

    let mut widths = vec![0.0f32; minimum_columns];
    for row_cells in &cells {
        for (width, cell) in widths.iter_mut().zip(row_cells) {
            *width = width.max(cell.width());
        }
    }

    // Keep columns while they fit along with room for a trailing ellipsis
    let mut column_x = Vec::with_capacity(minimum_columns);
    let mut x = paren_width;
    for (index, width) in widths.iter().enumerate() {
        let reserve = if index + 1 == slots.len() {
            0.0
        } else {
            column_gap + ellipsis_width
        };
        if !column_x.is_empty() && x + width + reserve + paren_width > maximum.width {
            break;
        }
        column_x.push(x);
        x += width + column_gap;
    }
    let shown = column_x.len();
    // A kept ellipsis column already marks the cut
    let truncated = shown < slots.len() && shown > 0 && slots[shown - 1] != ColumnSlot::Ellipsis;
    let ellipsis_x = x;

    let mut display = Vec::with_capacity(plan.displayed_rows());
    let built_leading = plan.leading.min(cells.len());
    display.extend((0..built_leading).map(DisplayRow::Data));
    if plan.ellipsis && cells.len() >= plan.leading {
        display.push(DisplayRow::Ellipsis);
    }
    display.extend((built_leading..cells.len()).map(DisplayRow::Data));

    let Some(group) = ctx.scene.get_mut(item) else {
        return PresentationArea {
            item,
            size: Size::zero(),
            ascent: 0.0,
        };
    };
    group.defer_updates();

    let mut slot = 0;
    for (index, display_row) in display.iter().enumerate() {
        let baseline = index as f32 * row.height + row.ascent;
        match display_row {
            DisplayRow::Data(built) => {
                for column in 0..shown {
                    let cell = &cells[*built][column];
                    let cell_x = column_x[column] + (widths[column] - cell.width()) / 2.0;
                    slot = cell.draw(group, slot, Point::new(cell_x, baseline), fonts.color);
                }
                if truncated {
                    slot = draw_glyph(
                        group,
                        slot,
                        HORIZONTAL_ELLIPSIS,
                        fonts,
                        metrics,
                        (ellipsis_x, ellipsis_width),
                        baseline,
                    );
                }
            }
            DisplayRow::Ellipsis => {
                for column in 0..shown {
                    let glyph = match slots[column] {
                        ColumnSlot::Ellipsis => DIAGONAL_ELLIPSIS,
                        ColumnSlot::Data(_) => VERTICAL_ELLIPSIS,
                    };
                    slot = draw_glyph(
                        group,
                        slot,
                        glyph,
                        fonts,
                        metrics,
                        (column_x[column], widths[column]),
                        baseline,
                    );
                }
                if truncated {
                    slot = draw_glyph(
                        group,
                        slot,
                        DIAGONAL_ELLIPSIS,
                        fonts,
                        metrics,
                        (ellipsis_x, ellipsis_width),
                        baseline,
                    );
                }
            }
        }
    }

    let right = if truncated {
        ellipsis_x + ellipsis_width
    } else {
        column_x[shown - 1] + widths[shown - 1]
    };
    let height = display.len().max(1) as f32 * row.height;
    let size = Size::new(right + paren_width, height);
    group.restore_updates();

    finish(ctx, item, slot, size, matrix_ascent(height, row))
}

/// Trim unused entries and set the bracket frame and size
fn finish(
    ctx: &mut PlacementContext<'_>,
    item: ItemId,
    used_entries: usize,
    size: Size,
    ascent: f32,
) -> PresentationArea {
    if let Some(group) = ctx.scene.get_mut(item) {
        group.defer_updates();
        group.truncate_entries(used_entries);
        group.set_brackets(BracketStyle::Bracket, BracketStyle::Bracket);
        group.set_bracket_rect(Rect::new(0.0, 0.0, size.width, size.height));
        group.set_size(size, ascent);
        group.restore_updates();
    }
    PresentationArea { item, size, ascent }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_visible_span() {
        assert_eq!(visible_span(3, 5, 1), (3, 0));
        assert_eq!(visible_span(10, 5, 1), (5, 1));
        assert_eq!(visible_span(10, 0, 0), (1, 0));
        assert_eq!(visible_span(0, 0, 0), (0, 0));
    }

    #[test]
    fn test_plan_rows_fits() {
        let plan = plan_rows(100, 5, 1, 10);
        assert_eq!(
            plan,
            RowPlan {
                leading: 5,
                trailing: 1,
                ellipsis: true
            }
        );
        assert_eq!(plan.displayed_rows(), 7);

        let plan = plan_rows(3, 3, 0, 3);
        assert!(!plan.ellipsis);
        assert_eq!(plan.displayed_rows(), 3);
    }

    #[test]
    fn test_plan_rows_shrinks_trailing_first() {
        let plan = plan_rows(100, 5, 1, 6);
        assert_eq!(plan.leading, 5);
        assert_eq!(plan.trailing, 0);
        assert!(plan.ellipsis);

        let plan = plan_rows(100, 5, 1, 3);
        assert_eq!(plan.leading, 2);
        assert_eq!(plan.trailing, 0);
    }

    #[test]
    fn test_plan_rows_keeps_one_row() {
        let plan = plan_rows(100, 5, 1, 1);
        assert_eq!(
            plan,
            RowPlan {
                leading: 1,
                trailing: 0,
                ellipsis: false
            }
        );
        assert_eq!(plan.displayed_rows(), 1);

        let plan = plan_rows(100, 5, 1, 2);
        assert_eq!(plan.leading, 1);
        assert!(plan.ellipsis);
        assert_eq!(plan.displayed_rows(), 2);
    }

    proptest! {
        #[test]
        fn prop_plan_respects_budget(
            total in 1usize..200,
            leading in 0usize..20,
            trailing in 0usize..20,
            space in 1usize..50,
        ) {
            let (leading, trailing) = visible_span(total, leading, trailing);
            let plan = plan_rows(total, leading, trailing, space);
            prop_assert!(plan.displayed_rows() <= space);
            prop_assert!(plan.leading <= leading);
            prop_assert!(plan.trailing <= trailing);
            prop_assert!(plan.leading >= 1);
            if plan.leading < leading {
                prop_assert_eq!(plan.trailing, 0);
            }
        }
    }
}
