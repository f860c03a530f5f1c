//! Text fields making up a rendered coefficient
//!
//! A coefficient is a short horizontal run of fields, each with its own font
//! and baseline offset: a mantissa, a raised exponent, an imaginary unit.

use crate::numeric::{format_integer, format_real, NumericText};
use doc_model::{Color, Complex, ValueFormat};
use render_model::{font_for, GraphicsGroup, Point, TextEntry};
use text_engine::{Font, FontMetrics};

/// Size of superscripts relative to the base font
pub const SUPERSCRIPT_SCALE: f32 = 0.75;

/// Superscript baseline raise as a fraction of the base ascent
pub const SUPERSCRIPT_RAISE: f32 = 0.45;

/// Size of subscripts relative to the base font
pub const SUBSCRIPT_SCALE: f32 = 0.75;

/// Subscript baseline drop as a fraction of the base ascent
pub const SUBSCRIPT_DROP: f32 = 0.2;

/// Multiplication sign and base written before a superscript exponent
const TIMES_TEN: &str = "\u{00D7}10";

/// One run of text within a coefficient
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub text: String,
    pub font: Font,
    /// Horizontal offset from the coefficient start and vertical offset from
    /// its baseline (negative is up)
    pub position: Point,
}

/// Fonts and offsets used to build coefficients of one value
#[derive(Debug, Clone)]
pub struct FieldFonts {
    pub base: Font,
    pub superscript: Font,
    pub superscript_raise: f32,
    pub subscript: Font,
    pub subscript_drop: f32,
    pub color: Color,
}

impl FieldFonts {
    pub fn new(base: Font, color: Color, metrics: &dyn FontMetrics) -> Self {
        let superscript = base
            .scaled(SUPERSCRIPT_SCALE)
            .with_weight(base.weight.heavier(1));
        let subscript = base.scaled(SUBSCRIPT_SCALE);
        let ascent = metrics.ascent(&base);

        Self {
            superscript_raise: ascent * SUPERSCRIPT_RAISE,
            subscript_drop: ascent * SUBSCRIPT_DROP,
            base,
            superscript,
            subscript,
            color,
        }
    }

    /// Fonts for a value drawn with `format` at `relative_scale`
    pub fn for_format(format: &ValueFormat, relative_scale: f32, metrics: &dyn FontMetrics) -> Self {
        Self::new(
            font_for(&format.font, relative_scale),
            format.font.color,
            metrics,
        )
    }
}

/// Height and ascent of a line of coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VerticalMetrics {
    pub height: f32,
    pub ascent: f32,
}

impl VerticalMetrics {
    pub fn descent(&self) -> f32 {
        self.height - self.ascent
    }
}

/// Row metrics for coefficients that may carry superscripts or subscripts.
///
/// Every coefficient in a row shares these so baselines line up even when
/// only some cells have exponents.
pub fn line_metrics(
    fonts: &FieldFonts,
    metrics: &dyn FontMetrics,
    superscripts: bool,
    subscripts: bool,
) -> VerticalMetrics {
    let mut ascent = metrics.ascent(&fonts.base);
    let mut descent = metrics.descent(&fonts.base);

    if superscripts {
        ascent = ascent.max(fonts.superscript_raise + metrics.ascent(&fonts.superscript));
        descent = descent.max(metrics.descent(&fonts.superscript) - fonts.superscript_raise);
    }
    if subscripts {
        ascent = ascent.max(metrics.ascent(&fonts.subscript) - fonts.subscript_drop);
        descent = descent.max(fonts.subscript_drop + metrics.descent(&fonts.subscript));
    }

    VerticalMetrics {
        height: ascent + descent,
        ascent,
    }
}

/// Measured fields of a single coefficient
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientData {
    fields: Vec<TextField>,
    width: f32,
    ascent: f32,
    descent: f32,
}

impl CoefficientData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field after the existing ones, `baseline_offset` below the
    /// coefficient baseline
    pub fn push_field(
        &mut self,
        text: impl Into<String>,
        font: &Font,
        baseline_offset: f32,
        metrics: &dyn FontMetrics,
    ) {
        let text = text.into();
        let advance = metrics.horizontal_advance(font, &text);
        self.ascent = self.ascent.max(metrics.ascent(font) - baseline_offset);
        self.descent = self.descent.max(metrics.descent(font) + baseline_offset);
        self.fields.push(TextField {
            text,
            font: font.clone(),
            position: Point::new(self.width, baseline_offset),
        });
        self.width += advance;
    }

    /// Append `suffix` to the text of the last field
    fn extend_last(&mut self, suffix: &str, metrics: &dyn FontMetrics) {
        if let Some(last) = self.fields.last_mut() {
            last.text.push_str(suffix);
            self.width += metrics.horizontal_advance(&last.font, suffix);
        }
    }

    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    /// Write the fields into `group` starting at entry `slot`, with the
    /// coefficient baseline starting at `origin`. Returns the next free slot.
    pub fn draw(&self, group: &mut GraphicsGroup, slot: usize, origin: Point, color: Color) -> usize {
        for (offset, field) in self.fields.iter().enumerate() {
            let mut entry = TextEntry::new(
                field.text.clone(),
                field.font.clone(),
                origin.offset(field.position.x, field.position.y),
            );
            entry.color = color;
            group.set_entry(slot + offset, entry);
        }
        slot + self.fields.len()
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn text_coefficient(text: &str, fonts: &FieldFonts, metrics: &dyn FontMetrics) -> CoefficientData {
    let mut data = CoefficientData::new();
    data.push_field(text, &fonts.base, 0.0, metrics);
    data
}

pub fn boolean_coefficient(
    value: bool,
    format: &ValueFormat,
    fonts: &FieldFonts,
    metrics: &dyn FontMetrics,
) -> CoefficientData {
    text_coefficient(format.boolean_style.text(value), fonts, metrics)
}

pub fn integer_coefficient(
    value: i64,
    format: &ValueFormat,
    fonts: &FieldFonts,
    metrics: &dyn FontMetrics,
) -> CoefficientData {
    text_coefficient(&format_integer(value, format), fonts, metrics)
}

pub fn real_coefficient(
    value: f64,
    format: &ValueFormat,
    fonts: &FieldFonts,
    metrics: &dyn FontMetrics,
) -> CoefficientData {
    let mut data = CoefficientData::new();
    push_number(&mut data, &format_real(value, format), format, fonts, metrics);
    data
}

/// Complex coefficient. The imaginary part carries a forced sign when a real
/// part precedes it, and its unit becomes a separate field when an exponent
/// sits between the mantissa and the unit.
pub fn complex_coefficient(
    value: Complex,
    format: &ValueFormat,
    fonts: &FieldFonts,
    metrics: &dyn FontMetrics,
) -> CoefficientData {
    let mut data = CoefficientData::new();
    let show_imaginary = value.imag != 0.0;
    let show_real = value.real != 0.0 || !show_imaginary;

    if show_real {
        push_number(&mut data, &format_real(value.real, format), format, fonts, metrics);
    }

    if show_imaginary {
        let mut imaginary = format_real(value.imag, format);
        if show_real && !imaginary.mantissa.starts_with(['-', '+']) {
            imaginary.mantissa.insert(0, '+');
        }
        let unit = format.imaginary_unit.symbol();

        push_number(&mut data, &imaginary, format, fonts, metrics);
        if imaginary.exponent.is_some() && !format.style.is_computer() {
            data.push_field(unit, &fonts.base, 0.0, metrics);
        } else {
            data.extend_last(unit, metrics);
        }
    }

    data
}

fn push_number(
    data: &mut CoefficientData,
    number: &NumericText,
    format: &ValueFormat,
    fonts: &FieldFonts,
    metrics: &dyn FontMetrics,
) {
    match &number.exponent {
        None => data.push_field(number.mantissa.clone(), &fonts.base, 0.0, metrics),
        Some(_) if format.style.is_computer() => {
            data.push_field(number.inline(format.case), &fonts.base, 0.0, metrics)
        }
        Some(exponent) => {
            data.push_field(format!("{}{}", number.mantissa, TIMES_TEN), &fonts.base, 0.0, metrics);
            data.push_field(
                exponent.clone(),
                &fonts.superscript,
                -fonts.superscript_raise,
                metrics,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::NumericStyle;
    use text_engine::ApproximateMetrics;

    fn fonts() -> FieldFonts {
        FieldFonts::new(Font::new("Serif", 10.0), Color::BLACK, &ApproximateMetrics)
    }

    fn texts(data: &CoefficientData) -> Vec<&str> {
        data.fields().iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_superscript_font() {
        let fonts = fonts();
        assert_eq!(fonts.superscript.point_size, 7.5);
        assert_eq!(fonts.superscript.weight.0, 500);
        assert!((fonts.superscript_raise - 3.6).abs() < 1e-4);
    }

    #[test]
    fn test_line_metrics_grow_for_superscripts() {
        let fonts = fonts();
        let plain = line_metrics(&fonts, &ApproximateMetrics, false, false);
        let raised = line_metrics(&fonts, &ApproximateMetrics, true, false);
        assert_eq!(plain.height, 10.0);
        assert_eq!(plain.ascent, 8.0);
        assert!(raised.ascent > plain.ascent);
        assert_eq!(raised.descent(), plain.descent());
    }

    #[test]
    fn test_real_with_superscript_exponent() {
        let format = ValueFormat::default().with_style(NumericStyle::Scientific);
        let data = real_coefficient(1500.0, &format, &fonts(), &ApproximateMetrics);
        assert_eq!(texts(&data), ["1.5\u{00D7}10", "3"]);
        assert!(data.fields()[1].position.y < 0.0);
        assert!(data.fields()[1].position.x > 0.0);
    }

    #[test]
    fn test_computer_style_is_inline() {
        let format = ValueFormat::default().with_style(NumericStyle::ComputerScientific);
        let data = real_coefficient(1500.0, &format, &fonts(), &ApproximateMetrics);
        assert_eq!(texts(&data), ["1.5e3"]);
    }

    #[test]
    fn test_complex_forces_imaginary_sign() {
        let format = ValueFormat::default();
        let data = complex_coefficient(Complex::new(1.0, 2.0), &format, &fonts(), &ApproximateMetrics);
        assert_eq!(texts(&data), ["1", "+2i"]);

        let data = complex_coefficient(Complex::new(0.0, -2.0), &format, &fonts(), &ApproximateMetrics);
        assert_eq!(texts(&data), ["-2i"]);

        let data = complex_coefficient(Complex::new(0.0, 0.0), &format, &fonts(), &ApproximateMetrics);
        assert_eq!(texts(&data), ["0"]);
    }

    #[test]
    fn test_complex_unit_is_own_field_after_superscript() {
        let format = ValueFormat::default().with_style(NumericStyle::Scientific);
        let data = complex_coefficient(Complex::new(1.0, 2000.0), &format, &fonts(), &ApproximateMetrics);
        assert_eq!(
            texts(&data),
            ["1\u{00D7}10", "0", "+2\u{00D7}10", "3", "i"]
        );
        assert_eq!(data.fields()[4].position.y, 0.0);
    }

    #[test]
    fn test_widths_accumulate() {
        let fonts = fonts();
        let mut data = CoefficientData::new();
        data.push_field("ab", &fonts.base, 0.0, &ApproximateMetrics);
        data.push_field("c", &fonts.base, 0.0, &ApproximateMetrics);
        assert_eq!(data.fields()[1].position.x, 11.0);
        assert_eq!(data.width(), 16.5);
    }
}
