//! Character and value formats
//!
//! These are the read-only format accessors consumed by the presentation
//! generators: font attributes, colors, and the numeric display policy.

use serde::{Deserialize, Serialize};

// =============================================================================
// Color
// =============================================================================

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// =============================================================================
// Character format
// =============================================================================

/// Font and decoration attributes of a run of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterFormat {
    pub family: String,
    /// Point size
    pub size: f32,
    /// CSS-style weight, 400 is normal and 700 bold
    pub weight: u16,
    pub italic: bool,
    pub underline: bool,
    pub overline: bool,
    pub strikeout: bool,
    pub color: Color,
    pub background: Option<Color>,
    /// Additional spacing between letters, in points
    pub letter_spacing: f32,
}

impl Default for CharacterFormat {
    fn default() -> Self {
        Self {
            family: "Times New Roman".to_string(),
            size: 12.0,
            weight: 400,
            italic: false,
            underline: false,
            overline: false,
            strikeout: false,
            color: Color::BLACK,
            background: None,
            letter_spacing: 0.0,
        }
    }
}

impl CharacterFormat {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = 700;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

// =============================================================================
// Numeric display policy
// =============================================================================

/// How real and complex values are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumericStyle {
    /// Plain positional notation: 1234.5
    FloatingPoint,
    /// Mantissa in [1, 10) times a power of ten
    Scientific,
    /// Mantissa in [1, 1000) times a power of ten that is a multiple of three
    Engineering,
    /// Scientific rendered inline as `1.2e3`
    ComputerScientific,
    /// Floating point unless the magnitude calls for an exponent
    #[default]
    Concise,
    /// Concise rendered inline as `1.2e3`
    ComputerConcise,
}

impl NumericStyle {
    /// Whether exponents are written inline rather than as a superscript
    pub fn is_computer(self) -> bool {
        matches!(self, Self::ComputerScientific | Self::ComputerConcise)
    }

    /// Whether this style can produce an exponent at all
    pub fn may_use_exponent(self) -> bool {
        !matches!(self, Self::FloatingPoint)
    }
}

/// When to show a leading `+`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignMode {
    #[default]
    NegativeOnly,
    Always,
}

/// Case of digits above nine and of the exponent marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LetterCase {
    #[default]
    Lower,
    Upper,
}

/// Symbol used for the imaginary unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImaginaryUnit {
    #[default]
    I,
    J,
}

impl ImaginaryUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::I => "i",
            Self::J => "j",
        }
    }
}

/// How booleans are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BooleanStyle {
    #[default]
    LowerCaseWord,
    TitleCaseWord,
    Numeric,
    Letter,
}

impl BooleanStyle {
    pub fn text(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::LowerCaseWord, true) => "true",
            (Self::LowerCaseWord, false) => "false",
            (Self::TitleCaseWord, true) => "True",
            (Self::TitleCaseWord, false) => "False",
            (Self::Numeric, true) => "1",
            (Self::Numeric, false) => "0",
            (Self::Letter, true) => "T",
            (Self::Letter, false) => "F",
        }
    }
}

/// Alternate rendering of tuples whose members spell out a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TupleDisplayMode {
    /// Render members individually: `(a, b, c)`
    #[default]
    Normal,
    /// Render as bare text
    String,
    /// Render as `<text>`
    AngleBracketedString,
    /// Render as `'text'`
    SingleQuotedString,
    /// Render as `"text"`
    DoubleQuotedString,
}

impl TupleDisplayMode {
    /// Opening and closing decorations for string modes
    pub fn decorations(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Normal => None,
            Self::String => Some(("", "")),
            Self::AngleBracketedString => Some(("<", ">")),
            Self::SingleQuotedString => Some(("'", "'")),
            Self::DoubleQuotedString => Some(("\"", "\"")),
        }
    }
}

// =============================================================================
// Value format
// =============================================================================

/// Display format for a typed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValueFormat {
    pub font: CharacterFormat,
    /// Digits after the decimal point, `None` to infer the shortest exact form
    pub precision: Option<u32>,
    pub style: NumericStyle,
    pub sign: SignMode,
    pub case: LetterCase,
    /// Factor applied to reals and complex values before display
    pub multiplier: f64,
    /// Radix used for integers: 2, 8, 10 or 16
    pub radix: u32,
    pub imaginary_unit: ImaginaryUnit,
    pub boolean_style: BooleanStyle,
    pub tuple_display: TupleDisplayMode,
    /// Leading members shown for sets and tuples
    pub leading_members: usize,
    /// Trailing members shown for sets and tuples
    pub trailing_members: usize,
    /// Replace the bare ellipsis with an "N entries" label
    pub show_hidden_count: bool,
    pub leading_rows: usize,
    pub trailing_rows: usize,
    pub leading_columns: usize,
    pub trailing_columns: usize,
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self {
            font: CharacterFormat::default(),
            precision: None,
            style: NumericStyle::default(),
            sign: SignMode::default(),
            case: LetterCase::default(),
            multiplier: 1.0,
            radix: 10,
            imaginary_unit: ImaginaryUnit::default(),
            boolean_style: BooleanStyle::default(),
            tuple_display: TupleDisplayMode::default(),
            leading_members: 5,
            trailing_members: 1,
            show_hidden_count: false,
            leading_rows: 5,
            trailing_rows: 1,
            leading_columns: 5,
            trailing_columns: 1,
        }
    }
}

impl ValueFormat {
    pub fn with_style(mut self, style: NumericStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_members(mut self, leading: usize, trailing: usize) -> Self {
        self.leading_members = leading;
        self.trailing_members = trailing;
        self
    }

    pub fn with_rows(mut self, leading: usize, trailing: usize) -> Self {
        self.leading_rows = leading;
        self.trailing_rows = trailing;
        self
    }

    pub fn with_columns(mut self, leading: usize, trailing: usize) -> Self {
        self.leading_columns = leading;
        self.trailing_columns = trailing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_format_deserializes_partial_json() {
        let format: ValueFormat =
            serde_json::from_str(r#"{"precision": 3, "style": "Scientific"}"#).unwrap();
        assert_eq!(format.precision, Some(3));
        assert_eq!(format.style, NumericStyle::Scientific);
        assert_eq!(format.radix, 10);
        assert_eq!(format.multiplier, 1.0);
    }

    #[test]
    fn test_style_predicates() {
        assert!(NumericStyle::ComputerConcise.is_computer());
        assert!(!NumericStyle::Engineering.is_computer());
        assert!(!NumericStyle::FloatingPoint.may_use_exponent());
    }

    #[test]
    fn test_tuple_decorations() {
        assert_eq!(TupleDisplayMode::Normal.decorations(), None);
        assert_eq!(
            TupleDisplayMode::AngleBracketedString.decorations(),
            Some(("<", ">"))
        );
    }
}
