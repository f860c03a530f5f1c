//! Font metrics used by layout
//!
//! Layout never computes glyph metrics itself; it asks a [`FontMetrics`]
//! implementation supplied by the platform text stack.

use crate::Font;
use unicode_segmentation::UnicodeSegmentation;

/// Measurements of text drawn with a given font
pub trait FontMetrics {
    /// Distance from the baseline to the top of the tallest glyphs
    fn ascent(&self, font: &Font) -> f32;

    /// Distance from the baseline to the bottom of the lowest glyphs (positive)
    fn descent(&self, font: &Font) -> f32;

    /// Advance width of `text`
    fn horizontal_advance(&self, font: &Font, text: &str) -> f32;

    /// Natural line height
    fn height(&self, font: &Font) -> f32 {
        self.ascent(font) + self.descent(font)
    }
}

/// Deterministic metrics estimated from character classes.
///
/// Used when no font face is loaded and throughout the test suites, where
/// exact, platform independent numbers are needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMetrics;

/// Units per em used by the estimator
const UNITS_PER_EM: f32 = 1000.0;

impl ApproximateMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Estimated advance of a character in units per em
    pub fn estimate_char_width(ch: char) -> f32 {
        match ch {
            ' ' | 'i' | 'l' | 'j' | 't' | 'f' | 'r' | '!' | '|' | '\'' | '`' | '.' | ',' | ':'
            | ';' | '(' | ')' | '[' | ']' => 300.0,
            'I' => 350.0,
            'm' | 'w' | 'M' | 'W' | '@' | '%' => 900.0,
            'A'..='Z' => 700.0,
            'a'..='z' => 550.0,
            // Digits are monospaced
            '0'..='9' => 600.0,
            '\u{4E00}'..='\u{9FFF}' | '\u{3000}'..='\u{303F}' => UNITS_PER_EM,
            // Ellipses
            '\u{2026}' | '\u{22EE}' | '\u{22EF}' | '\u{22F1}' => UNITS_PER_EM,
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' | '\u{00AD}' => 0.0,
            '\u{00A0}' => 300.0,
            _ => 600.0,
        }
    }
}

impl FontMetrics for ApproximateMetrics {
    fn ascent(&self, font: &Font) -> f32 {
        font.point_size * 0.8
    }

    fn descent(&self, font: &Font) -> f32 {
        font.point_size * 0.2
    }

    fn horizontal_advance(&self, font: &Font, text: &str) -> f32 {
        let scale = font.point_size / UNITS_PER_EM;
        text.graphemes(true)
            .map(|grapheme| {
                let base = grapheme.chars().next().map_or(0.0, Self::estimate_char_width);
                base * scale + font.letter_spacing
            })
            .sum()
    }
}
