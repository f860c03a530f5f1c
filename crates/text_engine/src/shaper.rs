//! Font metrics backed by a real font face
//!
//! [`FaceMetrics`] shapes text with rustybuzz so advances include kerning
//! and ligatures. One face measures every family; hosts that need per-family
//! faces can compose several.

use crate::{Font, FontMetrics, Result, TextError};

/// Metrics read from a parsed font face
pub struct FaceMetrics<'a> {
    face: rustybuzz::Face<'a>,
}

impl<'a> FaceMetrics<'a> {
    /// Parse the face at `index` in `data`
    pub fn from_slice(data: &'a [u8], index: u32) -> Result<Self> {
        let face = rustybuzz::Face::from_slice(data, index)
            .ok_or_else(|| TextError::InvalidFontData("Failed to parse font".into()))?;
        Ok(Self { face })
    }

    fn scale(&self, font: &Font) -> f32 {
        font.point_size / self.face.units_per_em() as f32
    }
}

impl std::fmt::Debug for FaceMetrics<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceMetrics")
            .field("units_per_em", &self.face.units_per_em())
            .finish()
    }
}

impl FontMetrics for FaceMetrics<'_> {
    fn ascent(&self, font: &Font) -> f32 {
        self.face.ascender() as f32 * self.scale(font)
    }

    fn descent(&self, font: &Font) -> f32 {
        (self.face.descender() as f32).abs() * self.scale(font)
    }

    fn horizontal_advance(&self, font: &Font, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(&self.face, &[], buffer);

        let advance: i32 = output.glyph_positions().iter().map(|p| p.x_advance).sum();
        advance as f32 * self.scale(font) + font.letter_spacing * output.len() as f32
    }
}
