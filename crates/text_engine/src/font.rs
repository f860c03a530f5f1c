//! Font descriptors

use serde::{Deserialize, Serialize};

/// Font style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Font weight on the usual 100..900 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const BLACK: FontWeight = FontWeight(900);

    /// Heavier by `steps` hundreds, saturating at black
    pub fn heavier(self, steps: u16) -> Self {
        Self((self.0 + steps * 100).min(Self::BLACK.0))
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// A concrete font used to draw and measure text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub point_size: f32,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub underline: bool,
    pub overline: bool,
    pub strikeout: bool,
    /// Extra advance added after every grapheme
    pub letter_spacing: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, point_size: f32) -> Self {
        Self {
            family: family.into(),
            point_size,
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
            underline: false,
            overline: false,
            strikeout: false,
            letter_spacing: 0.0,
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Same font at `factor` times the size
    pub fn scaled(&self, factor: f32) -> Self {
        let mut font = self.clone();
        font.point_size *= factor;
        font.letter_spacing *= factor;
        font
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= FontWeight::BOLD
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Times New Roman", 12.0)
    }
}
