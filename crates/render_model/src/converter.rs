//! Conversion from document formats to render fonts

use doc_model::CharacterFormat;
use text_engine::{Font, FontStyle, FontWeight};

/// Font for text in `format`, scaled by `relative_scale`
pub fn font_for(format: &CharacterFormat, relative_scale: f32) -> Font {
    let mut font = Font::new(format.family.clone(), format.size * relative_scale)
        .with_weight(FontWeight(format.weight))
        .with_style(if format.italic {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        });
    font.underline = format.underline;
    font.overline = format.overline;
    font.strikeout = format.strikeout;
    font.letter_spacing = format.letter_spacing * relative_scale;
    font
}
