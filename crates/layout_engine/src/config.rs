//! Layout settings
//!
//! Page geometry and the defaults used where a paragraph's own format is
//! unavailable. Settings are read from JSON; missing keys keep their
//! defaults.

use crate::Result;
use doc_model::{CharacterFormat, ParagraphFormat};
use render_model::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Page margins in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageMargins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        // One inch on every side
        Self {
            top: 72.0,
            bottom: 72.0,
            left: 72.0,
            right: 72.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    /// US Letter by default
    pub page_width: f32,
    pub page_height: f32,
    pub margins: PageMargins,
    /// Vertical gap between consecutive pages in the scene
    pub page_gap: f32,
    /// Scale applied to every font size
    pub relative_scale: f32,
    /// Font of paragraphs whose format is missing
    pub default_font: CharacterFormat,
    /// Bullet used for new unordered lists
    pub default_bullet: char,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margins: PageMargins::default(),
            page_gap: 24.0,
            relative_scale: 1.0,
            default_font: CharacterFormat::default(),
            default_bullet: '\u{2022}',
        }
    }
}

impl LayoutSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn page_size(&self) -> Size {
        Size::new(self.page_width, self.page_height)
    }

    /// Page size minus margins
    pub fn content_size(&self) -> Size {
        Size::new(
            (self.page_width - self.margins.left - self.margins.right).max(0.0),
            (self.page_height - self.margins.top - self.margins.bottom).max(0.0),
        )
    }

    /// Stand-in format for a paragraph whose format is missing
    pub fn fallback_paragraph_format(&self) -> ParagraphFormat {
        ParagraphFormat {
            font: self.default_font.clone(),
            ..ParagraphFormat::default()
        }
    }
}
