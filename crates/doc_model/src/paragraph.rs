//! Paragraph and list block formats

use crate::{CharacterFormat, ListNumberStyle};
use serde::{Deserialize, Serialize};

/// Horizontal placement of a line within its paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

/// Paragraph level formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParagraphFormat {
    pub left_margin: f32,
    pub right_margin: f32,
    /// Extra indentation applied to the first line only
    pub first_line_margin: f32,
    pub top_spacing: f32,
    pub bottom_spacing: f32,
    /// Multiple of the natural line height
    pub line_spacing: f32,
    pub justification: Justification,
    /// Font used for list labels and empty lines
    pub font: CharacterFormat,
}

impl Default for ParagraphFormat {
    fn default() -> Self {
        Self {
            left_margin: 0.0,
            right_margin: 0.0,
            first_line_margin: 0.0,
            top_spacing: 0.0,
            bottom_spacing: 0.0,
            line_spacing: 1.0,
            justification: Justification::Left,
            font: CharacterFormat::default(),
        }
    }
}

impl ParagraphFormat {
    pub fn with_margins(mut self, left: f32, right: f32, first_line: f32) -> Self {
        self.left_margin = left;
        self.right_margin = right;
        self.first_line_margin = first_line;
        self
    }

    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = justification;
        self
    }

    pub fn with_spacing(mut self, top: f32, bottom: f32) -> Self {
        self.top_spacing = top;
        self.bottom_spacing = bottom;
        self
    }
}

/// Label style of a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListStyle {
    /// Bulleted list; bullets are not counted
    Unordered { bullet: char },
    /// Numbered list
    Ordered {
        numbering: ListNumberStyle,
        starting_number: u32,
        prefix: String,
        suffix: String,
    },
}

impl ListStyle {
    pub fn bullet() -> Self {
        Self::Unordered { bullet: '\u{2022}' }
    }

    pub fn numbered(numbering: ListNumberStyle, starting_number: u32) -> Self {
        Self::Ordered {
            numbering,
            starting_number,
            prefix: String::new(),
            suffix: ".".to_string(),
        }
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self, Self::Ordered { .. })
    }
}

/// Format of the first paragraph of a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFormat {
    pub paragraph: ParagraphFormat,
    /// Indentation of the list body; the label sits to its left
    pub indentation: f32,
    pub style: ListStyle,
}

/// Format of a paragraph continuing the list started by an earlier sibling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAdditionalFormat {
    pub paragraph: ParagraphFormat,
    /// Whether this paragraph shows its own label
    pub show_label: bool,
}

/// Format driving a block level element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockFormat {
    Paragraph(ParagraphFormat),
    List(ListFormat),
    ListAdditional(ListAdditionalFormat),
}

impl BlockFormat {
    /// The paragraph level part shared by all block formats
    pub fn paragraph(&self) -> &ParagraphFormat {
        match self {
            Self::Paragraph(p) => p,
            Self::List(l) => &l.paragraph,
            Self::ListAdditional(a) => &a.paragraph,
        }
    }

    pub fn paragraph_mut(&mut self) -> &mut ParagraphFormat {
        match self {
            Self::Paragraph(p) => p,
            Self::List(l) => &mut l.paragraph,
            Self::ListAdditional(a) => &mut a.paragraph,
        }
    }

    pub fn as_list(&self) -> Option<&ListFormat> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_list_continuation(&self) -> bool {
        matches!(self, Self::ListAdditional(_))
    }
}

impl Default for BlockFormat {
    fn default() -> Self {
        Self::Paragraph(ParagraphFormat::default())
    }
}
