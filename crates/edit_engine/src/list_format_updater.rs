//! List formatting updaters
//!
//! Each updater describes one change to list formatting and applies it to a
//! range of block formats at once. A batch is all-or-nothing: every format
//! is updated on a copy first, and the table is only written once the whole
//! range succeeded. The returned [`FormatChange`] records carry both
//! versions of every format that actually changed.

use crate::{EditError, Result};
use doc_model::{
    BlockFormat, FormatId, FormatTable, ListAdditionalFormat, ListFormat, ListNumberStyle, ListStyle,
};
use serde::{Deserialize, Serialize};

/// One format replaced by an update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatChange {
    pub id: FormatId,
    pub old: BlockFormat,
    pub new: BlockFormat,
}

/// A declarative change to list formatting
pub trait ListFormatUpdater: std::fmt::Debug {
    /// Get a display name for this update
    fn display_name(&self) -> &str;

    /// Update a single format in place
    fn update(&self, id: FormatId, format: &mut BlockFormat) -> Result<()>;

    /// Update every format in `ids`, returning the formats that changed
    fn apply(&self, formats: &mut FormatTable, ids: &[FormatId]) -> Result<Vec<FormatChange>> {
        let mut changes: Vec<FormatChange> = Vec::new();
        for &id in ids {
            if changes.iter().any(|change| change.id == id) {
                continue;
            }
            let old = formats.require(id)?.clone();
            let mut new = old.clone();
            self.update(id, &mut new)?;
            if new != old {
                changes.push(FormatChange { id, old, new });
            }
        }

        for change in &changes {
            formats.replace(change.id, change.new.clone())?;
        }
        tracing::debug!(
            updater = self.display_name(),
            requested = ids.len(),
            changed = changes.len(),
            "list formats updated"
        );
        Ok(changes)
    }
}

/// Restore the formats recorded in `changes`, newest first
pub fn revert_changes(formats: &mut FormatTable, changes: &[FormatChange]) -> Result<()> {
    for change in changes.iter().rev() {
        formats.replace(change.id, change.old.clone())?;
    }
    Ok(())
}

fn list_mut(id: FormatId, format: &mut BlockFormat) -> Result<Option<&mut ListFormat>> {
    match format {
        BlockFormat::List(list) => Ok(Some(list)),
        // Continuations follow their driving list
        BlockFormat::ListAdditional(_) => Ok(None),
        BlockFormat::Paragraph(_) => Err(EditError::NotAList(id.0)),
    }
}

// =============================================================================
// Style
// =============================================================================

/// Set the label style, turning plain paragraphs into list starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListStyleUpdater {
    pub style: ListStyle,
    /// Indentation given to paragraphs that become lists
    pub indentation: f32,
}

impl ListStyleUpdater {
    pub fn new(style: ListStyle, indentation: f32) -> Self {
        Self { style, indentation }
    }

    pub fn bullet(bullet: char, indentation: f32) -> Self {
        Self::new(ListStyle::Unordered { bullet }, indentation)
    }

    pub fn numbered(numbering: ListNumberStyle, indentation: f32) -> Self {
        Self::new(ListStyle::numbered(numbering, 1), indentation)
    }
}

impl ListFormatUpdater for ListStyleUpdater {
    fn display_name(&self) -> &str {
        "Set List Style"
    }

    fn update(&self, _id: FormatId, format: &mut BlockFormat) -> Result<()> {
        match format {
            BlockFormat::Paragraph(paragraph) => {
                *format = BlockFormat::List(ListFormat {
                    paragraph: paragraph.clone(),
                    indentation: self.indentation,
                    style: self.style.clone(),
                });
            }
            BlockFormat::List(list) => {
                // Keep the numbering of an ordered list that stays ordered
                list.style = match (&list.style, &self.style) {
                    (
                        ListStyle::Ordered {
                            starting_number,
                            prefix,
                            suffix,
                            ..
                        },
                        ListStyle::Ordered { numbering, .. },
                    ) => ListStyle::Ordered {
                        numbering: *numbering,
                        starting_number: *starting_number,
                        prefix: prefix.clone(),
                        suffix: suffix.clone(),
                    },
                    _ => self.style.clone(),
                };
            }
            BlockFormat::ListAdditional(_) => {}
        }
        Ok(())
    }
}

// =============================================================================
// Indentation
// =============================================================================

/// How a list's indentation changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IndentationChange {
    Set(f32),
    /// Add to the current indentation, never going below zero
    Adjust(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListIndentationUpdater {
    pub change: IndentationChange,
}

impl ListIndentationUpdater {
    pub fn set(indentation: f32) -> Self {
        Self {
            change: IndentationChange::Set(indentation),
        }
    }

    pub fn adjust(delta: f32) -> Self {
        Self {
            change: IndentationChange::Adjust(delta),
        }
    }
}

impl ListFormatUpdater for ListIndentationUpdater {
    fn display_name(&self) -> &str {
        "Change List Indentation"
    }

    fn update(&self, id: FormatId, format: &mut BlockFormat) -> Result<()> {
        if let Some(list) = list_mut(id, format)? {
            list.indentation = match self.change {
                IndentationChange::Set(value) => value,
                IndentationChange::Adjust(delta) => list.indentation + delta,
            }
            .max(0.0);
        }
        Ok(())
    }
}

// =============================================================================
// Numbering
// =============================================================================

/// Set the first number of ordered lists; bullets are left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingNumberUpdater {
    pub starting_number: u32,
}

impl StartingNumberUpdater {
    pub fn new(starting_number: u32) -> Self {
        Self { starting_number }
    }
}

impl ListFormatUpdater for StartingNumberUpdater {
    fn display_name(&self) -> &str {
        "Set Starting Number"
    }

    fn update(&self, id: FormatId, format: &mut BlockFormat) -> Result<()> {
        if let Some(ListFormat {
            style: ListStyle::Ordered { starting_number, .. },
            ..
        }) = list_mut(id, format)?
        {
            *starting_number = self.starting_number;
        }
        Ok(())
    }
}

/// Replace the text around ordered list numbers. `None` keeps the current
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelAffixUpdater {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl LabelAffixUpdater {
    pub fn new(prefix: Option<String>, suffix: Option<String>) -> Self {
        Self { prefix, suffix }
    }
}

impl ListFormatUpdater for LabelAffixUpdater {
    fn display_name(&self) -> &str {
        "Set Label Text"
    }

    fn update(&self, id: FormatId, format: &mut BlockFormat) -> Result<()> {
        if let Some(ListFormat {
            style: ListStyle::Ordered { prefix, suffix, .. },
            ..
        }) = list_mut(id, format)?
        {
            if let Some(new_prefix) = &self.prefix {
                prefix.clone_from(new_prefix);
            }
            if let Some(new_suffix) = &self.suffix {
                suffix.clone_from(new_suffix);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Continuations
// =============================================================================

/// Show or hide the labels of list continuations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelVisibilityUpdater {
    pub show_label: bool,
}

impl LabelVisibilityUpdater {
    pub fn new(show_label: bool) -> Self {
        Self { show_label }
    }
}

impl ListFormatUpdater for LabelVisibilityUpdater {
    fn display_name(&self) -> &str {
        "Set Label Visibility"
    }

    fn update(&self, id: FormatId, format: &mut BlockFormat) -> Result<()> {
        match format {
            BlockFormat::ListAdditional(additional) => additional.show_label = self.show_label,
            // A list start always shows its label
            BlockFormat::List(_) => {}
            BlockFormat::Paragraph(_) => return Err(EditError::NotAList(id.0)),
        }
        Ok(())
    }
}

/// Make paragraphs continue the list started by an earlier sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueListUpdater {
    pub show_label: bool,
}

impl ContinueListUpdater {
    pub fn new(show_label: bool) -> Self {
        Self { show_label }
    }
}

impl ListFormatUpdater for ContinueListUpdater {
    fn display_name(&self) -> &str {
        "Continue List"
    }

    fn update(&self, _id: FormatId, format: &mut BlockFormat) -> Result<()> {
        *format = BlockFormat::ListAdditional(ListAdditionalFormat {
            paragraph: format.paragraph().clone(),
            show_label: self.show_label,
        });
        Ok(())
    }
}

/// Turn list paragraphs back into plain paragraphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoveListUpdater;

impl ListFormatUpdater for RemoveListUpdater {
    fn display_name(&self) -> &str {
        "Remove List"
    }

    fn update(&self, _id: FormatId, format: &mut BlockFormat) -> Result<()> {
        if !matches!(format, BlockFormat::Paragraph(_)) {
            *format = BlockFormat::Paragraph(format.paragraph().clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::ParagraphFormat;
    use proptest::prelude::*;

    fn table() -> (FormatTable, FormatId, FormatId, FormatId) {
        let mut formats = FormatTable::new();
        let plain = formats.insert(BlockFormat::Paragraph(ParagraphFormat::default().with_margins(4.0, 0.0, 0.0)));
        let list = formats.insert(BlockFormat::List(ListFormat {
            paragraph: ParagraphFormat::default(),
            indentation: 20.0,
            style: ListStyle::numbered(ListNumberStyle::Decimal, 1),
        }));
        let more = formats.insert(BlockFormat::ListAdditional(ListAdditionalFormat {
            paragraph: ParagraphFormat::default(),
            show_label: true,
        }));
        (formats, plain, list, more)
    }

    fn list_of(formats: &FormatTable, id: FormatId) -> &ListFormat {
        formats.get(id).and_then(BlockFormat::as_list).unwrap()
    }

    #[test]
    fn test_style_updater_converts_paragraph() {
        let (mut formats, plain, _, _) = table();
        let changes = ListStyleUpdater::bullet('-', 18.0).apply(&mut formats, &[plain]).unwrap();

        assert_eq!(changes.len(), 1);
        let list = list_of(&formats, plain);
        assert_eq!(list.style, ListStyle::Unordered { bullet: '-' });
        assert_eq!(list.indentation, 18.0);
        assert_eq!(list.paragraph.left_margin, 4.0);
    }

    #[test]
    fn test_style_updater_keeps_numbering() {
        let (mut formats, _, list, more) = table();
        StartingNumberUpdater::new(7).apply(&mut formats, &[list]).unwrap();
        let changes = ListStyleUpdater::numbered(ListNumberStyle::LowerAlpha, 30.0)
            .apply(&mut formats, &[list, more])
            .unwrap();

        // The continuation follows its list and is not touched
        assert_eq!(changes.len(), 1);
        match &list_of(&formats, list).style {
            ListStyle::Ordered {
                numbering,
                starting_number,
                ..
            } => {
                assert_eq!(*numbering, ListNumberStyle::LowerAlpha);
                assert_eq!(*starting_number, 7);
            }
            ListStyle::Unordered { .. } => panic!("Expected ordered style"),
        }
        assert_eq!(list_of(&formats, list).indentation, 20.0);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let (mut formats, plain, list, _) = table();
        let result = ListIndentationUpdater::set(40.0).apply(&mut formats, &[list, plain]);

        assert!(matches!(result, Err(EditError::NotAList(id)) if id == plain.0));
        assert_eq!(list_of(&formats, list).indentation, 20.0);
    }

    #[test]
    fn test_missing_format_is_an_error() {
        let (mut formats, ..) = table();
        let result = RemoveListUpdater.apply(&mut formats, &[FormatId(42)]);
        assert!(matches!(result, Err(EditError::DocModel(_))));
    }

    #[test]
    fn test_affixes_and_visibility() {
        let (mut formats, _, list, more) = table();
        LabelAffixUpdater::new(Some("(".into()), Some(")".into()))
            .apply(&mut formats, &[list])
            .unwrap();
        LabelVisibilityUpdater::new(false).apply(&mut formats, &[list, more]).unwrap();

        match &list_of(&formats, list).style {
            ListStyle::Ordered { prefix, suffix, .. } => {
                assert_eq!(prefix, "(");
                assert_eq!(suffix, ")");
            }
            ListStyle::Unordered { .. } => panic!("Expected ordered style"),
        }
        assert!(matches!(
            formats.get(more),
            Some(BlockFormat::ListAdditional(ListAdditionalFormat { show_label: false, .. }))
        ));
    }

    #[test]
    fn test_unchanged_formats_are_not_recorded() {
        let (mut formats, plain, list, more) = table();
        let changes = RemoveListUpdater.apply(&mut formats, &[plain, list, more, list]).unwrap();
        assert_eq!(changes.len(), 2);
        assert!(formats.get(list).is_some_and(|f| matches!(f, BlockFormat::Paragraph(_))));
    }

    #[test]
    fn test_continue_and_revert() {
        let (mut formats, plain, list, _) = table();
        let before = formats.clone();
        let changes = ContinueListUpdater::new(true).apply(&mut formats, &[plain, list]).unwrap();
        assert_eq!(changes.len(), 2);
        assert!(formats.get(plain).is_some_and(BlockFormat::is_list_continuation));

        revert_changes(&mut formats, &changes).unwrap();
        assert_eq!(formats.get(plain), before.get(plain));
        assert_eq!(formats.get(list), before.get(list));
    }

    proptest! {
        #[test]
        fn prop_indentation_never_negative(start in 0.0f32..100.0, deltas in prop::collection::vec(-60.0f32..60.0, 1..10)) {
            let (mut formats, _, list, _) = table();
            ListIndentationUpdater::set(start).apply(&mut formats, &[list]).unwrap();
            for delta in deltas {
                ListIndentationUpdater::adjust(delta).apply(&mut formats, &[list]).unwrap();
                prop_assert!(list_of(&formats, list).indentation >= 0.0);
            }
        }
    }
}
