//! List numbering across sibling paragraphs
//!
//! A list starts at a paragraph whose format is a [`ListFormat`] and runs
//! over the immediately following siblings whose formats continue it. Each
//! paragraph of the run records the format driving its label and the number
//! it shows. Continuations that hide their label do not consume a number.

use crate::ParagraphPresentation;
use doc_model::{BlockFormat, FormatId, FormatTable, ListFormat, ListStyle};

/// Numbering resolved for one paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingState {
    driving_format: Option<FormatId>,
    number: Option<u32>,
    show_label: bool,
    dirty: bool,
}

impl Default for NumberingState {
    fn default() -> Self {
        Self {
            driving_format: None,
            number: None,
            show_label: false,
            dirty: true,
        }
    }
}

impl NumberingState {
    /// The list format this paragraph's label follows
    pub fn driving_format(&self) -> Option<FormatId> {
        self.driving_format
    }

    /// Number shown by an ordered list label
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn shows_label(&self) -> bool {
        self.show_label
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn assign(&mut self, driving_format: Option<FormatId>, number: Option<u32>, show_label: bool) {
        self.driving_format = driving_format;
        self.number = number;
        self.show_label = show_label;
        self.dirty = false;
    }

    /// Text of the list label, `None` outside lists and for hidden labels
    pub fn label_text(&self, formats: &FormatTable) -> Option<String> {
        debug_assert!(!self.dirty, "list label requested before numbering was resolved");
        if !self.show_label {
            return None;
        }

        let driving = self.driving_format?;
        let Some(list) = formats.get(driving).and_then(BlockFormat::as_list) else {
            tracing::warn!(format = driving.0, "driving list format is missing");
            return None;
        };

        match &list.style {
            ListStyle::Unordered { bullet } => Some(bullet.to_string()),
            ListStyle::Ordered {
                numbering,
                prefix,
                suffix,
                ..
            } => {
                let number = self.number?;
                Some(format!("{prefix}{}{suffix}", numbering.format(number)))
            }
        }
    }
}

fn first_number(list: &ListFormat) -> Option<u32> {
    match list.style {
        ListStyle::Ordered { starting_number, .. } => Some(starting_number),
        ListStyle::Unordered { .. } => None,
    }
}

/// Number the run of paragraphs starting at `start` and return the index
/// after it
fn number_run(paragraphs: &mut [ParagraphPresentation], start: usize, formats: &FormatTable) -> usize {
    let id = paragraphs[start].format_id();
    match formats.get(id) {
        Some(BlockFormat::List(list)) => {
            let mut next = first_number(list);
            paragraphs[start].numbering_mut().assign(Some(id), next, true);
            next = next.map(|n| n.saturating_add(1));

            let mut index = start + 1;
            while index < paragraphs.len() {
                let Some(BlockFormat::ListAdditional(additional)) = formats.get(paragraphs[index].format_id())
                else {
                    break;
                };
                if additional.show_label {
                    paragraphs[index].numbering_mut().assign(Some(id), next, true);
                    next = next.map(|n| n.saturating_add(1));
                } else {
                    paragraphs[index].numbering_mut().assign(Some(id), None, false);
                }
                index += 1;
            }
            tracing::trace!(list = id.0, paragraphs = index - start, "list numbered");
            index
        }
        Some(BlockFormat::ListAdditional(_)) => {
            tracing::warn!(
                paragraph = %paragraphs[start].id(),
                "list continuation without a preceding list paragraph"
            );
            paragraphs[start].numbering_mut().assign(None, None, false);
            start + 1
        }
        Some(BlockFormat::Paragraph(_)) => {
            paragraphs[start].numbering_mut().assign(None, None, false);
            start + 1
        }
        None => {
            tracing::warn!(paragraph = %paragraphs[start].id(), format = id.0, "paragraph format is missing");
            paragraphs[start].numbering_mut().assign(None, None, false);
            start + 1
        }
    }
}

/// Resolve the numbering of every paragraph
pub fn renumber(paragraphs: &mut [ParagraphPresentation], formats: &FormatTable) {
    let mut index = 0;
    while index < paragraphs.len() {
        index = number_run(paragraphs, index, formats);
    }
}

/// Resolve the numbering of the list run containing `index` after its
/// format changed or it was attached. Returns the range renumbered.
pub fn renumber_from(
    paragraphs: &mut [ParagraphPresentation],
    index: usize,
    formats: &FormatTable,
) -> std::ops::Range<usize> {
    if index >= paragraphs.len() {
        return index..index;
    }

    let is_continuation = |paragraph: &ParagraphPresentation| {
        formats
            .get(paragraph.format_id())
            .is_some_and(BlockFormat::is_list_continuation)
    };

    let mut start = index;
    while start > 0 && is_continuation(&paragraphs[start]) {
        start -= 1;
    }
    let end = number_run(paragraphs, start, formats);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{ListAdditionalFormat, ListNumberStyle, ParagraphFormat};

    fn list(style: ListStyle) -> BlockFormat {
        BlockFormat::List(ListFormat {
            paragraph: ParagraphFormat::default(),
            indentation: 20.0,
            style,
        })
    }

    fn continuation(show_label: bool) -> BlockFormat {
        BlockFormat::ListAdditional(ListAdditionalFormat {
            paragraph: ParagraphFormat::default(),
            show_label,
        })
    }

    fn paragraphs(formats: &[FormatId]) -> Vec<ParagraphPresentation> {
        formats.iter().map(|id| ParagraphPresentation::new(*id)).collect()
    }

    #[test]
    fn test_run_numbers_consecutively() {
        let mut formats = FormatTable::new();
        let start = formats.insert(list(ListStyle::numbered(ListNumberStyle::Decimal, 5)));
        let more = formats.insert(continuation(true));
        let mut doc = paragraphs(&[start, more, more, more]);

        renumber(&mut doc, &formats);

        let numbers: Vec<_> = doc.iter().map(|p| p.numbering().number()).collect();
        assert_eq!(numbers, vec![Some(5), Some(6), Some(7), Some(8)]);
        assert!(doc.iter().all(|p| p.numbering().driving_format() == Some(start)));
        assert_eq!(doc[2].numbering().label_text(&formats).as_deref(), Some("7."));
    }

    #[test]
    fn test_hidden_labels_do_not_consume_numbers() {
        let mut formats = FormatTable::new();
        let start = formats.insert(list(ListStyle::numbered(ListNumberStyle::LowerRoman, 1)));
        let shown = formats.insert(continuation(true));
        let hidden = formats.insert(continuation(false));
        let mut doc = paragraphs(&[start, hidden, shown]);

        renumber(&mut doc, &formats);

        assert_eq!(doc[1].numbering().label_text(&formats), None);
        assert_eq!(doc[1].numbering().driving_format(), Some(start));
        assert_eq!(doc[2].numbering().label_text(&formats).as_deref(), Some("ii."));
    }

    #[test]
    fn test_plain_paragraph_ends_run() {
        let mut formats = FormatTable::new();
        let start = formats.insert(list(ListStyle::bullet()));
        let more = formats.insert(continuation(true));
        let plain = formats.insert(BlockFormat::default());
        let mut doc = paragraphs(&[start, more, plain, more]);

        renumber(&mut doc, &formats);

        assert_eq!(doc[1].numbering().label_text(&formats).as_deref(), Some("\u{2022}"));
        assert_eq!(doc[2].numbering().driving_format(), None);
        // Orphaned continuation
        assert_eq!(doc[3].numbering().driving_format(), None);
        assert_eq!(doc[3].numbering().label_text(&formats), None);
    }

    #[test]
    fn test_renumber_from_walks_back_to_list_start() {
        let mut formats = FormatTable::new();
        let plain = formats.insert(BlockFormat::default());
        let start = formats.insert(list(ListStyle::numbered(ListNumberStyle::Decimal, 1)));
        let more = formats.insert(continuation(true));
        let mut doc = paragraphs(&[plain, start, more, more, plain]);

        let range = renumber_from(&mut doc, 3, &formats);

        assert_eq!(range, 1..4);
        assert_eq!(doc[3].numbering().number(), Some(3));
        assert!(doc[0].numbering().is_dirty());
        assert!(doc[4].numbering().is_dirty());
    }
}
