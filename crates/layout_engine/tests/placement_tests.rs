//! Placement scenarios run through a document view

use doc_model::{
    BlockFormat, CharacterFormat, FormatId, FormatTable, Justification, ListAdditionalFormat, ListFormat,
    ListNumberStyle, ListStyle, Matrix, NodeId, ParagraphFormat, Value, ValueFormat,
};
use layout_engine::{
    DocumentView, LayoutSettings, PageMargins, ParagraphPresentation, PlacementRequest, Presentation,
    TextPresentation, ValuePresentation,
};
use proptest::prelude::*;
use render_model::{
    GraphicsGroup, NullTracker, PlacementContext, PlacementNegotiator, ProgressTracker, ReflowHint, Scene, Size,
    SpaceQualifier,
};
use std::cell::RefCell;
use std::rc::Rc;
use text_engine::ApproximateMetrics;

/// Width of one lowercase letter at 12pt
const LETTER: f32 = 6.6;
/// Width of a space at 12pt
const SPACE: f32 = 3.6;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn page(width: f32) -> LayoutSettings {
    LayoutSettings {
        page_width: width,
        page_height: 10_000.0,
        margins: PageMargins {
            top: 0.0,
            bottom: 0.0,
            left: 0.0,
            right: 0.0,
        },
        ..LayoutSettings::default()
    }
}

fn text(content: &str) -> TextPresentation {
    TextPresentation::new(content, CharacterFormat::default())
}

fn place(view: &mut DocumentView) {
    view.update(&ApproximateMetrics::new(), &mut NullTracker);
}

// =============================================================================
// Margins and list labels
// =============================================================================

#[test]
fn test_first_line_and_continuation_margins() {
    let mut formats = FormatTable::new();
    let list = formats.insert(BlockFormat::List(ListFormat {
        paragraph: ParagraphFormat::default().with_margins(10.0, 0.0, 5.0),
        indentation: 20.0,
        style: ListStyle::numbered(ListNumberStyle::Decimal, 5),
    }));
    let mut view = DocumentView::new(page(100.0), formats);
    let words = text("aaaa bbbb cccc dddd");
    let words_id = words.id();
    let paragraph = view.push_paragraph(ParagraphPresentation::new(list).with_child(words));

    place(&mut view);

    let paragraph = view.paragraph(paragraph).unwrap();
    let lines = paragraph.base().lines();
    assert_eq!(lines.len(), 2);
    assert!(approx(lines[0].start_x, 35.0));
    assert!(approx(lines[1].start_x, 30.0));
    // aaaa, space, bbbb, space
    assert_eq!(lines[0].items, 4);

    let scene = view.scene();
    let first_word = scene.area_item(words_id, 0).unwrap();
    assert!(approx(scene.scene_rect(first_word).unwrap().x, 35.0));

    let label = paragraph.base().label_item().unwrap();
    let label_group = scene.get(label).unwrap();
    assert_eq!(label_group.entries()[0].text, "5.");
    assert!(approx(scene.scene_rect(label).unwrap().x, 10.0));
}

#[test]
fn test_list_renumbers_consecutive_paragraphs() {
    let mut formats = FormatTable::new();
    let list = formats.insert(BlockFormat::List(ListFormat {
        paragraph: ParagraphFormat::default(),
        indentation: 20.0,
        style: ListStyle::numbered(ListNumberStyle::Decimal, 5),
    }));
    let more = formats.insert(BlockFormat::ListAdditional(ListAdditionalFormat {
        paragraph: ParagraphFormat::default(),
        show_label: true,
    }));
    let mut view = DocumentView::new(page(200.0), formats);
    view.push_paragraph(ParagraphPresentation::new(list).with_child(text("one")));
    for word in ["two", "three", "four"] {
        view.push_paragraph(ParagraphPresentation::new(more).with_child(text(word)));
    }

    place(&mut view);

    let labels: Vec<_> = view
        .paragraphs()
        .iter()
        .map(|p| p.base().layout_format().label.clone())
        .collect();
    assert_eq!(
        labels,
        vec![
            Some("5.".to_string()),
            Some("6.".to_string()),
            Some("7.".to_string()),
            Some("8.".to_string())
        ]
    );

    // Renumbering follows a change of the starting number
    view.edit_formats(|formats| {
        if let Some(BlockFormat::List(list)) = formats.get_mut(list) {
            list.style = ListStyle::numbered(ListNumberStyle::UpperRoman, 1);
        }
    });
    assert!(view.needs_update());
    place(&mut view);
    let last = view.paragraphs()[3].base().layout_format().label.clone();
    assert_eq!(last.as_deref(), Some("IV."));
}

#[test]
fn test_inserted_paragraph_joins_list() {
    let mut formats = FormatTable::new();
    let list = formats.insert(BlockFormat::List(ListFormat {
        paragraph: ParagraphFormat::default(),
        indentation: 20.0,
        style: ListStyle::numbered(ListNumberStyle::Decimal, 1),
    }));
    let more = formats.insert(BlockFormat::ListAdditional(ListAdditionalFormat {
        paragraph: ParagraphFormat::default(),
        show_label: true,
    }));
    let mut view = DocumentView::new(page(200.0), formats);
    view.push_paragraph(ParagraphPresentation::new(list).with_child(text("one")));
    view.push_paragraph(ParagraphPresentation::new(more).with_child(text("three")));
    place(&mut view);

    view.insert_paragraph(1, ParagraphPresentation::new(more).with_child(text("two")));

    let numbers: Vec<_> = view.paragraphs().iter().map(|p| p.numbering().number()).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
}

// =============================================================================
// Justification
// =============================================================================

#[test]
fn test_justified_line_stretches_spaces() {
    let mut formats = FormatTable::new();
    let justified = formats.insert(BlockFormat::Paragraph(
        ParagraphFormat::default().with_justification(Justification::Justify),
    ));
    let mut view = DocumentView::new(page(85.0), formats);
    let words = text("aa bb cc dd ee gg");
    let words_id = words.id();
    let paragraph = view.push_paragraph(ParagraphPresentation::new(justified).with_child(words));

    place(&mut view);

    let lines = view.paragraph(paragraph).unwrap().base().lines().to_vec();
    assert_eq!(lines.len(), 2);
    // Five words and five spaces, the last one ending the line
    assert_eq!(lines[0].items, 10);
    let content = 10.0 * LETTER + 4.0 * SPACE;
    let factor = (85.0 - content) / (4.0 * SPACE);
    assert!(approx(lines[0].stretch_factor, factor));
    // Nothing on the last line can stretch
    assert_eq!(lines[1].stretch_factor, 0.0);

    let scene = view.scene();
    let space = scene.get(scene.area_item(words_id, 1).unwrap()).unwrap();
    assert!(approx(space.stretch_factor(), factor));
    let trailing_space = scene.get(scene.area_item(words_id, 9).unwrap()).unwrap();
    assert_eq!(trailing_space.stretch_factor(), 0.0);

    let third_word = scene.area_item(words_id, 4).unwrap();
    let expected_x = 4.0 * LETTER + 2.0 * SPACE * (1.0 + factor);
    assert!(approx(scene.scene_rect(third_word).unwrap().x, expected_x));

    // The last word reaches the right edge
    let last_word = scene.scene_rect(scene.area_item(words_id, 8).unwrap()).unwrap();
    assert!(approx(last_word.x + last_word.width, 85.0));
}

#[test]
fn test_justify_ignores_trailing_space_slack() {
    let mut formats = FormatTable::new();
    let justified = formats.insert(BlockFormat::Paragraph(
        ParagraphFormat::default().with_justification(Justification::Justify),
    ));
    let mut view = DocumentView::new(page(93.0), formats);
    let paragraph =
        view.push_paragraph(ParagraphPresentation::new(justified).with_child(text("aaaa bbbb cccc dddd")));

    place(&mut view);

    // Two inner spaces would have to absorb 6.6pt, past the stretch limit
    let lines = view.paragraph(paragraph).unwrap().base().lines().to_vec();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].items, 6);
    assert_eq!(lines[0].stretch_factor, 0.0);
}

#[test]
fn test_right_and_center_justification() {
    let mut formats = FormatTable::new();
    let right = formats.insert(BlockFormat::Paragraph(
        ParagraphFormat::default().with_justification(Justification::Right),
    ));
    let center = formats.insert(BlockFormat::Paragraph(
        ParagraphFormat::default().with_justification(Justification::Center),
    ));
    let mut view = DocumentView::new(page(100.0), formats);
    let right_text = text("ab");
    let right_id = right_text.id();
    let center_text = text("ab");
    let center_id = center_text.id();
    view.push_paragraph(ParagraphPresentation::new(right).with_child(right_text));
    view.push_paragraph(ParagraphPresentation::new(center).with_child(center_text));

    place(&mut view);

    let scene = view.scene();
    let right_x = scene.scene_rect(scene.area_item(right_id, 0).unwrap()).unwrap().x;
    let center_x = scene.scene_rect(scene.area_item(center_id, 0).unwrap()).unwrap().x;
    assert!(approx(right_x, 100.0 - 2.0 * LETTER));
    assert!(approx(center_x, (100.0 - 2.0 * LETTER) / 2.0));
}

// =============================================================================
// Spacing and empty paragraphs
// =============================================================================

#[test]
fn test_spacing_between_paragraphs() {
    let mut formats = FormatTable::new();
    let spaced = formats.insert(BlockFormat::Paragraph(ParagraphFormat::default().with_spacing(4.0, 10.0)));
    let mut view = DocumentView::new(page(200.0), formats);
    let first = view.push_paragraph(ParagraphPresentation::new(spaced).with_child(text("one")));
    let second = view.push_paragraph(ParagraphPresentation::new(spaced).with_child(text("two")));

    place(&mut view);

    let first_line = view.paragraph(first).unwrap().base().lines()[0];
    let second_line = view.paragraph(second).unwrap().base().lines()[0];
    assert!(approx(first_line.y, 4.0));
    // The larger of the owed bottom spacing and the own top spacing
    assert!(approx(second_line.y, 10.0));

    let areas = view.placed_areas();
    assert_eq!(areas.len(), 2);
    // Only the last paragraph adds its bottom spacing
    assert!(approx(areas[0].rect.height, 16.0));
    assert!(approx(areas[1].rect.y, 16.0));
    assert!(approx(areas[1].rect.height, 32.0));
}

#[test]
fn test_empty_paragraph_has_one_line() {
    let mut formats = FormatTable::new();
    let plain = formats.insert(BlockFormat::default());
    let mut view = DocumentView::new(page(200.0), formats);
    let empty = view.push_paragraph(ParagraphPresentation::new(plain));

    place(&mut view);

    let lines = view.paragraph(empty).unwrap().base().lines();
    assert_eq!(lines.len(), 1);
    assert!(approx(lines[0].height, 12.0));
    assert_eq!(lines[0].items, 0);
}

// =============================================================================
// Area rollover and the negotiation protocol
// =============================================================================

#[test]
fn test_long_paragraph_rolls_over_pages() {
    let mut formats = FormatTable::new();
    let plain = formats.insert(BlockFormat::default());
    let settings = LayoutSettings {
        page_height: 50.0,
        page_gap: 0.0,
        ..page(32.0)
    };
    let mut view = DocumentView::new(settings, formats);
    let words = text(&vec!["aaaa"; 10].join(" "));
    let words_id = words.id();
    let id = view.push_paragraph(ParagraphPresentation::new(plain).with_child(words));

    place(&mut view);

    let paragraph = view.paragraph(id).unwrap();
    let lines = paragraph.base().lines();
    assert_eq!(lines.len(), 10);
    let line_areas: Vec<_> = lines.iter().map(|line| line.area_id).collect();
    assert_eq!(line_areas, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2]);
    // Every line restarts at the top of its area
    assert!(approx(lines[4].y, 0.0));
    assert!(approx(lines[8].y, 0.0));

    let areas = view.placed_areas();
    assert_eq!(areas.len(), 3);
    assert_eq!(view.page_count(), 3);
    let pages: Vec<_> = areas.iter().map(|area| area.page).collect();
    assert_eq!(pages, vec![0, 1, 2]);
    assert!(approx(areas[0].rect.height, 48.0));
    assert!(approx(areas[1].rect.height, 48.0));
    assert!(approx(areas[2].rect.height, 24.0));
    assert!(approx(areas[2].rect.y, 100.0));

    // Ten words and nine spaces, all attached to an area
    assert_eq!(lines.iter().map(|line| line.items).sum::<usize>(), 19);
    let scene = view.scene();
    for area_id in 0..19 {
        let item = scene.area_item(words_id, area_id).unwrap();
        assert!(scene.parent(item).is_some(), "fragment {area_id} detached");
    }

    assert!(paragraph.graphics_item(scene, 2).is_some());
    assert!(paragraph.graphics_item(scene, 3).is_none());
}

/// Child placing fixed-width areas and recording every offer it receives
struct RecordingChild {
    id: NodeId,
    widths: Vec<f32>,
    offers: Rc<RefCell<Vec<SpaceQualifier>>>,
    area_count: usize,
}

impl Presentation for RecordingChild {
    fn id(&self) -> NodeId {
        self.id
    }

    fn recalculate_placement(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        parent: &mut dyn PlacementNegotiator,
        _request: &PlacementRequest,
    ) {
        for (area_id, width) in self.widths.iter().enumerate() {
            let size = Size::new(*width, 12.0);
            let offer = parent.request_area(ctx, self.id);
            self.offers.borrow_mut().push(offer.qualifier);
            if size.width > offer.size.width {
                parent.area_insufficient(ctx, self.id, size);
                let retry = parent.request_area(ctx, self.id);
                self.offers.borrow_mut().push(retry.qualifier);
            }

            let mut group = GraphicsGroup::new();
            group.set_size(size, 9.6);
            let item = ctx.scene.insert(group);
            ctx.scene.register_area(self.id, area_id, item);
            parent.allocate_area(ctx, self.id, area_id, size, 9.6, false);
        }
        self.area_count = self.widths.len();
    }

    fn area_count(&self) -> usize {
        self.area_count
    }

    fn reset_placement(&mut self, scene: &mut Scene) {
        layout_engine::remove_own_areas(scene, self.id, self.area_count);
        self.area_count = 0;
    }

    fn reflow_hint(&self) -> ReflowHint {
        ReflowHint::SupportsReflow
    }

    fn mark_repositioning(&mut self, target: NodeId) -> bool {
        target == self.id
    }

    fn pending_repositioning(&self) -> bool {
        false
    }
}

#[test]
fn test_space_qualifiers_follow_line_state() {
    let mut formats = FormatTable::new();
    let plain = formats.insert(BlockFormat::default());
    let mut view = DocumentView::new(page(100.0), formats);
    let offers = Rc::new(RefCell::new(Vec::new()));
    let child = RecordingChild {
        id: NodeId::new(),
        widths: vec![40.0, 40.0, 40.0],
        offers: Rc::clone(&offers),
        area_count: 0,
    };
    let id = view.push_paragraph(ParagraphPresentation::new(plain).with_child(child));

    place(&mut view);

    assert_eq!(
        *offers.borrow(),
        vec![
            // Fresh area, empty line
            SpaceQualifier::MaximumWidthAndHeight,
            // Partly filled line
            SpaceQualifier::CurrentlyAvailable,
            SpaceQualifier::CurrentlyAvailable,
            // Empty line after the first one was committed
            SpaceQualifier::MaximumWidth,
        ]
    );
    let lines = view.paragraph(id).unwrap().base().lines();
    let items: Vec<_> = lines.iter().map(|line| line.items).collect();
    assert_eq!(items, vec![2, 1]);
}

// =============================================================================
// Values and aborts
// =============================================================================

#[test]
fn test_matrix_value_sets_line_height() {
    let mut formats = FormatTable::new();
    let plain = formats.insert(BlockFormat::default());
    let mut view = DocumentView::new(page(400.0), formats);
    let matrix = Matrix::from_fn(100, 1, |row, _| row as i64);
    let value = ValuePresentation::new(Value::IntegerMatrix(matrix), ValueFormat::default());
    let paragraph = view.push_paragraph(ParagraphPresentation::new(plain).with_child(value));

    place(&mut view);

    let paragraph = view.paragraph(paragraph).unwrap();
    let lines = paragraph.base().lines();
    assert_eq!(lines.len(), 1);
    // Seven rows of 12pt
    assert!(approx(lines[0].height, 84.0));
    assert_eq!(paragraph.reflow_hint(), ReflowHint::AlwaysReflow);
}

#[test]
fn test_set_value_wraps_across_lines() {
    let mut formats = FormatTable::new();
    let plain = formats.insert(BlockFormat::default());
    let mut view = DocumentView::new(page(60.0), formats);
    let members = (0..20).map(Value::Integer).collect();
    let value = ValuePresentation::new(Value::Set(members), ValueFormat::default());
    let value_id = value.id();
    let paragraph = view.push_paragraph(ParagraphPresentation::new(plain).with_child(value));

    place(&mut view);

    let paragraph = view.paragraph(paragraph).unwrap();
    assert!(paragraph.base().lines().len() >= 2);
    assert_eq!(paragraph.reflow_hint(), ReflowHint::SupportsReflow);
    assert!(view.scene().area_item(value_id, 0).is_some());
}

#[test]
fn test_aborted_pass_asks_for_reflow() {
    let mut formats = FormatTable::new();
    let plain = formats.insert(BlockFormat::default());
    let mut view = DocumentView::new(page(400.0), formats);
    let matrix = Matrix::from_fn(50, 50, |row, column| (row * column) as i64);
    let value = ValuePresentation::new(Value::IntegerMatrix(matrix), ValueFormat::default());
    view.push_paragraph(ParagraphPresentation::new(plain).with_child(value));
    view.push_paragraph(ParagraphPresentation::new(plain).with_child(text("after")));

    let mut tracker = ProgressTracker::with_job_limit(2);
    let hint = view.recalculate_placement(&ApproximateMetrics::new(), &mut tracker);

    assert_eq!(hint, ReflowHint::AlwaysReflow);
    // The second paragraph was never placed
    assert_eq!(view.placed_areas().len(), 1);
}

// =============================================================================
// Line filling property
// =============================================================================

proptest! {
    /// Lines are filled greedily: a line is committed only when the next
    /// word does not fit, and never holds more than fits unless it holds a
    /// single word.
    #[test]
    fn prop_lines_break_exactly_on_overflow(
        lengths in prop::collection::vec(1usize..8, 1..30),
        width in 40.0f32..200.0,
    ) {
        let mut formats = FormatTable::new();
        let plain = formats.insert(BlockFormat::default());
        let mut view = DocumentView::new(page(width), formats);
        let mut paragraph = ParagraphPresentation::new(FormatId(plain.0));
        for length in &lengths {
            paragraph = paragraph.with_child(text(&"a".repeat(*length)));
        }
        let id = view.push_paragraph(paragraph);
        place(&mut view);

        let lines = view.paragraph(id).unwrap().base().lines().to_vec();
        prop_assert_eq!(lines.iter().map(|line| line.items).sum::<usize>(), lengths.len());

        let widths: Vec<f32> = lengths.iter().map(|n| *n as f32 * LETTER).collect();
        let mut next = 0;
        for (index, line) in lines.iter().enumerate() {
            let line_width: f32 = widths[next..next + line.items].iter().sum();
            next += line.items;
            if line.items > 1 {
                prop_assert!(line_width <= width + 0.01);
            }
            if index + 1 < lines.len() {
                prop_assert!(line_width + widths[next] > width - 0.01);
            }
        }
    }
}
