//! Wrapped rendering of sets and tuples
//!
//! A composite is cut into fragments: the opening bracket, each member, the
//! separators, an elision marker and the closing bracket. Every fragment is
//! its own area, so the paragraph can break lines between them. Tuples that
//! spell out a string can instead be shown as quoted text broken at line
//! break opportunities.

use crate::fields::VerticalMetrics;
use crate::generator::place_fragment;
use crate::scalar::{text_area, text_metrics};
use crate::{
    AreaPresenter, FieldFonts, GenerationStatus, PresentationArea, PresentationGenerator,
    ValueRequest,
};
use doc_model::Value;
use render_model::{
    AreaOffer, ItemId, PlacementContext, Point, ReflowHint, Size, SpaceQualifier,
};
use text_engine::FontMetrics;
use unicode_segmentation::UnicodeSegmentation;

const SEPARATOR: &str = ", ";
const ELLIPSIS: &str = "\u{2026}";

/// Members shown before and after the elision marker, and how many are hidden
fn visible_members(total: usize, leading: usize, trailing: usize) -> (usize, usize, usize) {
    if leading + trailing >= total {
        (total, 0, 0)
    } else {
        (leading, trailing, total - leading - trailing)
    }
}

/// Renderer for sets and tuples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeGenerator {
    open: &'static str,
    close: &'static str,
    /// Whether the value may be shown as a string
    string_capable: bool,
}

impl CompositeGenerator {
    pub const SET: CompositeGenerator = CompositeGenerator {
        open: "{",
        close: "}",
        string_capable: false,
    };

    pub const TUPLE: CompositeGenerator = CompositeGenerator {
        open: "(",
        close: ")",
        string_capable: true,
    };

    /// Text of the tuple when it is shown in a string mode
    fn string_text(&self, request: &ValueRequest<'_>) -> Option<String> {
        if !self.string_capable {
            return None;
        }
        let (open, close) = request.format.tuple_display.decorations()?;
        let text = request.value.tuple_as_string()?;
        Some(format!("{open}{text}{close}"))
    }

    fn elision_text(&self, request: &ValueRequest<'_>, hidden: usize) -> String {
        if request.format.show_hidden_count {
            format!("{ELLIPSIS}{hidden} entries{ELLIPSIS}")
        } else {
            ELLIPSIS.to_string()
        }
    }

    fn place_text(
        ctx: &mut PlacementContext<'_>,
        presenter: &mut dyn AreaPresenter,
        text: &str,
        fonts: &FieldFonts,
    ) {
        place_fragment(ctx, presenter, |ctx, _| {
            text_area(ctx, text, &fonts.base, fonts.color)
        });
    }

    fn place_member(
        ctx: &mut PlacementContext<'_>,
        presenter: &mut dyn AreaPresenter,
        request: &ValueRequest<'_>,
        member: &Value,
    ) -> GenerationStatus {
        let member_request = request.for_member(member);
        let registry = request.registry;

        match registry.resolve(member) {
            Ok(generator) if generator.is_wrapping() => {
                let status =
                    generator.generate_graphics_items(ctx, presenter, &member_request, true);
                if status == GenerationStatus::Aborted {
                    return status;
                }
            }
            _ => place_fragment(ctx, presenter, |ctx, maximum| {
                registry.to_graphics_item(ctx, &member_request, maximum)
            }),
        }

        ctx.tracker.completed_job();
        if ctx.tracker.abort_placement() {
            tracing::debug!("composite placement aborted");
            return GenerationStatus::Aborted;
        }
        GenerationStatus::Complete
    }

    /// Break `text` into fragments at line break opportunities.
    ///
    /// For each offer the longest prefix that fits is found first, then cut
    /// back to the last break opportunity inside it. Without one, a partially
    /// filled line is abandoned; on an empty line the text is cut mid-word.
    fn place_string(
        ctx: &mut PlacementContext<'_>,
        presenter: &mut dyn AreaPresenter,
        text: &str,
        fonts: &FieldFonts,
    ) -> GenerationStatus {
        let metrics = ctx.metrics;
        let font = &fonts.base;
        let breaks: Vec<usize> = unicode_linebreak::linebreaks(text).map(|(i, _)| i).collect();
        let grapheme_ends: Vec<usize> = text
            .grapheme_indices(true)
            .map(|(i, g)| i + g.len())
            .collect();

        let mut start = 0;
        while start < text.len() {
            if ctx.tracker.abort_placement() {
                return GenerationStatus::Aborted;
            }

            let offer = presenter.request_area(ctx);
            let candidates = &grapheme_ends[grapheme_ends.partition_point(|&end| end <= start)..];
            let fitting = candidates.partition_point(|&end| {
                metrics.horizontal_advance(font, &text[start..end]) <= offer.size.width
            });

            let end = match fitting.checked_sub(1).map(|i| candidates[i]) {
                Some(end) if end == text.len() => end,
                Some(longest) => {
                    match breaks.iter().rev().find(|&&b| b > start && b <= longest) {
                        Some(&end) => end,
                        None if offer.qualifier.can_grow() => {
                            let size = Self::token_size(ctx, text, start, &breaks, fonts);
                            presenter.area_insufficient(ctx, size);
                            continue;
                        }
                        None => longest,
                    }
                }
                None if offer.qualifier.can_grow() => {
                    let size = Self::token_size(ctx, text, start, &breaks, fonts);
                    presenter.area_insufficient(ctx, size);
                    continue;
                }
                None => match candidates.first() {
                    Some(&end) => end,
                    None => break,
                },
            };

            let area = text_area(ctx, &text[start..end], font, fonts.color);
            presenter.place_area(ctx, area);
            start = end;
        }

        GenerationStatus::Complete
    }

    /// Size of the unbreakable run starting at `start`
    fn token_size(
        ctx: &PlacementContext<'_>,
        text: &str,
        start: usize,
        breaks: &[usize],
        fonts: &FieldFonts,
    ) -> Size {
        let end = breaks
            .iter()
            .copied()
            .find(|&b| b > start)
            .unwrap_or(text.len());
        Size::new(
            ctx.metrics.horizontal_advance(&fonts.base, &text[start..end]),
            ctx.metrics.height(&fonts.base),
        )
    }
}

impl PresentationGenerator for CompositeGenerator {
    fn calculate_height(&self, metrics: &dyn FontMetrics, request: &ValueRequest<'_>) -> VerticalMetrics {
        let fonts = request.fonts(metrics);
        let text = text_metrics(metrics, &fonts.base);
        if self.string_text(request).is_some() {
            return text;
        }

        let mut ascent = text.ascent;
        let mut descent = text.descent();
        if let Some(members) = request.value.members() {
            let format = request.format;
            let (leading, trailing, _) =
                visible_members(members.len(), format.leading_members, format.trailing_members);
            let visible = members[..leading]
                .iter()
                .chain(&members[members.len() - trailing..]);
            for member in visible {
                let height = request
                    .registry
                    .calculate_height(metrics, &request.for_member(member));
                ascent = ascent.max(height.ascent);
                descent = descent.max(height.descent());
            }
        }

        VerticalMetrics {
            height: ascent + descent,
            ascent,
        }
    }

    /// Lay every fragment out on one line inside `item`
    fn render(
        &self,
        ctx: &mut PlacementContext<'_>,
        item: ItemId,
        request: &ValueRequest<'_>,
        maximum: Size,
    ) -> PresentationArea {
        for child in ctx.scene.children(item).to_vec() {
            ctx.scene.schedule_removal(child);
        }
        let mut inline = InlinePresenter::new(maximum.width);
        self.generate_graphics_items(ctx, &mut inline, request, false);
        inline.finish(ctx, item)
    }

    fn is_wrapping(&self) -> bool {
        true
    }

    fn reflow_hint(&self) -> ReflowHint {
        ReflowHint::SupportsReflow
    }

    fn generate_graphics_items(
        &self,
        ctx: &mut PlacementContext<'_>,
        presenter: &mut dyn AreaPresenter,
        request: &ValueRequest<'_>,
        force_append: bool,
    ) -> GenerationStatus {
        if !force_append {
            presenter.clear_areas(ctx);
        }
        let fonts = request.fonts(ctx.metrics);

        if let Some(text) = self.string_text(request) {
            return Self::place_string(ctx, presenter, &text, &fonts);
        }

        let Some(members) = request.value.members() else {
            place_fragment(ctx, presenter, |ctx, maximum| {
                request.registry.to_graphics_item(ctx, request, maximum)
            });
            return GenerationStatus::Complete;
        };

        let format = request.format;
        let (leading, trailing, hidden) =
            visible_members(members.len(), format.leading_members, format.trailing_members);
        ctx.tracker.add_new_jobs((leading + trailing) as u64);

        Self::place_text(ctx, presenter, self.open, &fonts);
        let mut first = true;

        for member in &members[..leading] {
            if !first {
                Self::place_text(ctx, presenter, SEPARATOR, &fonts);
            }
            first = false;
            if Self::place_member(ctx, presenter, request, member) == GenerationStatus::Aborted {
                return GenerationStatus::Aborted;
            }
        }

        if hidden > 0 {
            if !first {
                Self::place_text(ctx, presenter, SEPARATOR, &fonts);
            }
            first = false;
            Self::place_text(ctx, presenter, &self.elision_text(request, hidden), &fonts);
        }

        for member in &members[members.len() - trailing..] {
            if !first {
                Self::place_text(ctx, presenter, SEPARATOR, &fonts);
            }
            first = false;
            if Self::place_member(ctx, presenter, request, member) == GenerationStatus::Aborted {
                return GenerationStatus::Aborted;
            }
        }

        Self::place_text(ctx, presenter, self.close, &fonts);
        GenerationStatus::Complete
    }
}

/// Collects fragments on a single line for a non-wrapping rendering
struct InlinePresenter {
    maximum_width: f32,
    x: f32,
    placed: Vec<(f32, PresentationArea)>,
}

impl InlinePresenter {
    fn new(maximum_width: f32) -> Self {
        Self {
            maximum_width,
            x: 0.0,
            placed: Vec::new(),
        }
    }

    /// Baseline-align the fragments as children owned by `item`
    fn finish(self, ctx: &mut PlacementContext<'_>, item: ItemId) -> PresentationArea {
        let ascent = self
            .placed
            .iter()
            .map(|(_, area)| area.ascent)
            .fold(0.0f32, f32::max);
        let descent = self
            .placed
            .iter()
            .map(|(_, area)| area.size.height - area.ascent)
            .fold(0.0f32, f32::max);

        for (x, area) in &self.placed {
            ctx.scene
                .set_position(area.item, Point::new(*x, ascent - area.ascent));
            ctx.scene.adopt(area.item, item);
        }

        let size = Size::new(self.x, ascent + descent);
        if let Some(group) = ctx.scene.get_mut(item) {
            group.clear_entries();
            group.set_size(size, ascent);
        }
        PresentationArea { item, size, ascent }
    }
}

impl AreaPresenter for InlinePresenter {
    fn request_area(&mut self, _ctx: &mut PlacementContext<'_>) -> AreaOffer {
        AreaOffer::new(
            Size::new((self.maximum_width - self.x).max(0.0), f32::MAX),
            SpaceQualifier::MaximumWidth,
        )
    }

    fn place_area(&mut self, _ctx: &mut PlacementContext<'_>, area: PresentationArea) {
        self.placed.push((self.x, area));
        self.x += area.size.width;
    }

    fn area_insufficient(&mut self, _ctx: &mut PlacementContext<'_>, _size: Size) {}

    fn clear_areas(&mut self, ctx: &mut PlacementContext<'_>) {
        for (_, area) in self.placed.drain(..) {
            ctx.scene.schedule_removal(area.item);
        }
        self.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorRegistry;
    use doc_model::{Matrix, TupleDisplayMode, ValueFormat};
    use render_model::{NullTracker, PlacementTracker, ProgressTracker, Scene};
    use text_engine::ApproximateMetrics;

    /// Fixed-width lines recording the text of every fragment
    struct LinePresenter {
        width: f32,
        x: f32,
        lines: Vec<Vec<String>>,
        insufficient: usize,
    }

    impl LinePresenter {
        fn new(width: f32) -> Self {
            Self {
                width,
                x: 0.0,
                lines: vec![Vec::new()],
                insufficient: 0,
            }
        }

        fn fragments(&self) -> Vec<String> {
            self.lines.concat()
        }
    }

    impl AreaPresenter for LinePresenter {
        fn request_area(&mut self, _ctx: &mut PlacementContext<'_>) -> AreaOffer {
            let qualifier = if self.x == 0.0 {
                SpaceQualifier::MaximumWidth
            } else {
                SpaceQualifier::CurrentlyAvailable
            };
            AreaOffer::new(Size::new(self.width - self.x, 100.0), qualifier)
        }

        fn place_area(&mut self, ctx: &mut PlacementContext<'_>, area: PresentationArea) {
            let group = ctx.scene.get(area.item).unwrap();
            let text: String = group.entries().iter().map(|e| e.text.as_str()).collect();
            let text = if text.is_empty() { "<group>".to_string() } else { text };
            if let Some(line) = self.lines.last_mut() {
                line.push(text);
            }
            self.x += area.size.width;
        }

        fn area_insufficient(&mut self, _ctx: &mut PlacementContext<'_>, _size: Size) {
            self.insufficient += 1;
            self.lines.push(Vec::new());
            self.x = 0.0;
        }

        fn clear_areas(&mut self, _ctx: &mut PlacementContext<'_>) {
            self.lines = vec![Vec::new()];
            self.x = 0.0;
        }
    }

    fn generate(
        value: &Value,
        format: &ValueFormat,
        presenter: &mut LinePresenter,
        tracker: &mut dyn PlacementTracker,
    ) -> GenerationStatus {
        let mut scene = Scene::new();
        let mut ctx = PlacementContext::new(&mut scene, tracker, &ApproximateMetrics);
        let registry = GeneratorRegistry::standard();
        let request = ValueRequest::new(value, format, registry);
        let generator = registry.resolve(value).unwrap();
        generator.generate_graphics_items(&mut ctx, presenter, &request, false)
    }

    fn integers(range: std::ops::Range<i64>) -> Vec<Value> {
        range.map(Value::Integer).collect()
    }

    #[test]
    fn test_set_fragments_with_elision() {
        let value = Value::Set(integers(0..10));
        let format = ValueFormat::default().with_members(2, 1);
        let mut presenter = LinePresenter::new(1000.0);
        let status = generate(&value, &format, &mut presenter, &mut NullTracker);

        assert_eq!(status, GenerationStatus::Complete);
        assert_eq!(
            presenter.fragments(),
            ["{", "0", ", ", "1", ", ", "\u{2026}", ", ", "9", "}"]
        );
    }

    #[test]
    fn test_hidden_count_label() {
        let value = Value::Set(integers(0..10));
        let mut format = ValueFormat::default().with_members(2, 1);
        format.show_hidden_count = true;
        let mut presenter = LinePresenter::new(1000.0);
        generate(&value, &format, &mut presenter, &mut NullTracker);

        assert_eq!(
            presenter.fragments(),
            ["{", "0", ", ", "1", ", ", "\u{2026}7 entries\u{2026}", ", ", "9", "}"]
        );
    }

    #[test]
    fn test_small_tuple_shows_every_member() {
        let value = Value::Tuple(integers(1..4));
        let format = ValueFormat::default();
        let mut presenter = LinePresenter::new(1000.0);
        generate(&value, &format, &mut presenter, &mut NullTracker);

        assert_eq!(
            presenter.fragments(),
            ["(", "1", ", ", "2", ", ", "3", ")"]
        );
    }

    #[test]
    fn test_nested_composites_flatten_into_fragments() {
        let value = Value::Set(vec![Value::Tuple(integers(1..3)), Value::Integer(5)]);
        let format = ValueFormat::default();
        let mut presenter = LinePresenter::new(1000.0);
        generate(&value, &format, &mut presenter, &mut NullTracker);

        assert_eq!(
            presenter.fragments(),
            ["{", "(", "1", ", ", "2", ")", ", ", "5", "}"]
        );
    }

    #[test]
    fn test_matrix_member_is_single_fragment() {
        let matrix = Value::IntegerMatrix(Matrix::from_fn(2, 2, |r, c| (r + c) as i64));
        let value = Value::Tuple(vec![matrix, Value::Integer(1)]);
        let format = ValueFormat::default();
        let mut presenter = LinePresenter::new(1000.0);
        generate(&value, &format, &mut presenter, &mut NullTracker);

        assert_eq!(presenter.fragments(), ["(", "0112", ", ", "1", ")"]);
    }

    #[test]
    fn test_fragments_wrap_to_new_lines() {
        let value = Value::Set(integers(10..15));
        let format = ValueFormat::default();
        // "{" and each separator are 7.2 wide, each number 14.4
        let mut presenter = LinePresenter::new(40.0);
        generate(&value, &format, &mut presenter, &mut NullTracker);

        assert!(presenter.lines.len() > 1);
        assert!(presenter.insufficient > 0);
        assert_eq!(presenter.fragments().len(), 11);
    }

    #[test]
    fn test_abort_between_members() {
        let value = Value::Set(integers(0..3));
        let format = ValueFormat::default();
        let mut presenter = LinePresenter::new(1000.0);
        let mut tracker = ProgressTracker::with_job_limit(1);
        let status = generate(&value, &format, &mut presenter, &mut tracker);

        assert_eq!(status, GenerationStatus::Aborted);
        assert_eq!(presenter.fragments(), ["{", "0"]);
    }

    #[test]
    fn test_tuple_string_breaks_between_words() {
        let value = Value::Tuple(vec![
            Value::Text("hello".to_string()),
            Value::Integer(' ' as i64),
            Value::Text("world".to_string()),
        ]);
        let mut format = ValueFormat::default();
        format.tuple_display = TupleDisplayMode::DoubleQuotedString;
        let mut presenter = LinePresenter::new(50.0);
        generate(&value, &format, &mut presenter, &mut NullTracker);

        assert_eq!(
            presenter.lines,
            vec![vec!["\"hello ".to_string()], vec!["world\"".to_string()]]
        );
    }

    #[test]
    fn test_tuple_string_cuts_long_word_on_empty_line() {
        let value = Value::Tuple(vec![Value::Text("mmmmmmmm".to_string())]);
        let mut format = ValueFormat::default();
        format.tuple_display = TupleDisplayMode::String;
        // Each "m" is 10.8 wide
        let mut presenter = LinePresenter::new(40.0);
        generate(&value, &format, &mut presenter, &mut NullTracker);

        assert_eq!(presenter.fragments(), ["mmm", "mmm", "mm"]);
    }

    #[test]
    fn test_non_string_tuple_ignores_string_mode() {
        let value = Value::Tuple(vec![Value::Real(1.5)]);
        let mut format = ValueFormat::default();
        format.tuple_display = TupleDisplayMode::String;
        let mut presenter = LinePresenter::new(1000.0);
        generate(&value, &format, &mut presenter, &mut NullTracker);

        assert_eq!(presenter.fragments(), ["(", "1.5", ")"]);
    }

    #[test]
    fn test_render_places_children_on_one_line() {
        let value = Value::Set(integers(0..2));
        let format = ValueFormat::default();
        let mut scene = Scene::new();
        let mut tracker = NullTracker;
        let mut ctx = PlacementContext::new(&mut scene, &mut tracker, &ApproximateMetrics);
        let request = ValueRequest::new(&value, &format, GeneratorRegistry::standard());
        let area = CompositeGenerator::SET.to_graphics_item(&mut ctx, &request, Size::new(500.0, 100.0));

        // "{" 7.2 + "0" 7.2 + ", " 7.2 + "1" 7.2 + "}" 7.2
        assert!((area.size.width - 36.0).abs() < 1e-4);
        assert_eq!(scene.children(area.item).len(), 5);
    }

    #[test]
    fn test_removing_rendered_composite_removes_fragments() {
        let value = Value::Set(vec![Value::Tuple(integers(1..3)), Value::Integer(5)]);
        let format = ValueFormat::default();
        let mut scene = Scene::new();
        let mut tracker = NullTracker;
        let mut ctx = PlacementContext::new(&mut scene, &mut tracker, &ApproximateMetrics);
        let request = ValueRequest::new(&value, &format, GeneratorRegistry::standard());
        let area = CompositeGenerator::SET.to_graphics_item(&mut ctx, &request, Size::new(500.0, 100.0));

        // Redrawing replaces the fragments rather than piling them up
        let area = CompositeGenerator::SET
            .update_graphics_item(&mut ctx, area.item, &request, Size::new(500.0, 100.0))
            .unwrap();
        ctx.scene.flush_removals();
        assert_eq!(ctx.scene.len(), 10);

        ctx.scene.schedule_removal(area.item);
        assert_eq!(ctx.scene.flush_removals(), 10);
        assert!(ctx.scene.is_empty());
    }
}
