//! Plain text runs
//!
//! A run is cut at word boundaries into one area per word or whitespace
//! run. Whitespace areas are stretchable and are dropped at line starts and
//! where they would overflow a line.

use crate::presentation::{remove_own_areas, PlacementRequest, Presentation};
use doc_model::{CharacterFormat, NodeId};
use math::text_area;
use render_model::{font_for, PlacementContext, PlacementNegotiator, ReflowHint, Scene, Size, SpaceQualifier};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct TextPresentation {
    id: NodeId,
    text: String,
    format: CharacterFormat,
    area_count: usize,
    pending_repositioning: bool,
}

impl TextPresentation {
    pub fn new(text: impl Into<String>, format: CharacterFormat) -> Self {
        Self::with_id(NodeId::new(), text, format)
    }

    pub fn with_id(id: NodeId, text: impl Into<String>, format: CharacterFormat) -> Self {
        Self {
            id,
            text: text.into(),
            format,
            area_count: 0,
            pending_repositioning: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.pending_repositioning = true;
    }

    pub fn format(&self) -> &CharacterFormat {
        &self.format
    }
}

fn is_whitespace(fragment: &str) -> bool {
    fragment.chars().all(char::is_whitespace)
}

impl Presentation for TextPresentation {
    fn id(&self) -> NodeId {
        self.id
    }

    fn recalculate_placement(
        &mut self,
        ctx: &mut PlacementContext<'_>,
        parent: &mut dyn PlacementNegotiator,
        request: &PlacementRequest,
    ) {
        self.reset_placement(ctx.scene);

        let font = font_for(&self.format, request.relative_scale);
        let height = ctx.metrics.height(&font);
        let mut area_id = 0;

        for fragment in self.text.split_word_bounds() {
            let space = is_whitespace(fragment);
            let width = ctx.metrics.horizontal_advance(&font, fragment);
            let offer = parent.request_area(ctx, self.id);

            if space {
                let line_start = offer.qualifier != SpaceQualifier::CurrentlyAvailable;
                if (line_start && !request.honor_leading_whitespace) || width > offer.size.width {
                    continue;
                }
            } else if width > offer.size.width && offer.qualifier.can_grow() {
                parent.area_insufficient(ctx, self.id, Size::new(width, height));
            }

            let area = text_area(ctx, fragment, &font, self.format.color);
            ctx.scene.register_area(self.id, area_id, area.item);
            parent.allocate_area(ctx, self.id, area_id, area.size, area.ascent, space);
            area_id += 1;
        }

        tracing::trace!(text = %self.id, areas = area_id, "text placed");
        self.area_count = area_id;
        self.pending_repositioning = false;
    }

    fn area_count(&self) -> usize {
        self.area_count
    }

    fn reset_placement(&mut self, scene: &mut Scene) {
        remove_own_areas(scene, self.id, self.area_count);
        self.area_count = 0;
    }

    fn reflow_hint(&self) -> ReflowHint {
        ReflowHint::SupportsReflow
    }

    fn mark_repositioning(&mut self, target: NodeId) -> bool {
        if target == self.id {
            self.pending_repositioning = true;
        }
        target == self.id
    }

    fn pending_repositioning(&self) -> bool {
        self.pending_repositioning
    }
}
