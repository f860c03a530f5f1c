//! Layout CLI - places a sample document and prints the resulting areas
//!
//! Usage: `layout-cli [settings.json] [--font path/to/font.ttf] [--json]`

use anyhow::{bail, Context};
use doc_model::{
    BlockFormat, Complex, FormatTable, Justification, ListNumberStyle, Matrix,
    Value, ValueFormat,
};
use edit_engine::{ContinueListUpdater, ListFormatUpdater, ListStyleUpdater, StartingNumberUpdater};
use layout_engine::{DocumentView, LayoutSettings, ParagraphPresentation, TextPresentation, ValuePresentation};
use render_model::ProgressTracker;
use std::path::PathBuf;
use text_engine::{ApproximateMetrics, FaceMetrics, FontMetrics};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Placement passes run before giving up on pending repositioning
const MAX_PASSES: usize = 8;

#[derive(Debug, Default)]
struct Args {
    settings: Option<PathBuf>,
    font: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--font" => {
                let path = iter.next().context("--font needs a path")?;
                args.font = Some(PathBuf::from(path));
            }
            "--json" => args.json = true,
            other if other.starts_with("--") => bail!("unknown option {other}"),
            other => args.settings = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;
    let settings = match &args.settings {
        Some(path) => LayoutSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => LayoutSettings::default(),
    };
    tracing::info!(
        page_width = settings.page_width,
        page_height = settings.page_height,
        "Loaded layout settings"
    );

    let mut view = sample_document(settings)?;

    let font_data = match &args.font {
        Some(path) => Some(
            std::fs::read(path).with_context(|| format!("failed to read font {}", path.display()))?,
        ),
        None => None,
    };
    let face = match &font_data {
        Some(data) => Some(FaceMetrics::from_slice(data, 0).context("failed to parse font")?),
        None => None,
    };
    let approximate = ApproximateMetrics::new();
    let metrics: &dyn FontMetrics = match &face {
        Some(face) => face,
        None => &approximate,
    };

    let mut tracker = ProgressTracker::new();
    let mut passes = 0;
    while passes < MAX_PASSES && view.update(metrics, &mut tracker) {
        passes += 1;
        tracker.reset();
    }
    tracing::info!(
        passes,
        pages = view.page_count(),
        hint = ?view.reflow_hint(),
        "Placement finished"
    );

    let areas = view.placed_areas();
    if args.json {
        let rows: Vec<_> = areas
            .iter()
            .map(|area| {
                serde_json::json!({
                    "paragraph": area.paragraph.to_string(),
                    "area": area.area_id,
                    "page": area.page,
                    "x": area.rect.x,
                    "y": area.rect.y,
                    "width": area.rect.width,
                    "height": area.rect.height,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for area in &areas {
            println!(
                "page {:>2}  area {:>2}  x {:>7.2}  y {:>7.2}  {:>7.2} x {:>6.2}  {}",
                area.page,
                area.area_id,
                area.rect.x,
                area.rect.y,
                area.rect.width,
                area.rect.height,
                area.paragraph,
            );
        }
    }

    Ok(())
}

/// A heading, a bulleted paragraph, a numbered list continued across
/// paragraphs, and a justified body of values
fn sample_document(settings: LayoutSettings) -> anyhow::Result<DocumentView> {
    let font = settings.default_font.clone();
    let bullet = settings.default_bullet;
    let base = settings.fallback_paragraph_format();

    let mut formats = FormatTable::new();
    let heading = formats.insert(BlockFormat::Paragraph(base.clone().with_spacing(0.0, 12.0)));
    let bullets = formats.insert(BlockFormat::Paragraph(base.clone()));
    let numbered = formats.insert(BlockFormat::Paragraph(base.clone()));
    let continuation = formats.insert(BlockFormat::Paragraph(base.clone()));
    let unlabelled = formats.insert(BlockFormat::Paragraph(base.clone()));
    let body = formats.insert(BlockFormat::Paragraph(
        base.with_margins(0.0, 0.0, 18.0)
            .with_justification(Justification::Justify),
    ));

    ListStyleUpdater::bullet(bullet, 18.0).apply(&mut formats, &[bullets])?;
    ListStyleUpdater::numbered(ListNumberStyle::Decimal, 18.0).apply(&mut formats, &[numbered])?;
    StartingNumberUpdater::new(3).apply(&mut formats, &[numbered])?;
    ContinueListUpdater::new(true).apply(&mut formats, &[continuation])?;
    ContinueListUpdater::new(false).apply(&mut formats, &[unlabelled])?;

    let mut view = DocumentView::new(settings, formats);
    let text = |s: &str| TextPresentation::new(s, font.clone());
    let value_format = ValueFormat {
        font: font.clone(),
        ..ValueFormat::default()
    };
    let value = |v: Value| ValuePresentation::new(v, value_format.clone());

    view.push_paragraph(ParagraphPresentation::new(heading).with_child(text("Placement sample")));
    view.push_paragraph(
        ParagraphPresentation::new(bullets).with_child(text("Bulleted paragraph with a default label")),
    );
    view.push_paragraph(ParagraphPresentation::new(numbered).with_child(text("First numbered item")));
    view.push_paragraph(
        ParagraphPresentation::new(unlabelled).with_child(text("An unlabelled note under the first item")),
    );
    view.push_paragraph(ParagraphPresentation::new(continuation).with_child(text("Second numbered item")));
    view.push_paragraph(ParagraphPresentation::new(continuation).with_child(text("Third numbered item")));

    let matrix = Matrix::from_fn(3, 3, |row, column| (row * 3 + column) as f64 / 4.0);
    let set = Value::Set((1..=40).map(Value::Integer).collect());
    let tuple = Value::Tuple(vec![
        Value::Real(std::f64::consts::PI),
        Value::Complex(Complex::new(1.5, -2.0)),
        Value::Boolean(true),
    ]);
    view.push_paragraph(
        ParagraphPresentation::new(body)
            .with_child(text("A real matrix "))
            .with_child(value(Value::RealMatrix(matrix)))
            .with_child(text(" sits in justified text next to a set "))
            .with_child(value(set))
            .with_child(text(" and a tuple "))
            .with_child(value(tuple))
            .with_child(text(".")),
    );

    Ok(view)
}
