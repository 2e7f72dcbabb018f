use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::{debug, info};

use crate::chart::BarChart;
use crate::compiler::compile_geometry;
use crate::hatch::hatch_segments;
use crate::ir::{DrawCommand, SceneGraph};
use crate::palette::parse_color;
use crate::scale::{build_scales, GROUP_LABEL_OFFSET};
use crate::style::{LegendPosition, Rotation};

const MARGIN: u32 = 10;
const CAPTION_SIZE: u32 = 20;
const Y_LABEL_AREA: u32 = 60;
const TICK_AREA: u32 = 40;
const TICK_LENGTH: i32 = 5;
const GROUP_LABEL_FONT_SIZE: u32 = 14;
/// Largest figure side accepted, in pixels
pub const MAX_FIGURE_SIDE: u32 = 16_384;

/// Figure-level options that are not part of the chart model
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub y_label: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 800,
            height: 600,
            title: None,
            y_label: None,
        }
    }
}

/// Run the layout, scaling and compilation phases for a chart
pub fn build_scene(chart: &BarChart, opts: &RenderOptions) -> Result<SceneGraph> {
    if opts.width == 0 || opts.height == 0 {
        anyhow::bail!("Invalid figure size {}x{}", opts.width, opts.height);
    }
    if opts.width > MAX_FIGURE_SIDE || opts.height > MAX_FIGURE_SIDE {
        anyhow::bail!(
            "Figure size {}x{} exceeds the {} pixel limit per side",
            opts.width,
            opts.height,
            MAX_FIGURE_SIDE
        );
    }

    let layout = chart.layout();
    let scales = build_scales(&layout, chart.bar_settings().align());
    debug!(x = ?scales.x, y = ?scales.y, "built scales");
    compile_geometry(chart, layout, scales, opts)
}

/// Render a scene to PNG bytes
pub fn render_png(scene: &SceneGraph) -> Result<Vec<u8>> {
    let len = (scene.width as usize)
        .checked_mul(scene.height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| {
            anyhow::anyhow!("Figure size {}x{} is too large", scene.width, scene.height)
        })?;
    let mut buffer = vec![0u8; len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                &buffer,
                scene.width,
                scene.height,
                image::ColorType::Rgb8,
            )
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Render a scene to an SVG document
pub fn render_svg(scene: &SceneGraph) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

/// Write a scene to disk. The format follows the extension (`png` or `svg`).
pub fn save(scene: &SceneGraph, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => {
            let bytes = render_png(scene)?;
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Some("svg") => {
            let svg = render_svg(scene)?;
            std::fs::write(path, svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format for '{}' (use .png or .svg)",
            path.display()
        ),
    }

    info!("saved chart to {}", path.display());
    Ok(())
}

/// Height reserved below the plot for tick labels and group labels
pub fn bottom_area(scene: &SceneGraph) -> u32 {
    let longest = scene
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawTick { label, .. } => Some(label.chars().count()),
            _ => None,
        })
        .max()
        .unwrap_or(0) as u32;

    let font = scene.xtick_settings.font_size();
    let ticks = match scene.xtick_settings.rotation() {
        Rotation::Deg90 | Rotation::Deg270 => TICK_AREA.max(longest * font * 6 / 10 + 15),
        _ => TICK_AREA.max(font + 20),
    };

    if !scene.has_group_labels {
        return ticks;
    }

    // Group labels sit a fraction of the plot height below the axis, and the
    // plot height itself depends on this area: solve for it.
    let top = MARGIN + if scene.title.is_some() { CAPTION_SIZE + 10 } else { 0 };
    let available = scene.height.saturating_sub(top + MARGIN) as f64;
    let groups = ((GROUP_LABEL_OFFSET * available
        + 2.0 * GROUP_LABEL_FONT_SIZE as f64)
        / (1.0 + GROUP_LABEL_OFFSET)) as u32;

    ticks.max(groups).min(scene.height / 2)
}

fn legend_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        LegendPosition::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendPosition::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendPosition::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendPosition::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendPosition::Center => SeriesLabelPosition::MiddleMiddle,
    }
}

fn tick_text_style(font_size: u32, rotation: Rotation) -> TextStyle<'static> {
    let (transform, pos) = match rotation {
        Rotation::None => (FontTransform::None, Pos::new(HPos::Center, VPos::Top)),
        // Counter-clockwise quarter turn: text reads upwards and ends at the tick
        Rotation::Deg90 => (FontTransform::Rotate270, Pos::new(HPos::Right, VPos::Center)),
        Rotation::Deg180 => (FontTransform::Rotate180, Pos::new(HPos::Center, VPos::Bottom)),
        Rotation::Deg270 => (FontTransform::Rotate90, Pos::new(HPos::Left, VPos::Center)),
    };
    TextStyle::from(("sans-serif", font_size).into_font().transform(transform)).pos(pos)
}

/// Execute a scene graph on any plotters backend
pub fn draw_scene<DB>(root: &DrawingArea<DB, Shift>, scene: &SceneGraph) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let edge = parse_color(scene.bar_settings.edge_color()).context("Invalid bar edge color")?;
    let line_width = scene.bar_settings.line_width();
    let (x_range, y_range) = (scene.scales.x, scene.scales.y);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(MARGIN)
        .x_label_area_size(bottom_area(scene))
        .y_label_area_size(Y_LABEL_AREA);
    if let Some(title) = &scene.title {
        builder.caption(title.as_str(), ("sans-serif", CAPTION_SIZE));
    }
    let mut chart = builder
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .context("Failed to build chart")?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_x_axis()
            .y_label_style(("sans-serif", scene.xtick_settings.font_size()));
        if let Some(label) = &scene.y_label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw().context("Failed to draw mesh")?;
    }

    // x axis baseline (tick labels are drawn by hand below it)
    let axis_left = chart.backend_coord(&(x_range.0, y_range.0));
    let axis_right = chart.backend_coord(&(x_range.1, y_range.0));
    root.draw(&PathElement::new(vec![axis_left, axis_right], BLACK))
        .context("Failed to draw x axis")?;

    let tick_style = tick_text_style(
        scene.xtick_settings.font_size(),
        scene.xtick_settings.rotation(),
    );
    let group_style = TextStyle::from(
        ("sans-serif", GROUP_LABEL_FONT_SIZE)
            .into_font()
            .style(FontStyle::Bold),
    )
    .pos(Pos::new(HPos::Center, VPos::Top));

    let mut has_legend = false;

    for command in &scene.commands {
        match command {
            DrawCommand::DrawRect { tl, br, style } => {
                chart
                    .draw_series(std::iter::once(Rectangle::new([*tl, *br], style.fill.filled())))
                    .context("Failed to draw bar")?;
                if let Some(hatch) = &style.hatch {
                    let a = chart.backend_coord(tl);
                    let b = chart.backend_coord(br);
                    let segments = hatch_segments(
                        (a.0 as f64, a.1 as f64),
                        (b.0 as f64, b.1 as f64),
                        hatch,
                    );
                    for ((xa, ya), (xb, yb)) in segments {
                        root.draw(&PathElement::new(
                            vec![
                                (xa.round() as i32, ya.round() as i32),
                                (xb.round() as i32, yb.round() as i32),
                            ],
                            edge.stroke_width(1),
                        ))
                        .context("Failed to draw hatch")?;
                    }
                }
                if line_width > 0 {
                    chart
                        .draw_series(std::iter::once(Rectangle::new(
                            [*tl, *br],
                            edge.stroke_width(line_width),
                        )))
                        .context("Failed to draw bar edge")?;
                }
            }
            DrawCommand::DrawTick { x, label } => {
                let (px, py) = chart.backend_coord(&(*x, y_range.0));
                root.draw(&PathElement::new(vec![(px, py), (px, py + TICK_LENGTH)], BLACK))
                    .context("Failed to draw tick")?;
                root.draw(&Text::new(label.clone(), (px, py + TICK_LENGTH + 3), tick_style.clone()))
                    .context("Failed to draw tick label")?;
            }
            DrawCommand::DrawGroupLabel { x, y, text } => {
                let pos = chart.backend_coord(&(*x, *y));
                root.draw(&Text::new(text.clone(), pos, group_style.clone()))
                    .context("Failed to draw group label")?;
            }
            DrawCommand::DrawLegendEntry { label, style } => {
                let fill = style.fill;
                chart
                    .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
                    .context("Failed to draw legend entry")?
                    .label(label.clone())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill.filled())
                    });
                has_legend = true;
            }
        }
    }

    if has_legend {
        let (background, border) = if scene.legend_settings.frame() {
            (WHITE.mix(0.8), BLACK.mix(1.0))
        } else {
            (WHITE.mix(0.0), WHITE.mix(0.0))
        };
        chart
            .configure_series_labels()
            .position(legend_position(scene.legend_settings.position()))
            .background_style(&background)
            .border_style(&border)
            .label_font(("sans-serif", scene.legend_settings.font_size()))
            .draw()
            .context("Failed to draw legend")?;
    }

    Ok(())
}
