use anyhow::{Context, Result};
use tracing::debug;
use crate::chart::BarChart;
use crate::graph::RenderOptions;
use crate::ir::{ChartLayout, DrawCommand, Scales, SceneGraph, SeriesStyle};
use crate::palette::ColorPalette;
use crate::scale::{bar_edges, group_label_y};

/// Compile a layout and its scales into a SceneGraph of drawing commands
pub fn compile_geometry(
    chart: &BarChart,
    layout: ChartLayout,
    scales: Scales,
    opts: &RenderOptions,
) -> Result<SceneGraph> {
    let explicit: Vec<Option<String>> = chart.series().iter().map(|s| s.color.clone()).collect();
    let fills = ColorPalette::category10()
        .assign_colors(&explicit)
        .context("Failed to resolve series colors")?;

    let styles: Vec<SeriesStyle> = chart
        .series()
        .iter()
        .zip(fills)
        .map(|(series, fill)| SeriesStyle {
            fill,
            hatch: series.hatch.clone(),
        })
        .collect();

    let align = chart.bar_settings().align();
    let mut commands = Vec::new();

    for bar in &layout.bars {
        let (left, right) = bar_edges(bar, align);
        // Rect coordinates (Top-Left, Bottom-Right); negative bars hang below 0
        let tl = (left, bar.height.max(0.0));
        let br = (right, bar.height.min(0.0));
        commands.push(DrawCommand::DrawRect {
            tl,
            br,
            style: styles[bar.series].clone(),
        });
    }

    for tick in &layout.ticks {
        commands.push(DrawCommand::DrawTick {
            x: tick.x,
            label: tick.label.clone(),
        });
    }

    for label in &layout.group_labels {
        let y = label.y.unwrap_or_else(|| group_label_y(scales.y));
        debug!(group = %label.text, x = label.x, y, "placing group label");
        commands.push(DrawCommand::DrawGroupLabel {
            x: label.x,
            y,
            text: label.text.clone(),
        });
    }

    if chart.legend_settings().show() {
        for entry in &layout.legend {
            commands.push(DrawCommand::DrawLegendEntry {
                label: entry.label.clone(),
                style: styles[entry.series].clone(),
            });
        }
    }

    Ok(SceneGraph {
        width: opts.width,
        height: opts.height,
        title: opts.title.clone(),
        y_label: opts.y_label.clone(),
        has_group_labels: !layout.group_labels.is_empty(),
        scales,
        bar_settings: chart.bar_settings().clone(),
        xtick_settings: chart.xtick_settings().clone(),
        legend_settings: chart.legend_settings().clone(),
        commands,
    })
}
