// Bar placement: map categories (optionally partitioned into groups) and
// series to x positions and widths.
//
// Category `i` of a block starting at `origin` is centered on `origin + i`.
// The `n` bars of that category share the central `1 - bar_spacing` of the
// slot, each `(1 - bar_spacing) / n` wide.

use crate::chart::BarChart;
use crate::ir::{BarRect, ChartLayout, GroupLabel, LegendEntry, XTick};
use tracing::debug;

/// Width of a single bar when `n_series` bars share one category slot
pub fn bar_width(n_series: usize, bar_spacing: f64) -> f64 {
    (1.0 - bar_spacing) / n_series as f64
}

/// Left edge of the bar of series `series` in category `index`
pub fn bar_position(
    origin: f64,
    index: usize,
    series: usize,
    n_series: usize,
    bar_spacing: f64,
) -> f64 {
    origin + index as f64 + series as f64 / n_series as f64 * (1.0 - bar_spacing) - 0.5
        + bar_spacing / 2.0
}

/// A run of consecutive categories sharing one origin
struct Block<'a> {
    name: Option<&'a str>,
    members: Vec<&'a str>,
}

pub fn compute_layout(chart: &BarChart) -> ChartLayout {
    let n_series = chart.series().len();
    if n_series == 0 {
        return ChartLayout::default();
    }

    let blocks: Vec<Block> = match chart.groups() {
        None => vec![Block {
            name: None,
            members: chart.categories().iter().map(|c| c.name.as_str()).collect(),
        }],
        Some(groups) => groups
            .iter()
            .map(|g| Block {
                name: Some(g.name.as_str()),
                members: g.members.iter().map(String::as_str).collect(),
            })
            .collect(),
    };

    let spacing = chart.bar_spacing();
    let width = bar_width(n_series, spacing);
    let mut layout = ChartLayout::default();
    let mut origin = 0usize;

    for (block_idx, block) in blocks.iter().enumerate() {
        let block_origin = origin as f64;

        for (i, member) in block.members.iter().enumerate() {
            layout.ticks.push(XTick {
                x: block_origin + i as f64,
                label: member.to_string(),
            });

            let Some(category) = chart.category(member) else {
                continue;
            };
            for (k, value) in category.values.iter().enumerate() {
                if let Some(height) = value {
                    layout.bars.push(BarRect {
                        x: bar_position(block_origin, i, k, n_series, spacing),
                        width,
                        height: *height,
                        series: k,
                        category: member.to_string(),
                    });
                }
            }
        }

        if let Some(name) = block.name {
            layout.group_labels.push(GroupLabel {
                x: block_origin + block.members.len() as f64 / 2.0 - 0.5,
                y: chart.group_label_loc(),
                text: name.to_string(),
            });
        }

        // Legend entries come from the first block only so each series is listed once
        if block_idx == 0 {
            for (k, series) in chart.series().iter().enumerate() {
                if let Some(label) = &series.label {
                    layout.legend.push(LegendEntry {
                        series: k,
                        label: label.clone(),
                    });
                }
            }
        }

        origin += block.members.len() + chart.group_spacing();
    }

    debug!(
        bars = layout.bars.len(),
        ticks = layout.ticks.len(),
        groups = layout.group_labels.len(),
        "computed layout"
    );
    layout
}
