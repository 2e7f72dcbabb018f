use crate::style::{BarSettings, Hatch, LegendSettings, XTickSettings};
use plotters::style::RGBColor;

// =============================================================================
// Phase 1: Layout
// =============================================================================

/// Result of placing every bar on the x-axis (data space, no pixels yet)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartLayout {
    pub bars: Vec<BarRect>,
    pub ticks: Vec<XTick>,
    pub group_labels: Vec<GroupLabel>,
    pub legend: Vec<LegendEntry>,
}

impl ChartLayout {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.ticks.is_empty()
    }
}

/// A single bar. `x` is the anchor given by the alignment mode, `width` is in
/// category units (1 unit = 1 category slot).
#[derive(Debug, Clone, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub series: usize,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XTick {
    pub x: f64,
    pub label: String,
}

/// Group caption. `y` is only set when the user pinned a location; otherwise
/// it is derived from the y limits during scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLabel {
    pub x: f64,
    pub y: Option<f64>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub series: usize,
    pub label: String,
}

// =============================================================================
// Phase 2: Scaling
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

// =============================================================================
// Phase 3: Compilation (Scene Graph)
// =============================================================================

/// Fully resolved style for one series
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub fill: RGBColor,
    pub hatch: Option<Hatch>,
}

/// A list of primitive drawing commands.
/// The backend just executes these blindly.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub y_label: Option<String>,
    pub scales: Scales,
    pub bar_settings: BarSettings,
    pub xtick_settings: XTickSettings,
    pub legend_settings: LegendSettings,
    pub has_group_labels: bool,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    DrawRect {
        // Top-Left, Bottom-Right in data space
        tl: (f64, f64),
        br: (f64, f64),
        style: SeriesStyle,
    },
    DrawTick {
        x: f64,
        label: String,
    },
    DrawGroupLabel {
        x: f64,
        y: f64,
        text: String,
    },
    DrawLegendEntry {
        label: String,
        style: SeriesStyle,
    },
}
