// Settings bags for bars, x ticks and the legend.
//
// Every field is optional: `None` means "use the default", and merging a bag
// into another only overwrites the fields that are set.

use crate::error::ChartError;
use std::str::FromStr;

pub const DEFAULT_EDGE_COLOR: &str = "#030203";
pub const DEFAULT_LINE_WIDTH: u32 = 1;
pub const DEFAULT_TICK_FONT_SIZE: u32 = 13;
pub const DEFAULT_LEGEND_FONT_SIZE: u32 = 13;

/// Where a bar's x coordinate sits relative to the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// x is the left edge
    #[default]
    Edge,
    /// x is the center
    Center,
}

impl FromStr for Align {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edge" => Ok(Align::Edge),
            "center" | "centre" => Ok(Align::Center),
            _ => Err(ChartError::InvalidAlign(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarSettings {
    pub align: Option<Align>,
    pub edge_color: Option<String>,
    pub line_width: Option<u32>,
}

impl BarSettings {
    pub fn merge(&mut self, other: BarSettings) {
        if other.align.is_some() {
            self.align = other.align;
        }
        if other.edge_color.is_some() {
            self.edge_color = other.edge_color;
        }
        if other.line_width.is_some() {
            self.line_width = other.line_width;
        }
    }

    pub fn align(&self) -> Align {
        self.align.unwrap_or_default()
    }

    pub fn edge_color(&self) -> &str {
        self.edge_color.as_deref().unwrap_or(DEFAULT_EDGE_COLOR)
    }

    pub fn line_width(&self) -> u32 {
        self.line_width.unwrap_or(DEFAULT_LINE_WIDTH)
    }
}

/// Tick label rotation, counter-clockwise in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Deg90,
    Deg180,
    Deg270,
}

impl TryFrom<u16> for Rotation {
    type Error = ChartError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees % 360 {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            _ => Err(ChartError::InvalidRotation(degrees)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XTickSettings {
    pub rotation: Option<Rotation>,
    pub font_size: Option<u32>,
}

impl XTickSettings {
    pub fn merge(&mut self, other: XTickSettings) {
        if other.rotation.is_some() {
            self.rotation = other.rotation;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation.unwrap_or_default()
    }

    pub fn font_size(&self) -> u32 {
        self.font_size.unwrap_or(DEFAULT_TICK_FONT_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    UpperLeft,
    #[default]
    UpperRight,
    LowerLeft,
    LowerRight,
    UpperCenter,
    LowerCenter,
    CenterLeft,
    CenterRight,
    Center,
}

impl FromStr for LegendPosition {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "upper left" => Ok(LegendPosition::UpperLeft),
            "upper right" | "best" => Ok(LegendPosition::UpperRight),
            "lower left" => Ok(LegendPosition::LowerLeft),
            "lower right" => Ok(LegendPosition::LowerRight),
            "upper center" => Ok(LegendPosition::UpperCenter),
            "lower center" => Ok(LegendPosition::LowerCenter),
            "center left" => Ok(LegendPosition::CenterLeft),
            "center right" | "right" => Ok(LegendPosition::CenterRight),
            "center" => Ok(LegendPosition::Center),
            _ => Err(ChartError::InvalidLegendPosition(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendSettings {
    pub show: Option<bool>,
    pub position: Option<LegendPosition>,
    pub frame: Option<bool>,
    pub font_size: Option<u32>,
}

impl LegendSettings {
    pub fn merge(&mut self, other: LegendSettings) {
        if other.show.is_some() {
            self.show = other.show;
        }
        if other.position.is_some() {
            self.position = other.position;
        }
        if other.frame.is_some() {
            self.frame = other.frame;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
    }

    pub fn show(&self) -> bool {
        self.show.unwrap_or(true)
    }

    pub fn position(&self) -> LegendPosition {
        self.position.unwrap_or_default()
    }

    pub fn frame(&self) -> bool {
        self.frame.unwrap_or(true)
    }

    pub fn font_size(&self) -> u32 {
        self.font_size.unwrap_or(DEFAULT_LEGEND_FONT_SIZE)
    }
}

/// Line families a hatch can be made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HatchLine {
    /// `/`
    Forward,
    /// `\`
    Back,
    /// `|`
    Vertical,
    /// `-`
    Horizontal,
}

/// Fill pattern drawn on top of a bar. Repeating a character makes the
/// pattern denser, so `"//"` is twice as dense as `"/"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hatch {
    pub lines: Vec<HatchLine>,
    pub density: usize,
}

impl FromStr for Hatch {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = Vec::new();
        let mut counts = [0usize; 4];

        for c in s.chars() {
            let family: &[HatchLine] = match c {
                '/' => &[HatchLine::Forward],
                '\\' => &[HatchLine::Back],
                '|' => &[HatchLine::Vertical],
                '-' => &[HatchLine::Horizontal],
                '+' => &[HatchLine::Vertical, HatchLine::Horizontal],
                'x' | 'X' => &[HatchLine::Forward, HatchLine::Back],
                _ => return Err(ChartError::InvalidHatch(s.to_string())),
            };
            for &line in family {
                counts[line as usize] += 1;
                if !lines.contains(&line) {
                    lines.push(line);
                }
            }
        }

        if lines.is_empty() {
            return Err(ChartError::InvalidHatch(s.to_string()));
        }

        let density = counts.into_iter().max().unwrap_or(1);
        Ok(Hatch { lines, density })
    }
}
