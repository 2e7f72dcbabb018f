use crate::ir::{BarRect, ChartLayout, Scales};
use crate::style::Align;

/// Fraction of the y span group labels sit below the bottom of the y axis
pub const GROUP_LABEL_OFFSET: f64 = 0.2;

/// Build the axis limits for a layout
pub fn build_scales(layout: &ChartLayout, align: Align) -> Scales {
    let x = calculate_min_max_x(layout, align);
    let y = calculate_min_max_y(layout);

    Scales {
        x: pad_range(x.min, x.max),
        y: pad_range(y.min, y.max),
    }
}

/// Horizontal extent of a bar in data space
pub fn bar_edges(bar: &BarRect, align: Align) -> (f64, f64) {
    match align {
        Align::Edge => (bar.x, bar.x + bar.width),
        Align::Center => (bar.x - bar.width / 2.0, bar.x + bar.width / 2.0),
    }
}

/// Default y for group labels: a fixed fraction of the axis span below it
pub fn group_label_y(y: (f64, f64)) -> f64 {
    y.0 - (y.1 - y.0) * GROUP_LABEL_OFFSET
}

#[derive(Debug, Clone)]
struct MinMax {
    min: f64,
    max: f64,
}

impl MinMax {
    fn empty() -> Self {
        MinMax {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, val: f64) {
        if val < self.min {
            self.min = val;
        }
        if val > self.max {
            self.max = val;
        }
    }

    fn or_unit(self) -> Self {
        if self.min == f64::INFINITY {
            MinMax { min: 0.0, max: 1.0 }
        } else {
            self
        }
    }
}

fn calculate_min_max_x(layout: &ChartLayout, align: Align) -> MinMax {
    let mut mm = MinMax::empty();

    for bar in &layout.bars {
        let (left, right) = bar_edges(bar, align);
        mm.include(left);
        mm.include(right);
    }
    // Ticks without bars (empty slots) still need room on the axis
    for tick in &layout.ticks {
        mm.include(tick.x);
    }

    mm.or_unit()
}

fn calculate_min_max_y(layout: &ChartLayout) -> MinMax {
    let mut mm = MinMax::empty();

    for bar in &layout.bars {
        mm.include(bar.height);
    }
    if layout.bars.is_empty() {
        return mm.or_unit();
    }

    // Bar charts always include 0
    mm.include(0.0);
    mm
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}
