// Errors raised while building up a chart.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("series length mismatch: {x_len} categories but {y_len} values")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("category '{0}' appears more than once in the same series")]
    DuplicateCategory(String),

    #[error("unknown category '{category}' in group '{group}'")]
    UnknownCategory { group: String, category: String },

    #[error("no series labelled '{0}'")]
    UnknownSeries(String),

    #[error("value {value} for category '{category}' is not a finite number")]
    NonFiniteValue { category: String, value: f64 },

    #[error("bar spacing must be in [0, 1), got {0}")]
    InvalidBarSpacing(f64),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid hatch pattern '{0}' (use any of / \\ | - + x)")]
    InvalidHatch(String),

    #[error("unsupported tick rotation {0} (use 0, 90, 180 or 270)")]
    InvalidRotation(u16),

    #[error("unknown legend position '{0}'")]
    InvalidLegendPosition(String),

    #[error("unknown bar alignment '{0}' (use edge or center)")]
    InvalidAlign(String),
}
