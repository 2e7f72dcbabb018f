// Library exports for groupbar

pub mod chart;
pub mod csv_reader;
pub mod error;
pub mod graph;
pub mod hatch;
pub mod palette;
pub mod style;

// Render pipeline
pub mod ir;
pub mod layout;
pub mod transform;
pub mod scale;
pub mod compiler;

pub use chart::{BarChart, SeriesSpec};
pub use error::ChartError;
pub use graph::RenderOptions;
