// The grouped bar chart model.
//
// A `BarChart` collects labelled series of per-category values, an optional
// partition of categories into named groups, and the style bags used when it
// is drawn. Every mutation bumps the revision; the chart itself never caches
// a rendering, so the next layout or render call always reflects the latest
// state.

use crate::error::{ChartError, Result};
use crate::graph::{self, RenderOptions};
use crate::ir::{ChartLayout, SceneGraph};
use crate::layout;
use crate::palette::parse_color;
use crate::style::{BarSettings, Hatch, LegendSettings, XTickSettings};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_BAR_SPACING: f64 = 0.25;
pub const DEFAULT_GROUP_SPACING: usize = 1;

/// One series (one bar per category, one legend entry)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub label: Option<String>,
    pub color: Option<String>,
    pub hatch: Option<Hatch>,
}

/// Values of every series for one x-axis category.
/// `values[k]` belongs to series `k`; `None` means that series has no bar here.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub members: Vec<String>,
}

/// Everything `add_series_with` needs to know about a new series
#[derive(Debug, Clone, Default)]
pub struct SeriesSpec {
    pub xs: Vec<String>,
    pub ys: Vec<f64>,
    pub label: Option<String>,
    pub color: Option<String>,
    pub hatch: Option<Hatch>,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    categories: Vec<Category>,
    series: Vec<Series>,
    groups: Option<Vec<Group>>,
    bar_spacing: f64,
    group_spacing: usize,
    group_label_loc: Option<f64>,
    xtick_settings: XTickSettings,
    legend_settings: LegendSettings,
    bar_settings: BarSettings,
    revision: u64,
}

impl Default for BarChart {
    fn default() -> Self {
        BarChart {
            categories: Vec::new(),
            series: Vec::new(),
            groups: None,
            bar_spacing: DEFAULT_BAR_SPACING,
            group_spacing: DEFAULT_GROUP_SPACING,
            group_label_loc: None,
            xtick_settings: XTickSettings::default(),
            legend_settings: LegendSettings::default(),
            bar_settings: BarSettings::default(),
            revision: 0,
        }
    }
}

impl BarChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series: `ys[i]` is the bar height for category `xs[i]`.
    pub fn add_series<S: AsRef<str>>(
        &mut self,
        xs: &[S],
        ys: &[f64],
        label: Option<&str>,
        color: Option<&str>,
    ) -> Result<()> {
        self.add_series_with(SeriesSpec {
            xs: xs.iter().map(|x| x.as_ref().to_string()).collect(),
            ys: ys.to_vec(),
            label: label.map(str::to_string),
            color: color.map(str::to_string),
            hatch: None,
        })
    }

    pub fn add_series_with(&mut self, spec: SeriesSpec) -> Result<()> {
        if spec.xs.len() != spec.ys.len() {
            return Err(ChartError::LengthMismatch {
                x_len: spec.xs.len(),
                y_len: spec.ys.len(),
            });
        }
        if let Some(color) = &spec.color {
            parse_color(color)?;
        }
        let non_finite = spec.xs.iter().zip(spec.ys.iter()).find(|(_, y)| !y.is_finite());
        if let Some((x, &y)) = non_finite {
            return Err(ChartError::NonFiniteValue {
                category: x.clone(),
                value: y,
            });
        }
        let mut seen = HashSet::new();
        for x in &spec.xs {
            if !seen.insert(x.as_str()) {
                return Err(ChartError::DuplicateCategory(x.clone()));
            }
        }

        let index = self.series.len();
        for category in &mut self.categories {
            category.values.push(None);
        }
        for (x, &y) in spec.xs.iter().zip(spec.ys.iter()) {
            match self.categories.iter_mut().find(|c| &c.name == x) {
                Some(category) => category.values[index] = Some(y),
                None => {
                    let mut values = vec![None; index + 1];
                    values[index] = Some(y);
                    self.categories.push(Category {
                        name: x.clone(),
                        values,
                    });
                }
            }
        }

        self.series.push(Series {
            label: spec.label,
            color: spec.color,
            hatch: spec.hatch,
        });
        self.touch("add_series");
        Ok(())
    }

    /// Register a category without values so it still gets a tick.
    /// Does nothing if the category is already known.
    pub fn add_category(&mut self, name: &str) {
        if self.category(name).is_some() {
            return;
        }
        self.categories.push(Category {
            name: name.to_string(),
            values: vec![None; self.series.len()],
        });
        self.touch("add_category");
    }

    /// Assign categories to a named group. Setting an existing group again
    /// replaces its members but keeps its position.
    pub fn set_group<S: AsRef<str>>(&mut self, name: &str, xs: &[S]) -> Result<()> {
        let members: Vec<String> = xs.iter().map(|x| x.as_ref().to_string()).collect();
        if let Some(unknown) = members.iter().find(|m| self.category(m).is_none()) {
            return Err(ChartError::UnknownCategory {
                group: name.to_string(),
                category: unknown.clone(),
            });
        }

        let groups = self.groups.get_or_insert_with(Vec::new);
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.members = members,
            None => groups.push(Group {
                name: name.to_string(),
                members,
            }),
        }
        self.touch("set_group");
        Ok(())
    }

    /// Order bars by the values of the series labelled `label`, smallest
    /// first (largest first when `reverse`). Grouped charts are sorted inside
    /// each group. Categories without a value for that series go last.
    pub fn sort(&mut self, label: &str, reverse: bool) -> Result<()> {
        let idx = self
            .series
            .iter()
            .position(|s| s.label.as_deref() == Some(label))
            .ok_or_else(|| ChartError::UnknownSeries(label.to_string()))?;

        let compare = |a: Option<f64>, b: Option<f64>| match (a, b) {
            (Some(a), Some(b)) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                if reverse {
                    ord.reverse()
                } else {
                    ord
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        match self.groups.take() {
            None => {
                self.categories
                    .sort_by(|a, b| compare(a.values[idx], b.values[idx]));
            }
            Some(mut groups) => {
                for group in &mut groups {
                    group.members.sort_by(|a, b| {
                        compare(self.value(a, idx), self.value(b, idx))
                    });
                }
                self.groups = Some(groups);
            }
        }
        self.touch("sort");
        Ok(())
    }

    pub fn set_xtick_settings(&mut self, settings: XTickSettings) {
        self.xtick_settings.merge(settings);
        self.touch("set_xtick_settings");
    }

    pub fn set_legend_settings(&mut self, settings: LegendSettings) {
        self.legend_settings.merge(settings);
        self.touch("set_legend_settings");
    }

    pub fn set_bar_settings(&mut self, settings: BarSettings) -> Result<()> {
        if let Some(color) = &settings.edge_color {
            parse_color(color)?;
        }
        self.bar_settings.merge(settings);
        self.touch("set_bar_settings");
        Ok(())
    }

    /// Fraction of each category slot left empty between clusters
    pub fn set_bar_spacing(&mut self, spacing: f64) -> Result<()> {
        if !(0.0..1.0).contains(&spacing) {
            return Err(ChartError::InvalidBarSpacing(spacing));
        }
        self.bar_spacing = spacing;
        self.touch("set_bar_spacing");
        Ok(())
    }

    /// Number of empty category slots between two groups
    pub fn set_group_spacing(&mut self, spacing: usize) {
        self.group_spacing = spacing;
        self.touch("set_group_spacing");
    }

    /// Pin group labels at a y value instead of below the axis
    pub fn set_group_label_loc(&mut self, loc: Option<f64>) {
        self.group_label_loc = loc;
        self.touch("set_group_label_loc");
    }

    pub fn set_hatch(&mut self, label: &str, hatch: Option<Hatch>) -> Result<()> {
        self.series_mut(label)?.hatch = hatch;
        self.touch("set_hatch");
        Ok(())
    }

    pub fn set_color(&mut self, label: &str, color: Option<&str>) -> Result<()> {
        if let Some(c) = color {
            parse_color(c)?;
        }
        self.series_mut(label)?.color = color.map(str::to_string);
        self.touch("set_color");
        Ok(())
    }

    fn series_mut(&mut self, label: &str) -> Result<&mut Series> {
        self.series
            .iter_mut()
            .find(|s| s.label.as_deref() == Some(label))
            .ok_or_else(|| ChartError::UnknownSeries(label.to_string()))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn groups(&self) -> Option<&[Group]> {
        self.groups.as_deref()
    }

    pub fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    pub fn group_spacing(&self) -> usize {
        self.group_spacing
    }

    pub fn group_label_loc(&self) -> Option<f64> {
        self.group_label_loc
    }

    pub fn xtick_settings(&self) -> &XTickSettings {
        &self.xtick_settings
    }

    pub fn legend_settings(&self) -> &LegendSettings {
        &self.legend_settings
    }

    pub fn bar_settings(&self) -> &BarSettings {
        &self.bar_settings
    }

    /// Number of mutations applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    fn value(&self, category: &str, series: usize) -> Option<f64> {
        self.category(category).and_then(|c| c.values[series])
    }

    /// Place every bar, tick and group label
    pub fn layout(&self) -> ChartLayout {
        layout::compute_layout(self)
    }

    /// Compile the current state into a scene graph
    pub fn render(&self, opts: &RenderOptions) -> anyhow::Result<SceneGraph> {
        graph::build_scene(self, opts)
    }

    pub fn to_png(&self, opts: &RenderOptions) -> anyhow::Result<Vec<u8>> {
        graph::render_png(&self.render(opts)?)
    }

    pub fn to_svg(&self, opts: &RenderOptions) -> anyhow::Result<String> {
        graph::render_svg(&self.render(opts)?)
    }

    /// Render and write to `path`; the format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P, opts: &RenderOptions) -> anyhow::Result<()> {
        graph::save(&self.render(opts)?, path.as_ref())
    }

    fn touch(&mut self, op: &str) {
        self.revision += 1;
        debug!(op, revision = self.revision, "chart changed");
    }
}
