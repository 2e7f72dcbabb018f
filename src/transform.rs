use anyhow::{Context, Result};
use tracing::{debug, warn};
use crate::chart::{BarChart, SeriesSpec};
use crate::csv_reader::{self, ColumnSelector, CsvData};

/// Which CSV columns feed the chart
#[derive(Debug, Clone, Default)]
pub struct TableSpec {
    /// Column holding the x-axis category of each row
    pub category: String,
    /// Numeric columns, one series each. Empty means every other column.
    pub series: Vec<String>,
    /// Column naming the group each row's category belongs to
    pub group: Option<String>,
}

/// Main entry point: build a chart from a wide CSV table
pub fn build_chart(spec: &TableSpec, csv_data: &CsvData) -> Result<BarChart> {
    // 1. Resolve columns
    let (cat_idx, cat_name) = csv_reader::find_column(
        csv_data,
        csv_reader::parse_column_selector(&spec.category),
    )
    .context("Failed to resolve category column")?;

    let group = match &spec.group {
        Some(g) => Some(
            csv_reader::find_column(csv_data, csv_reader::parse_column_selector(g))
                .context("Failed to resolve group column")?,
        ),
        None => None,
    };

    let series_cols: Vec<String> = if spec.series.is_empty() {
        csv_data
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != cat_idx && group.as_ref().map(|(g, _)| g) != Some(i))
            .map(|(_, h)| h.clone())
            .collect()
    } else {
        spec.series.clone()
    };
    if series_cols.is_empty() {
        anyhow::bail!("No series columns left besides '{}'", cat_name);
    }

    let (_, categories) =
        csv_reader::extract_column_as_string(csv_data, ColumnSelector::Index(cat_idx))?;

    // 2. One series per numeric column. A category listed on several rows
    //    (e.g. once per group) takes its values from the first row.
    let mut chart = BarChart::new();
    // Register categories up front so the axis follows row order, and
    // categories without any value still get a tick
    for category in &categories {
        chart.add_category(category);
    }
    for col in &series_cols {
        let (label, values) = csv_reader::extract_column(csv_data, csv_reader::parse_column_selector(col))
            .with_context(|| format!("Failed to extract series column '{}'", col))?;

        let mut xs: Vec<String> = Vec::new();
        let mut ys = Vec::new();
        let mut seen: Vec<&str> = Vec::new();
        for (category, value) in categories.iter().zip(values.iter()) {
            if seen.contains(&category.as_str()) {
                let first = first_value(&categories, &values, category);
                if first != *value {
                    warn!(
                        category = %category,
                        series = %label,
                        "conflicting values for repeated category, keeping the first"
                    );
                }
                continue;
            }
            seen.push(category.as_str());
            if let Some(v) = value {
                xs.push(category.clone());
                ys.push(*v);
            }
        }

        debug!(series = %label, bars = xs.len(), "adding series");
        chart
            .add_series_with(SeriesSpec {
                xs,
                ys,
                label: Some(label),
                ..Default::default()
            })
            .context("Failed to add series")?;
    }

    // 3. Groups in first-seen order
    if let Some((group_idx, _)) = group {
        let (_, group_names) =
            csv_reader::extract_column_as_string(csv_data, ColumnSelector::Index(group_idx))?;
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for (name, category) in group_names.iter().zip(categories.iter()) {
            let pos = match groups.iter().position(|(g, _)| g == name) {
                Some(pos) => pos,
                None => {
                    groups.push((name.clone(), Vec::new()));
                    groups.len() - 1
                }
            };
            let members = &mut groups[pos].1;
            if !members.contains(category) {
                members.push(category.clone());
            }
        }
        for (name, members) in groups {
            chart.set_group(&name, &members).context("Failed to set group")?;
        }
    }

    Ok(chart)
}

fn first_value(categories: &[String], values: &[Option<f64>], category: &str) -> Option<f64> {
    categories
        .iter()
        .position(|c| c == category)
        .and_then(|i| values[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn csv(content: &str) -> CsvData {
        csv_reader::read_csv(Cursor::new(content)).unwrap()
    }

    fn spec(category: &str) -> TableSpec {
        TableSpec {
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_chart_all_columns() {
        let data = csv("name,mean,sd\na,3,1\nb,6,2\nc,2.5,1\n");
        let chart = build_chart(&spec("name"), &data).unwrap();

        assert_eq!(chart.series().len(), 2);
        assert_eq!(chart.series()[0].label.as_deref(), Some("mean"));
        assert_eq!(chart.category("b").unwrap().values, vec![Some(6.0), Some(2.0)]);
        assert!(chart.groups().is_none());
    }

    #[test]
    fn test_build_chart_selected_series() {
        let data = csv("name,mean,sd\na,3,1\nb,6,2\n");
        let table = TableSpec {
            category: "name".to_string(),
            series: vec!["sd".to_string()],
            group: None,
        };
        let chart = build_chart(&table, &data).unwrap();
        assert_eq!(chart.series().len(), 1);
        assert_eq!(chart.series()[0].label.as_deref(), Some("sd"));
    }

    #[test]
    fn test_build_chart_with_groups() {
        let data = csv("name,grp,mean\na,First,3\nb,First,6\nc,First,2.5\na,Second,3\nc,Second,2.5\n");
        let table = TableSpec {
            category: "name".to_string(),
            series: vec![],
            group: Some("grp".to_string()),
        };
        let chart = build_chart(&table, &data).unwrap();

        assert_eq!(chart.series().len(), 1);
        let groups = chart.groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "First");
        assert_eq!(groups[0].members, vec!["a", "b", "c"]);
        assert_eq!(groups[1].members, vec!["a", "c"]);
        assert_eq!(chart.categories().len(), 3);
    }

    #[test]
    fn test_build_chart_empty_cells() {
        let data = csv("name,s1,s2\na,1,\nb,,2\n");
        let chart = build_chart(&spec("name"), &data).unwrap();
        assert_eq!(chart.category("a").unwrap().values, vec![Some(1.0), None]);
        assert_eq!(chart.category("b").unwrap().values, vec![None, Some(2.0)]);
    }

    #[test]
    fn test_build_chart_category_without_values() {
        let data = csv("name,s1\na,1\nb,\n");
        let chart = build_chart(&spec("name"), &data).unwrap();
        assert_eq!(chart.series().len(), 1);
        assert_eq!(chart.category("b").unwrap().values, vec![None]);
        assert_eq!(chart.layout().ticks.len(), 2);
    }

    #[test]
    fn test_build_chart_missing_category_column() {
        let data = csv("name,s1\na,1\n");
        let result = build_chart(&spec("label"), &data);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_chart_no_series() {
        let data = csv("name\na\n");
        let result = build_chart(&spec("name"), &data);
        assert!(result.unwrap_err().to_string().contains("No series columns"));
    }

    #[test]
    fn test_build_chart_non_numeric_series() {
        let data = csv("name,s1\na,lots\n");
        assert!(build_chart(&spec("name"), &data).is_err());
    }
}
