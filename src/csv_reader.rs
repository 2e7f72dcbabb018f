use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

/// Read CSV with a header row from any reader
pub fn read_csv<R: Read>(input: R) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(CsvData { headers, rows })
}

pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin())
}

pub fn read_csv_from_path(path: &Path) -> Result<CsvData> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_csv(file)
}

pub fn parse_column_selector(input: &str) -> ColumnSelector {
    match input.parse::<usize>() {
        Ok(index) => ColumnSelector::Index(index),
        Err(_) => ColumnSelector::Name(input.to_string()),
    }
}

/// Resolve a selector to a column index and the actual header name
pub fn find_column(data: &CsvData, selector: ColumnSelector) -> Result<(usize, String)> {
    match selector {
        ColumnSelector::Index(idx) => {
            if idx >= data.headers.len() {
                return Err(anyhow!(
                    "Column index {} out of bounds (available columns: {})",
                    idx,
                    data.headers.len()
                ));
            }
            Ok((idx, data.headers[idx].clone()))
        }
        ColumnSelector::Name(name) => {
            let idx = data
                .headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(&name))
                .ok_or_else(|| {
                    anyhow!(
                        "Column '{}' not found. Available columns: {}",
                        name,
                        data.headers.join(", ")
                    )
                })?;
            Ok((idx, data.headers[idx].clone()))
        }
    }
}

/// Extract a numeric column. Empty cells become `None`.
pub fn extract_column(
    data: &CsvData,
    selector: ColumnSelector,
) -> Result<(String, Vec<Option<f64>>)> {
    let (column_index, column_name) = find_column(data, selector)?;

    let mut values = Vec::new();
    for (row_idx, row) in data.rows.iter().enumerate() {
        let value_str = cell(row, row_idx, column_index)?;
        if value_str.is_empty() {
            values.push(None);
            continue;
        }
        let value = value_str.parse::<f64>().with_context(|| {
            format!(
                "Failed to parse value '{}' as number in column '{}' at row {}",
                value_str,
                column_name,
                row_idx + 1
            )
        })?;
        if !value.is_finite() {
            return Err(anyhow!(
                "Value '{}' in column '{}' at row {} is not a finite number",
                value_str,
                column_name,
                row_idx + 1
            ));
        }
        values.push(Some(value));
    }

    Ok((column_name, values))
}

pub fn extract_column_as_string(
    data: &CsvData,
    selector: ColumnSelector,
) -> Result<(String, Vec<String>)> {
    let (column_index, column_name) = find_column(data, selector)?;

    let mut values = Vec::new();
    for (row_idx, row) in data.rows.iter().enumerate() {
        values.push(cell(row, row_idx, column_index)?.to_string());
    }

    Ok((column_name, values))
}

fn cell(row: &[String], row_idx: usize, column_index: usize) -> Result<&str> {
    row.get(column_index).map(String::as_str).ok_or_else(|| {
        anyhow!(
            "Row {} has only {} columns, expected at least {}",
            row_idx + 1,
            row.len(),
            column_index + 1
        )
    })
}
