use anyhow::{Context, Result};
use clap::Parser;
use groupbar::csv_reader;
use groupbar::graph::{self, RenderOptions};
use groupbar::style::{Align, BarSettings, Hatch, LegendPosition, LegendSettings, Rotation, XTickSettings};
use groupbar::transform::{self, TableSpec};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "groupbar")]
#[command(about = "Draw grouped bar charts from CSV data", long_about = None)]
struct Args {
    #[arg(short = 'i', long = "input", help = "CSV file to read (defaults to stdin)")]
    input: Option<PathBuf>,

    #[arg(short = 'o', long = "output", help = "Output file, .png or .svg (defaults to PNG on stdout)")]
    output: Option<PathBuf>,

    #[arg(long = "svg", help = "Write SVG instead of PNG to stdout")]
    svg: bool,

    #[arg(short = 'c', long = "category", default_value = "0", help = "Category column (name or 0-based index)")]
    category: String,

    #[arg(short = 's', long = "series", value_delimiter = ',', help = "Series columns (defaults to every other column)")]
    series: Vec<String>,

    #[arg(short = 'g', long = "group", help = "Column naming the group of each row")]
    group: Option<String>,

    #[arg(long = "sort", help = "Sort bars by this series")]
    sort: Option<String>,

    #[arg(long = "reverse", help = "Sort largest first")]
    reverse: bool,

    #[arg(long = "color", value_parser = parse_assignment, help = "Series color as SERIES=COLOR (repeatable)")]
    colors: Vec<(String, String)>,

    #[arg(long = "hatch", value_parser = parse_assignment, help = "Series hatch as SERIES=PATTERN, e.g. mean=// (repeatable)")]
    hatches: Vec<(String, String)>,

    #[arg(long = "bar-spacing", default_value = "0.25", help = "Empty fraction of each category slot")]
    bar_spacing: f64,

    #[arg(long = "group-spacing", default_value = "1", help = "Empty slots between groups")]
    group_spacing: usize,

    #[arg(long = "group-label-loc", allow_hyphen_values = true, help = "Y value for group labels (defaults to below the axis)")]
    group_label_loc: Option<f64>,

    #[arg(long = "xtick-rotation", help = "Tick label rotation in degrees (0, 90, 180, 270)")]
    xtick_rotation: Option<u16>,

    #[arg(long = "xtick-font-size", help = "Tick label font size")]
    xtick_font_size: Option<u32>,

    #[arg(long = "legend-position", help = "Legend location, e.g. \"upper right\"")]
    legend_position: Option<LegendPosition>,

    #[arg(long = "legend-font-size", help = "Legend font size")]
    legend_font_size: Option<u32>,

    #[arg(long = "no-legend", help = "Hide the legend")]
    no_legend: bool,

    #[arg(long = "no-legend-frame", help = "Draw the legend without a frame")]
    no_legend_frame: bool,

    #[arg(long = "align", help = "Bar anchor: edge or center")]
    align: Option<Align>,

    #[arg(long = "edge-color", help = "Bar outline color")]
    edge_color: Option<String>,

    #[arg(long = "line-width", help = "Bar outline width in pixels (0 disables)")]
    line_width: Option<u32>,

    #[arg(long = "width", default_value = "800", help = "Output width in pixels")]
    width: u32,

    #[arg(long = "height", default_value = "600", help = "Output height in pixels")]
    height: u32,

    #[arg(short = 't', long = "title", help = "Graph title")]
    title: Option<String>,

    #[arg(long = "y-label", help = "Y-axis label")]
    y_label: Option<String>,
}

fn parse_assignment(input: &str) -> Result<(String, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected SERIES=VALUE, got '{}'", input))?;
    if key.is_empty() {
        return Err(format!("missing series name in '{}'", input));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let csv_data = match &args.input {
        Some(path) => csv_reader::read_csv_from_path(path),
        None => csv_reader::read_csv_from_stdin(),
    }
    .context("Failed to read CSV")?;

    let table = TableSpec {
        category: args.category.clone(),
        series: args.series.clone(),
        group: args.group.clone(),
    };
    let mut chart = transform::build_chart(&table, &csv_data)
        .context("Failed to build chart from CSV")?;

    for (label, color) in &args.colors {
        chart.set_color(label, Some(color))?;
    }
    for (label, pattern) in &args.hatches {
        let hatch: Hatch = pattern.parse()?;
        chart.set_hatch(label, Some(hatch))?;
    }

    chart.set_bar_spacing(args.bar_spacing)?;
    chart.set_group_spacing(args.group_spacing);
    chart.set_group_label_loc(args.group_label_loc);

    chart.set_xtick_settings(XTickSettings {
        rotation: args.xtick_rotation.map(Rotation::try_from).transpose()?,
        font_size: args.xtick_font_size,
    });
    chart.set_legend_settings(LegendSettings {
        show: args.no_legend.then_some(false),
        position: args.legend_position,
        frame: args.no_legend_frame.then_some(false),
        font_size: args.legend_font_size,
    });
    chart.set_bar_settings(BarSettings {
        align: args.align,
        edge_color: args.edge_color.clone(),
        line_width: args.line_width,
    })?;

    if let Some(label) = &args.sort {
        chart.sort(label, args.reverse)?;
    }

    let opts = RenderOptions {
        width: args.width,
        height: args.height,
        title: args.title.clone(),
        y_label: args.y_label.clone(),
    };

    let scene = chart.render(&opts).context("Failed to generate graph")?;

    if let Some(path) = &args.output {
        return graph::save(&scene, path);
    }

    let bytes = if args.svg {
        graph::render_svg(&scene)?.into_bytes()
    } else {
        graph::render_png(&scene)?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write chart to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
