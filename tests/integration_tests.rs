use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper function to run groupbar with arguments and CSV on stdin
fn run_groupbar(args: &[&str], csv_content: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_groupbar"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("test/{}", name)).expect("Failed to read test CSV")
}

#[test]
fn test_end_to_end_simple_bars() {
    let result = run_groupbar(&["--category", "name"], &fixture("means.csv"));
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_single_series() {
    let result = run_groupbar(&["-c", "name", "-s", "mean", "--no-legend"], &fixture("means.csv"));
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_grouped_bars() {
    let result = run_groupbar(
        &["-c", "name", "-g", "group", "--group-spacing", "2"],
        &fixture("grouped.csv"),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_grouped_label_location() {
    let result = run_groupbar(
        &["-c", "name", "-g", "group", "--group-label-loc", "-1.5"],
        &fixture("grouped.csv"),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

/// Byte offset of a text element in rendered SVG
fn text_position(svg: &str, text: &str) -> usize {
    svg.find(&format!(">{}<", text))
        .unwrap_or_else(|| panic!("'{}' not found in SVG", text))
}

#[test]
fn test_end_to_end_sorted_reverse() {
    let result = run_groupbar(
        &["-c", "name", "--sort", "mean", "--reverse", "--svg"],
        &fixture("means.csv"),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let svg = String::from_utf8(result.unwrap()).expect("SVG should be UTF-8");
    // mean: alpha 3, beta 6, gamma 2.5, delta -1.5
    let order: Vec<usize> = ["beta", "alpha", "gamma", "delta"]
        .iter()
        .map(|t| text_position(&svg, t))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "ticks out of order: {:?}", order);
}

#[test]
fn test_end_to_end_sorted_within_groups() {
    let result = run_groupbar(
        &["-c", "name", "-g", "group", "--sort", "sd", "--svg"],
        &fixture("grouped.csv"),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let svg = String::from_utf8(result.unwrap()).expect("SVG should be UTF-8");
    // First group sd: a 1, b 2, c 1, so b moves behind c
    assert!(text_position(&svg, "c") < text_position(&svg, "b"));
    assert!(text_position(&svg, "a") < text_position(&svg, "c"));
}

#[test]
fn test_end_to_end_hatches_and_colors() {
    let result = run_groupbar(
        &[
            "-c", "name",
            "--hatch", "mean=//",
            "--hatch", "sd=x",
            "--color", "mean=#1f77b4",
            "--color", "sd=orange",
        ],
        &fixture("means.csv"),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_settings() {
    let result = run_groupbar(
        &[
            "-c", "name",
            "--xtick-rotation", "90",
            "--xtick-font-size", "16",
            "--legend-position", "lower left",
            "--no-legend-frame",
            "--align", "center",
            "--edge-color", "black",
            "--line-width", "2",
            "--bar-spacing", "0.5",
            "--title", "Means",
            "--y-label", "value",
        ],
        &fixture("means.csv"),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_ragged_series() {
    let result = run_groupbar(&["-c", "name"], &fixture("ragged.csv"));
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_svg_stdout() {
    let result = run_groupbar(&["-c", "name", "--svg"], &fixture("means.csv"));
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let svg = String::from_utf8(result.unwrap()).expect("SVG should be UTF-8");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("alpha"));
}

#[test]
fn test_end_to_end_output_file() {
    let path = std::env::temp_dir().join(format!("groupbar_it_{}.png", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    let result = run_groupbar(&["-c", "name", "-o", &path_str], &fixture("means.csv"));
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let bytes = fs::read(&path).expect("output file should exist");
    assert!(is_valid_png(&bytes));
    let _ = fs::remove_file(&path);
}

#[test]
fn test_end_to_end_input_path() {
    let result = run_groupbar(&["-i", "test/means.csv", "-c", "name"], "");
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

// Error cases

#[test]
fn test_end_to_end_non_numeric_fails() {
    let result = run_groupbar(&["-c", "name"], &fixture("non_numeric.csv"));
    let err = result.expect_err("non-numeric column should fail");
    assert!(err.contains("Failed to parse"), "unexpected error: {}", err);
}

#[test]
fn test_end_to_end_unknown_sort_series_fails() {
    let result = run_groupbar(&["-c", "name", "--sort", "median"], &fixture("means.csv"));
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_invalid_hatch_fails() {
    let result = run_groupbar(&["-c", "name", "--hatch", "mean=~~"], &fixture("means.csv"));
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_invalid_rotation_fails() {
    let result = run_groupbar(&["-c", "name", "--xtick-rotation", "45"], &fixture("means.csv"));
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_invalid_bar_spacing_fails() {
    let result = run_groupbar(&["-c", "name", "--bar-spacing", "1.0"], &fixture("means.csv"));
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_infinite_value_fails() {
    let result = run_groupbar(&["-c", "name"], "name,v\na,1\nb,inf\n");
    let err = result.expect_err("infinite value should fail");
    assert!(err.contains("not a finite number"), "unexpected error: {}", err);
}

#[test]
fn test_end_to_end_nan_value_fails() {
    let result = run_groupbar(&["-c", "name"], "name,v\na,NaN\nb,2\n");
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_oversized_figure_fails() {
    let result = run_groupbar(
        &["-c", "name", "--width", "40000", "--height", "40000"],
        &fixture("means.csv"),
    );
    let err = result.expect_err("oversized figure should fail");
    assert!(err.contains("exceeds"), "unexpected error: {}", err);
}

#[test]
fn test_end_to_end_invalid_edge_color_fails() {
    let result = run_groupbar(&["-c", "name", "--edge-color", "greyish"], &fixture("means.csv"));
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_empty_csv_fails() {
    let result = run_groupbar(&["-c", "name"], "name,mean\n");
    assert!(result.is_err());
}
