// Color palette and color string parsing

use crate::error::ChartError;
use plotters::style::RGBColor;

/// Color cycle used for series without an explicit color
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    /// Create a Category10 color palette (D3-inspired)
    /// Colors: blue, orange, green, red, purple, brown, pink, gray, olive, cyan
    pub fn category10() -> Self {
        ColorPalette {
            colors: vec![
                RGBColor(0x1f, 0x77, 0xb4),
                RGBColor(0xff, 0x7f, 0x0e),
                RGBColor(0x2c, 0xa0, 0x2c),
                RGBColor(0xd6, 0x27, 0x28),
                RGBColor(0x94, 0x67, 0xbd),
                RGBColor(0x8c, 0x56, 0x4b),
                RGBColor(0xe3, 0x77, 0xc2),
                RGBColor(0x7f, 0x7f, 0x7f),
                RGBColor(0xbc, 0xbd, 0x22),
                RGBColor(0x17, 0xbe, 0xcf),
            ],
        }
    }

    /// Get color for a specific index (wraps around if index > palette size)
    pub fn get_color(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }

    /// Resolve the fill of every series: explicit colors are parsed, the rest
    /// take the palette color of their position
    pub fn assign_colors(&self, explicit: &[Option<String>]) -> Result<Vec<RGBColor>, ChartError> {
        explicit
            .iter()
            .enumerate()
            .map(|(i, color)| match color {
                Some(c) => parse_color(c),
                None => Ok(self.get_color(i)),
            })
            .collect()
    }
}

/// Parse a named color or a `#rgb` / `#rrggbb` hex string
pub fn parse_color(input: &str) -> Result<RGBColor, ChartError> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ChartError::InvalidColor(input.to_string()));
    }

    let color = match s.to_ascii_lowercase().as_str() {
        "black" | "k" => RGBColor(0, 0, 0),
        "white" | "w" => RGBColor(255, 255, 255),
        "red" | "r" => RGBColor(255, 0, 0),
        "green" | "g" => RGBColor(0, 128, 0),
        "blue" | "b" => RGBColor(0, 0, 255),
        "yellow" | "y" => RGBColor(255, 255, 0),
        "cyan" | "c" => RGBColor(0, 255, 255),
        "magenta" | "m" => RGBColor(255, 0, 255),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "brown" => RGBColor(165, 42, 42),
        "pink" => RGBColor(255, 192, 203),
        "gray" | "grey" => RGBColor(128, 128, 128),
        "olive" => RGBColor(128, 128, 0),
        "navy" => RGBColor(0, 0, 128),
        "teal" => RGBColor(0, 128, 128),
        _ => return Err(ChartError::InvalidColor(input.to_string())),
    };
    Ok(color)
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut channels = hex.chars().map(|c| {
                let v = c.to_digit(16).unwrap_or(0) as u8;
                v * 16 + v
            });
            Some(RGBColor(channels.next()?, channels.next()?, channels.next()?))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}
