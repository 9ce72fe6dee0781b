use plotters::style::{RGBAColor, RGBColor};

use crate::error::{Error, Result};

/// Chart theme configuration
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(0, 0, 0, 0.9),
            grid_color: RGBAColor(176, 176, 176, 0.6),
            axis_color: RGBAColor(0, 0, 0, 0.9),
        }
    }
}

/// Chart style configuration
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub marker_size: u32,
    pub font_size: u32,
    pub title_font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            marker_size: 4,
            font_size: 15,
            title_font_size: 22,
            margin: 15,
            label_area_size: 50,
        }
    }
}

/// Resolve a marker colour written the matplotlib way.
///
/// Accepts the base colour names, the `tab:` palette, single-letter codes and
/// `#rrggbb` hex strings.
pub fn parse_color(spec: &str) -> Result<RGBColor> {
    let key = spec.trim().to_ascii_lowercase();

    if let Some(hex) = key.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| Error::InvalidColor(spec.to_string()));
    }

    let rgb = match key.as_str() {
        "b" | "blue" => (0, 0, 255),
        "g" | "green" => (0, 128, 0),
        "r" | "red" => (255, 0, 0),
        "c" | "cyan" => (0, 191, 191),
        "m" | "magenta" => (191, 0, 191),
        "y" | "yellow" => (191, 191, 0),
        "k" | "black" => (0, 0, 0),
        "w" | "white" => (255, 255, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "pink" => (255, 192, 203),
        "gray" | "grey" => (128, 128, 128),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "tab:blue" => (31, 119, 180),
        "tab:orange" => (255, 127, 14),
        "tab:green" => (44, 160, 44),
        "tab:red" => (214, 39, 40),
        "tab:purple" => (148, 103, 189),
        "tab:brown" => (140, 86, 75),
        "tab:pink" => (227, 119, 194),
        "tab:gray" | "tab:grey" => (127, 127, 127),
        "tab:olive" => (188, 189, 34),
        "tab:cyan" => (23, 190, 207),
        _ => return Err(Error::InvalidColor(spec.to_string())),
    };
    Ok(RGBColor(rgb.0, rgb.1, rgb.2))
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
