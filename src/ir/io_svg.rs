//! SVG writer.
//!
//! Renders a page as one `<path>` per stroke: an absolute, moveto-prefixed
//! polyline through the stroke's located dots. The stroke width is the
//! mean dot pressure, with 0.5 substituted for missing or non-positive
//! pressure; joins and caps are round and paths are unfilled.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::model::{Page, Stroke};
use super::units::WRITE_DECIMAL_PRECISION;
use crate::error::PaninkError;

/// Writes a page to an SVG file.
pub fn write_svg(path: &Path, page: &Page) -> Result<(), PaninkError> {
    fs::write(path, to_svg_string(page)).map_err(PaninkError::Io)
}

/// Renders a page as an SVG string.
pub fn to_svg_string(page: &Page) -> String {
    let mut svg = String::new();

    write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" height=\"{}\" width=\"{}\" stroke=\"#000\">",
        page.height, page.width
    )
    .expect("write to string");

    svg.push_str("<g>");
    for stroke in &page.strokes {
        if let Some(path_element) = path_from_stroke(stroke) {
            svg.push_str(&path_element);
        }
    }
    svg.push_str("</g>");
    svg.push_str("</svg>");

    svg
}

/// Renders one stroke as a `<path>` element, or `None` when the stroke has
/// no located dots to draw.
fn path_from_stroke(stroke: &Stroke) -> Option<String> {
    let precision = WRITE_DECIMAL_PRECISION as usize;

    let mut polyline = String::new();
    let mut pressure_sum = 0.0;
    let mut drawn = 0usize;

    for dot in &stroke.dots {
        let (Some(x), Some(y)) = (dot.x, dot.y) else {
            continue;
        };

        if drawn > 0 {
            polyline.push(',');
        }
        write!(polyline, "{x:.precision$} {y:.precision$}").expect("write to string");

        pressure_sum += match dot.pressure {
            Some(pressure) if pressure > 0.0 => pressure,
            _ => 0.5,
        };
        drawn += 1;
    }

    if drawn == 0 {
        return None;
    }

    let width = pressure_sum / drawn as f64;
    Some(format!(
        "<path d=\"M{polyline}\" stroke-width=\"{width:.precision$}\" \
         shape-rendering=\"geometricPrecision\" stroke-linejoin=\"round\" \
         stroke-linecap=\"round\" fill=\"none\"/>"
    ))
}
