//! Legacy protocol XML reader.
//!
//! This module decodes the research-protocol XML dialect used by older
//! capture deployments: a `<protocol>` document with a `code` attribute,
//! a `<header>` carrying layout metadata, and one `<strokes>` element per
//! stroke whose `<stroke>` children are the individual samples.
//!
//! Two generations of the dialect name the stroke time attributes
//! differently (`start`/`stop` vs. `begin`/`end`); both are accepted, the
//! newer pair first. Per-sample `x`/`y` attributes may be absent when the
//! device failed to resolve a position; absence is preserved rather than
//! coerced to zero. The dialect declares no page size, so the page bounds
//! are computed from the decoded samples.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::model::{Dot, Page, Stroke};
use crate::error::PaninkError;

/// Reads a page from a protocol XML file.
pub fn read_protocol_xml(path: &Path) -> Result<Page, PaninkError> {
    let xml = fs::read_to_string(path).map_err(PaninkError::Io)?;
    parse_protocol_str(&xml, path)
}

/// Reads a page from a protocol XML string.
///
/// Useful for testing without file I/O.
pub fn from_protocol_str(xml: &str) -> Result<Page, PaninkError> {
    parse_protocol_str(xml, Path::new("<memory>"))
}

/// Reads a page from protocol XML bytes.
///
/// The input must be valid UTF-8.
pub fn from_protocol_slice(bytes: &[u8]) -> Result<Page, PaninkError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| PaninkError::ProtocolXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_protocol_str(xml)
}

fn parse_protocol_str(xml: &str, path: &Path) -> Result<Page, PaninkError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| PaninkError::ProtocolXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    let protocol = document.root_element();
    if protocol.tag_name().name() != "protocol" {
        return Err(PaninkError::ProtocolXmlParse {
            path: path.to_path_buf(),
            message: "missing <protocol> root element".to_string(),
        });
    }

    let mut page = Page::new();

    if let Some(header) = child_element(protocol, "header") {
        read_header(header, &mut page, path)?;
    }
    if let Some(code) = protocol.attribute("code") {
        page.add_metadata("id", code);
    }

    for strokes in protocol
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "strokes")
    {
        let stroke = read_stroke(strokes, path)?;
        page.add_stroke(stroke);
    }

    // No declared geometry: the page bounds are the extremes of the decoded
    // samples. The folds are order-independent; document order of the dots
    // themselves is untouched.
    page.width = page
        .dots()
        .filter_map(|dot| dot.x)
        .fold(0.0f64, f64::max);
    page.height = page
        .dots()
        .filter_map(|dot| dot.y)
        .fold(0.0f64, f64::max);

    Ok(page)
}

fn read_header(header: Node<'_, '_>, page: &mut Page, path: &Path) -> Result<(), PaninkError> {
    let Some(layout) = child_element(header, "layout") else {
        return Ok(());
    };

    if let Some(label) = layout.attribute("layout") {
        page.add_metadata("noteType", label);
    }
    if let Some(raw) = layout.attribute("page") {
        let page_no = raw
            .parse::<i64>()
            .map_err(|_| PaninkError::ProtocolXmlParse {
                path: path.to_path_buf(),
                message: format!("invalid layout page number '{raw}'"),
            })?;
        page.add_metadata("pageNo", page_no);
    }

    Ok(())
}

fn read_stroke(strokes: Node<'_, '_>, path: &Path) -> Result<Stroke, PaninkError> {
    let start = time_attribute(strokes, "start", "begin", path)?;
    let stop = time_attribute(strokes, "stop", "end", path)?;

    let mut stroke = Stroke::new(start, stop);

    for sample in strokes
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "stroke")
    {
        let x = coordinate_attribute(sample, "x", path)?;
        let y = coordinate_attribute(sample, "y", path)?;
        let raw_time = sample
            .attribute("time")
            .ok_or_else(|| PaninkError::ProtocolXmlParse {
                path: path.to_path_buf(),
                message: "missing time attribute in <stroke>".to_string(),
            })?;
        let timestamp = raw_time
            .parse::<i64>()
            .map_err(|_| PaninkError::ProtocolXmlParse {
                path: path.to_path_buf(),
                message: format!("invalid stroke time '{raw_time}'"),
            })?;

        stroke.add_dot(Dot {
            x,
            y,
            timestamp,
            ..Dot::default()
        });
    }

    Ok(stroke)
}

/// Reads a stroke time attribute, trying the primary name first and the
/// legacy fallback second.
fn time_attribute(
    node: Node<'_, '_>,
    primary: &str,
    fallback: &str,
    path: &Path,
) -> Result<i64, PaninkError> {
    let raw = node
        .attribute(primary)
        .or_else(|| node.attribute(fallback))
        .ok_or_else(|| PaninkError::ProtocolXmlParse {
            path: path.to_path_buf(),
            message: format!("missing {primary}/{fallback} attribute in <strokes>"),
        })?;

    raw.parse::<i64>().map_err(|_| PaninkError::ProtocolXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid {primary} value '{raw}'"),
    })
}

/// Reads an optional per-sample coordinate. Absent attributes stay absent;
/// present ones must parse.
fn coordinate_attribute(
    node: Node<'_, '_>,
    name: &str,
    path: &Path,
) -> Result<Option<f64>, PaninkError> {
    node.attribute(name)
        .map(|raw| {
            raw.parse::<f64>().map_err(|_| PaninkError::ProtocolXmlParse {
                path: path.to_path_buf(),
                message: format!("invalid {name} value '{raw}'"),
            })
        })
        .transpose()
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}
