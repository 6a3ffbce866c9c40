//! InkML ink-markup reader.
//!
//! This module decodes the W3C ink markup dialect produced by capture
//! front-ends: an `<ink>` document whose top-level children are
//! `<annotation>` elements (page metadata, including the declared page
//! size) and `<trace>` elements (one stroke each, carrying a
//! whitespace-separated `x y t` triple per sample, triples joined by
//! commas).
//!
//! Trace times are offsets: the first trace's `timeOffset` establishes the
//! capture origin for the whole page, and every trace's start/end time is
//! the origin plus its own offset (plus duration for the end). Coordinates
//! are already millimeters and are taken as-is.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::model::{Dot, DotKind, Page, Stroke};
use crate::error::PaninkError;

/// Reads a page from an InkML file.
pub fn read_inkml(path: &Path) -> Result<Page, PaninkError> {
    let xml = fs::read_to_string(path).map_err(PaninkError::Io)?;
    parse_inkml_str(&xml, path)
}

/// Reads a page from an InkML string.
///
/// Useful for testing without file I/O.
pub fn from_inkml_str(xml: &str) -> Result<Page, PaninkError> {
    parse_inkml_str(xml, Path::new("<memory>"))
}

/// Reads a page from InkML bytes.
///
/// The input must be valid UTF-8.
pub fn from_inkml_slice(bytes: &[u8]) -> Result<Page, PaninkError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| PaninkError::InkMlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_inkml_str(xml)
}

fn parse_inkml_str(xml: &str, path: &Path) -> Result<Page, PaninkError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| PaninkError::InkMlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let ink = document.root_element();
    if ink.tag_name().name() != "ink" {
        return Err(PaninkError::InkMlParse {
            path: path.to_path_buf(),
            message: "missing <ink> root element".to_string(),
        });
    }

    let mut page = Page::new();
    if let Some(document_id) = ink.attribute("documentID") {
        page.add_metadata("id", document_id);
    }

    // The first trace fixes the page's capture-time origin.
    let mut origin = 0i64;

    for child in ink.children().filter(|node| node.is_element()) {
        match child.tag_name().name() {
            "annotation" => read_annotation(child, &mut page, path)?,
            "trace" => {
                if page.strokes.is_empty() {
                    origin = time_attribute(child, "timeOffset", path)?.unwrap_or(0);
                }
                let stroke = read_trace(child, origin, path)?;
                page.add_stroke(stroke);
            }
            _ => {}
        }
    }

    Ok(page)
}

/// Applies one `<annotation>` element: `width`/`height` (compared
/// case-insensitively) set the page dimensions, anything else becomes page
/// metadata under the annotation type.
fn read_annotation(node: Node<'_, '_>, page: &mut Page, path: &Path) -> Result<(), PaninkError> {
    let Some(kind) = node.attribute("type") else {
        return Ok(());
    };
    let value = node.text().map(str::trim).unwrap_or_default();

    if kind.eq_ignore_ascii_case("width") {
        page.width = parse_mm(value, kind, path)?;
    } else if kind.eq_ignore_ascii_case("height") {
        page.height = parse_mm(value, kind, path)?;
    } else {
        page.add_metadata(kind, value);
    }

    Ok(())
}

fn read_trace(node: Node<'_, '_>, origin: i64, path: &Path) -> Result<Stroke, PaninkError> {
    let offset = time_attribute(node, "timeOffset", path)?.unwrap_or(0);
    let duration = time_attribute(node, "duration", path)?.unwrap_or(0);

    let mut stroke = Stroke::new(origin + offset, origin + offset + duration);

    let kind = match node.attribute("type") {
        Some(raw) => trace_kind(raw),
        None => DotKind::Move,
    };

    let payload = node.text().unwrap_or_default();
    for triple in payload.split(',') {
        let fields: Vec<&str> = triple.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }

        let x = parse_mm(fields[0], "trace x", path)?;
        let y = parse_mm(fields[1], "trace y", path)?;
        let timestamp = fields[2]
            .parse::<i64>()
            .map_err(|_| PaninkError::InkMlParse {
                path: path.to_path_buf(),
                message: format!("invalid trace timestamp '{}'", fields[2]),
            })?;

        stroke.add_dot(Dot::new(x, y, timestamp).with_kind(kind));
    }

    Ok(stroke)
}

/// Maps a trace `type` attribute to a dot kind. Both the InkML camel-case
/// spellings and the hyphenated ones are accepted, case-insensitively.
fn trace_kind(raw: &str) -> DotKind {
    let normalized: String = raw
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match normalized.as_str() {
        "pendown" => DotKind::Down,
        "penup" => DotKind::Up,
        _ => DotKind::Move,
    }
}

/// Parses a decimal time attribute, truncated toward zero to whole
/// milliseconds. Returns `None` when the attribute is absent.
fn time_attribute(
    node: Node<'_, '_>,
    name: &str,
    path: &Path,
) -> Result<Option<i64>, PaninkError> {
    node.attribute(name)
        .map(|raw| {
            raw.parse::<f64>()
                .map(|value| value.trunc() as i64)
                .map_err(|_| PaninkError::InkMlParse {
                    path: path.to_path_buf(),
                    message: format!("invalid {name} value '{raw}'"),
                })
        })
        .transpose()
}

fn parse_mm(raw: &str, what: &str, path: &Path) -> Result<f64, PaninkError> {
    raw.parse::<f64>().map_err(|_| PaninkError::InkMlParse {
        path: path.to_path_buf(),
        message: format!("invalid {what} value '{raw}'"),
    })
}
