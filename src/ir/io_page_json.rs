//! Interchange page JSON reader and writer.
//!
//! This is the crate's own serialization of the canonical page model, used
//! to exchange pages between tools: a page object carrying `width`,
//! `height`, `metadata` and a `strokes` array, each stroke carrying
//! `startTime`, `endTime`, `metadata` and a `dots` array, each dot carrying
//! `x`, `y`, `timestamp`, `pressure`, `type` and `metadata`.
//!
//! Reading is permissive about omissions (missing numeric scalars default
//! to 0, missing maps to empty, a missing dot `type` to MOVE) but strict
//! about nonsense: a dot `type` that matches none of DOWN/MOVE/UP —
//! compared case-insensitively — fails the decode. Coordinates are already
//! millimeters.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::{Dot, DotKind, Metadata, Page, Stroke};
use crate::error::PaninkError;

// ============================================================================
// Schema types (internal to this module)
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonPage {
    #[serde(default)]
    width: f64,

    #[serde(default)]
    height: f64,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,

    #[serde(default)]
    strokes: Vec<JsonStroke>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonStroke {
    #[serde(default, rename = "startTime")]
    start_time: i64,

    #[serde(default, rename = "endTime")]
    end_time: i64,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,

    #[serde(default)]
    dots: Vec<JsonDot>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonDot {
    #[serde(default)]
    x: f64,

    #[serde(default)]
    y: f64,

    #[serde(default)]
    timestamp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pressure: Option<f64>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

// ============================================================================
// Public API
// ============================================================================

/// Reads a page from an interchange JSON file.
pub fn read_page_json(path: &Path) -> Result<Page, PaninkError> {
    let file = File::open(path).map_err(PaninkError::Io)?;
    let reader = BufReader::new(file);

    let json: JsonPage =
        serde_json::from_reader(reader).map_err(|source| PaninkError::PageJsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    json_to_page(json, path)
}

/// Writes a page to an interchange JSON file.
pub fn write_page_json(path: &Path, page: &Page) -> Result<(), PaninkError> {
    let file = File::create(path).map_err(PaninkError::Io)?;
    let writer = BufWriter::new(file);

    let json = page_to_json(page);

    serde_json::to_writer_pretty(writer, &json).map_err(|source| PaninkError::PageJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a page from an interchange JSON string.
///
/// Useful for testing without file I/O.
pub fn from_page_json_str(json: &str) -> Result<Page, PaninkError> {
    let path = Path::new("<memory>");
    let parsed: JsonPage =
        serde_json::from_str(json).map_err(|source| PaninkError::PageJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    json_to_page(parsed, path)
}

/// Reads a page from interchange JSON bytes.
///
/// Useful for fuzzing and processing raw bytes without UTF-8 validation
/// overhead.
pub fn from_page_json_slice(bytes: &[u8]) -> Result<Page, PaninkError> {
    let path = Path::new("<memory>");
    let parsed: JsonPage =
        serde_json::from_slice(bytes).map_err(|source| PaninkError::PageJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    json_to_page(parsed, path)
}

/// Writes a page to an interchange JSON string.
///
/// Useful for testing without file I/O.
pub fn to_page_json_string(page: &Page) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&page_to_json(page))
}

// ============================================================================
// Conversion: JSON <-> IR
// ============================================================================

fn json_to_page(json: JsonPage, path: &Path) -> Result<Page, PaninkError> {
    let mut page = Page::new();
    page.width = json.width;
    page.height = json.height;
    page.metadata = json.metadata;

    for stroke_json in json.strokes {
        let mut stroke = Stroke::new(stroke_json.start_time, stroke_json.end_time);
        stroke.metadata = stroke_json.metadata;

        for dot_json in stroke_json.dots {
            let kind = match dot_json.kind.as_deref() {
                None => DotKind::Move,
                Some(raw) => {
                    DotKind::parse(raw).ok_or_else(|| PaninkError::PageJsonInvalid {
                        path: path.to_path_buf(),
                        message: format!(
                            "invalid dot type '{raw}' (expected DOWN, MOVE or UP)"
                        ),
                    })?
                }
            };

            let mut dot = Dot::new(dot_json.x, dot_json.y, dot_json.timestamp).with_kind(kind);
            dot.pressure = dot_json.pressure;
            dot.metadata = dot_json.metadata;
            stroke.add_dot(dot);
        }

        page.add_stroke(stroke);
    }

    Ok(page)
}

fn page_to_json(page: &Page) -> JsonPage {
    JsonPage {
        width: page.width,
        height: page.height,
        metadata: page.metadata.clone(),
        strokes: page
            .strokes
            .iter()
            .map(|stroke| JsonStroke {
                start_time: stroke.start_time,
                end_time: stroke.end_time,
                metadata: stroke.metadata.clone(),
                dots: stroke
                    .dots
                    .iter()
                    .map(|dot| JsonDot {
                        x: dot.x.unwrap_or(0.0),
                        y: dot.y.unwrap_or(0.0),
                        timestamp: dot.timestamp,
                        pressure: dot.pressure,
                        kind: Some(kind_name(dot.kind).to_string()),
                        metadata: dot.metadata.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn kind_name(kind: DotKind) -> &'static str {
    match kind {
        DotKind::Down => "DOWN",
        DotKind::Move => "MOVE",
        DotKind::Up => "UP",
    }
}
