//! CSV writer.
//!
//! Renders every dot of a page as one `x,y,timestamp` row, in document
//! order, with coordinates formatted to three decimals. Quoting dialect:
//! a field is quoted when it contains a comma, a double quote or an
//! apostrophe, internal quotes are doubled, and embedded line breaks are
//! replaced by a single space.

use std::fs;
use std::path::Path;

use super::model::Page;
use super::units::WRITE_DECIMAL_PRECISION;
use crate::error::PaninkError;

const HEADER: [&str; 3] = ["x", "y", "timestamp"];

/// Writes a page to a CSV file.
pub fn write_csv(path: &Path, page: &Page) -> Result<(), PaninkError> {
    fs::write(path, to_csv_string(page)).map_err(PaninkError::Io)
}

/// Renders a page as a CSV string.
pub fn to_csv_string(page: &Page) -> String {
    let precision = WRITE_DECIMAL_PRECISION as usize;

    let mut lines = vec![to_csv_row(HEADER.iter().map(|field| field.to_string()))];
    for dot in page.dots() {
        let (Some(x), Some(y)) = (dot.x, dot.y) else {
            continue;
        };
        lines.push(to_csv_row(
            [
                format!("{x:.precision$}"),
                format!("{y:.precision$}"),
                dot.timestamp.to_string(),
            ]
            .into_iter(),
        ));
    }

    lines.join("\n")
}

fn to_csv_row(fields: impl Iterator<Item = String>) -> String {
    fields
        .map(|field| escape_field(&field))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_field(raw: &str) -> String {
    let flattened = raw
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ");

    if flattened.contains(',') || flattened.contains('"') || flattened.contains('\'') {
        format!("\"{}\"", flattened.replace('"', "\"\""))
    } else {
        flattened
    }
}
