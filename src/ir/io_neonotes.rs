//! Neo Notes binary format reader.
//!
//! This module decodes the vendor binary page format (`.data` files) and
//! its zip archive container (`.neonotes` exports holding one `.data`
//! entry per page).
//!
//! # Layout Reference
//!
//! All fixed-width fields are little-endian. A page file is:
//!
//! - header: 3-byte ASCII id, i32 version, i32 note type, i32 page number,
//!   f32 width, f32 height, i64 created time, i64 modified time, 1-byte
//!   dirty flag, i32 stroke count;
//! - per stroke: 1-byte record kind. Kind 0 is an ink stroke: i32 color,
//!   u8 thickness, i32 dot count, i64 start time, then per dot f32 x,
//!   f32 y, f32 pressure and a u8 time delta accumulated onto a running
//!   timestamp; a u8 extra-data length plus that many bytes trail each
//!   stroke. Any other kind is a non-ink record (e.g. a voice memo): an
//!   i32 payload length plus payload, consumed and discarded;
//! - trailer: i32 GUID length plus that many ASCII bytes.
//!
//! Coordinates are Ncode glyph units and convert to millimeters exactly
//! once, while dots are materialized. The declared page size is replaced
//! by the physical product geometry looked up from the note type.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use super::model::{Dot, Page, Stroke};
use super::paper;
use super::units::NCODE_TO_MM;
use crate::error::PaninkError;

/// Filename suffix of page entries inside an archive container.
const DATA_FILE_SUFFIX: &str = ".data";

// ============================================================================
// Public API
// ============================================================================

/// Reads a single page from a `.data` file.
pub fn read_neonotes(path: &Path) -> Result<Page, PaninkError> {
    let file = File::open(path).map_err(PaninkError::Io)?;
    parse_page(&mut BufReader::new(file), path)
}

/// Reads a single page from an in-memory `.data` image.
pub fn from_neonotes_slice(bytes: &[u8]) -> Result<Page, PaninkError> {
    parse_page(&mut Cursor::new(bytes), Path::new("<memory>"))
}

/// Reads every page of a `.neonotes` archive file, in entry order.
pub fn read_neonotes_archive(path: &Path) -> Result<Vec<Page>, PaninkError> {
    let file = File::open(path).map_err(PaninkError::Io)?;
    parse_archive(BufReader::new(file), path)
}

/// Reads every page of an in-memory archive image, in entry order.
pub fn from_neonotes_archive_slice(bytes: &[u8]) -> Result<Vec<Page>, PaninkError> {
    parse_archive(Cursor::new(bytes), Path::new("<memory>"))
}

// ============================================================================
// Archive container
// ============================================================================

/// Iterates the archive's named entries sequentially, buffering each
/// `.data` entry fully in memory before decoding it (the binary layout
/// needs buffer-relative positioning, and container streams are
/// forward-only). A malformed entry is reported and skipped; later
/// entries still decode.
fn parse_archive<R: Read + std::io::Seek>(
    reader: R,
    path: &Path,
) -> Result<Vec<Page>, PaninkError> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|source| PaninkError::ArchiveRead {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let mut pages = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| PaninkError::ArchiveRead {
                path: path.to_path_buf(),
                message: source.to_string(),
            })?;

        if !entry.is_file() || !entry.name().ends_with(DATA_FILE_SUFFIX) {
            continue;
        }

        let entry_name = entry.name().to_string();
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| PaninkError::ArchiveRead {
                path: path.to_path_buf(),
                message: format!("failed to read entry '{entry_name}': {source}"),
            })?;

        match parse_page(&mut Cursor::new(bytes), Path::new(&entry_name)) {
            Ok(page) => pages.push(page),
            Err(error) => {
                eprintln!("Warning: skipping archive entry '{entry_name}': {error}");
            }
        }
    }

    Ok(pages)
}

// ============================================================================
// Page layout
// ============================================================================

fn parse_page<R: Read>(reader: &mut R, path: &Path) -> Result<Page, PaninkError> {
    let mut page = Page::new();

    // Fixed header.
    let id = read_string(reader, 3, path, "header id")?;
    let version = read_i32(reader, path, "header version")?;
    let note_type = read_i32(reader, path, "header note type")?;
    let page_no = read_i32(reader, path, "header page number")?;
    let declared_width = read_f32(reader, path, "header width")? as f64 * NCODE_TO_MM;
    let declared_height = read_f32(reader, path, "header height")? as f64 * NCODE_TO_MM;
    let created_time = read_i64(reader, path, "header created time")?;
    let modified_time = read_i64(reader, path, "header modified time")?;
    let dirty = read_u8(reader, path, "header dirty flag")?;
    let stroke_count = read_i32(reader, path, "header stroke count")?;

    let size = paper::resolve(note_type, declared_width, declared_height);
    page.width = size.width;
    page.height = size.height;
    page.margin_left = size.margin_left;
    page.margin_top = size.margin_top;
    page.margin_right = size.margin_right;
    page.margin_bottom = size.margin_bottom;

    page.add_metadata("id", id);
    page.add_metadata("version", version);
    page.add_metadata("noteType", note_type);
    page.add_metadata("pageNo", page_no);
    page.add_metadata("createdTime", created_time);
    page.add_metadata("modifiedTime", modified_time);
    page.add_metadata("dirtyBit", dirty != 0);

    if stroke_count < 0 {
        return Err(malformed(
            path,
            format!("negative stroke count {stroke_count}"),
        ));
    }

    // One kind byte per declared record; non-ink records are drained but
    // produce no stroke.
    for _ in 0..stroke_count {
        let kind = read_u8(reader, path, "stroke kind")?;
        if kind == 0 {
            page.add_stroke(parse_stroke(reader, path)?);
        } else {
            let payload_length = read_i32(reader, path, "non-ink record length")?;
            if payload_length < 0 {
                return Err(malformed(
                    path,
                    format!("negative non-ink record length {payload_length}"),
                ));
            }
            skip_bytes(reader, payload_length as u64, path, "non-ink record payload")?;
        }
    }

    // Trailing page GUID.
    let guid_length = read_i32(reader, path, "page GUID length")?;
    if guid_length < 0 {
        return Err(malformed(
            path,
            format!("negative page GUID length {guid_length}"),
        ));
    }
    let guid = read_string(reader, guid_length as usize, path, "page GUID")?;
    page.add_metadata("pageGuidString", guid);

    Ok(page)
}

fn parse_stroke<R: Read>(reader: &mut R, path: &Path) -> Result<Stroke, PaninkError> {
    let color = read_i32(reader, path, "stroke color")?;
    let thickness = read_u8(reader, path, "stroke thickness")?;
    let dot_count = read_i32(reader, path, "stroke dot count")?;
    let start_time = read_i64(reader, path, "stroke start time")?;

    if dot_count < 0 {
        return Err(malformed(path, format!("negative dot count {dot_count}")));
    }

    let mut stroke = Stroke::new(start_time, start_time);
    stroke.add_metadata("color", color);
    stroke.add_metadata("thickness", thickness as i32);

    // The per-dot delta is an unsigned byte added to a running timestamp;
    // it is never re-based mid-stroke.
    let mut time = start_time;
    for _ in 0..dot_count {
        let x = read_f32(reader, path, "dot x")? as f64 * NCODE_TO_MM;
        let y = read_f32(reader, path, "dot y")? as f64 * NCODE_TO_MM;
        let pressure = read_f32(reader, path, "dot pressure")? as f64;
        let delta = read_u8(reader, path, "dot time delta")?;

        time += i64::from(delta);
        stroke.add_dot(Dot::new(x, y, time).with_pressure(pressure));
    }
    stroke.end_time = time;

    let extra_length = read_u8(reader, path, "stroke extra-data length")?;
    skip_bytes(reader, u64::from(extra_length), path, "stroke extra data")?;

    Ok(stroke)
}

// ============================================================================
// Little-endian field readers
// ============================================================================

fn malformed(path: &Path, message: String) -> PaninkError {
    PaninkError::NeoNotesParse {
        path: path.to_path_buf(),
        message,
    }
}

fn fill<R: Read>(
    reader: &mut R,
    buffer: &mut [u8],
    path: &Path,
    what: &str,
) -> Result<(), PaninkError> {
    reader
        .read_exact(buffer)
        .map_err(|_| malformed(path, format!("stream ended while reading {what}")))
}

fn read_u8<R: Read>(reader: &mut R, path: &Path, what: &str) -> Result<u8, PaninkError> {
    let mut buffer = [0u8; 1];
    fill(reader, &mut buffer, path, what)?;
    Ok(buffer[0])
}

fn read_i32<R: Read>(reader: &mut R, path: &Path, what: &str) -> Result<i32, PaninkError> {
    let mut buffer = [0u8; 4];
    fill(reader, &mut buffer, path, what)?;
    Ok(i32::from_le_bytes(buffer))
}

fn read_i64<R: Read>(reader: &mut R, path: &Path, what: &str) -> Result<i64, PaninkError> {
    let mut buffer = [0u8; 8];
    fill(reader, &mut buffer, path, what)?;
    Ok(i64::from_le_bytes(buffer))
}

fn read_f32<R: Read>(reader: &mut R, path: &Path, what: &str) -> Result<f32, PaninkError> {
    let mut buffer = [0u8; 4];
    fill(reader, &mut buffer, path, what)?;
    Ok(f32::from_le_bytes(buffer))
}

fn read_string<R: Read>(
    reader: &mut R,
    length: usize,
    path: &Path,
    what: &str,
) -> Result<String, PaninkError> {
    let mut bytes = Vec::new();
    let copied = reader
        .by_ref()
        .take(length as u64)
        .read_to_end(&mut bytes)
        .map_err(|_| malformed(path, format!("stream ended while reading {what}")))?;
    if copied < length {
        return Err(malformed(path, format!("stream ended while reading {what}")));
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn skip_bytes<R: Read>(
    reader: &mut R,
    length: u64,
    path: &Path,
    what: &str,
) -> Result<(), PaninkError> {
    let copied = std::io::copy(&mut reader.by_ref().take(length), &mut std::io::sink())
        .map_err(|_| malformed(path, format!("stream ended while skipping {what}")))?;
    if copied < length {
        return Err(malformed(path, format!("stream ended while skipping {what}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::MetaValue;

    fn header(stroke_count: i32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"neo");
        bytes.extend_from_slice(&5i32.to_le_bytes());
        bytes.extend_from_slice(&609i32.to_le_bytes());
        bytes.extend_from_slice(&79i32.to_le_bytes());
        bytes.extend_from_slice(&88.678f32.to_le_bytes());
        bytes.extend_from_slice(&114.708f32.to_le_bytes());
        bytes.extend_from_slice(&1_576_500_142_905i64.to_le_bytes());
        bytes.extend_from_slice(&1_576_500_328_443i64.to_le_bytes());
        bytes.push(1);
        bytes.extend_from_slice(&stroke_count.to_le_bytes());
        bytes
    }

    fn trailer(bytes: &mut Vec<u8>) {
        let guid = b"c0ffee00-0000-0000-0000-000000000001";
        bytes.extend_from_slice(&(guid.len() as i32).to_le_bytes());
        bytes.extend_from_slice(guid);
    }

    #[test]
    fn truncated_header_is_malformed() {
        let bytes = header(0);
        let error = from_neonotes_slice(&bytes[..10]).unwrap_err();
        assert!(matches!(error, PaninkError::NeoNotesParse { .. }));
    }

    #[test]
    fn empty_page_decodes_header_metadata() {
        let mut bytes = header(0);
        trailer(&mut bytes);

        let page = from_neonotes_slice(&bytes).expect("decode page");
        assert_eq!(page.metadata.get("id"), Some(&MetaValue::from("neo")));
        assert_eq!(page.metadata.get("noteType"), Some(&MetaValue::Int(609)));
        assert_eq!(page.metadata.get("dirtyBit"), Some(&MetaValue::Bool(true)));
        assert_eq!(page.width, 236.0);
        assert_eq!(page.height, 323.0);
        assert!(page.strokes.is_empty());
    }

    #[test]
    fn non_ink_record_is_drained_without_a_stroke() {
        let mut bytes = header(1);
        bytes.push(1); // voice memo record
        bytes.extend_from_slice(&4i32.to_le_bytes());
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
        trailer(&mut bytes);

        let page = from_neonotes_slice(&bytes).expect("decode page");
        assert!(page.strokes.is_empty());
        // The GUID trailer parsed cleanly, so the payload really was drained.
        assert!(page.metadata.contains_key("pageGuidString"));
    }
}
