#![allow(dead_code)]

use std::io::Write as _;

/// Builds the fixed little-endian header of a Neo Notes page image.
#[allow(clippy::too_many_arguments)]
pub fn neonotes_header(
    id: &[u8; 3],
    version: i32,
    note_type: i32,
    page_no: i32,
    width: f32,
    height: f32,
    created_time: i64,
    modified_time: i64,
    dirty: u8,
    stroke_count: i32,
) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(id);
    bytes.extend_from_slice(&version.to_le_bytes());
    bytes.extend_from_slice(&note_type.to_le_bytes());
    bytes.extend_from_slice(&page_no.to_le_bytes());
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend_from_slice(&created_time.to_le_bytes());
    bytes.extend_from_slice(&modified_time.to_le_bytes());
    bytes.push(dirty);
    bytes.extend_from_slice(&stroke_count.to_le_bytes());
    bytes
}

/// Builds one ink stroke record (kind byte included). Dots are
/// `(x, y, pressure, time_delta)` in raw device units.
pub fn ink_stroke(
    color: i32,
    thickness: u8,
    start_time: i64,
    dots: &[(f32, f32, f32, u8)],
    extra: &[u8],
) -> Vec<u8> {
    let mut bytes = vec![0u8]; // kind 0 = ink
    bytes.extend_from_slice(&color.to_le_bytes());
    bytes.push(thickness);
    bytes.extend_from_slice(&(dots.len() as i32).to_le_bytes());
    bytes.extend_from_slice(&start_time.to_le_bytes());
    for (x, y, pressure, delta) in dots {
        bytes.extend_from_slice(&x.to_le_bytes());
        bytes.extend_from_slice(&y.to_le_bytes());
        bytes.extend_from_slice(&pressure.to_le_bytes());
        bytes.push(*delta);
    }
    bytes.push(extra.len() as u8);
    bytes.extend_from_slice(extra);
    bytes
}

/// Builds one non-ink record (kind byte included): a declared payload
/// length followed by the payload.
pub fn non_ink_record(kind: u8, payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![kind];
    bytes.extend_from_slice(&(payload.len() as i32).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

/// Builds the trailing page GUID block.
pub fn neonotes_trailer(guid: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(guid.len() as i32).to_le_bytes());
    bytes.extend_from_slice(guid.as_bytes());
    bytes
}

/// Builds a complete single-stroke page image with the metadata the
/// reader tests expect.
pub fn sample_page_bytes(note_type: i32, page_no: i32, dots: &[(f32, f32, f32, u8)]) -> Vec<u8> {
    let mut bytes = neonotes_header(
        b"neo",
        5,
        note_type,
        page_no,
        88.678,
        114.708,
        1_576_500_142_905,
        1_576_500_328_443,
        0,
        1,
    );
    bytes.extend_from_slice(&ink_stroke(-16_777_216, 1, 1_576_499_042_448, dots, &[]));
    bytes.extend_from_slice(&neonotes_trailer("5a0e3c5b-0001-0002-0003-0123456789ab"));
    bytes
}

/// Builds a zip archive image holding the given named entries.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for (name, bytes) in entries {
        writer.start_file(name.to_string(), options).expect("start entry");
        writer.write_all(bytes).expect("write entry");
    }

    writer.finish().expect("finish archive").into_inner()
}
