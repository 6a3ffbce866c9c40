//! Source format identification and decoder dispatch.
//!
//! Decoders are dispatched from the [`Format`] enum rather than a trait
//! hierarchy; each variant independently rejects the operations it cannot
//! perform (a single-page format cannot be decoded as an archive, and
//! vice versa).
//!
//! When no format is given explicitly, [`detect`] probes in a fixed
//! order: structural magic-byte sniffing first, then the filename
//! extension, then a trial decode against every known decoder.

use std::path::{Path, PathBuf};

use crate::error::PaninkError;
use crate::geometry;
use crate::ir::{io_inkml, io_neonotes, io_page_json, io_protocol_xml, Page};

/// A decodable source format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Neo Notes vendor binary page (`.data`).
    NeoNotes,
    /// Zip archive of Neo Notes pages (`.neonotes`).
    NeoNotesArchive,
    /// InkML ink markup (`.inkml`).
    InkMl,
    /// Legacy protocol XML (`.xml`).
    ProtocolXml,
    /// Interchange page JSON (`.json`).
    PageJson,
}

/// Every format, in trial-decode order.
const ALL_FORMATS: [Format; 5] = [
    Format::NeoNotes,
    Format::NeoNotesArchive,
    Format::InkMl,
    Format::ProtocolXml,
    Format::PageJson,
];

impl Format {
    /// Stable name used on the CLI and in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Format::NeoNotes => "neonotes",
            Format::NeoNotesArchive => "neonotes-archive",
            Format::InkMl => "inkml",
            Format::ProtocolXml => "protocol-xml",
            Format::PageJson => "page-json",
        }
    }

    /// Parses a CLI format name (with the common aliases).
    pub fn from_name(name: &str) -> Option<Format> {
        match name {
            "neonotes" => Some(Format::NeoNotes),
            "neonotes-archive" | "archive" => Some(Format::NeoNotesArchive),
            "inkml" => Some(Format::InkMl),
            "protocol-xml" | "protocol" => Some(Format::ProtocolXml),
            "page-json" | "json" => Some(Format::PageJson),
            _ => None,
        }
    }

    /// Whether this format holds multiple pages per input.
    pub fn is_archive(&self) -> bool {
        matches!(self, Format::NeoNotesArchive)
    }

    /// Decodes one page. Archive formats reject this operation.
    pub fn read_single(&self, bytes: &[u8]) -> Result<Page, PaninkError> {
        match self {
            Format::NeoNotes => io_neonotes::from_neonotes_slice(bytes),
            Format::NeoNotesArchive => Err(PaninkError::UnsupportedFormat(format!(
                "'{}' holds multiple pages; decode it as an archive",
                self.name()
            ))),
            Format::InkMl => io_inkml::from_inkml_slice(bytes),
            Format::ProtocolXml => io_protocol_xml::from_protocol_slice(bytes),
            Format::PageJson => io_page_json::from_page_json_slice(bytes),
        }
    }

    /// Decodes an archive into its pages, in entry order. Single-page
    /// formats reject this operation.
    pub fn read_archive(&self, bytes: &[u8]) -> Result<Vec<Page>, PaninkError> {
        match self {
            Format::NeoNotesArchive => io_neonotes::from_neonotes_archive_slice(bytes),
            _ => Err(PaninkError::UnsupportedFormat(format!(
                "'{}' has no archive variant",
                self.name()
            ))),
        }
    }
}

/// Identifies the format of `bytes`, optionally using `path` as a
/// filename hint. Explicitly selected formats bypass this entirely.
pub fn detect(bytes: &[u8], path: Option<&Path>) -> Result<Format, PaninkError> {
    if let Some(format) = sniff_magic(bytes) {
        return Ok(format);
    }

    if let Some(format) = path.and_then(sniff_extension) {
        return Ok(format);
    }

    for format in ALL_FORMATS {
        let decoded = if format.is_archive() {
            format.read_archive(bytes).map(|_| ())
        } else {
            format.read_single(bytes).map(|_| ())
        };
        if decoded.is_ok() {
            return Ok(format);
        }
    }

    Err(PaninkError::UnrecognizedFormat {
        path: path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("<memory>")),
    })
}

/// Decodes input of a known or detected format into pages and runs the
/// capture-quality analysis on each.
pub fn decode_pages(
    bytes: &[u8],
    path: Option<&Path>,
    explicit: Option<Format>,
) -> Result<Vec<Page>, PaninkError> {
    let format = match explicit {
        Some(format) => format,
        None => detect(bytes, path)?,
    };

    let mut pages = if format.is_archive() {
        format.read_archive(bytes)?
    } else {
        vec![format.read_single(bytes)?]
    };

    for page in &mut pages {
        geometry::apply(page);
    }

    Ok(pages)
}

fn sniff_magic(bytes: &[u8]) -> Option<Format> {
    if bytes.starts_with(b"neo") {
        return Some(Format::NeoNotes);
    }
    if bytes.starts_with(b"PK\x03\x04") {
        return Some(Format::NeoNotesArchive);
    }

    let text = std::str::from_utf8(bytes).ok()?;
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with('{') {
        return Some(Format::PageJson);
    }
    if trimmed.starts_with('<') {
        let document = roxmltree::Document::parse(text).ok()?;
        return match document.root_element().tag_name().name() {
            "ink" => Some(Format::InkMl),
            "protocol" => Some(Format::ProtocolXml),
            _ => None,
        };
    }

    None
}

fn sniff_extension(path: &Path) -> Option<Format> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "data" => Some(Format::NeoNotes),
        "neonotes" | "zip" => Some(Format::NeoNotesArchive),
        "inkml" => Some(Format::InkMl),
        "xml" => Some(Format::ProtocolXml),
        "json" => Some(Format::PageJson),
        _ => None,
    }
}
