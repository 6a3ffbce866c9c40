use std::path::PathBuf;
use thiserror::Error;

/// The main error type for panink operations.
#[derive(Debug, Error)]
pub enum PaninkError {
    /// A filesystem or other I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A NeoNotes archive could not be opened or read.
    #[error("Failed to read archive {path}: {message}")]
    ArchiveRead { path: PathBuf, message: String },

    /// A NeoNotes page payload could not be parsed.
    #[error("Failed to parse NeoNotes data from {path}: {message}")]
    NeoNotesParse { path: PathBuf, message: String },

    /// An InkML document could not be parsed.
    #[error("Failed to parse InkML from {path}: {message}")]
    InkMlParse { path: PathBuf, message: String },

    /// A protocol XML document could not be parsed.
    #[error("Failed to parse protocol XML from {path}: {message}")]
    ProtocolXmlParse { path: PathBuf, message: String },

    /// A page JSON document could not be parsed.
    #[error("Failed to parse page JSON from {path}: {source}")]
    PageJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A page JSON document parsed but contained invalid data.
    #[error("Invalid page JSON in {path}: {message}")]
    PageJsonInvalid { path: PathBuf, message: String },

    /// A page could not be serialized to page JSON.
    #[error("Failed to write page JSON to {path}: {source}")]
    PageJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested input or output format is not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The input format could not be recognized from its contents.
    #[error("Could not recognize the format of {path}")]
    UnrecognizedFormat { path: PathBuf },

    /// The command was invoked incorrectly.
    #[error("{0}")]
    Usage(String),
}
