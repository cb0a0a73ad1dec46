use std::io;
use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not open input archive for reading: {path}")]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("could not open the output archive for writing: {path}")]
    ArchiveCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy entry to output archive: {entry}")]
    Copy {
        entry: String,
        #[source]
        source: ZipError,
    },
    #[error("failed to create entry in output archive: {entry}")]
    EntryCreate {
        entry: String,
        #[source]
        source: ZipError,
    },
    #[error("failed to write entry to output archive: {entry}")]
    Write {
        entry: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to finalize the output archive: {path}")]
    ArchiveClose {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("request to slack {method} failed")]
    Request {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("slack {method} returned HTTP code {status}")]
    Transport { method: &'static str, status: u16 },
    #[error("slack {method} rejected the request ({reason}); check that the API token is correct")]
    ApiRejected {
        method: &'static str,
        reason: String,
    },
    #[error("slack {method} returned a malformed response")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed {kind} record: {detail}")]
    MalformedRecord { kind: &'static str, detail: String },
}

impl ExportError {
    pub fn is_close_failure(&self) -> bool {
        matches!(self, Self::ArchiveClose { .. })
    }
}
