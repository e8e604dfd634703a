//! All error types for the a3trans crate.
//!
//! Parsing and extraction errors are scoped to one document: callers decide
//! whether a failed document aborts the operation or is skipped.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("unsupported XLIFF version: {0}")]
    UnsupportedVersion(String),

    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("no packages found: {0}")]
    EmptyProject(String),
}

impl Error {
    /// Creates a new malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDocument(message.into())
    }

    /// Returns `true` when the error was caused by the document's content
    /// rather than by the file system.
    pub fn is_document_error(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}
