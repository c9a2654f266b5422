//! Error types for the docx-resolve library.
//!
//! Only failures of the input package itself are errors. Dangling style or
//! numbering references inside a well-formed document are recoverable and are
//! reported through [`crate::diagnostics`] instead.

use std::io;
use thiserror::Error;

/// Result type alias for docx-resolve operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or rendering a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a WordprocessingML package.
    #[error("Not a Word document: {0}")]
    NotDocx(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotDocx("missing word/document.xml".to_string());
        assert_eq!(
            err.to_string(),
            "Not a Word document: missing word/document.xml"
        );

        let err = Error::MissingComponent("word/document.xml".to_string());
        assert_eq!(err.to_string(), "Missing component: word/document.xml");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
