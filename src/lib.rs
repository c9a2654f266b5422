//! # docx-resolve
//!
//! Style cascade and list numbering resolution for Word (`.docx`) documents.
//!
//! WordprocessingML spreads formatting over document defaults, default
//! styles, `basedOn` style chains and direct formatting, and keeps list
//! numbering in a separate definition graph. This crate merges all of it into
//! a [`ResolvedDocument`] in which every paragraph and run carries its
//! effective properties and every list paragraph its computed marker.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docx_resolve::{parse_file, to_html};
//!
//! // Resolve a document and inspect it
//! let doc = parse_file("document.docx")?;
//! for para in doc.paragraphs() {
//!     if let Some(marker) = para.marker() {
//!         println!("{} {}", marker, para.plain_text());
//!     }
//! }
//!
//! // Convert to HTML
//! let html = to_html("document.docx")?;
//! std::fs::write("output.html", html)?;
//! # Ok::<(), docx_resolve::Error>(())
//! ```
//!
//! ## Lower-level APIs
//!
//! ```no_run
//! use docx_resolve::docx::DocxReader;
//! use docx_resolve::resolve::{CounterScope, ResolveOptions};
//!
//! let reader = DocxReader::open("report.docx")?;
//! println!("{} styles", reader.styles().len());
//!
//! let options = ResolveOptions::default().with_counter_scope(CounterScope::TableCell);
//! let doc = reader.resolve(&options)?;
//! # Ok::<(), docx_resolve::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: `parse_file_async` using Tokio

pub mod container;
pub mod diagnostics;
pub mod docx;
pub mod error;
pub mod model;
pub mod render;
pub mod resolve;
pub mod xml;

// Re-exports
pub use container::{DocxPackage, Relationship, Relationships};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use docx::DocxReader;
pub use error::{Error, Result};
pub use model::{
    Block, Cell, EffectiveParagraphProperties, EffectiveRunProperties, HeadingLevel, ListItem,
    NumberingMarker, Paragraph, ResolvedDocument, Row, Table, TextRun,
};
pub use resolve::{CounterScope, ResolveOptions};

use std::path::Path;

/// Parse and resolve a `.docx` file with default options.
///
/// # Example
///
/// ```no_run
/// use docx_resolve::parse_file;
///
/// let doc = parse_file("document.docx")?;
/// println!("Blocks: {}", doc.blocks.len());
/// # Ok::<(), docx_resolve::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<ResolvedDocument> {
    parse_file_with(path, &ResolveOptions::default())
}

/// Parse and resolve a `.docx` file.
pub fn parse_file_with(path: impl AsRef<Path>, options: &ResolveOptions) -> Result<ResolvedDocument> {
    DocxReader::open(path)?.resolve(options)
}

/// Parse and resolve a `.docx` document from bytes.
///
/// # Example
///
/// ```no_run
/// use docx_resolve::parse_bytes;
///
/// let data = std::fs::read("document.docx")?;
/// let doc = parse_bytes(&data)?;
/// # Ok::<(), docx_resolve::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<ResolvedDocument> {
    parse_bytes_with(data, &ResolveOptions::default())
}

/// Parse and resolve a `.docx` document from bytes.
pub fn parse_bytes_with(data: &[u8], options: &ResolveOptions) -> Result<ResolvedDocument> {
    DocxReader::from_bytes(data.to_vec())?.resolve(options)
}

/// Parse and resolve a `.docx` file without blocking the runtime on I/O.
#[cfg(feature = "async")]
pub async fn parse_file_async(path: impl AsRef<Path>) -> Result<ResolvedDocument> {
    let data = tokio::fs::read(path.as_ref()).await?;
    parse_bytes(&data)
}

/// Extract plain text (with list markers) from a document.
///
/// # Example
///
/// ```no_run
/// use docx_resolve::extract_text;
///
/// let text = extract_text("document.docx")?;
/// println!("{}", text);
/// # Ok::<(), docx_resolve::Error>(())
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, &render::RenderOptions::default())
}

/// Convert a document to an HTML fragment.
pub fn to_html(path: impl AsRef<Path>) -> Result<String> {
    to_html_with_options(path, &render::RenderOptions::default())
}

/// Convert a document to HTML with options.
///
/// # Example
///
/// ```no_run
/// use docx_resolve::{to_html_with_options, render::RenderOptions};
///
/// let options = RenderOptions::default().with_full_document(true);
/// let html = to_html_with_options("document.docx", &options)?;
/// # Ok::<(), docx_resolve::Error>(())
/// ```
pub fn to_html_with_options(
    path: impl AsRef<Path>,
    options: &render::RenderOptions,
) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_html(&doc, options)
}
