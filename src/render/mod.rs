//! Output rendering for resolved documents.
//!
//! Emitters only read the resolved model: effective properties in points,
//! computed list markers and list transitions.
//!
//! # Example
//!
//! ```no_run
//! use docx_resolve::{parse_file, render::*};
//!
//! let doc = parse_file("document.docx")?;
//!
//! // Render to HTML
//! let html = to_html(&doc, &RenderOptions::default())?;
//!
//! // Render to plain text
//! let text = to_text(&doc, &RenderOptions::default())?;
//!
//! // Render to JSON
//! let json = to_json(&doc, JsonFormat::Pretty)?;
//! # Ok::<(), docx_resolve::Error>(())
//! ```

mod html;
mod json;
mod options;
mod text;

pub use html::to_html;
pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;
pub use text::to_text;
