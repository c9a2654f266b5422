//! Resolved document model.
//!
//! Everything here carries effective (fully merged) values in points and
//! plain enums, so emitters never see OOXML units or style references.

mod document;
mod paragraph;
mod properties;
mod table;

pub use document::*;
pub use paragraph::*;
pub use properties::*;
pub use table::*;
