//! Resolution engine: style cascade, numbering and the document traversal
//! that ties them together.

mod cascade;
mod lists;
mod merge;
mod numbering;
mod options;
mod traverse;

pub use cascade::{ResolvedStyle, StyleResolver};
pub use lists::ListStack;
pub use merge::{finish_paragraph, finish_run, merge_all, run_layer_from_effective, Merge};
pub use numbering::{
    format_counter, resolve_level, CounterState, LevelNotFound, NumberingEngine, ResolvedLevel,
};
pub use options::{CounterScope, ResolveOptions};
pub use traverse::{resolve_document, DocumentResolver};
