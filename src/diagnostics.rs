//! Recoverable conditions found while resolving a document.
//!
//! Nothing here aborts processing. Each diagnostic is logged through the
//! `log` facade when it is recorded and is also kept on the resolved
//! document so callers can inspect what degraded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::docx::StyleKind;
use crate::resolve::LevelNotFound;

/// A recoverable problem with a style or numbering reference.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A `pStyle`/`rStyle` reference names no style of that kind.
    #[error("{kind} style '{style_id}' is not defined")]
    MissingStyle { kind: StyleKind, style_id: String },

    /// A style's `basedOn` names no style of the same kind.
    #[error("style '{style_id}' is based on undefined style '{based_on}'")]
    MissingBasedOn { style_id: String, based_on: String },

    /// A `basedOn` chain revisits a style.
    #[error("style '{style_id}' has a basedOn cycle through '{repeated}'")]
    StyleCycle { style_id: String, repeated: String },

    /// A numbering reference could not be resolved to a level.
    #[error("numbering {num_id} level {ilvl}: {reason}")]
    MissingNumbering {
        num_id: u32,
        ilvl: u8,
        reason: LevelNotFound,
    },
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Record every diagnostic of another collection, without logging again.
    pub fn extend_from(&mut self, other: &Diagnostics) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
