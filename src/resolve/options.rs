//! Options for resolving a document.

/// How list counters relate to table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CounterScope {
    /// Counters run through the whole document, across table cells.
    #[default]
    Document,
    /// Counters are saved on entering a table cell and restored on leaving
    /// it, so lists inside a cell do not disturb the surrounding numbering.
    TableCell,
}

/// Options for resolving a document.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub counter_scope: CounterScope,

    /// Marker used when a numbering reference cannot be resolved
    pub fallback_bullet: String,

    /// Coalesce adjacent runs with identical effective properties
    pub merge_adjacent_runs: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            counter_scope: CounterScope::Document,
            fallback_bullet: "\u{2022}".to_string(),
            merge_adjacent_runs: true,
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counter_scope(mut self, scope: CounterScope) -> Self {
        self.counter_scope = scope;
        self
    }

    pub fn with_fallback_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.fallback_bullet = bullet.into();
        self
    }

    pub fn with_merge_adjacent_runs(mut self, merge: bool) -> Self {
        self.merge_adjacent_runs = merge;
        self
    }
}
