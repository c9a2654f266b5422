//! Resolved table model.

use super::{Block, Paragraph, Shading};
use serde::{Deserialize, Serialize};

/// A cell in a table. Cells hold blocks, so tables nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Horizontal span (colspan)
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub col_span: u32,

    /// Vertical span (rowspan), after folding vertical merges
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub row_span: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<Shading>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            col_span: 1,
            row_span: 1,
            shading: None,
        }
    }
}

fn default_span() -> u32 {
    1
}

fn is_default_span(n: &u32) -> bool {
    *n == 1
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell with one plain paragraph.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![Block::Paragraph(Paragraph::with_text(text))],
            ..Default::default()
        }
    }

    /// Get the plain text content, one line per block.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| match b {
            Block::Paragraph(p) => p.is_empty(),
            Block::Table(t) => t.is_empty(),
        })
    }

    pub fn has_spans(&self) -> bool {
        self.col_span > 1 || self.row_span > 1
    }
}

/// A row in a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Repeated header row (`w:tblHeader`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Column count accounting for horizontal spans.
    pub fn effective_columns(&self) -> usize {
        self.cells.iter().map(|c| c.col_span as usize).sum()
    }
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<Row>,

    /// Table style ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row, accounting for spans.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Row::effective_columns)
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_merged_cells(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.cells.iter().any(|c| c.has_spans()))
    }

    /// Tab-separated cells, one row per line.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            let cells: Vec<String> = row.cells.iter().map(|c| c.plain_text()).collect();
            text.push_str(&cells.join("\t"));
            text.push('\n');
        }
        text
    }
}
