//! Resolved document model.

use super::{Paragraph, Table};
use crate::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};

/// A content block: paragraph or table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    /// Plain text of the block, without list markers.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) => p.plain_text(),
            Block::Table(t) => t.plain_text(),
        }
    }
}

/// A document whose every paragraph and run carries effective properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Recoverable problems found while resolving
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All paragraphs in document order, descending into table cells.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        collect_paragraphs(&self.blocks, &mut out);
        out
    }

    /// Number of tables, nested ones included.
    pub fn table_count(&self) -> usize {
        count_tables(&self.blocks)
    }

    /// Extract all text content, one paragraph per line.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for block in &self.blocks {
            text.push_str(&block.plain_text());
            text.push('\n');
        }
        text.trim().to_string()
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to JSON string (compact).
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn collect_paragraphs<'a>(blocks: &'a [Block], out: &mut Vec<&'a Paragraph>) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => out.push(p),
            Block::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| r.cells.iter()) {
                    collect_paragraphs(&cell.blocks, out);
                }
            }
        }
    }
}

fn count_tables(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .map(|block| match block {
            Block::Paragraph(_) => 0,
            Block::Table(t) => {
                1 + t
                    .rows
                    .iter()
                    .flat_map(|r| r.cells.iter())
                    .map(|c| count_tables(&c.blocks))
                    .sum::<usize>()
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Row};

    fn sample() -> ResolvedDocument {
        let mut table = Table::new();
        let mut row = Row::new();
        row.add_cell(Cell::with_text("cell"));
        table.add_row(row);

        let mut doc = ResolvedDocument::new();
        doc.add_block(Block::Paragraph(Paragraph::with_text("Hello")));
        doc.add_block(Block::Table(table));
        doc
    }

    #[test]
    fn test_paragraphs_descend_into_tables() {
        let doc = sample();
        let texts: Vec<_> = doc.paragraphs().iter().map(|p| p.plain_text()).collect();
        assert_eq!(texts, vec!["Hello", "cell"]);
        assert_eq!(doc.table_count(), 1);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(sample().plain_text(), "Hello\ncell");
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let json = sample().to_json_compact().unwrap();
        assert!(json.contains("\"type\":\"Paragraph\""));
        assert!(json.contains("\"type\":\"Table\""));
        assert!(!json.contains("diagnostics"));

        let back: ResolvedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
