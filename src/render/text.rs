//! Plain text renderer implementation.
//!
//! List items are written flat, each prefixed with its computed marker and
//! suffix; no grouping is needed.

use crate::error::Result;
use crate::model::{Block, Paragraph, ResolvedDocument, RunContent, Table};
use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthStr;

use super::options::RenderOptions;

/// Convert a resolved document to plain text.
pub fn to_text(doc: &ResolvedDocument, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();
    render_blocks(&doc.blocks, options, &mut output);

    let output = output.trim_end().to_string();
    if options.normalize_unicode {
        Ok(output.nfc().collect())
    } else {
        Ok(output)
    }
}

fn render_blocks(blocks: &[Block], options: &RenderOptions, output: &mut String) {
    for block in blocks {
        match block {
            Block::Paragraph(para) => {
                let text = render_paragraph_text(para, options);
                if !text.is_empty() || options.include_empty_paragraphs {
                    output.push_str(&text);
                    output.push('\n');
                    if options.paragraph_spacing {
                        output.push('\n');
                    }
                }
            }
            Block::Table(table) => {
                let text = render_table_text(table, options);
                if !text.is_empty() {
                    output.push_str(&text);
                    output.push_str("\n\n");
                }
            }
        }
    }
}

/// Render a paragraph to plain text, marker first.
fn render_paragraph_text(para: &Paragraph, options: &RenderOptions) -> String {
    let mut output = String::new();

    if let Some(item) = &para.list_item {
        if options.indent_lists {
            output.push_str(&"  ".repeat(item.marker.ilvl as usize));
        }
        output.push_str(&item.marker.with_suffix(&options.tab));
    }

    for run in para.runs.iter().filter(|r| !r.properties.hidden) {
        for content in &run.content {
            match content {
                RunContent::Tab => output.push_str(&options.tab),
                RunContent::SoftHyphen => {}
                other => output.push_str(other.as_plain()),
            }
        }
    }

    output
}

/// Text of a cell on one line.
fn cell_text(blocks: &[Block], options: &RenderOptions) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Paragraph(p) => render_paragraph_text(p, options),
            Block::Table(t) => t.plain_text(),
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['\n', '\t'], " ")
}

/// Render a table as an ASCII table. Spanned cells occupy one column.
fn render_table_text(table: &Table, options: &RenderOptions) -> String {
    if table.is_empty() {
        return String::new();
    }

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| cell_text(&cell.blocks, options))
                .collect()
        })
        .collect();

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }

    // minimum width of 3 for readability
    let mut widths = vec![3usize; col_count];
    for row in &rows {
        for (i, text) in row.iter().enumerate() {
            widths[i] = widths[i].max(text.width());
        }
    }

    let border = |fill: &str| {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&fill.repeat(*w + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let mut output = border("-");
    for (row_idx, row) in rows.iter().enumerate() {
        output.push('|');
        for (i, width) in widths.iter().enumerate() {
            let text = row.get(i).map(String::as_str).unwrap_or("");
            let padding = width.saturating_sub(text.width());
            output.push(' ');
            output.push_str(text);
            output.push_str(&" ".repeat(padding));
            output.push_str(" |");
        }
        output.push('\n');

        let is_header = table.rows.get(row_idx).is_some_and(|r| r.is_header);
        let next_is_header = table.rows.get(row_idx + 1).is_some_and(|r| r.is_header);
        if is_header && !next_is_header && row_idx + 1 < rows.len() {
            output.push_str(&border("="));
        }
    }
    output.push_str(border("-").trim_end());

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{LevelSuffix, NumberFormat};
    use crate::model::{
        Cell, EffectiveRunProperties, Justification, ListItem, ListKind, ListTransition,
        NumberingMarker, Row, TextRun,
    };

    fn list_paragraph(text: &str, marker: &str, ilvl: u8, suffix: LevelSuffix) -> Paragraph {
        Paragraph {
            list_item: Some(ListItem {
                marker: NumberingMarker {
                    text: marker.to_string(),
                    num_id: 1,
                    ilvl,
                    format: NumberFormat::Decimal,
                    kind: ListKind::Ordered,
                    suffix,
                    justification: Justification::Left,
                    run_properties: EffectiveRunProperties::default(),
                },
                transition: ListTransition::default(),
            }),
            ..Paragraph::with_text(text)
        }
    }

    #[test]
    fn test_basic_paragraph() {
        let para = Paragraph::with_text("Hello, World!");
        let text = render_paragraph_text(&para, &RenderOptions::default());
        assert_eq!(text, "Hello, World!");
    }

    #[test]
    fn test_list_markers_and_indent() {
        let options = RenderOptions::default().with_tab(" ");
        let doc = ResolvedDocument {
            blocks: vec![
                Block::Paragraph(list_paragraph("one", "1.", 0, LevelSuffix::Tab)),
                Block::Paragraph(list_paragraph("sub", "1.1.", 1, LevelSuffix::Space)),
                Block::Paragraph(list_paragraph("tight", "a)", 1, LevelSuffix::Nothing)),
            ],
            diagnostics: Vec::new(),
        };
        let text = to_text(&doc, &options.with_paragraph_spacing(false)).unwrap();
        assert_eq!(text, "1. one\n  1.1. sub\n  a)tight");
    }

    #[test]
    fn test_tabs_and_hidden_runs() {
        let para = Paragraph {
            runs: vec![
                TextRun {
                    content: vec![
                        RunContent::Text("a".to_string()),
                        RunContent::Tab,
                        RunContent::Text("b".to_string()),
                    ],
                    ..Default::default()
                },
                TextRun {
                    properties: EffectiveRunProperties {
                        hidden: true,
                        ..Default::default()
                    },
                    ..TextRun::plain("hidden")
                },
            ],
            ..Default::default()
        };
        let text = render_paragraph_text(&para, &RenderOptions::default().with_tab("    "));
        assert_eq!(text, "a    b");
    }

    #[test]
    fn test_table_text() {
        let mut table = Table::new();
        table.add_row(Row {
            cells: vec![Cell::with_text("A"), Cell::with_text("B")],
            is_header: true,
        });
        table.add_row(Row {
            cells: vec![Cell::with_text("1"), Cell::with_text("2")],
            is_header: false,
        });

        let text = render_table_text(&table, &RenderOptions::default());
        let expected = "\
+-----+-----+
| A   | B   |
+=====+=====+
| 1   | 2   |
+-----+-----+";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_wide_characters_align() {
        let mut table = Table::new();
        table.add_row(Row {
            cells: vec![Cell::with_text("\u{D55C}\u{AE00}"), Cell::with_text("x")],
            is_header: false,
        });
        table.add_row(Row {
            cells: vec![Cell::with_text("ab"), Cell::with_text("y")],
            is_header: false,
        });
        let text = render_table_text(&table, &RenderOptions::default());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[1].width(), lines[2].width());
        assert_eq!(lines[1], "| \u{D55C}\u{AE00} | x   |");
    }

    #[test]
    fn test_normalize_unicode() {
        let doc = ResolvedDocument {
            blocks: vec![Block::Paragraph(Paragraph::with_text("e\u{0301}"))],
            diagnostics: Vec::new(),
        };
        let text = to_text(&doc, &RenderOptions::default().with_normalize_unicode(true)).unwrap();
        assert_eq!(text, "\u{00E9}");
    }
}
