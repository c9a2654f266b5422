//! Single depth-first pass from a raw document to a resolved one.

use super::cascade::StyleResolver;
use super::lists::ListStack;
use super::merge::{finish_run, run_layer_from_effective, Merge};
use super::numbering::{NumberingEngine, ResolvedLevel};
use super::options::{CounterScope, ResolveOptions};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::docx::{
    LevelSuffix, NumberFormat, NumberingSheet, RawBlock, RawDocument, RawParagraph, RawTable,
    StyleSheet, VerticalMerge,
};
use crate::model::{
    Block, Cell, EffectiveParagraphProperties, Justification, ListFrame, ListItem, ListKind,
    ListRef, NumberingMarker, Paragraph, ResolvedDocument, Row, Table, TextRun,
};
use std::collections::HashMap;

/// Resolve a whole document against its style and numbering sheets.
pub fn resolve_document(
    raw: &RawDocument,
    styles: &StyleSheet,
    numbering: &NumberingSheet,
    options: &ResolveOptions,
) -> ResolvedDocument {
    let cascade = StyleResolver::new(styles);
    DocumentResolver::new(&cascade, numbering, options).resolve(raw)
}

/// Traversal state of one document.
///
/// The style resolver is only read and may be shared by several traversals;
/// the counters and the open-list stack belong to this traversal alone.
#[derive(Debug)]
pub struct DocumentResolver<'a> {
    styles: &'a StyleResolver<'a>,
    numbering: NumberingEngine<'a>,
    lists: ListStack,
    options: &'a ResolveOptions,
    diagnostics: Diagnostics,
}

impl<'a> DocumentResolver<'a> {
    pub fn new(
        styles: &'a StyleResolver<'a>,
        numbering: &'a NumberingSheet,
        options: &'a ResolveOptions,
    ) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend_from(styles.diagnostics());

        Self {
            styles,
            numbering: NumberingEngine::new(numbering),
            lists: ListStack::new(),
            options,
            diagnostics,
        }
    }

    pub fn resolve(mut self, raw: &RawDocument) -> ResolvedDocument {
        let blocks = self.resolve_blocks(&raw.blocks);
        log::debug!(
            "resolved {} blocks with {} diagnostics",
            blocks.len(),
            self.diagnostics.len()
        );
        ResolvedDocument {
            blocks,
            diagnostics: self.diagnostics.into_vec(),
        }
    }

    fn resolve_blocks(&mut self, blocks: &[RawBlock]) -> Vec<Block> {
        let mut out = Vec::with_capacity(blocks.len());
        // last list item of the current contiguous list run
        let mut last_item: Option<usize> = None;

        for block in blocks {
            match block {
                RawBlock::Paragraph(raw) => {
                    let paragraph = self.resolve_paragraph(raw);
                    if paragraph.is_list_item() {
                        last_item = Some(out.len());
                    } else {
                        self.close_lists(&mut out, last_item.take());
                    }
                    out.push(Block::Paragraph(paragraph));
                }
                RawBlock::Table(raw) => {
                    self.close_lists(&mut out, last_item.take());
                    let table = self.resolve_table(raw);
                    out.push(Block::Table(table));
                }
            }
        }

        self.close_lists(&mut out, last_item.take());
        out
    }

    /// Close every open list after the item at `last_item`.
    fn close_lists(&mut self, out: &mut [Block], last_item: Option<usize>) {
        if self.lists.is_empty() {
            return;
        }
        log::debug!("closing {} open list level(s)", self.lists.depth());
        let closed = self.lists.close_all();
        let item = last_item.and_then(|index| match out.get_mut(index) {
            Some(Block::Paragraph(p)) => p.list_item.as_mut(),
            _ => None,
        });
        if let Some(item) = item {
            item.transition.close_after.extend(closed);
        }
    }

    fn resolve_paragraph(&mut self, raw: &RawParagraph) -> Paragraph {
        let styled = self
            .styles
            .styled_paragraph(&raw.properties, &mut self.diagnostics);
        let mut properties = self.styles.finish_paragraph(&styled, None, &raw.properties);

        let list_item = match properties.numbering {
            Some(list_ref) => {
                let level = self.numbering.resolve_level(list_ref.num_id, list_ref.ilvl);
                if let Some(layer) = level
                    .as_ref()
                    .ok()
                    .and_then(|l| l.level.paragraph_properties.as_ref())
                {
                    properties =
                        self.styles
                            .finish_paragraph(&styled, Some(layer), &raw.properties);
                    properties.numbering = Some(list_ref);
                }

                let marker = match level {
                    Ok(level) => self.marker(&level, &properties),
                    Err(reason) => {
                        self.diagnostics.push(Diagnostic::MissingNumbering {
                            num_id: list_ref.num_id,
                            ilvl: list_ref.ilvl,
                            reason,
                        });
                        self.fallback_marker(list_ref, &properties)
                    }
                };
                let transition = self.lists.enter(ListFrame {
                    num_id: list_ref.num_id,
                    ilvl: list_ref.ilvl,
                    kind: marker.kind,
                });
                Some(ListItem { marker, transition })
            }
            None => None,
        };

        let runs = raw
            .runs
            .iter()
            .filter(|run| !run.content.is_empty())
            .map(|run| TextRun {
                content: run.content.clone(),
                properties: self.styles.resolve_run(
                    &run.properties,
                    &properties.run_defaults,
                    &mut self.diagnostics,
                ),
                hyperlink: run.hyperlink.clone(),
            })
            .collect();

        let mut paragraph = Paragraph {
            runs,
            heading: self.styles.heading_level(&properties),
            properties,
            list_item,
        };
        if self.options.merge_adjacent_runs {
            paragraph.merge_adjacent_runs();
        }
        paragraph
    }

    fn marker(
        &mut self,
        level: &ResolvedLevel,
        properties: &EffectiveParagraphProperties,
    ) -> NumberingMarker {
        let mut run_layer = run_layer_from_effective(&properties.run_defaults);
        if let Some(rpr) = &level.level.run_properties {
            run_layer = run_layer.merge(rpr);
        }

        NumberingMarker {
            text: self.numbering.next_marker(level),
            num_id: level.num_id,
            ilvl: level.ilvl,
            format: level.level.format.clone(),
            kind: ListKind::for_format(&level.level.format),
            suffix: level.level.suffix,
            justification: level.level.justification,
            run_properties: finish_run(&run_layer),
        }
    }

    fn fallback_marker(
        &self,
        list_ref: ListRef,
        properties: &EffectiveParagraphProperties,
    ) -> NumberingMarker {
        NumberingMarker {
            text: self.options.fallback_bullet.clone(),
            num_id: list_ref.num_id,
            ilvl: list_ref.ilvl,
            format: NumberFormat::Bullet,
            kind: ListKind::Unordered,
            suffix: LevelSuffix::Tab,
            justification: Justification::Left,
            run_properties: properties.run_defaults.clone(),
        }
    }

    fn resolve_table(&mut self, raw: &RawTable) -> Table {
        let spans = vertical_spans(raw);
        let mut table = Table {
            rows: Vec::with_capacity(raw.rows.len()),
            style_id: raw.style_id.clone(),
        };

        for (raw_row, row_spans) in raw.rows.iter().zip(spans) {
            let mut row = Row {
                cells: Vec::with_capacity(raw_row.cells.len()),
                is_header: raw_row.is_header,
            };
            for (raw_cell, row_span) in raw_row.cells.iter().zip(row_spans) {
                let Some(row_span) = row_span else {
                    continue;
                };
                let blocks = self.resolve_cell(&raw_cell.blocks);
                row.add_cell(Cell {
                    blocks,
                    col_span: raw_cell.col_span.max(1),
                    row_span,
                    shading: raw_cell.shading.clone(),
                });
            }
            table.add_row(row);
        }

        table
    }

    fn resolve_cell(&mut self, blocks: &[RawBlock]) -> Vec<Block> {
        match self.options.counter_scope {
            CounterScope::Document => self.resolve_blocks(blocks),
            CounterScope::TableCell => {
                let saved = self.numbering.counters().clone();
                let out = self.resolve_blocks(blocks);
                self.numbering.swap_counters(saved);
                out
            }
        }
    }
}

/// Row span of every cell, `None` for continuation cells folded into the
/// cell above them.
fn vertical_spans(raw: &RawTable) -> Vec<Vec<Option<u32>>> {
    let mut spans: Vec<Vec<Option<u32>>> = raw
        .rows
        .iter()
        .map(|row| vec![Some(1); row.cells.len()])
        .collect();
    // grid column -> (row, cell) of the cell that started the region
    let mut regions: HashMap<usize, (usize, usize)> = HashMap::new();

    for (r, row) in raw.rows.iter().enumerate() {
        let mut column = 0usize;
        for (c, cell) in row.cells.iter().enumerate() {
            match cell.v_merge {
                Some(VerticalMerge::Restart) => {
                    regions.insert(column, (r, c));
                }
                Some(VerticalMerge::Continue) => {
                    if let Some(&(origin_row, origin_cell)) = regions.get(&column) {
                        if let Some(Some(span)) = spans
                            .get_mut(origin_row)
                            .and_then(|row| row.get_mut(origin_cell))
                        {
                            *span += 1;
                        }
                        spans[r][c] = None;
                    }
                }
                None => {
                    regions.remove(&column);
                }
            }
            column += cell.col_span.max(1) as usize;
        }
    }

    spans
}
