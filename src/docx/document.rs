//! Document body (`word/document.xml`) with only directly specified properties.
//!
//! The raw tree is never mutated by resolution; the resolver builds a new
//! [`crate::model::ResolvedDocument`] next to it.

use super::properties::{number, parse_shading, ParagraphProperties, RunProperties};
use crate::container::Relationships;
use crate::error::{Error, Result};
use crate::model::{push_content, BreakKind, RunContent, Shading};
use crate::xml::{on_off, XmlElement};

/// Block-level element as written.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBlock {
    Paragraph(RawParagraph),
    Table(RawTable),
}

/// A paragraph with its direct properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParagraph {
    pub properties: ParagraphProperties,
    pub runs: Vec<RawRun>,
}

/// A run with its direct properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRun {
    pub properties: RunProperties,
    pub content: Vec<RunContent>,
    /// Target of the enclosing hyperlink
    pub hyperlink: Option<String>,
}

/// Vertical merge state of a cell (`w:vMerge`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalMerge {
    /// Starts a merged region
    Restart,
    /// Continues the region of the cell above
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawCell {
    pub blocks: Vec<RawBlock>,
    pub col_span: u32,
    pub v_merge: Option<VerticalMerge>,
    pub shading: Option<Shading>,
}

impl Default for RawCell {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            col_span: 1,
            v_merge: None,
            shading: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
    pub is_header: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub style_id: Option<String>,
    pub rows: Vec<RawRow>,
}

/// The document body in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
}

impl RawDocument {
    /// Parse `document.xml`. Hyperlink targets are looked up in `relationships`.
    pub fn parse(xml: &str, relationships: &Relationships) -> Result<Self> {
        let root = XmlElement::parse(xml)?;
        Self::from_element(&root, relationships)
    }

    /// Build from a parsed `w:document` element.
    pub fn from_element(root: &XmlElement, relationships: &Relationships) -> Result<Self> {
        let body = root
            .child("body")
            .ok_or_else(|| Error::MissingComponent("w:body".to_string()))?;

        let builder = BodyBuilder { relationships };
        let mut blocks = Vec::new();
        builder.collect_blocks(body, &mut blocks);

        log::debug!("read {} top-level blocks", blocks.len());
        Ok(RawDocument { blocks })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

struct BodyBuilder<'a> {
    relationships: &'a Relationships,
}

impl BodyBuilder<'_> {
    /// Block content of a body, cell or content control.
    fn collect_blocks(&self, parent: &XmlElement, out: &mut Vec<RawBlock>) {
        for child in parent.elements() {
            match child.local_name() {
                "p" => out.push(RawBlock::Paragraph(self.paragraph(child))),
                "tbl" => out.push(RawBlock::Table(self.table(child))),
                "sdt" => {
                    if let Some(content) = child.child("sdtContent") {
                        self.collect_blocks(content, out);
                    }
                }
                "customXml" | "ins" => self.collect_blocks(child, out),
                _ => {}
            }
        }
    }

    fn paragraph(&self, element: &XmlElement) -> RawParagraph {
        let mut para = RawParagraph {
            properties: element
                .child("pPr")
                .map(ParagraphProperties::from_element)
                .unwrap_or_default(),
            runs: Vec::new(),
        };
        self.collect_runs(element, None, &mut para.runs);
        para
    }

    /// Inline content of a paragraph or an inline wrapper.
    fn collect_runs(&self, parent: &XmlElement, hyperlink: Option<&str>, out: &mut Vec<RawRun>) {
        for child in parent.elements() {
            match child.local_name() {
                "r" => out.push(self.run(child, hyperlink)),
                "hyperlink" => {
                    let target = self.hyperlink_target(child);
                    self.collect_runs(child, target.as_deref().or(hyperlink), out);
                }
                "ins" | "smartTag" | "fldSimple" | "customXml" | "moveTo" => {
                    self.collect_runs(child, hyperlink, out)
                }
                "sdt" => {
                    if let Some(content) = child.child("sdtContent") {
                        self.collect_runs(content, hyperlink, out);
                    }
                }
                // deleted content and revision bookkeeping
                _ => {}
            }
        }
    }

    fn run(&self, element: &XmlElement, hyperlink: Option<&str>) -> RawRun {
        let mut run = RawRun {
            properties: element
                .child("rPr")
                .map(RunProperties::from_element)
                .unwrap_or_default(),
            content: Vec::new(),
            hyperlink: hyperlink.map(str::to_string),
        };

        for child in element.elements() {
            let item = match child.local_name() {
                "t" => RunContent::Text(child.text()),
                "tab" | "ptab" => RunContent::Tab,
                "br" => RunContent::Break(match child.attr("type") {
                    Some("page") => BreakKind::Page,
                    Some("column") => BreakKind::Column,
                    _ => BreakKind::Line,
                }),
                "cr" => RunContent::Break(BreakKind::Line),
                "noBreakHyphen" => RunContent::NoBreakHyphen,
                "softHyphen" => RunContent::SoftHyphen,
                "sym" => match child.attr("char").and_then(symbol_char) {
                    Some(c) => RunContent::Text(c.to_string()),
                    None => continue,
                },
                // delText, instrText, drawings, field chars
                _ => continue,
            };
            push_content(&mut run.content, item);
        }

        run
    }

    fn hyperlink_target(&self, element: &XmlElement) -> Option<String> {
        if let Some(id) = element.attr("id") {
            match self.relationships.get(id) {
                Some(rel) => {
                    let target = match element.attr("anchor") {
                        Some(anchor) => format!("{}#{}", rel.target, anchor),
                        None => rel.target.clone(),
                    };
                    return Some(target);
                }
                None => log::debug!("hyperlink relationship '{}' not found", id),
            }
        }
        element.attr("anchor").map(|a| format!("#{}", a))
    }

    fn table(&self, element: &XmlElement) -> RawTable {
        let style_id = element
            .child("tblPr")
            .and_then(|p| p.child("tblStyle"))
            .and_then(|s| s.val())
            .map(str::to_string);

        let rows = element
            .children_named("tr")
            .map(|tr| self.row(tr))
            .collect();

        RawTable { style_id, rows }
    }

    fn row(&self, element: &XmlElement) -> RawRow {
        let is_header = element
            .child("trPr")
            .and_then(|p| p.child("tblHeader"))
            .is_some_and(on_off);

        let mut cells = Vec::new();
        for child in element.elements() {
            match child.local_name() {
                "tc" => cells.push(self.cell(child)),
                // content controls wrapping whole cells
                "sdt" => {
                    if let Some(content) = child.child("sdtContent") {
                        cells.extend(content.children_named("tc").map(|tc| self.cell(tc)));
                    }
                }
                _ => {}
            }
        }

        RawRow { cells, is_header }
    }

    fn cell(&self, element: &XmlElement) -> RawCell {
        let mut cell = RawCell::default();

        if let Some(tc_pr) = element.child("tcPr") {
            if let Some(span) = tc_pr
                .child("gridSpan")
                .and_then(|e| e.val().and_then(|v| number(e, v)))
            {
                cell.col_span = (span as u32).max(1);
            }
            cell.v_merge = tc_pr.child("vMerge").map(|e| match e.val() {
                Some("restart") => VerticalMerge::Restart,
                _ => VerticalMerge::Continue,
            });
            cell.shading = tc_pr.child("shd").map(parse_shading);
        }

        self.collect_blocks(element, &mut cell.blocks);
        cell
    }
}

/// `w:sym` characters are hex code points, often in the symbol-font private
/// use area (`F0xx`).
fn symbol_char(hex: &str) -> Option<char> {
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Relationship;
    use pretty_assertions::assert_eq;

    fn parse(body: &str) -> RawDocument {
        let xml = format!(
            r#"<w:document xmlns:w="urn:w" xmlns:r="urn:r"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut rels = Relationships::new();
        rels.add(Relationship {
            id: "rId5".to_string(),
            rel_type: "hyperlink".to_string(),
            target: "https://example.com".to_string(),
            external: true,
        });
        RawDocument::parse(&xml, &rels).unwrap()
    }

    fn first_paragraph(doc: &RawDocument) -> &RawParagraph {
        match &doc.blocks[0] {
            RawBlock::Paragraph(p) => p,
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_run_content_kinds() {
        let doc = parse(
            r#"<w:p><w:r>
                <w:t>a</w:t><w:tab/><w:t xml:space="preserve"> b</w:t>
                <w:br/><w:br w:type="page"/><w:noBreakHyphen/><w:softHyphen/>
                <w:instrText>PAGE</w:instrText><w:delText>gone</w:delText>
            </w:r></w:p>"#,
        );
        let run = &first_paragraph(&doc).runs[0];
        assert_eq!(
            run.content,
            vec![
                RunContent::Text("a".to_string()),
                RunContent::Tab,
                RunContent::Text(" b".to_string()),
                RunContent::Break(BreakKind::Line),
                RunContent::Break(BreakKind::Page),
                RunContent::NoBreakHyphen,
                RunContent::SoftHyphen,
            ]
        );
    }

    #[test]
    fn test_direct_properties_only() {
        let doc = parse(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr>
                <w:r><w:rPr><w:b/></w:rPr><w:t>x</w:t></w:r></w:p>"#,
        );
        let para = first_paragraph(&doc);
        assert_eq!(para.properties.style.as_deref(), Some("Heading1"));
        assert_eq!(para.runs[0].properties.bold, Some(true));
        assert_eq!(para.runs[0].properties.italic, None);
    }

    #[test]
    fn test_hyperlinks_and_wrappers() {
        let doc = parse(
            r#"<w:p>
                <w:hyperlink r:id="rId5"><w:r><w:t>site</w:t></w:r></w:hyperlink>
                <w:hyperlink w:anchor="intro"><w:r><w:t>jump</w:t></w:r></w:hyperlink>
                <w:ins><w:r><w:t>new</w:t></w:r></w:ins>
                <w:del><w:r><w:delText>old</w:delText></w:r></w:del>
                <w:smartTag><w:r><w:t>tag</w:t></w:r></w:smartTag>
            </w:p>"#,
        );
        let runs = &first_paragraph(&doc).runs;
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0].hyperlink.as_deref(), Some("https://example.com"));
        assert_eq!(runs[1].hyperlink.as_deref(), Some("#intro"));
        assert_eq!(runs[2].hyperlink, None);
        assert_eq!(runs[2].content, vec![RunContent::Text("new".to_string())]);
        assert_eq!(runs[3].content, vec![RunContent::Text("tag".to_string())]);
    }

    #[test]
    fn test_tables_nest() {
        let doc = parse(
            r#"<w:tbl>
                <w:tblPr><w:tblStyle w:val="Grid"/></w:tblPr>
                <w:tr><w:trPr><w:tblHeader/></w:trPr>
                    <w:tc><w:tcPr><w:gridSpan w:val="2"/><w:vMerge w:val="restart"/></w:tcPr>
                        <w:p><w:r><w:t>h</w:t></w:r></w:p>
                        <w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>
                    </w:tc>
                </w:tr>
                <w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc></w:tr>
            </w:tbl>"#,
        );
        let RawBlock::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.style_id.as_deref(), Some("Grid"));
        assert!(table.rows[0].is_header);
        assert!(!table.rows[1].is_header);

        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.col_span, 2);
        assert_eq!(cell.v_merge, Some(VerticalMerge::Restart));
        assert_eq!(cell.blocks.len(), 2);
        assert!(matches!(cell.blocks[1], RawBlock::Table(_)));
        assert_eq!(
            table.rows[1].cells[0].v_merge,
            Some(VerticalMerge::Continue)
        );
    }

    #[test]
    fn test_block_content_controls_flatten() {
        let doc = parse(
            r#"<w:sdt><w:sdtContent><w:p><w:r><w:t>in sdt</w:t></w:r></w:p></w:sdtContent></w:sdt>
               <w:sectPr/>"#,
        );
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let err = RawDocument::parse("<w:document/>", &Relationships::new()).unwrap_err();
        assert!(matches!(err, Error::MissingComponent(_)));
    }
}
