//! HTML renderer implementation.
//!
//! List items are grouped into nested `<ol>`/`<ul>` elements using only the
//! open/close transitions recorded on each item. Markers are written as
//! `<span class="marker">` and list bullets are suppressed with
//! `list-style:none`, so the computed marker is the one readers see.

use crate::docx::LevelSuffix;
use crate::error::Result;
use crate::model::{
    Block, BreakKind, Cell, EffectiveParagraphProperties, EffectiveRunProperties, Justification,
    ListFrame, ListKind, NumberingMarker, Paragraph, ResolvedDocument, RunContent, Table, TextRun,
    VerticalAlign,
};
use unicode_normalization::UnicodeNormalization;

use super::options::RenderOptions;

/// Convert a resolved document to HTML.
pub fn to_html(doc: &ResolvedDocument, options: &RenderOptions) -> Result<String> {
    let mut writer = HtmlWriter {
        out: String::new(),
        options,
        open_lists: Vec::new(),
    };
    writer.blocks(&doc.blocks);
    writer.close_remaining_lists();

    let body = writer.out;
    if options.full_document {
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n</head>\n<body>\n{}</body>\n</html>\n",
            body
        ))
    } else {
        Ok(body)
    }
}

struct HtmlWriter<'a> {
    out: String,
    options: &'a RenderOptions,
    /// Open lists, outermost first, with whether their last `<li>` is open
    open_lists: Vec<(ListKind, bool)>,
}

impl HtmlWriter<'_> {
    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            match block {
                Block::Paragraph(p) => match &p.list_item {
                    Some(item) => {
                        let marker = &item.marker;
                        let transition = &item.transition;
                        self.list_item(p, marker, &transition.close_before, &transition.open);
                        for _ in &transition.close_after {
                            self.close_list();
                        }
                    }
                    None => self.paragraph(p),
                },
                Block::Table(t) => self.table(t),
            }
        }
    }

    fn list_item(
        &mut self,
        para: &Paragraph,
        marker: &NumberingMarker,
        close: &[ListFrame],
        open: &[ListFrame],
    ) {
        for _ in close {
            self.close_list();
        }

        // a sibling item ends the previous one; a nested list stays inside it
        if open.is_empty() {
            if let Some((_, item_open)) = self.open_lists.last_mut() {
                if *item_open {
                    self.out.push_str("</li>\n");
                    *item_open = false;
                }
            }
        }

        for frame in open {
            let tag = list_tag(frame.kind);
            self.out
                .push_str(&format!("<{} style=\"list-style:none\">\n", tag));
            self.open_lists.push((frame.kind, false));
        }

        // an item with no list around it still gets one
        if self.open_lists.is_empty() {
            self.out.push_str(&format!(
                "<{} style=\"list-style:none\">\n",
                list_tag(marker.kind)
            ));
            self.open_lists.push((marker.kind, false));
        }

        self.out.push_str("<li");
        self.paragraph_style(&para.properties);
        self.out.push('>');
        self.marker(marker);
        self.runs(&para.runs);
        if let Some((_, item_open)) = self.open_lists.last_mut() {
            *item_open = true;
        }
    }

    fn close_list(&mut self) {
        if let Some((kind, item_open)) = self.open_lists.pop() {
            if item_open {
                self.out.push_str("</li>\n");
            }
            self.out.push_str(&format!("</{}>\n", list_tag(kind)));
        }
    }

    /// Close lists whose transitions never arrived (hand-built documents).
    fn close_remaining_lists(&mut self) {
        while !self.open_lists.is_empty() {
            self.close_list();
        }
    }

    fn marker(&mut self, marker: &NumberingMarker) {
        self.out.push_str("<span class=\"marker\"");
        if self.options.inline_styles {
            let css = run_css(&marker.run_properties);
            if !css.is_empty() {
                self.out
                    .push_str(&format!(" style=\"{}\"", escape_html(&css)));
            }
        }
        self.out.push('>');
        let text = self.text(&marker.text);
        self.out.push_str(&text);
        self.out.push_str("</span>");
        match marker.suffix {
            LevelSuffix::Tab => self.out.push_str("&emsp;"),
            LevelSuffix::Space => self.out.push(' '),
            LevelSuffix::Nothing => {}
        }
    }

    fn paragraph(&mut self, para: &Paragraph) {
        if para.is_empty() && !self.options.include_empty_paragraphs {
            return;
        }
        let tag = match para.heading.level() {
            0 => "p".to_string(),
            n => format!("h{}", n),
        };
        self.out.push('<');
        self.out.push_str(&tag);
        self.paragraph_style(&para.properties);
        self.out.push('>');
        self.runs(&para.runs);
        self.out.push_str(&format!("</{}>\n", tag));
    }

    fn paragraph_style(&mut self, props: &EffectiveParagraphProperties) {
        if !self.options.inline_styles {
            return;
        }
        let css = paragraph_css(props);
        if !css.is_empty() {
            self.out
                .push_str(&format!(" style=\"{}\"", escape_html(&css)));
        }
    }

    fn runs(&mut self, runs: &[TextRun]) {
        for run in runs.iter().filter(|r| !r.properties.hidden) {
            self.run(run);
        }
    }

    fn run(&mut self, run: &TextRun) {
        let mut inner = String::new();
        for item in &run.content {
            match item {
                RunContent::Text(t) => inner.push_str(&self.text(t)),
                RunContent::Tab => inner.push_str("&emsp;"),
                RunContent::Break(BreakKind::Line) => inner.push_str("<br>"),
                RunContent::Break(_) => {
                    inner.push_str("<br style=\"page-break-after:always\">")
                }
                RunContent::NoBreakHyphen => inner.push_str("&#8209;"),
                RunContent::SoftHyphen => inner.push_str("&shy;"),
            }
        }

        let css = if self.options.inline_styles {
            run_css(&run.properties)
        } else {
            String::new()
        };
        if !css.is_empty() {
            inner = format!("<span style=\"{}\">{}</span>", escape_html(&css), inner);
        }
        if let Some(href) = &run.hyperlink {
            inner = format!("<a href=\"{}\">{}</a>", escape_html(href), inner);
        }
        self.out.push_str(&inner);
    }

    fn table(&mut self, table: &Table) {
        self.out.push_str("<table>\n");
        for row in &table.rows {
            self.out.push_str("<tr>\n");
            let tag = if row.is_header { "th" } else { "td" };
            for cell in &row.cells {
                self.cell(cell, tag);
            }
            self.out.push_str("</tr>\n");
        }
        self.out.push_str("</table>\n");
    }

    fn cell(&mut self, cell: &Cell, tag: &str) {
        let mut attrs = String::new();
        if cell.col_span > 1 {
            attrs.push_str(&format!(" colspan=\"{}\"", cell.col_span));
        }
        if cell.row_span > 1 {
            attrs.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
        }
        if self.options.inline_styles {
            if let Some(fill) = cell.shading.as_ref().and_then(|s| css_color(s.fill.as_deref())) {
                attrs.push_str(&format!(" style=\"background-color:{}\"", fill));
            }
        }

        self.out.push_str(&format!("<{}{}>", tag, attrs));
        // lists inside a cell are closed by their own transitions
        let outer = std::mem::take(&mut self.open_lists);
        self.blocks(&cell.blocks);
        self.close_remaining_lists();
        self.open_lists = outer;
        self.out.push_str(&format!("</{}>\n", tag));
    }

    fn text(&self, text: &str) -> String {
        if self.options.normalize_unicode {
            escape_html(&text.nfc().collect::<String>())
        } else {
            escape_html(text)
        }
    }
}

fn list_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Ordered => "ol",
        ListKind::Unordered => "ul",
    }
}

/// Inline CSS for a run.
fn run_css(props: &EffectiveRunProperties) -> String {
    let mut css = Vec::new();

    if props.bold {
        css.push("font-weight:bold".to_string());
    }
    if props.italic {
        css.push("font-style:italic".to_string());
    }

    let mut decorations = Vec::new();
    if props.underline.is_underlined() {
        decorations.push("underline");
    }
    if props.strike || props.double_strike {
        decorations.push("line-through");
    }
    if !decorations.is_empty() {
        css.push(format!("text-decoration:{}", decorations.join(" ")));
    }

    if let Some(font) = props.font.primary() {
        css.push(format!("font-family:'{}'", font.replace('\'', "")));
    }
    if let Some(size) = props.size {
        css.push(format!("font-size:{}pt", size));
    }
    if let Some(color) = css_color(props.color.as_deref()) {
        css.push(format!("color:{}", color));
    }

    let background = props
        .highlight
        .as_deref()
        .map(highlight_color)
        .or_else(|| {
            props
                .shading
                .as_ref()
                .and_then(|s| css_color(s.fill.as_deref()))
        });
    if let Some(background) = background {
        css.push(format!("background-color:{}", background));
    }

    match props.vertical_align {
        VerticalAlign::Superscript => css.push("vertical-align:super".to_string()),
        VerticalAlign::Subscript => css.push("vertical-align:sub".to_string()),
        VerticalAlign::Baseline => {}
    }
    if props.caps {
        css.push("text-transform:uppercase".to_string());
    } else if props.small_caps {
        css.push("font-variant:small-caps".to_string());
    }
    if let Some(spacing) = props.character_spacing {
        css.push(format!("letter-spacing:{}pt", spacing));
    }

    css.join(";")
}

/// Inline CSS for a paragraph or list item.
fn paragraph_css(props: &EffectiveParagraphProperties) -> String {
    let mut css = Vec::new();

    match props.justification {
        Justification::Left => {}
        Justification::Center => css.push("text-align:center".to_string()),
        Justification::Right => css.push("text-align:right".to_string()),
        Justification::Both | Justification::Distribute => {
            css.push("text-align:justify".to_string())
        }
    }

    if let Some(left) = props.indentation.left {
        css.push(format!("margin-left:{}pt", left));
    }
    if let Some(right) = props.indentation.right {
        css.push(format!("margin-right:{}pt", right));
    }
    if let Some(hanging) = props.indentation.hanging {
        css.push(format!("text-indent:-{}pt", hanging));
    } else if let Some(first) = props.indentation.first_line {
        css.push(format!("text-indent:{}pt", first));
    }
    if let Some(before) = props.spacing.before {
        css.push(format!("margin-top:{}pt", before));
    }
    if let Some(after) = props.spacing.after {
        css.push(format!("margin-bottom:{}pt", after));
    }
    if let Some(fill) = props.shading.as_ref().and_then(|s| css_color(s.fill.as_deref())) {
        css.push(format!("background-color:{}", fill));
    }

    css.join(";")
}

/// `RRGGBB` to `#RRGGBB`; `auto` and anything else that is not a hex color
/// yields nothing.
fn css_color(value: Option<&str>) -> Option<String> {
    let value = value?;
    (value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| format!("#{}", value))
}

/// CSS color for a `w:highlight` name.
fn highlight_color(name: &str) -> String {
    match name {
        "darkYellow" => "olive".to_string(),
        other => other.to_ascii_lowercase(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::NumberFormat;
    use crate::model::{HeadingLevel, ListItem, ListTransition, Row};

    fn item(text: &str, marker: &str, ilvl: u8, transition: ListTransition) -> Block {
        let kind = ListKind::Ordered;
        Block::Paragraph(Paragraph {
            list_item: Some(ListItem {
                marker: NumberingMarker {
                    text: marker.to_string(),
                    num_id: 1,
                    ilvl,
                    format: NumberFormat::Decimal,
                    kind,
                    suffix: LevelSuffix::Space,
                    justification: Justification::Left,
                    run_properties: EffectiveRunProperties::default(),
                },
                transition,
            }),
            ..Paragraph::with_text(text)
        })
    }

    fn frame(ilvl: u8) -> ListFrame {
        ListFrame {
            num_id: 1,
            ilvl,
            kind: ListKind::Ordered,
        }
    }

    fn render(blocks: Vec<Block>) -> String {
        let doc = ResolvedDocument {
            blocks,
            diagnostics: Vec::new(),
        };
        to_html(&doc, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let heading = Paragraph {
            heading: HeadingLevel::H2,
            ..Paragraph::with_text("Title")
        };
        let html = render(vec![
            Block::Paragraph(heading),
            Block::Paragraph(Paragraph::with_text("a < b")),
        ]);
        assert_eq!(html, "<h2>Title</h2>\n<p>a &lt; b</p>\n");
    }

    #[test]
    fn test_nested_lists() {
        let html = render(vec![
            item(
                "one",
                "1.",
                0,
                ListTransition {
                    open: vec![frame(0)],
                    ..Default::default()
                },
            ),
            item(
                "sub",
                "1.1.",
                1,
                ListTransition {
                    open: vec![frame(1)],
                    ..Default::default()
                },
            ),
            item(
                "two",
                "2.",
                0,
                ListTransition {
                    close_before: vec![frame(1)],
                    close_after: vec![frame(0)],
                    ..Default::default()
                },
            ),
        ]);

        let expected = concat!(
            "<ol style=\"list-style:none\">\n",
            "<li><span class=\"marker\">1.</span> one",
            "<ol style=\"list-style:none\">\n",
            "<li><span class=\"marker\">1.1.</span> sub</li>\n",
            "</ol>\n",
            "</li>\n",
            "<li><span class=\"marker\">2.</span> two</li>\n",
            "</ol>\n",
        );
        assert_eq!(html, expected);
    }

    #[test]
    fn test_run_styles() {
        let run = TextRun {
            properties: EffectiveRunProperties {
                bold: true,
                size: Some(14.0),
                color: Some("FF0000".to_string()),
                highlight: Some("yellow".to_string()),
                vertical_align: VerticalAlign::Superscript,
                ..Default::default()
            },
            ..TextRun::plain("x")
        };
        let css = run_css(&run.properties);
        assert_eq!(
            css,
            "font-weight:bold;font-size:14pt;color:#FF0000;background-color:yellow;vertical-align:super"
        );
    }

    #[test]
    fn test_hyperlink_and_tab() {
        let para = Paragraph {
            runs: vec![TextRun {
                content: vec![
                    RunContent::Text("a".to_string()),
                    RunContent::Tab,
                    RunContent::Text("b".to_string()),
                ],
                hyperlink: Some("https://example.com/?q=1&r=2".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let html = render(vec![Block::Paragraph(para)]);
        assert_eq!(
            html,
            "<p><a href=\"https://example.com/?q=1&amp;r=2\">a&emsp;b</a></p>\n"
        );
    }

    #[test]
    fn test_table_spans_and_header() {
        let mut table = Table::new();
        table.add_row(Row {
            cells: vec![Cell {
                col_span: 2,
                ..Cell::with_text("H")
            }],
            is_header: true,
        });
        table.add_row(Row {
            cells: vec![
                Cell {
                    row_span: 2,
                    ..Cell::with_text("a")
                },
                Cell::with_text("b"),
            ],
            is_header: false,
        });
        let html = render(vec![Block::Table(table)]);
        assert!(html.contains("<th colspan=\"2\"><p>H</p>\n</th>"));
        assert!(html.contains("<td rowspan=\"2\"><p>a</p>\n</td>"));
    }

    #[test]
    fn test_hidden_runs_and_empty_paragraphs_skipped() {
        let hidden = TextRun {
            properties: EffectiveRunProperties {
                hidden: true,
                ..Default::default()
            },
            ..TextRun::plain("secret")
        };
        let para = Paragraph {
            runs: vec![hidden, TextRun::plain("shown")],
            ..Default::default()
        };
        let html = render(vec![
            Block::Paragraph(para),
            Block::Paragraph(Paragraph::new()),
        ]);
        assert_eq!(html, "<p>shown</p>\n");
    }

    #[test]
    fn test_full_document() {
        let doc = ResolvedDocument::new();
        let html = to_html(&doc, &RenderOptions::new().with_full_document(true)).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(Some("00ff00")), Some("#00ff00".to_string()));
        assert_eq!(css_color(Some("auto")), None);
        assert_eq!(css_color(None), None);
    }
}
