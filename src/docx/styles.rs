//! Style sheet (`word/styles.xml`).

use super::properties::{ParagraphProperties, RunProperties};
use crate::error::Result;
use crate::xml::XmlElement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Style type (`w:type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleKind {
    /// Map a `w:type` value. A missing type means paragraph.
    pub fn from_ooxml(val: Option<&str>) -> Option<Self> {
        match val {
            None | Some("paragraph") => Some(StyleKind::Paragraph),
            Some("character") => Some(StyleKind::Character),
            Some("table") => Some(StyleKind::Table),
            Some("numbering") => Some(StyleKind::Numbering),
            Some(_) => None,
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleKind::Paragraph => "paragraph",
            StyleKind::Character => "character",
            StyleKind::Table => "table",
            StyleKind::Numbering => "numbering",
        };
        f.write_str(name)
    }
}

/// Document-wide defaults (`w:docDefaults`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocDefaults {
    pub paragraph: ParagraphProperties,
    pub run: RunProperties,
}

/// A style definition as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Display name (e.g., "heading 1")
    pub name: Option<String>,
    pub kind: StyleKind,
    pub based_on: Option<String>,
    pub paragraph_properties: Option<ParagraphProperties>,
    pub run_properties: Option<RunProperties>,
    /// Marked as the default style of its kind
    pub is_default: bool,
}

impl Style {
    pub fn new(id: impl Into<String>, kind: StyleKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            based_on: None,
            paragraph_properties: None,
            run_properties: None,
            is_default: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_based_on(mut self, parent: impl Into<String>) -> Self {
        self.based_on = Some(parent.into());
        self
    }

    pub fn with_paragraph_properties(mut self, props: ParagraphProperties) -> Self {
        self.paragraph_properties = Some(props);
        self
    }

    pub fn with_run_properties(mut self, props: RunProperties) -> Self {
        self.run_properties = Some(props);
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    fn from_element(element: &XmlElement) -> Option<Self> {
        let id = element.attr("styleId")?.to_string();
        let kind = match StyleKind::from_ooxml(element.attr("type")) {
            Some(kind) => kind,
            None => {
                log::debug!("skipping style '{}' with unknown type", id);
                return None;
            }
        };

        let mut style = Style::new(id, kind);
        style.is_default = element
            .attr("default")
            .is_some_and(|v| matches!(v, "1" | "true" | "on"));
        style.name = element
            .child("name")
            .and_then(|e| e.val())
            .map(str::to_string);
        style.based_on = element
            .child("basedOn")
            .and_then(|e| e.val())
            .map(str::to_string);
        style.paragraph_properties = element.child("pPr").map(ParagraphProperties::from_element);
        style.run_properties = element.child("rPr").map(RunProperties::from_element);

        Some(style)
    }
}

/// Parsed `styles.xml`: defaults, named styles, and the default style per kind.
///
/// Built once per document and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    pub doc_defaults: DocDefaults,
    styles: Vec<Style>,
    index: HashMap<(StyleKind, String), usize>,
    type_defaults: HashMap<StyleKind, String>,
}

impl StyleSheet {
    /// Parse styles from XML content. Empty content yields an empty sheet.
    pub fn parse(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Ok(Self::default());
        }
        let root = XmlElement::parse(xml)?;
        Ok(Self::from_element(&root))
    }

    /// Build from a parsed `w:styles` element.
    pub fn from_element(root: &XmlElement) -> Self {
        let mut sheet = StyleSheet::default();

        if let Some(defaults) = root.child("docDefaults") {
            if let Some(rpr) = defaults.child("rPrDefault").and_then(|e| e.child("rPr")) {
                sheet.doc_defaults.run = RunProperties::from_element(rpr);
            }
            if let Some(ppr) = defaults.child("pPrDefault").and_then(|e| e.child("pPr")) {
                sheet.doc_defaults.paragraph = ParagraphProperties::from_element(ppr);
            }
        }

        for style in root.children_named("style").filter_map(Style::from_element) {
            sheet.add_style(style);
        }

        log::debug!("parsed {} styles", sheet.styles.len());
        sheet
    }

    /// Add a style. The first definition of an `(id, kind)` pair wins, and so
    /// does the first style marked default for its kind.
    pub fn add_style(&mut self, style: Style) {
        let key = (style.kind, style.id.clone());
        if self.index.contains_key(&key) {
            log::debug!("ignoring duplicate {} style '{}'", style.kind, style.id);
            return;
        }
        if style.is_default {
            self.type_defaults
                .entry(style.kind)
                .or_insert_with(|| style.id.clone());
        }
        self.index.insert(key, self.styles.len());
        self.styles.push(style);
    }

    /// Builder form of [`add_style`](Self::add_style).
    pub fn with_style(mut self, style: Style) -> Self {
        self.add_style(style);
        self
    }

    pub fn with_doc_defaults(mut self, defaults: DocDefaults) -> Self {
        self.doc_defaults = defaults;
        self
    }

    /// Look up a style by kind and ID.
    pub fn get(&self, kind: StyleKind, id: &str) -> Option<&Style> {
        self.index
            .get(&(kind, id.to_string()))
            .map(|&i| &self.styles[i])
    }

    /// ID of the default style for a kind.
    pub fn default_style_id(&self, kind: StyleKind) -> Option<&str> {
        self.type_defaults.get(&kind).map(String::as_str)
    }

    /// All styles in document order.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:docDefaults>
        <w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault>
        <w:pPrDefault><w:pPr><w:spacing w:after="160"/></w:pPr></w:pPrDefault>
    </w:docDefaults>
    <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
        <w:name w:val="Normal"/>
        <w:rPr><w:rFonts w:ascii="Arial"/></w:rPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="Heading1">
        <w:name w:val="heading 1"/>
        <w:basedOn w:val="Normal"/>
        <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
        <w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
    </w:style>
    <w:style w:type="character" w:default="1" w:styleId="DefaultParagraphFont">
        <w:name w:val="Default Paragraph Font"/>
    </w:style>
    <w:style w:type="character" w:styleId="Heading1">
        <w:rPr><w:i/></w:rPr>
    </w:style>
</w:styles>"#;

    #[test]
    fn test_parse_styles() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        assert_eq!(sheet.len(), 4);

        let heading = sheet.get(StyleKind::Paragraph, "Heading1").unwrap();
        assert_eq!(heading.name.as_deref(), Some("heading 1"));
        assert_eq!(heading.based_on.as_deref(), Some("Normal"));
        let run = heading.run_properties.as_ref().unwrap();
        assert_eq!(run.bold, Some(true));
        assert_eq!(run.size, Some(16.0));
        assert_eq!(
            heading.paragraph_properties.as_ref().unwrap().outline_level,
            Some(0)
        );
    }

    #[test]
    fn test_same_id_different_kinds() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        let para = sheet.get(StyleKind::Paragraph, "Heading1").unwrap();
        let chr = sheet.get(StyleKind::Character, "Heading1").unwrap();
        assert_ne!(para, chr);
        assert_eq!(chr.run_properties.as_ref().unwrap().italic, Some(true));
        assert!(sheet.get(StyleKind::Table, "Heading1").is_none());
    }

    #[test]
    fn test_doc_defaults_and_type_defaults() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        assert_eq!(sheet.doc_defaults.run.size, Some(11.0));
        assert_eq!(sheet.doc_defaults.paragraph.spacing.after, Some(8.0));
        assert_eq!(sheet.default_style_id(StyleKind::Paragraph), Some("Normal"));
        assert_eq!(
            sheet.default_style_id(StyleKind::Character),
            Some("DefaultParagraphFont")
        );
        assert_eq!(sheet.default_style_id(StyleKind::Table), None);
    }

    #[test]
    fn test_empty_content() {
        let sheet = StyleSheet::parse("  ").unwrap();
        assert!(sheet.is_empty());
        assert_eq!(sheet.doc_defaults, DocDefaults::default());
    }

    #[test]
    fn test_first_definition_wins() {
        let sheet = StyleSheet::default()
            .with_style(Style::new("A", StyleKind::Paragraph).with_name("first"))
            .with_style(Style::new("A", StyleKind::Paragraph).with_name("second"));
        assert_eq!(sheet.len(), 1);
        assert_eq!(
            sheet.get(StyleKind::Paragraph, "A").unwrap().name.as_deref(),
            Some("first")
        );
    }
}
