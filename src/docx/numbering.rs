//! Numbering definitions (`word/numbering.xml`).
//!
//! Abstract definitions hold up to nine levels; concrete instances point at an
//! abstract definition and may override individual levels.

use super::properties::{number, ParagraphProperties, RunProperties};
use crate::error::Result;
use crate::model::Justification;
use crate::xml::XmlElement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Deepest level index.
pub const MAX_LEVEL: u8 = 8;

/// Counter format of a level (`w:numFmt`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberFormat {
    /// 1, 2, 3
    #[default]
    Decimal,
    /// I, II, III
    UpperRoman,
    /// i, ii, iii
    LowerRoman,
    /// A, B, C
    UpperLetter,
    /// a, b, c
    LowerLetter,
    /// Level text is the glyph
    Bullet,
    /// 01, 02, 03
    DecimalZero,
    /// No number
    None,
    /// Any other format (formatted as decimal)
    Other(String),
}

impl FromStr for NumberFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "decimal" => NumberFormat::Decimal,
            "upperRoman" => NumberFormat::UpperRoman,
            "lowerRoman" => NumberFormat::LowerRoman,
            "upperLetter" => NumberFormat::UpperLetter,
            "lowerLetter" => NumberFormat::LowerLetter,
            "bullet" => NumberFormat::Bullet,
            "decimalZero" => NumberFormat::DecimalZero,
            "none" => NumberFormat::None,
            other => NumberFormat::Other(other.to_string()),
        })
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumberFormat::Decimal => "decimal",
            NumberFormat::UpperRoman => "upperRoman",
            NumberFormat::LowerRoman => "lowerRoman",
            NumberFormat::UpperLetter => "upperLetter",
            NumberFormat::LowerLetter => "lowerLetter",
            NumberFormat::Bullet => "bullet",
            NumberFormat::DecimalZero => "decimalZero",
            NumberFormat::None => "none",
            NumberFormat::Other(name) => name,
        };
        f.write_str(name)
    }
}

/// What follows the marker (`w:suff`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelSuffix {
    #[default]
    Tab,
    Space,
    Nothing,
}

impl LevelSuffix {
    pub fn from_ooxml(val: &str) -> Self {
        match val {
            "space" => LevelSuffix::Space,
            "nothing" => LevelSuffix::Nothing,
            _ => LevelSuffix::Tab,
        }
    }
}

/// One level of a numbering definition (`w:lvl`).
#[derive(Debug, Clone, PartialEq)]
pub struct NumberingLevel {
    /// Level index (0-8)
    pub ilvl: u8,
    pub start: u32,
    pub format: NumberFormat,
    /// Template with `%1`..`%9` placeholders, or the bullet glyph
    pub level_text: String,
    pub justification: Justification,
    pub suffix: LevelSuffix,
    /// Paragraph properties applied to list paragraphs at this level
    pub paragraph_properties: Option<ParagraphProperties>,
    /// Run properties of the marker glyph
    pub run_properties: Option<RunProperties>,
}

impl NumberingLevel {
    pub fn new(ilvl: u8, format: NumberFormat, level_text: impl Into<String>) -> Self {
        Self {
            ilvl: ilvl.min(MAX_LEVEL),
            start: 1,
            format,
            level_text: level_text.into(),
            justification: Justification::Left,
            suffix: LevelSuffix::Tab,
            paragraph_properties: None,
            run_properties: None,
        }
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn with_suffix(mut self, suffix: LevelSuffix) -> Self {
        self.suffix = suffix;
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

    fn from_element(element: &XmlElement) -> Option<Self> {
        let ilvl = element
            .attr("ilvl")
            .and_then(|v| number(element, v))
            .map(|v| v as u8)?;
        if ilvl > MAX_LEVEL {
            log::debug!("ignoring numbering level {} beyond {}", ilvl, MAX_LEVEL);
            return None;
        }

        let format = element
            .child("numFmt")
            .and_then(|e| e.val())
            .map(|v| v.parse::<NumberFormat>().unwrap_or_default())
            .unwrap_or_default();
        let level_text = element
            .child("lvlText")
            .and_then(|e| e.val())
            .unwrap_or_default();

        let mut level = NumberingLevel::new(ilvl, format, level_text);
        if let Some(start) = element
            .child("start")
            .and_then(|e| e.val().and_then(|v| number(e, v)))
        {
            level.start = start.max(0.0) as u32;
        }
        if let Some(jc) = element
            .child("lvlJc")
            .and_then(|e| e.val())
            .and_then(Justification::from_ooxml)
        {
            level.justification = jc;
        }
        if let Some(suffix) = element.child("suff").and_then(|e| e.val()) {
            level.suffix = LevelSuffix::from_ooxml(suffix);
        }
        level.paragraph_properties = element.child("pPr").map(ParagraphProperties::from_element);
        level.run_properties = element.child("rPr").map(RunProperties::from_element);

        Some(level)
    }
}

/// Reusable numbering definition (`w:abstractNum`).
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractNumbering {
    pub abstract_num_id: u32,
    pub levels: Vec<NumberingLevel>,
}

impl AbstractNumbering {
    pub fn new(abstract_num_id: u32) -> Self {
        Self {
            abstract_num_id,
            levels: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: NumberingLevel) -> Self {
        self.levels.push(level);
        self
    }

    /// Level definition for an index.
    pub fn level(&self, ilvl: u8) -> Option<&NumberingLevel> {
        self.levels.iter().find(|l| l.ilvl == ilvl)
    }
}

/// Per-level override inside an instance (`w:lvlOverride`).
#[derive(Debug, Clone, PartialEq)]
pub struct LevelOverride {
    pub ilvl: u8,
    /// Replaces only the start value
    pub start_override: Option<u32>,
    /// Replaces the whole level definition
    pub level: Option<NumberingLevel>,
}

/// Concrete numbering instance (`w:num`).
#[derive(Debug, Clone, PartialEq)]
pub struct NumberingInstance {
    pub num_id: u32,
    pub abstract_num_id: u32,
    pub overrides: Vec<LevelOverride>,
}

impl NumberingInstance {
    pub fn new(num_id: u32, abstract_num_id: u32) -> Self {
        Self {
            num_id,
            abstract_num_id,
            overrides: Vec::new(),
        }
    }

    pub fn with_start_override(mut self, ilvl: u8, start: u32) -> Self {
        self.overrides.push(LevelOverride {
            ilvl,
            start_override: Some(start),
            level: None,
        });
        self
    }

    pub fn with_level_override(mut self, level: NumberingLevel) -> Self {
        self.overrides.push(LevelOverride {
            ilvl: level.ilvl,
            start_override: None,
            level: Some(level),
        });
        self
    }

    /// Override for a level index.
    pub fn level_override(&self, ilvl: u8) -> Option<&LevelOverride> {
        self.overrides.iter().find(|o| o.ilvl == ilvl)
    }
}

/// Parsed `numbering.xml`. Built once per document and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct NumberingSheet {
    abstracts: HashMap<u32, AbstractNumbering>,
    instances: HashMap<u32, NumberingInstance>,
}

impl NumberingSheet {
    /// Parse numbering from XML content. Empty content yields an empty sheet.
    pub fn parse(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Ok(Self::default());
        }
        let root = XmlElement::parse(xml)?;
        Ok(Self::from_element(&root))
    }

    /// Build from a parsed `w:numbering` element.
    pub fn from_element(root: &XmlElement) -> Self {
        let mut sheet = NumberingSheet::default();

        for element in root.children_named("abstractNum") {
            let Some(id) = element
                .attr("abstractNumId")
                .and_then(|v| number(element, v))
            else {
                continue;
            };
            let mut abstract_num = AbstractNumbering::new(id as u32);
            abstract_num.levels = element
                .children_named("lvl")
                .filter_map(NumberingLevel::from_element)
                .collect();
            sheet.add_abstract(abstract_num);
        }

        for element in root.children_named("num") {
            let num_id = element.attr("numId").and_then(|v| number(element, v));
            let abstract_id = element
                .child("abstractNumId")
                .and_then(|e| e.val().and_then(|v| number(e, v)));
            let (Some(num_id), Some(abstract_id)) = (num_id, abstract_id) else {
                continue;
            };

            let mut instance = NumberingInstance::new(num_id as u32, abstract_id as u32);
            for ov in element.children_named("lvlOverride") {
                let Some(ilvl) = ov.attr("ilvl").and_then(|v| number(ov, v)) else {
                    continue;
                };
                instance.overrides.push(LevelOverride {
                    ilvl: ilvl as u8,
                    start_override: ov
                        .child("startOverride")
                        .and_then(|e| e.val().and_then(|v| number(e, v)))
                        .map(|v| v.max(0.0) as u32),
                    level: ov.child("lvl").and_then(NumberingLevel::from_element),
                });
            }
            sheet.add_instance(instance);
        }

        log::debug!(
            "parsed {} abstract numberings, {} instances",
            sheet.abstracts.len(),
            sheet.instances.len()
        );
        sheet
    }

    pub fn add_abstract(&mut self, abstract_num: AbstractNumbering) {
        self.abstracts
            .entry(abstract_num.abstract_num_id)
            .or_insert(abstract_num);
    }

    pub fn add_instance(&mut self, instance: NumberingInstance) {
        self.instances.entry(instance.num_id).or_insert(instance);
    }

    pub fn with_abstract(mut self, abstract_num: AbstractNumbering) -> Self {
        self.add_abstract(abstract_num);
        self
    }

    pub fn with_instance(mut self, instance: NumberingInstance) -> Self {
        self.add_instance(instance);
        self
    }

    pub fn abstract_numbering(&self, abstract_num_id: u32) -> Option<&AbstractNumbering> {
        self.abstracts.get(&abstract_num_id)
    }

    pub fn instance(&self, num_id: u32) -> Option<&NumberingInstance> {
        self.instances.get(&num_id)
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.abstracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:abstractNum w:abstractNumId="0">
        <w:lvl w:ilvl="0">
            <w:start w:val="1"/>
            <w:numFmt w:val="decimal"/>
            <w:lvlText w:val="%1."/>
            <w:lvlJc w:val="left"/>
            <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
        </w:lvl>
        <w:lvl w:ilvl="1">
            <w:start w:val="1"/>
            <w:numFmt w:val="lowerLetter"/>
            <w:lvlText w:val="%1.%2."/>
            <w:suff w:val="space"/>
            <w:rPr><w:b/></w:rPr>
        </w:lvl>
    </w:abstractNum>
    <w:abstractNum w:abstractNumId="1">
        <w:lvl w:ilvl="0">
            <w:numFmt w:val="bullet"/>
            <w:lvlText w:val="&#xF0B7;"/>
        </w:lvl>
    </w:abstractNum>
    <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
    <w:num w:numId="2">
        <w:abstractNumId w:val="0"/>
        <w:lvlOverride w:ilvl="0"><w:startOverride w:val="5"/></w:lvlOverride>
    </w:num>
    <w:num w:numId="3"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

    #[test]
    fn test_parse_abstract_levels() {
        let sheet = NumberingSheet::parse(NUMBERING).unwrap();
        let abs = sheet.abstract_numbering(0).unwrap();
        assert_eq!(abs.levels.len(), 2);

        let l0 = abs.level(0).unwrap();
        assert_eq!(l0.format, NumberFormat::Decimal);
        assert_eq!(l0.level_text, "%1.");
        assert_eq!(l0.suffix, LevelSuffix::Tab);
        assert_eq!(
            l0.paragraph_properties.as_ref().unwrap().indentation.left,
            Some(36.0)
        );

        let l1 = abs.level(1).unwrap();
        assert_eq!(l1.format, NumberFormat::LowerLetter);
        assert_eq!(l1.suffix, LevelSuffix::Space);
        assert_eq!(l1.run_properties.as_ref().unwrap().bold, Some(true));
        assert!(abs.level(2).is_none());
    }

    #[test]
    fn test_parse_instances_and_overrides() {
        let sheet = NumberingSheet::parse(NUMBERING).unwrap();
        assert_eq!(sheet.instance(1).unwrap().abstract_num_id, 0);

        let ov = sheet.instance(2).unwrap().level_override(0).unwrap();
        assert_eq!(ov.start_override, Some(5));
        assert!(ov.level.is_none());
        assert!(sheet.instance(9).is_none());
    }

    #[test]
    fn test_bullet_level_defaults() {
        let sheet = NumberingSheet::parse(NUMBERING).unwrap();
        let level = sheet.abstract_numbering(1).unwrap().level(0).unwrap();
        assert_eq!(level.format, NumberFormat::Bullet);
        assert_eq!(level.level_text, "\u{F0B7}");
        assert_eq!(level.start, 1);
    }

    #[test]
    fn test_number_format_from_str() {
        assert_eq!("upperRoman".parse(), Ok(NumberFormat::UpperRoman));
        assert_eq!("decimalZero".parse(), Ok(NumberFormat::DecimalZero));
        assert_eq!(
            "ordinal".parse(),
            Ok(NumberFormat::Other("ordinal".to_string()))
        );
        assert_eq!(NumberFormat::LowerLetter.to_string(), "lowerLetter");
    }
}
