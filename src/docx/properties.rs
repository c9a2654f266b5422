//! Directly specified paragraph and run properties (`w:pPr` / `w:rPr`).
//!
//! Every field is optional: `None` means "this layer says nothing", which is
//! what lets the cascade merge layers field by field. Values are converted to
//! points while parsing, so nothing downstream sees twips or half-points.

use crate::model::{
    Border, Borders, FontFamily, Indentation, Justification, LineRule, NumberingRef, Shading,
    Spacing, UnderlineStyle, VerticalAlign,
};
use crate::xml::{on_off, XmlElement};

/// Twentieths of a point per point.
const TWIPS_PER_POINT: f64 = 20.0;
/// `w:line` value meaning single spacing under the `auto` rule.
const AUTO_LINE_UNIT: f64 = 240.0;

/// Run properties as written in one layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    /// Character style (`w:rStyle`)
    pub style: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<UnderlineStyle>,
    pub strike: Option<bool>,
    pub double_strike: Option<bool>,
    pub caps: Option<bool>,
    pub small_caps: Option<bool>,
    /// `w:vanish`
    pub hidden: Option<bool>,
    pub font: FontFamily,
    /// Points
    pub size: Option<f64>,
    /// Hex color or `auto`
    pub color: Option<String>,
    /// Highlight name or `none`
    pub highlight: Option<String>,
    pub shading: Option<Shading>,
    pub vertical_align: Option<VerticalAlign>,
    /// Points
    pub character_spacing: Option<f64>,
}

/// Paragraph properties as written in one layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    /// Paragraph style (`w:pStyle`)
    pub style: Option<String>,
    pub justification: Option<Justification>,
    pub spacing: Spacing,
    pub indentation: Indentation,
    pub borders: Borders,
    pub shading: Option<Shading>,
    pub numbering: Option<NumberingRef>,
    pub outline_level: Option<u8>,
    pub keep_next: Option<bool>,
    pub keep_lines: Option<bool>,
    pub page_break_before: Option<bool>,
    /// Default run properties for runs of this paragraph (`w:pPr/w:rPr`)
    pub run: Option<RunProperties>,
}

impl RunProperties {
    /// Read a `w:rPr` element.
    pub fn from_element(rpr: &XmlElement) -> Self {
        let mut props = RunProperties::default();

        for child in rpr.elements() {
            match child.local_name() {
                "rStyle" => props.style = child.val().map(str::to_string),
                "b" => props.bold = Some(on_off(child)),
                "i" => props.italic = Some(on_off(child)),
                "u" => {
                    props.underline = Some(
                        child
                            .val()
                            .map(UnderlineStyle::from_ooxml)
                            .unwrap_or(UnderlineStyle::Single),
                    )
                }
                "strike" => props.strike = Some(on_off(child)),
                "dstrike" => props.double_strike = Some(on_off(child)),
                "caps" => props.caps = Some(on_off(child)),
                "smallCaps" => props.small_caps = Some(on_off(child)),
                "vanish" => props.hidden = Some(on_off(child)),
                "rFonts" => props.font = parse_fonts(child),
                "sz" => props.size = child.val().and_then(|v| number(child, v)).map(|v| v / 2.0),
                "color" => props.color = child.val().map(str::to_string),
                "highlight" => props.highlight = child.val().map(str::to_string),
                "shd" => props.shading = Some(parse_shading(child)),
                "vertAlign" => props.vertical_align = child.val().map(VerticalAlign::from_ooxml),
                "spacing" => props.character_spacing = twips(child, "val"),
                _ => {}
            }
        }

        props
    }

    /// Whether this layer specifies nothing.
    pub fn is_empty(&self) -> bool {
        *self == RunProperties::default()
    }
}

impl ParagraphProperties {
    /// Read a `w:pPr` element.
    pub fn from_element(ppr: &XmlElement) -> Self {
        let mut props = ParagraphProperties::default();

        for child in ppr.elements() {
            match child.local_name() {
                "pStyle" => props.style = child.val().map(str::to_string),
                "jc" => props.justification = child.val().and_then(Justification::from_ooxml),
                "spacing" => props.spacing = parse_spacing(child),
                "ind" => props.indentation = parse_indentation(child),
                "pBdr" => props.borders = parse_borders(child),
                "shd" => props.shading = Some(parse_shading(child)),
                "numPr" => props.numbering = Some(parse_numbering_ref(child)),
                "outlineLvl" => {
                    props.outline_level = child
                        .val()
                        .and_then(|v| number(child, v))
                        .map(|v| v as u8)
                        // 9 means "body text"
                        .filter(|lvl| *lvl < 9)
                }
                "keepNext" => props.keep_next = Some(on_off(child)),
                "keepLines" => props.keep_lines = Some(on_off(child)),
                "pageBreakBefore" => props.page_break_before = Some(on_off(child)),
                "rPr" => props.run = Some(RunProperties::from_element(child)),
                _ => {}
            }
        }

        props
    }

    /// Whether this layer specifies nothing.
    pub fn is_empty(&self) -> bool {
        *self == ParagraphProperties::default()
    }
}

fn parse_fonts(element: &XmlElement) -> FontFamily {
    FontFamily {
        ascii: element.attr("ascii").map(str::to_string),
        h_ansi: element.attr("hAnsi").map(str::to_string),
        east_asia: element.attr("eastAsia").map(str::to_string),
        complex_script: element.attr("cs").map(str::to_string),
    }
}

fn parse_spacing(element: &XmlElement) -> Spacing {
    let line_rule = match element.attr("lineRule") {
        Some("exact") => Some(LineRule::Exact),
        Some("atLeast") => Some(LineRule::AtLeast),
        Some(_) => Some(LineRule::Auto),
        None => None,
    };

    let line = element
        .attr("line")
        .and_then(|v| number(element, v))
        .map(|raw| match line_rule {
            Some(LineRule::Exact) | Some(LineRule::AtLeast) => raw / TWIPS_PER_POINT,
            _ => raw / AUTO_LINE_UNIT,
        });

    Spacing {
        before: twips(element, "before"),
        after: twips(element, "after"),
        line,
        line_rule: line_rule.or(line.map(|_| LineRule::Auto)),
    }
}

fn parse_indentation(element: &XmlElement) -> Indentation {
    Indentation {
        left: twips(element, "left").or_else(|| twips(element, "start")),
        right: twips(element, "right").or_else(|| twips(element, "end")),
        first_line: twips(element, "firstLine"),
        hanging: twips(element, "hanging"),
    }
}

fn parse_borders(element: &XmlElement) -> Borders {
    let mut borders = Borders::default();
    for edge in element.elements() {
        let border = Some(parse_border(edge));
        match edge.local_name() {
            "top" => borders.top = border,
            "bottom" => borders.bottom = border,
            "left" | "start" => borders.left = border,
            "right" | "end" => borders.right = border,
            "between" => borders.between = border,
            _ => {}
        }
    }
    borders
}

fn parse_border(element: &XmlElement) -> Border {
    Border {
        style: element.val().unwrap_or("single").to_string(),
        // eighths of a point
        width: element
            .attr("sz")
            .and_then(|v| number(element, v))
            .map(|v| v / 8.0),
        color: element
            .attr("color")
            .filter(|c| *c != "auto")
            .map(str::to_string),
        space: element.attr("space").and_then(|v| number(element, v)),
    }
}

pub(crate) fn parse_shading(element: &XmlElement) -> Shading {
    Shading {
        fill: element
            .attr("fill")
            .filter(|c| *c != "auto")
            .map(str::to_string),
        color: element
            .attr("color")
            .filter(|c| *c != "auto")
            .map(str::to_string),
        pattern: element.val().map(str::to_string),
    }
}

fn parse_numbering_ref(element: &XmlElement) -> NumberingRef {
    NumberingRef {
        num_id: element
            .child("numId")
            .and_then(|e| e.val().and_then(|v| number(e, v)))
            .map(|v| v as u32),
        ilvl: element
            .child("ilvl")
            .and_then(|e| e.val().and_then(|v| number(e, v)))
            .map(|v| v as u8),
    }
}

/// A twips-valued attribute converted to points.
fn twips(element: &XmlElement, attr: &str) -> Option<f64> {
    element
        .attr(attr)
        .and_then(|v| number(element, v))
        .map(|v| v / TWIPS_PER_POINT)
}

/// Parse a numeric literal. Malformed values make the field absent.
pub(crate) fn number(element: &XmlElement, value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            log::debug!(
                "ignoring malformed numeric value '{}' on <{}>",
                value,
                element.name
            );
            None
        }
    }
}
