//! Property groups and fully resolved (effective) properties.
//!
//! All lengths are in points. Grouped values (spacing, indentation, borders,
//! shading, fonts) keep optional fields because "not specified anywhere" is a
//! meaningful answer for an emitter: it falls back to its own default.

use serde::{Deserialize, Serialize};

/// Paragraph justification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
    /// Justified (`both`)
    Both,
    /// Justified with inter-character distribution
    Distribute,
}

impl Justification {
    /// Map an OOXML `w:jc` value. Bidi-neutral `start`/`end` map to left/right.
    pub fn from_ooxml(val: &str) -> Option<Self> {
        match val {
            "left" | "start" => Some(Justification::Left),
            "center" => Some(Justification::Center),
            "right" | "end" => Some(Justification::Right),
            "both" | "lowKashida" | "mediumKashida" | "highKashida" | "thaiDistribute" => {
                Some(Justification::Both)
            }
            "distribute" => Some(Justification::Distribute),
            _ => None,
        }
    }
}

/// Underline style. `None` is an explicit "no underline" that can override
/// an underline inherited from a style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnderlineStyle {
    #[default]
    None,
    Single,
    Double,
    Thick,
    Dotted,
    Dashed,
    Wave,
    Words,
}

impl UnderlineStyle {
    /// Map an OOXML `w:u` value.
    pub fn from_ooxml(val: &str) -> Self {
        match val {
            "none" => UnderlineStyle::None,
            "double" | "wavyDouble" => UnderlineStyle::Double,
            "thick" => UnderlineStyle::Thick,
            "dotted" | "dottedHeavy" | "dotDash" | "dotDotDash" => UnderlineStyle::Dotted,
            "dash" | "dashedHeavy" | "dashLong" | "dashLongHeavy" => UnderlineStyle::Dashed,
            "wave" | "wavyHeavy" => UnderlineStyle::Wave,
            "words" => UnderlineStyle::Words,
            _ => UnderlineStyle::Single,
        }
    }

    /// Whether any underline is drawn.
    pub fn is_underlined(&self) -> bool {
        !matches!(self, UnderlineStyle::None)
    }
}

/// Vertical text position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

impl VerticalAlign {
    /// Map an OOXML `w:vertAlign` value.
    pub fn from_ooxml(val: &str) -> Self {
        match val {
            "superscript" => VerticalAlign::Superscript,
            "subscript" => VerticalAlign::Subscript,
            _ => VerticalAlign::Baseline,
        }
    }
}

/// How the `line` value of paragraph spacing is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineRule {
    /// `line` is a multiple of single spacing
    Auto,
    /// `line` is an exact height in points
    Exact,
    /// `line` is a minimum height in points
    AtLeast,
}

/// Font family set (`w:rFonts`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontFamily {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascii: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h_ansi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub east_asia: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complex_script: Option<String>,
}

impl FontFamily {
    /// Font a Latin-script emitter should use.
    pub fn primary(&self) -> Option<&str> {
        self.ascii
            .as_deref()
            .or(self.h_ansi.as_deref())
            .or(self.east_asia.as_deref())
            .or(self.complex_script.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.primary().is_none()
    }
}

/// Paragraph spacing (`w:spacing`), in points except `line` under
/// [`LineRule::Auto`], which is a multiplier (1.0 = single).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_rule: Option<LineRule>,
}

impl Spacing {
    pub fn is_empty(&self) -> bool {
        *self == Spacing::default()
    }
}

/// Paragraph indentation (`w:ind`), in points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hanging: Option<f64>,
}

impl Indentation {
    pub fn is_empty(&self) -> bool {
        *self == Indentation::default()
    }
}

/// One border edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// OOXML line style (`single`, `double`, `dashed`, `nil` …)
    pub style: String,
    /// Line width in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Hex color, `None` for automatic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Distance from text in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<f64>,
}

impl Border {
    /// `nil`/`none` borders remove an inherited border.
    pub fn is_visible(&self) -> bool {
        !matches!(self.style.as_str(), "nil" | "none")
    }
}

/// Paragraph borders (`w:pBdr`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Borders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub between: Option<Border>,
}

impl Borders {
    pub fn is_empty(&self) -> bool {
        *self == Borders::default()
    }
}

/// Background shading (`w:shd`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shading {
    /// Fill color (hex), `None` for automatic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Pattern color (hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Pattern (`clear`, `solid`, `pct25` …)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Reference from a paragraph to a numbering instance (`w:numPr`).
///
/// Both halves are optional so that a paragraph can override only the level
/// of a numbering inherited from its style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ilvl: Option<u8>,
}

/// A complete numbering reference after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListRef {
    pub num_id: u32,
    pub ilvl: u8,
}

impl NumberingRef {
    /// Complete reference, or `None` when numbering is absent or explicitly
    /// cancelled with `numId = 0`. The level is kept as written; a level no
    /// definition covers is reported when the numbering is resolved.
    pub fn to_list_ref(&self) -> Option<ListRef> {
        match self.num_id {
            Some(0) | None => None,
            Some(num_id) => Some(ListRef {
                num_id,
                ilvl: self.ilvl.unwrap_or(0),
            }),
        }
    }
}

/// Fully merged run properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRunProperties {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_no_underline")]
    pub underline: UnderlineStyle,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strike: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub double_strike: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub caps: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub small_caps: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "FontFamily::is_empty")]
    pub font: FontFamily,
    /// Font size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Text color (hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Highlight color name (`yellow`, `cyan` …)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<Shading>,
    #[serde(default, skip_serializing_if = "is_baseline")]
    pub vertical_align: VerticalAlign,
    /// Extra character spacing in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_spacing: Option<f64>,
    /// Character style applied to the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
}

/// Fully merged paragraph properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveParagraphProperties {
    /// Paragraph style applied to the paragraph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
    #[serde(default)]
    pub justification: Justification,
    #[serde(default, skip_serializing_if = "Spacing::is_empty")]
    pub spacing: Spacing,
    #[serde(default, skip_serializing_if = "Indentation::is_empty")]
    pub indentation: Indentation,
    #[serde(default, skip_serializing_if = "Borders::is_empty")]
    pub borders: Borders,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<Shading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numbering: Option<ListRef>,
    /// Outline level, 0-based (0 = top-level heading)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<u8>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub keep_next: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub keep_lines: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub page_break_before: bool,
    /// Run properties every run of this paragraph starts from
    #[serde(default)]
    pub run_defaults: EffectiveRunProperties,
}

fn is_no_underline(u: &UnderlineStyle) -> bool {
    !u.is_underlined()
}

fn is_baseline(v: &VerticalAlign) -> bool {
    *v == VerticalAlign::Baseline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_justification_mapping() {
        assert_eq!(Justification::from_ooxml("both"), Some(Justification::Both));
        assert_eq!(Justification::from_ooxml("end"), Some(Justification::Right));
        assert_eq!(Justification::from_ooxml("bogus"), None);
    }

    #[test]
    fn test_numbering_ref_zero_cancels() {
        let cancelled = NumberingRef {
            num_id: Some(0),
            ilvl: Some(2),
        };
        assert_eq!(cancelled.to_list_ref(), None);

        let level_only = NumberingRef {
            num_id: None,
            ilvl: Some(1),
        };
        assert_eq!(level_only.to_list_ref(), None);

        let full = NumberingRef {
            num_id: Some(3),
            ilvl: None,
        };
        assert_eq!(full.to_list_ref(), Some(ListRef { num_id: 3, ilvl: 0 }));
    }

    #[test]
    fn test_numbering_ref_keeps_deep_level() {
        let deep = NumberingRef {
            num_id: Some(1),
            ilvl: Some(12),
        };
        assert_eq!(deep.to_list_ref(), Some(ListRef { num_id: 1, ilvl: 12 }));
    }

    #[test]
    fn test_font_family_primary() {
        let font = FontFamily {
            east_asia: Some("MS Mincho".to_string()),
            h_ansi: Some("Calibri".to_string()),
            ..Default::default()
        };
        assert_eq!(font.primary(), Some("Calibri"));
        assert!(FontFamily::default().is_empty());
    }

    #[test]
    fn test_effective_run_serialization_skips_defaults() {
        let props = EffectiveRunProperties {
            bold: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&props).unwrap();
        assert!(json.contains("\"bold\":true"));
        assert!(!json.contains("italic"));
        assert!(!json.contains("underline"));
    }
}
