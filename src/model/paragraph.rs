//! Resolved paragraph and text run models.

use super::properties::{EffectiveParagraphProperties, EffectiveRunProperties, Justification};
use crate::docx::{LevelSuffix, NumberFormat};
use serde::{Deserialize, Serialize};

/// Heading level (h1-h6 or none).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    #[default]
    None,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Create a heading level from a number (1-6).
    pub fn from_number(n: u8) -> Self {
        match n {
            1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            4 => HeadingLevel::H4,
            5 => HeadingLevel::H5,
            6 => HeadingLevel::H6,
            _ => HeadingLevel::None,
        }
    }

    /// Heading for a 0-based outline level.
    pub fn from_outline_level(level: u8) -> Self {
        Self::from_number(level.saturating_add(1))
    }

    /// Get the numeric level (0 for none, 1-6 for headings).
    pub fn level(&self) -> u8 {
        match self {
            HeadingLevel::None => 0,
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
            HeadingLevel::H6 => 6,
        }
    }

    /// Check if this is a heading (not None).
    pub fn is_heading(&self) -> bool {
        !matches!(self, HeadingLevel::None)
    }

    fn is_none(&self) -> bool {
        matches!(self, HeadingLevel::None)
    }
}

/// Kind of break inside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Line,
    Page,
    Column,
}

/// One piece of run content. Tabs and breaks stay distinct from text until
/// an emitter decides how to write them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RunContent {
    Text(String),
    Tab,
    Break(BreakKind),
    /// U+2011
    NoBreakHyphen,
    /// U+00AD
    SoftHyphen,
}

impl RunContent {
    /// Plain-text rendition. Tabs become `\t`, breaks `\n`.
    pub fn as_plain(&self) -> &str {
        match self {
            RunContent::Text(t) => t,
            RunContent::Tab => "\t",
            RunContent::Break(_) => "\n",
            RunContent::NoBreakHyphen => "\u{2011}",
            RunContent::SoftHyphen => "\u{00AD}",
        }
    }
}

/// Append content, coalescing consecutive text pieces.
pub(crate) fn push_content(content: &mut Vec<RunContent>, item: RunContent) {
    if let RunContent::Text(ref text) = item {
        if text.is_empty() {
            return;
        }
        if let Some(RunContent::Text(last)) = content.last_mut() {
            last.push_str(text);
            return;
        }
    }
    content.push(item);
}

/// A run of content with fully merged properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: Vec<RunContent>,

    #[serde(default)]
    pub properties: EffectiveRunProperties,

    /// Hyperlink target (URL or `#anchor`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
}

impl TextRun {
    /// Create a plain text run with default properties.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            content: vec![RunContent::Text(text.into())],
            ..Default::default()
        }
    }

    /// Plain text with tabs and breaks as control characters.
    pub fn text(&self) -> String {
        self.content.iter().map(RunContent::as_plain).collect()
    }

    pub fn is_link(&self) -> bool {
        self.hyperlink.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Whether a list renders ordered or unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn for_format(format: &NumberFormat) -> Self {
        match format {
            NumberFormat::Bullet => ListKind::Unordered,
            _ => ListKind::Ordered,
        }
    }
}

/// An open list container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFrame {
    pub num_id: u32,
    pub ilvl: u8,
    pub kind: ListKind,
}

/// List containers to close and open around one list item.
///
/// `close_before` and `close_after` are innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTransition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub close_before: Vec<ListFrame>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub open: Vec<ListFrame>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub close_after: Vec<ListFrame>,
}

/// The computed marker of a list paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingMarker {
    /// Marker text, e.g. `1.2.` or a bullet glyph
    pub text: String,
    pub num_id: u32,
    pub ilvl: u8,
    pub format: NumberFormat,
    pub kind: ListKind,
    #[serde(default)]
    pub suffix: LevelSuffix,
    #[serde(default)]
    pub justification: Justification,
    /// Properties of the marker glyph
    #[serde(default)]
    pub run_properties: EffectiveRunProperties,
}

impl NumberingMarker {
    /// Marker text followed by its suffix, with tab written as `tab`.
    pub fn with_suffix(&self, tab: &str) -> String {
        match self.suffix {
            LevelSuffix::Tab => format!("{}{}", self.text, tab),
            LevelSuffix::Space => format!("{} ", self.text),
            LevelSuffix::Nothing => self.text.clone(),
        }
    }
}

/// List membership of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub marker: NumberingMarker,
    #[serde(default)]
    pub transition: ListTransition,
}

/// A paragraph with fully merged properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<TextRun>,

    #[serde(default)]
    pub properties: EffectiveParagraphProperties,

    #[serde(default, skip_serializing_if = "HeadingLevel::is_none")]
    pub heading: HeadingLevel,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_item: Option<ListItem>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
            ..Default::default()
        }
    }

    /// Get the plain text content, without the list marker.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text()).collect()
    }

    /// Check if this paragraph has no content.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.is_empty())
    }

    pub fn is_heading(&self) -> bool {
        self.heading.is_heading()
    }

    pub fn is_list_item(&self) -> bool {
        self.list_item.is_some()
    }

    /// Marker text of a list paragraph.
    pub fn marker(&self) -> Option<&str> {
        self.list_item.as_ref().map(|item| item.marker.text.as_str())
    }

    /// Merge consecutive runs with identical properties and hyperlink.
    ///
    /// Documents often split one visually uniform span into many runs
    /// (spell-check marks, revision ids).
    pub fn merge_adjacent_runs(&mut self) {
        if self.runs.len() <= 1 {
            return;
        }

        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());

        for run in self.runs.drain(..) {
            let should_merge = merged.last().is_some_and(|last: &TextRun| {
                last.properties == run.properties && last.hyperlink == run.hyperlink
            });

            match merged.last_mut() {
                Some(last) if should_merge => {
                    for item in run.content {
                        push_content(&mut last.content, item);
                    }
                }
                _ => merged.push(run),
            }
        }

        self.runs = merged;
    }
}
