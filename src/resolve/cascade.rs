//! Style cascade.
//!
//! Effective properties come from four layers, lowest precedence first:
//!
//! 1. document defaults (`w:docDefaults`)
//! 2. the default style of the kind (`w:default="1"`), fully resolved
//! 3. the named style (`pStyle` / `rStyle`) with its `basedOn` chain
//! 4. direct properties on the element
//!
//! A paragraph's run defaults fold the default character style in right after
//! the document defaults. A run starts from those run defaults as one complete
//! layer, so a value the paragraph switched off stays off, and only its own
//! `rStyle` chain and direct properties go on top.
//!
//! Every style's chain is resolved once when the resolver is built; lookups
//! afterwards only read the cache, so one resolver can be shared by any number
//! of document traversals.

use super::merge::{finish_paragraph, finish_run, merge_all, run_layer_from_effective, Merge};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::docx::{ParagraphProperties, RunProperties, StyleKind, StyleSheet};
use crate::model::{EffectiveParagraphProperties, EffectiveRunProperties, HeadingLevel};
use std::collections::{HashMap, HashSet};

/// A style with its `basedOn` chain already merged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle {
    pub paragraph: ParagraphProperties,
    pub run: RunProperties,
}

impl Merge for ResolvedStyle {
    fn merge(&self, over: &Self) -> Self {
        ResolvedStyle {
            paragraph: self.paragraph.merge(&over.paragraph),
            run: self.run.merge(&over.run),
        }
    }
}

/// Resolves effective paragraph and run properties against one style sheet.
#[derive(Debug)]
pub struct StyleResolver<'a> {
    sheet: &'a StyleSheet,
    cache: HashMap<(StyleKind, String), ResolvedStyle>,
    diagnostics: Diagnostics,
}

impl<'a> StyleResolver<'a> {
    /// Resolve every style chain of the sheet.
    pub fn new(sheet: &'a StyleSheet) -> Self {
        let mut cache = HashMap::with_capacity(sheet.len());
        let mut found = Vec::new();

        for style in sheet.styles() {
            let mut visited = HashSet::new();
            let resolved = resolve_chain(sheet, style.kind, &style.id, &mut visited, &mut found);
            if let Some(resolved) = resolved {
                cache.insert((style.kind, style.id.clone()), resolved);
            }
        }

        // chains share ancestors, so the same problem shows up once per descendant
        let mut diagnostics = Diagnostics::new();
        let mut seen = Vec::new();
        for diagnostic in found {
            if !seen.contains(&diagnostic) {
                seen.push(diagnostic.clone());
                diagnostics.push(diagnostic);
            }
        }

        Self {
            sheet,
            cache,
            diagnostics,
        }
    }

    /// Problems found in the style sheet itself (broken or cyclic `basedOn`).
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn sheet(&self) -> &StyleSheet {
        self.sheet
    }

    /// Fully resolved style, `None` when no style of that kind has the ID.
    pub fn style(&self, kind: StyleKind, id: &str) -> Option<&ResolvedStyle> {
        self.cache.get(&(kind, id.to_string()))
    }

    fn default_style(&self, kind: StyleKind) -> Option<&ResolvedStyle> {
        self.sheet
            .default_style_id(kind)
            .and_then(|id| self.style(kind, id))
    }

    /// Effective properties of a paragraph.
    pub fn resolve_paragraph(
        &self,
        raw: &ParagraphProperties,
        diagnostics: &mut Diagnostics,
    ) -> EffectiveParagraphProperties {
        let styled = self.styled_paragraph(raw, diagnostics);
        self.finish_paragraph(&styled, None, raw)
    }

    /// Layers 1-3 of a paragraph, plus the paragraph style's run defaults.
    pub(crate) fn styled_paragraph(
        &self,
        raw: &ParagraphProperties,
        diagnostics: &mut Diagnostics,
    ) -> ResolvedStyle {
        let mut layered = ResolvedStyle {
            paragraph: self.sheet.doc_defaults.paragraph.clone(),
            run: self.sheet.doc_defaults.run.clone(),
        };

        if let Some(default) = self.default_style(StyleKind::Character) {
            layered.run = layered.run.merge(&default.run);
        }
        if let Some(default) = self.default_style(StyleKind::Paragraph) {
            layered = layered.merge(default);
        }

        let named = raw.style.as_deref().and_then(|id| {
            let found = self.style(StyleKind::Paragraph, id);
            if found.is_none() {
                diagnostics.push(Diagnostic::MissingStyle {
                    kind: StyleKind::Paragraph,
                    style_id: id.to_string(),
                });
            }
            found
        });
        if let Some(named) = named {
            layered = layered.merge(named);
        }

        layered.paragraph.style = match named {
            Some(_) => raw.style.clone(),
            None => self
                .sheet
                .default_style_id(StyleKind::Paragraph)
                .map(str::to_string),
        };
        layered
    }

    /// Apply an optional numbering-level layer and the direct properties.
    pub(crate) fn finish_paragraph(
        &self,
        styled: &ResolvedStyle,
        numbering_layer: Option<&ParagraphProperties>,
        raw: &ParagraphProperties,
    ) -> EffectiveParagraphProperties {
        let style_id = styled.paragraph.style.clone();

        let mut merged = styled.paragraph.clone();
        if let Some(level) = numbering_layer {
            merged = merged.merge(level);
        }
        let direct = ParagraphProperties {
            style: None,
            ..raw.clone()
        };
        merged = merged.merge(&direct);

        // pPr/rPr from any layer lands in `merged.run`, direct formatting last
        let run_layer = match &merged.run {
            Some(run) => styled.run.merge(run),
            None => styled.run.clone(),
        };

        let mut effective = finish_paragraph(&merged);
        effective.style_id = style_id;
        effective.run_defaults = finish_run(&run_layer);
        effective
    }

    /// Effective properties of a run inside a paragraph whose resolved run
    /// defaults are `inherited`.
    pub fn resolve_run(
        &self,
        raw: &RunProperties,
        inherited: &EffectiveRunProperties,
        diagnostics: &mut Diagnostics,
    ) -> EffectiveRunProperties {
        let inherited = run_layer_from_effective(inherited);
        let named = raw.style.as_deref().and_then(|id| {
            let found = self.style(StyleKind::Character, id);
            if found.is_none() {
                diagnostics.push(Diagnostic::MissingStyle {
                    kind: StyleKind::Character,
                    style_id: id.to_string(),
                });
            }
            found
        });
        let style_id = named.and(raw.style.clone());

        let layer: RunProperties = merge_all(
            std::iter::once(&inherited)
                .chain(named.map(|style| &style.run))
                .chain(std::iter::once(raw)),
        );

        let mut effective = finish_run(&layer);
        effective.style_id = style_id;
        effective
    }

    /// Heading level from the outline level, else from a `Title`/`Subtitle`
    /// style name.
    pub fn heading_level(&self, props: &EffectiveParagraphProperties) -> HeadingLevel {
        if let Some(level) = props.outline_level {
            let heading = HeadingLevel::from_outline_level(level);
            if heading.is_heading() {
                return heading;
            }
        }

        let name = props
            .style_id
            .as_deref()
            .and_then(|id| self.sheet.get(StyleKind::Paragraph, id))
            .and_then(|style| style.name.as_deref())
            .map(str::to_lowercase);

        match name.as_deref() {
            Some("title") => HeadingLevel::H1,
            Some("subtitle") => HeadingLevel::H2,
            _ => HeadingLevel::None,
        }
    }
}

/// Resolve one style's chain. `visited` holds the styles of the chain being
/// resolved; reaching one of them again stops inheritance at that point.
fn resolve_chain(
    sheet: &StyleSheet,
    kind: StyleKind,
    id: &str,
    visited: &mut HashSet<String>,
    found: &mut Vec<Diagnostic>,
) -> Option<ResolvedStyle> {
    let style = sheet.get(kind, id)?;
    visited.insert(id.to_string());

    let own = ResolvedStyle {
        paragraph: style.paragraph_properties.clone().unwrap_or_default(),
        run: style.run_properties.clone().unwrap_or_default(),
    };

    let Some(parent) = style.based_on.as_deref() else {
        return Some(own);
    };

    if visited.contains(parent) {
        found.push(Diagnostic::StyleCycle {
            style_id: id.to_string(),
            repeated: parent.to_string(),
        });
        return Some(own);
    }

    match resolve_chain(sheet, kind, parent, visited, found) {
        Some(base) => Some(base.merge(&own)),
        None => {
            found.push(Diagnostic::MissingBasedOn {
                style_id: id.to_string(),
                based_on: parent.to_string(),
            });
            Some(own)
        }
    }
}
