//! Field-wise merging of property layers.
//!
//! `base.merge(over)` returns a new value in which every field that `over`
//! specifies wins and every field it leaves out keeps the base value.
//! Structured groups merge key by key, so a layer that only sets a left
//! indent keeps an inherited right indent. Neither input is mutated.

use crate::docx::{ParagraphProperties, RunProperties};
use crate::model::{
    Borders, EffectiveParagraphProperties, EffectiveRunProperties, FontFamily, Indentation,
    NumberingRef, Shading, Spacing,
};

/// Layered override.
pub trait Merge {
    /// `self` overlaid with `over`.
    fn merge(&self, over: &Self) -> Self;
}

/// Scalar override: `over` wins when present.
fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
    over.as_ref().or(base.as_ref()).cloned()
}

/// Optional structured group: merged when both sides have one.
fn merge_opt<T: Merge + Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
    match (base, over) {
        (Some(b), Some(o)) => Some(b.merge(o)),
        (_, Some(o)) => Some(o.clone()),
        (b, None) => b.clone(),
    }
}

impl Merge for FontFamily {
    fn merge(&self, over: &Self) -> Self {
        FontFamily {
            ascii: pick(&self.ascii, &over.ascii),
            h_ansi: pick(&self.h_ansi, &over.h_ansi),
            east_asia: pick(&self.east_asia, &over.east_asia),
            complex_script: pick(&self.complex_script, &over.complex_script),
        }
    }
}

impl Merge for Spacing {
    fn merge(&self, over: &Self) -> Self {
        Spacing {
            before: pick(&self.before, &over.before),
            after: pick(&self.after, &over.after),
            line: pick(&self.line, &over.line),
            line_rule: pick(&self.line_rule, &over.line_rule),
        }
    }
}

impl Merge for Indentation {
    fn merge(&self, over: &Self) -> Self {
        Indentation {
            left: pick(&self.left, &over.left),
            right: pick(&self.right, &over.right),
            first_line: pick(&self.first_line, &over.first_line),
            hanging: pick(&self.hanging, &over.hanging),
        }
    }
}

// Border edges replace whole: a style/width/color triple only makes sense
// as a unit.
impl Merge for Borders {
    fn merge(&self, over: &Self) -> Self {
        Borders {
            top: pick(&self.top, &over.top),
            bottom: pick(&self.bottom, &over.bottom),
            left: pick(&self.left, &over.left),
            right: pick(&self.right, &over.right),
            between: pick(&self.between, &over.between),
        }
    }
}

impl Merge for Shading {
    fn merge(&self, over: &Self) -> Self {
        Shading {
            fill: pick(&self.fill, &over.fill),
            color: pick(&self.color, &over.color),
            pattern: pick(&self.pattern, &over.pattern),
        }
    }
}

impl Merge for NumberingRef {
    fn merge(&self, over: &Self) -> Self {
        NumberingRef {
            num_id: pick(&self.num_id, &over.num_id),
            ilvl: pick(&self.ilvl, &over.ilvl),
        }
    }
}

impl Merge for RunProperties {
    fn merge(&self, over: &Self) -> Self {
        RunProperties {
            style: pick(&self.style, &over.style),
            bold: pick(&self.bold, &over.bold),
            italic: pick(&self.italic, &over.italic),
            underline: pick(&self.underline, &over.underline),
            strike: pick(&self.strike, &over.strike),
            double_strike: pick(&self.double_strike, &over.double_strike),
            caps: pick(&self.caps, &over.caps),
            small_caps: pick(&self.small_caps, &over.small_caps),
            hidden: pick(&self.hidden, &over.hidden),
            font: self.font.merge(&over.font),
            size: pick(&self.size, &over.size),
            color: pick(&self.color, &over.color),
            highlight: pick(&self.highlight, &over.highlight),
            shading: merge_opt(&self.shading, &over.shading),
            vertical_align: pick(&self.vertical_align, &over.vertical_align),
            character_spacing: pick(&self.character_spacing, &over.character_spacing),
        }
    }
}

impl Merge for ParagraphProperties {
    fn merge(&self, over: &Self) -> Self {
        ParagraphProperties {
            style: pick(&self.style, &over.style),
            justification: pick(&self.justification, &over.justification),
            spacing: self.spacing.merge(&over.spacing),
            indentation: self.indentation.merge(&over.indentation),
            borders: self.borders.merge(&over.borders),
            shading: merge_opt(&self.shading, &over.shading),
            numbering: merge_opt(&self.numbering, &over.numbering),
            outline_level: pick(&self.outline_level, &over.outline_level),
            keep_next: pick(&self.keep_next, &over.keep_next),
            keep_lines: pick(&self.keep_lines, &over.keep_lines),
            page_break_before: pick(&self.page_break_before, &over.page_break_before),
            run: merge_opt(&self.run, &over.run),
        }
    }
}

/// Fold layers from lowest to highest precedence.
pub fn merge_all<'a, T, I>(layers: I) -> T
where
    T: Merge + Default + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    layers
        .into_iter()
        .fold(T::default(), |acc, layer| acc.merge(layer))
}

/// Collapse a merged run layer into effective values.
pub fn finish_run(layer: &RunProperties) -> EffectiveRunProperties {
    EffectiveRunProperties {
        bold: layer.bold.unwrap_or(false),
        italic: layer.italic.unwrap_or(false),
        underline: layer.underline.unwrap_or_default(),
        strike: layer.strike.unwrap_or(false),
        double_strike: layer.double_strike.unwrap_or(false),
        caps: layer.caps.unwrap_or(false),
        small_caps: layer.small_caps.unwrap_or(false),
        hidden: layer.hidden.unwrap_or(false),
        font: layer.font.clone(),
        size: layer.size,
        color: layer
            .color
            .clone()
            .filter(|c| !c.eq_ignore_ascii_case("auto")),
        highlight: layer
            .highlight
            .clone()
            .filter(|h| !h.eq_ignore_ascii_case("none")),
        shading: layer.shading.clone(),
        vertical_align: layer.vertical_align.unwrap_or_default(),
        character_spacing: layer.character_spacing,
        style_id: None,
    }
}

/// Turn effective run properties back into a layer.
///
/// Every toggle is specified, including the ones that are off, and an absent
/// color or highlight becomes an explicit `auto`/`none`. Merged over any
/// lower layer, the result therefore finishes to exactly `props`.
pub fn run_layer_from_effective(props: &EffectiveRunProperties) -> RunProperties {
    RunProperties {
        style: None,
        bold: Some(props.bold),
        italic: Some(props.italic),
        underline: Some(props.underline),
        strike: Some(props.strike),
        double_strike: Some(props.double_strike),
        caps: Some(props.caps),
        small_caps: Some(props.small_caps),
        hidden: Some(props.hidden),
        font: props.font.clone(),
        size: props.size,
        color: Some(props.color.clone().unwrap_or_else(|| "auto".to_string())),
        highlight: Some(
            props
                .highlight
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        ),
        shading: props.shading.clone(),
        vertical_align: Some(props.vertical_align),
        character_spacing: props.character_spacing,
    }
}

/// Collapse a merged paragraph layer into effective values. Run defaults are
/// computed separately by the cascade.
pub fn finish_paragraph(layer: &ParagraphProperties) -> EffectiveParagraphProperties {
    EffectiveParagraphProperties {
        style_id: None,
        justification: layer.justification.unwrap_or_default(),
        spacing: layer.spacing.clone(),
        indentation: layer.indentation.clone(),
        borders: layer.borders.clone(),
        shading: layer.shading.clone(),
        numbering: layer.numbering.and_then(|n| n.to_list_ref()),
        outline_level: layer.outline_level,
        keep_next: layer.keep_next.unwrap_or(false),
        keep_lines: layer.keep_lines.unwrap_or(false),
        page_break_before: layer.page_break_before.unwrap_or(false),
        run_defaults: EffectiveRunProperties::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Border, Justification, UnderlineStyle, VerticalAlign};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indentation_merges_key_by_key() {
        let base = Indentation {
            left: Some(10.0),
            right: Some(20.0),
            ..Default::default()
        };
        let over = Indentation {
            left: Some(36.0),
            ..Default::default()
        };
        let merged = base.merge(&over);
        assert_eq!(merged.left, Some(36.0));
        assert_eq!(merged.right, Some(20.0));
    }

    #[test]
    fn test_fonts_merge_per_script() {
        let base = FontFamily {
            ascii: Some("Arial".to_string()),
            east_asia: Some("SimSun".to_string()),
            ..Default::default()
        };
        let over = FontFamily {
            ascii: Some("Times New Roman".to_string()),
            ..Default::default()
        };
        let merged = base.merge(&over);
        assert_eq!(merged.ascii.as_deref(), Some("Times New Roman"));
        assert_eq!(merged.east_asia.as_deref(), Some("SimSun"));
    }

    #[test]
    fn test_run_override_and_inheritance() {
        let base = RunProperties {
            bold: Some(true),
            size: Some(12.0),
            ..Default::default()
        };
        let over = RunProperties {
            bold: Some(false),
            italic: Some(true),
            ..Default::default()
        };
        let merged = base.merge(&over);
        assert_eq!(merged.bold, Some(false));
        assert_eq!(merged.italic, Some(true));
        assert_eq!(merged.size, Some(12.0));
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let base = ParagraphProperties {
            justification: Some(Justification::Center),
            ..Default::default()
        };
        let snapshot = base.clone();
        let over = ParagraphProperties {
            justification: Some(Justification::Right),
            ..Default::default()
        };
        let _ = base.merge(&over);
        assert_eq!(base, snapshot);
    }

    #[test]
    fn test_border_edges_replace_whole() {
        let base = Borders {
            top: Some(Border {
                style: "single".to_string(),
                width: Some(1.0),
                color: Some("FF0000".to_string()),
                space: None,
            }),
            ..Default::default()
        };
        let over = Borders {
            top: Some(Border {
                style: "double".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let top = base.merge(&over).top.unwrap();
        assert_eq!(top.style, "double");
        assert_eq!(top.color, None);
    }

    #[test]
    fn test_numbering_ref_level_only_override() {
        let base = ParagraphProperties {
            numbering: Some(NumberingRef {
                num_id: Some(3),
                ilvl: Some(0),
            }),
            ..Default::default()
        };
        let over = ParagraphProperties {
            numbering: Some(NumberingRef {
                num_id: None,
                ilvl: Some(2),
            }),
            ..Default::default()
        };
        let merged = base.merge(&over);
        assert_eq!(
            merged.numbering,
            Some(NumberingRef {
                num_id: Some(3),
                ilvl: Some(2)
            })
        );
    }

    #[test]
    fn test_finish_run_drops_auto_values() {
        let layer = RunProperties {
            color: Some("auto".to_string()),
            highlight: Some("none".to_string()),
            bold: Some(true),
            ..Default::default()
        };
        let effective = finish_run(&layer);
        assert!(effective.bold);
        assert_eq!(effective.color, None);
        assert_eq!(effective.highlight, None);
    }

    #[test]
    fn test_effective_layer_switches_off_lower_values() {
        let effective = EffectiveRunProperties {
            bold: true,
            size: Some(11.0),
            ..Default::default()
        };
        let layer = run_layer_from_effective(&effective);
        assert_eq!(layer.bold, Some(true));
        assert_eq!(layer.italic, Some(false));
        assert_eq!(layer.underline, Some(UnderlineStyle::None));
        assert_eq!(layer.color.as_deref(), Some("auto"));

        let lower = RunProperties {
            italic: Some(true),
            underline: Some(UnderlineStyle::Single),
            color: Some("FF0000".to_string()),
            highlight: Some("yellow".to_string()),
            vertical_align: Some(VerticalAlign::Superscript),
            ..Default::default()
        };
        assert_eq!(finish_run(&lower.merge(&layer)), effective);
    }

    #[test]
    fn test_merge_all_folds_in_order() {
        let layers = [
            RunProperties {
                size: Some(10.0),
                ..Default::default()
            },
            RunProperties {
                size: Some(12.0),
                ..Default::default()
            },
        ];
        let merged: RunProperties = merge_all(layers.iter());
        assert_eq!(merged.size, Some(12.0));
    }
}
