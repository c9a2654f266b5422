//! Numbering engine: level lookup, counters and marker text.

use crate::docx::{NumberFormat, NumberingLevel, NumberingSheet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Why a `(numId, ilvl)` reference could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelNotFound {
    #[error("no numbering instance with this numId")]
    NoInstance,
    #[error("the instance refers to an undefined abstract numbering")]
    NoAbstract,
    #[error("the abstract numbering does not define this level")]
    NoLevel,
}

/// A numbering level with instance overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLevel {
    pub num_id: u32,
    pub ilvl: u8,
    pub level: NumberingLevel,
}

impl ResolvedLevel {
    pub fn is_bullet(&self) -> bool {
        self.level.format == NumberFormat::Bullet
    }
}

/// Find the effective definition of level `ilvl` of instance `num_id`.
///
/// A full level override replaces the abstract level; a start override only
/// replaces `start` (and wins over the start of a full override).
pub fn resolve_level(
    sheet: &NumberingSheet,
    num_id: u32,
    ilvl: u8,
) -> Result<ResolvedLevel, LevelNotFound> {
    let instance = sheet.instance(num_id).ok_or(LevelNotFound::NoInstance)?;
    let level_override = instance.level_override(ilvl);

    let mut level = match level_override.and_then(|o| o.level.as_ref()) {
        Some(replacement) => replacement.clone(),
        None => sheet
            .abstract_numbering(instance.abstract_num_id)
            .ok_or(LevelNotFound::NoAbstract)?
            .level(ilvl)
            .ok_or(LevelNotFound::NoLevel)?
            .clone(),
    };

    if let Some(start) = level_override.and_then(|o| o.start_override) {
        level.start = start;
    }
    level.ilvl = ilvl;

    Ok(ResolvedLevel {
        num_id,
        ilvl,
        level,
    })
}

/// Per-list, per-level counters of one traversal.
///
/// A missing entry means "not used yet"; reading it yields the level's start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    counters: HashMap<u32, BTreeMap<u8, u32>>,
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value without advancing.
    pub fn peek(&self, num_id: u32, ilvl: u8, start: u32) -> u32 {
        self.counters
            .get(&num_id)
            .and_then(|levels| levels.get(&ilvl))
            .copied()
            .unwrap_or(start)
    }

    /// Advance and return the counter. The first call returns `start`.
    pub fn increment(&mut self, num_id: u32, ilvl: u8, start: u32) -> u32 {
        let levels = self.counters.entry(num_id).or_default();
        let value = match levels.get(&ilvl) {
            Some(current) => current.saturating_add(1),
            None => start,
        };
        levels.insert(ilvl, value);
        value
    }

    /// Forget every level of `num_id` deeper than `ilvl`.
    pub fn reset_deeper(&mut self, num_id: u32, ilvl: u8) {
        if let Some(levels) = self.counters.get_mut(&num_id) {
            levels.retain(|level, _| *level <= ilvl);
        }
    }

    pub fn reset(&mut self) {
        self.counters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.counters.values().all(BTreeMap::is_empty)
    }
}

const ROMAN: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

fn to_roman(mut value: u32) -> Option<String> {
    if !(1..=3999).contains(&value) {
        return None;
    }
    let mut out = String::new();
    for (amount, numeral) in ROMAN {
        while value >= amount {
            out.push_str(numeral);
            value -= amount;
        }
    }
    Some(out)
}

/// Bijective base-26: 1 → A, 26 → Z, 27 → AA.
fn to_letters(mut value: u32) -> Option<String> {
    if value == 0 {
        return None;
    }
    let mut letters = Vec::new();
    while value > 0 {
        value -= 1;
        letters.push(b'A' + (value % 26) as u8);
        value /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).ok()
}

/// Format a counter value in a numbering format.
pub fn format_counter(value: u32, format: &NumberFormat) -> String {
    match format {
        NumberFormat::UpperRoman => to_roman(value).unwrap_or_else(|| value.to_string()),
        NumberFormat::LowerRoman => to_roman(value)
            .map(|r| r.to_lowercase())
            .unwrap_or_else(|| value.to_string()),
        NumberFormat::UpperLetter => to_letters(value).unwrap_or_else(|| value.to_string()),
        NumberFormat::LowerLetter => to_letters(value)
            .map(|l| l.to_lowercase())
            .unwrap_or_else(|| value.to_string()),
        NumberFormat::DecimalZero => format!("{:02}", value),
        NumberFormat::None => String::new(),
        NumberFormat::Decimal | NumberFormat::Bullet | NumberFormat::Other(_) => {
            value.to_string()
        }
    }
}

/// Replace `%1`..`%9` in `template`; other text, including a lone `%`, is
/// kept as written.
fn substitute(template: &str, mut value_of: impl FnMut(u8) -> String) -> String {
    let mut out = String::with_capacity(template.len() + 4);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            if let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
                if (1..=9).contains(&digit) {
                    chars.next();
                    out.push_str(&value_of(digit as u8 - 1));
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Numbering state of one document traversal.
#[derive(Debug)]
pub struct NumberingEngine<'a> {
    sheet: &'a NumberingSheet,
    counters: CounterState,
}

impl<'a> NumberingEngine<'a> {
    pub fn new(sheet: &'a NumberingSheet) -> Self {
        Self {
            sheet,
            counters: CounterState::new(),
        }
    }

    pub fn resolve_level(&self, num_id: u32, ilvl: u8) -> Result<ResolvedLevel, LevelNotFound> {
        resolve_level(self.sheet, num_id, ilvl)
    }

    /// Marker text for the next item at `resolved`, advancing its counter.
    ///
    /// Deeper levels of the same list restart. Bullets are emitted verbatim
    /// and never counted.
    pub fn next_marker(&mut self, resolved: &ResolvedLevel) -> String {
        let (num_id, ilvl) = (resolved.num_id, resolved.ilvl);
        self.counters.reset_deeper(num_id, ilvl);

        if resolved.is_bullet() {
            return resolved.level.level_text.clone();
        }

        let current = self
            .counters
            .increment(num_id, ilvl, resolved.level.start);

        substitute(&resolved.level.level_text, |level| {
            if level == ilvl {
                return format_counter(current, &resolved.level.format);
            }
            match self.resolve_level(num_id, level) {
                Ok(other) => format_counter(
                    self.counters.peek(num_id, level, other.level.start),
                    &other.level.format,
                ),
                Err(_) => self.counters.peek(num_id, level, 1).to_string(),
            }
        })
    }

    pub fn counters(&self) -> &CounterState {
        &self.counters
    }

    /// Replace the counters, returning the previous state.
    pub fn swap_counters(&mut self, counters: CounterState) -> CounterState {
        std::mem::replace(&mut self.counters, counters)
    }

    /// Forget all counters, as at the start of a new document.
    pub fn reset(&mut self) {
        self.counters.reset();
    }
}
