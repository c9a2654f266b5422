//! WordprocessingML schema builders.
//!
//! This module turns the parts of a `.docx` package into typed intermediate
//! models: [`StyleSheet`] from `styles.xml`, [`NumberingSheet`] from
//! `numbering.xml` and [`RawDocument`] from the main document part. They
//! carry only what is written in the XML; nothing is inherited yet.

mod document;
mod numbering;
mod properties;
mod styles;

pub use document::{
    RawBlock, RawCell, RawDocument, RawParagraph, RawRow, RawRun, RawTable, VerticalMerge,
};
pub use numbering::{
    AbstractNumbering, LevelOverride, LevelSuffix, NumberFormat, NumberingInstance,
    NumberingLevel, NumberingSheet, MAX_LEVEL,
};
pub use properties::{ParagraphProperties, RunProperties};
pub use styles::{DocDefaults, Style, StyleKind, StyleSheet};

use crate::container::{rel_types, DocxPackage, Relationships};
use crate::error::Result;
use crate::model::ResolvedDocument;
use crate::resolve::{resolve_document, ResolveOptions};

/// Reader for `.docx` packages.
///
/// Styles and numbering are parsed when the reader is created; the document
/// body is parsed on demand.
pub struct DocxReader {
    package: DocxPackage,
    styles: StyleSheet,
    numbering: NumberingSheet,
    relationships: Relationships,
}

impl DocxReader {
    /// Open a DOCX file.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let package = DocxPackage::open(path)?;
        Self::from_package(package)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let package = DocxPackage::from_bytes(data)?;
        Self::from_package(package)
    }

    /// Create a reader from an opened package.
    pub fn from_package(package: DocxPackage) -> Result<Self> {
        let relationships = package.read_relationships(package.document_path())?;

        let styles = match package.related_part(&relationships, rel_types::STYLES, "styles.xml") {
            Some(path) => StyleSheet::parse(&package.read_xml(&path)?)?,
            None => {
                log::debug!("no styles part, using an empty style sheet");
                StyleSheet::default()
            }
        };

        let numbering =
            match package.related_part(&relationships, rel_types::NUMBERING, "numbering.xml") {
                Some(path) => NumberingSheet::parse(&package.read_xml(&path)?)?,
                None => NumberingSheet::default(),
            };

        Ok(Self {
            package,
            styles,
            numbering,
            relationships,
        })
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn numbering(&self) -> &NumberingSheet {
        &self.numbering
    }

    pub fn package(&self) -> &DocxPackage {
        &self.package
    }

    /// Parse the document body without resolving anything.
    pub fn read_raw(&self) -> Result<RawDocument> {
        let xml = self.package.read_xml(self.package.document_path())?;
        RawDocument::parse(&xml, &self.relationships)
    }

    /// Parse the body and resolve it against the package's styles and
    /// numbering.
    pub fn resolve(&self, options: &ResolveOptions) -> Result<ResolvedDocument> {
        let raw = self.read_raw()?;
        Ok(resolve_document(&raw, &self.styles, &self.numbering, options))
    }
}
