//! ZIP package access for `.docx` files.
//!
//! Reads parts and relationship files out of the archive and decodes XML
//! bytes to strings. Nothing here knows about styles or numbering.

use crate::error::{Error, Result};
use crate::xml::XmlElement;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Conventional location of the main document part.
pub const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";

/// Relationship type suffixes. Transitional and strict OOXML use different
/// namespace prefixes, so types are matched by their last path segment.
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str = "officeDocument";
    pub const STYLES: &str = "styles";
    pub const NUMBERING: &str = "numbering";
    pub const HYPERLINK: &str = "hyperlink";
}

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute) or external URL
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

impl Relationship {
    /// Last segment of the type URI.
    pub fn type_name(&self) -> &str {
        self.rel_type
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.rel_type)
    }
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Map from relationship ID to relationship data
    pub by_id: HashMap<String, Relationship>,
    /// Map from relationship type to list of relationships
    pub by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Get relationships by full type URI.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.by_type
            .get(rel_type)
            .map(|v| v.iter().collect())
            .unwrap_or_default()
    }

    /// First internal relationship whose type ends in `type_name`.
    pub fn find_by_type_name(&self, type_name: &str) -> Option<&Relationship> {
        let mut matches: Vec<&Relationship> = self
            .by_id
            .values()
            .filter(|rel| !rel.external && rel.type_name() == type_name)
            .collect();
        // HashMap order is arbitrary; keep the choice stable
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches.into_iter().next()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel.clone());
        self.by_id.insert(rel.id.clone(), rel);
    }

    /// Parse the content of a .rels part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Relationships::new();
        if xml.trim().is_empty() {
            return Ok(rels);
        }

        let root = XmlElement::parse(xml)?;
        for element in root.children_named("Relationship") {
            let Some(id) = element.attr("Id") else {
                continue;
            };
            rels.add(Relationship {
                id: id.to_string(),
                rel_type: element.attr("Type").unwrap_or_default().to_string(),
                target: element.attr("Target").unwrap_or_default().to_string(),
                external: element
                    .attr("TargetMode")
                    .is_some_and(|m| m.eq_ignore_ascii_case("external")),
            });
        }
        Ok(rels)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// Once UTF-16 XML is decoded to a Rust String the declaration still says
/// `encoding="UTF-16"`, which quick-xml would honour on the UTF-8 text.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// Parts are normally UTF-8, but some producers write UTF-16 with or
/// without a byte order mark.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::Encoding(e.to_string()));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // ASCII markup in UTF-16 has a zero byte in every pair
            let content = if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)?
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)?
            } else {
                log::debug!("part is not valid UTF-8, decoding lossily");
                return Ok(String::from_utf8_lossy(bytes).into_owned());
            };
            Ok(fix_xml_encoding_declaration(&content))
        }
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Encoding(e.to_string()))
}

/// A `.docx` package over a ZIP archive.
pub struct DocxPackage {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
    document_path: String,
}

impl DocxPackage {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docx_resolve::container::DocxPackage;
    ///
    /// let package = DocxPackage::open("document.docx")?;
    /// println!("{}", package.document_path());
    /// # Ok::<(), docx_resolve::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut package = Self {
            archive: RefCell::new(archive),
            document_path: DEFAULT_DOCUMENT_PART.to_string(),
        };
        package.document_path = package.locate_main_document()?;
        Ok(package)
    }

    /// Create a package from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Path of the main document part inside the archive.
    pub fn document_path(&self) -> &str {
        &self.document_path
    }

    fn locate_main_document(&self) -> Result<String> {
        let rels = self.read_package_relationships()?;
        if let Some(rel) = rels.find_by_type_name(rel_types::OFFICE_DOCUMENT) {
            let path = Self::resolve_path("", &rel.target);
            if self.exists(&path) {
                return Ok(path);
            }
            log::debug!("officeDocument target '{}' is missing", path);
        }
        if self.exists(DEFAULT_DOCUMENT_PART) {
            return Ok(DEFAULT_DOCUMENT_PART.to_string());
        }
        Err(Error::NotDocx(format!(
            "no main document part (expected {})",
            DEFAULT_DOCUMENT_PART
        )))
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a part as raw bytes.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// List all parts in the archive.
    pub fn list_files(&self) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .map(String::from)
            .collect()
    }

    /// Relationships of a part. A missing .rels part yields an empty set.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = if part_path.is_empty() || part_path == "/" {
            "_rels/.rels".to_string()
        } else {
            let path = Path::new(part_path);
            let parent = path.parent().unwrap_or(Path::new(""));
            let filename = path.file_name().unwrap_or_default().to_string_lossy();
            if parent.as_os_str().is_empty() {
                format!("_rels/{}.rels", filename)
            } else {
                format!("{}/_rels/{}.rels", parent.display(), filename)
            }
        };

        match self.read_xml(&rels_path) {
            Ok(content) => Relationships::parse(&content),
            Err(Error::MissingComponent(_)) => Ok(Relationships::new()),
            Err(e) => Err(e),
        }
    }

    /// Package-level relationships (`_rels/.rels`).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.read_relationships("")
    }

    /// Path of a part related to the main document by relationship type,
    /// falling back to `word/<fallback_name>`.
    pub fn related_part(
        &self,
        document_rels: &Relationships,
        type_name: &str,
        fallback_name: &str,
    ) -> Option<String> {
        if let Some(rel) = document_rels.find_by_type_name(type_name) {
            let path = Self::resolve_path(&self.document_path, &rel.target);
            if self.exists(&path) {
                return Some(path);
            }
        }
        let fallback = Self::resolve_path(&self.document_path, fallback_name);
        self.exists(&fallback).then_some(fallback)
    }

    /// Resolve a relationship target against the part that owns it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for DocxPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocxPackage")
            .field("document_path", &self.document_path)
            .field("files", &self.list_files().len())
            .finish()
    }
}
