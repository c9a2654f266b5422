//! Rendering options configuration.

/// Options for rendering resolved documents.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Add blank line between paragraphs (text)
    pub paragraph_spacing: bool,

    /// Include empty paragraphs in output
    pub include_empty_paragraphs: bool,

    /// Indent list items two spaces per level (text)
    pub indent_lists: bool,

    /// Emit inline CSS for run and paragraph properties (HTML)
    pub inline_styles: bool,

    /// Wrap the fragment in a complete HTML document (HTML)
    pub full_document: bool,

    /// Normalize text to Unicode NFC
    pub normalize_unicode: bool,

    /// What a tab becomes in text output
    pub tab: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            paragraph_spacing: true,
            include_empty_paragraphs: false,
            indent_lists: true,
            inline_styles: true,
            full_document: false,
            normalize_unicode: false,
            tab: "\t".to_string(),
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paragraph_spacing(mut self, spacing: bool) -> Self {
        self.paragraph_spacing = spacing;
        self
    }

    pub fn with_empty_paragraphs(mut self, include: bool) -> Self {
        self.include_empty_paragraphs = include;
        self
    }

    pub fn with_indent_lists(mut self, indent: bool) -> Self {
        self.indent_lists = indent;
        self
    }

    /// Enable or disable inline CSS.
    pub fn with_inline_styles(mut self, inline: bool) -> Self {
        self.inline_styles = inline;
        self
    }

    /// Produce a standalone HTML page instead of a fragment.
    pub fn with_full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    pub fn with_normalize_unicode(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Set the tab replacement for text output.
    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = tab.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RenderOptions::default();
        assert!(opts.paragraph_spacing);
        assert!(!opts.include_empty_paragraphs);
        assert!(opts.inline_styles);
        assert!(!opts.full_document);
        assert_eq!(opts.tab, "\t");
    }

    #[test]
    fn test_builder_pattern() {
        let opts = RenderOptions::new()
            .with_full_document(true)
            .with_inline_styles(false)
            .with_tab("    ")
            .with_normalize_unicode(true);

        assert!(opts.full_document);
        assert!(!opts.inline_styles);
        assert_eq!(opts.tab, "    ");
        assert!(opts.normalize_unicode);
    }
}
