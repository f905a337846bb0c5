use relative_path::{RelativePath, RelativePathBuf};

use crate::text::contains_ci;

/// One loaded help document: stable source identity, display title,
/// and the raw markdown it was loaded with. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpDocument {
    source_id: RelativePathBuf,
    title: String,
    raw_text: String,
}

impl HelpDocument {
    /// Creates a document, deriving the display title from the source
    /// file name.
    pub fn new(source_id: RelativePathBuf, raw_text: String) -> Self {
        let title = Self::derive_title(&source_id);
        Self {
            source_id,
            title,
            raw_text,
        }
    }

    /// Convenience constructor from a relative path string.
    pub fn from_parts(source_id: &str, raw_text: &str) -> Self {
        Self::new(RelativePathBuf::from(source_id), raw_text.to_string())
    }

    /// Stable identifier of the document within its source.
    pub fn source_id(&self) -> &RelativePath {
        &self.source_id
    }

    /// Display title shown in document lists.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The raw markdown this document was loaded with.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Whether the document matches a search query: case-insensitive
    /// containment against the title or the raw text.
    pub fn matches(&self, query: &str) -> bool {
        contains_ci(&self.title, query) || contains_ci(&self.raw_text, query)
    }

    /// Turns a file name into a display title: the `.md` extension is
    /// stripped and underscores become spaces.
    fn derive_title(source_id: &RelativePath) -> String {
        source_id
            .file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .replace('_', " ")
            .trim()
            .to_string()
    }
}
