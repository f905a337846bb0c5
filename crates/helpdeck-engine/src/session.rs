//! Document session: the state driving a help-document viewer.
//!
//! Owns the loaded documents, the search query, the selection, and the
//! currently rendered tree. Every transition is a synchronous,
//! complete recomputation: a query change re-filters, fixes the
//! selection, and re-renders before the call returns. There is no
//! background work and no event plumbing - sinks call the transition
//! methods and read the updated state back.
//!
//! Collaborators come in through the constructor: a [`DocumentSource`]
//! borrowed once at load time, and a [`Clipboard`] the session owns
//! for copy-code actions.

use crate::io::DocumentSource;
use crate::models::HelpDocument;
use crate::parsing::blocks::{Block, parse_blocks};
use crate::parsing::inline::{InlineRun, format_inline};
use crate::render::{RenderedDocument, build_document};

/// Receives the raw text of a copied code block, verbatim.
pub trait Clipboard {
    fn set_text(&mut self, text: &str);
}

/// A clipboard that discards everything. For sinks that do not offer
/// a copy affordance.
#[derive(Debug, Default)]
pub struct NullClipboard;

impl Clipboard for NullClipboard {
    fn set_text(&mut self, _text: &str) {}
}

pub struct DocumentSession {
    documents: Vec<HelpDocument>,
    /// Indices into `documents`, always a subsequence in original order.
    filtered: Vec<usize>,
    /// Index into `documents`; when present, always a member of `filtered`.
    selected: Option<usize>,
    search_query: String,
    sections_expanded: bool,
    rendered: Option<RenderedDocument>,
    status: String,
    clipboard: Box<dyn Clipboard>,
}

impl DocumentSession {
    /// Loads documents from the source once and selects the first one,
    /// if any. A source failure leaves the session with an empty
    /// document set and the failure text as status; it never
    /// propagates.
    pub fn new(source: &dyn DocumentSource, clipboard: Box<dyn Clipboard>) -> Self {
        let (documents, status) = match source.load() {
            Ok(documents) => {
                log::info!("help documents loaded: {}", documents.len());
                let status = format!("{} document(s) loaded.", documents.len());
                (documents, status)
            }
            Err(err) => {
                log::warn!("help documents unavailable: {err}");
                (Vec::new(), err.to_string())
            }
        };

        let mut session = Self {
            filtered: (0..documents.len()).collect(),
            documents,
            selected: None,
            search_query: String::new(),
            sections_expanded: true,
            rendered: None,
            status,
            clipboard,
        };

        if let Some(&first) = session.filtered.first() {
            session.selected = Some(first);
            session.render_selected();
        }

        session
    }

    /// Changes the search query, re-filters, fixes the selection, and
    /// re-renders. Filtering matches the trimmed query against each
    /// document's title or raw text; highlighting uses the query as
    /// written.
    pub fn set_query(&mut self, query: &str) {
        if self.search_query == query {
            return;
        }
        self.search_query = query.to_string();
        self.apply_filter();
        self.render_selected();
    }

    /// Selects a document by its position in the filtered list and
    /// re-renders. Out-of-range positions and re-selecting the current
    /// document are no-ops.
    pub fn select(&mut self, filtered_index: usize) {
        let Some(&document_index) = self.filtered.get(filtered_index) else {
            return;
        };
        if self.selected == Some(document_index) {
            return;
        }
        self.selected = Some(document_index);
        self.render_selected();
    }

    /// Flips the global expansion flag and applies it to every section
    /// of the current tree. Without a rendered document this does
    /// nothing.
    pub fn toggle_sections(&mut self) {
        let Some(rendered) = self.rendered.as_mut() else {
            return;
        };
        self.sections_expanded = !self.sections_expanded;
        rendered.set_sections_expanded(self.sections_expanded);
    }

    /// Hands a code block's raw text to the clipboard collaborator,
    /// verbatim. Blank text is ignored.
    pub fn copy_code(&mut self, code: &str) {
        if code.trim().is_empty() {
            return;
        }
        self.clipboard.set_text(code);
        log::info!("code block copied to clipboard");
    }

    /// Inline runs for one leaf block under the current query, or
    /// `None` for blocks that render raw.
    pub fn runs_for(&self, block: &Block) -> Option<Vec<InlineRun>> {
        block
            .inline_text()
            .map(|text| format_inline(&text, &self.search_query))
    }

    pub fn documents(&self) -> &[HelpDocument] {
        &self.documents
    }

    /// The filtered documents, in original load order.
    pub fn filtered_documents(&self) -> impl Iterator<Item = &HelpDocument> {
        self.filtered.iter().map(|&index| &self.documents[index])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn selected_document(&self) -> Option<&HelpDocument> {
        self.selected.map(|index| &self.documents[index])
    }

    /// Position of the selected document within the filtered list.
    pub fn selected_filtered_index(&self) -> Option<usize> {
        let selected = self.selected?;
        self.filtered.iter().position(|&index| index == selected)
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn rendered(&self) -> Option<&RenderedDocument> {
        self.rendered.as_ref()
    }

    pub fn sections_expanded(&self) -> bool {
        self.sections_expanded
    }

    /// Label for the expand/collapse-all affordance.
    pub fn expand_collapse_label(&self) -> &'static str {
        if self.sections_expanded {
            "Collapse All"
        } else {
            "Expand All"
        }
    }

    /// Status line: load result, selection state, or the selected
    /// document's title.
    pub fn status_text(&self) -> &str {
        &self.status
    }

    fn apply_filter(&mut self) {
        let query = self.search_query.trim();
        self.filtered = self
            .documents
            .iter()
            .enumerate()
            .filter(|(_, document)| query.is_empty() || document.matches(query))
            .map(|(index, _)| index)
            .collect();

        if let Some(selected) = self.selected
            && !self.filtered.contains(&selected)
        {
            self.selected = None;
        }
        if self.selected.is_none()
            && let Some(&first) = self.filtered.first()
        {
            self.selected = Some(first);
        }
    }

    fn render_selected(&mut self) {
        let Some(index) = self.selected else {
            self.rendered = None;
            self.status = "No document selected.".to_string();
            return;
        };

        let document = &self.documents[index];
        self.rendered = Some(build_document(parse_blocks(document.raw_text())));
        // New content always opens fully expanded.
        self.sections_expanded = true;
        self.status = document.title().to_string();
    }
}
