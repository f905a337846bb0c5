use std::fs;
use std::path::{Path, PathBuf};

use relative_path::RelativePathBuf;

use crate::models::HelpDocument;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Docs folder not found: {0}")]
    MissingRoot(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies the documents a session works with.
///
/// The session depends only on this enumeration capability; where the
/// documents actually live is the implementor's business.
pub trait DocumentSource {
    fn load(&self) -> Result<Vec<HelpDocument>, SourceError>;
}

/// Loads `*.md` files from the top level of one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirectorySource {
    /// Scans the docs folder (top level only, no recursion) and
    /// returns its markdown files ordered case-insensitively by
    /// source id.
    fn load(&self) -> Result<Vec<HelpDocument>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::MissingRoot(self.root.clone()));
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_dir() {
                continue;
            }
            let Some(ext) = path.extension() else {
                continue;
            };
            if ext != "md" {
                continue;
            }

            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let raw_text = fs::read_to_string(&path)?;
            documents.push(HelpDocument::new(RelativePathBuf::from(file_name), raw_text));
        }

        documents.sort_by_key(|doc| doc.source_id().as_str().to_lowercase());
        Ok(documents)
    }
}
