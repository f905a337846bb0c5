pub mod document;

pub use document::HelpDocument;
