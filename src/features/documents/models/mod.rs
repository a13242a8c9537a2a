mod document;

pub use document::{Document, DocumentContent, DocumentKind};
