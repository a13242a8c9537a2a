//! Attachment picker: candidate documents and their selection state.

pub mod binding;
pub mod models;
pub mod services;
pub mod sources;

pub use binding::{
    ActionButton, DocumentRow, FilePicker, PendingRedraws, Redraw, TableDataSource, TableView,
};
pub use models::{Document, DocumentContent, DocumentKind};
pub use services::{encode_documents, DocumentList};
pub use sources::{DocumentSource, StaticDocumentSource};
