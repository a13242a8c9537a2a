mod document_list;

pub use document_list::{encode_documents, DocumentList};
