//! Seams between the document list and the host's widgets.
//!
//! The list is the data authority. Widgets only render what they read through
//! [`TableDataSource`] and are told to redraw through [`TableView`].

use std::path::PathBuf;
use std::sync::Arc;

use super::models::DocumentKind;

/// Display fields of one table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub filename: String,
    pub modified: String,
    pub kind: DocumentKind,
    pub selected: bool,
}

/// Row-oriented access used by the table widget
pub trait TableDataSource {
    fn row_count(&self) -> usize;

    fn row_at(&self, row: usize) -> Option<DocumentRow>;

    /// Checkbox clicked at `row`
    fn toggle_row(&mut self, row: usize);
}

/// Redraw requests sent to the table widget
pub trait TableView: Send + Sync {
    fn reload_data(&self);

    fn reload_row(&self, row: usize);
}

/// One queued redraw request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Redraw {
    All,
    Row(usize),
}

/// Redraws collected while the list was borrowed, sent once the borrow ends.
///
/// A view may read rows back from the list while handling these, so they must
/// only be sent after every lock guarding the list has been released.
pub struct PendingRedraws {
    table_view: Arc<dyn TableView>,
    requests: Vec<Redraw>,
}

impl PendingRedraws {
    pub(crate) fn new(table_view: Arc<dyn TableView>, requests: Vec<Redraw>) -> Self {
        Self {
            table_view,
            requests,
        }
    }

    pub fn requests(&self) -> &[Redraw] {
        &self.requests
    }

    pub fn send(self) {
        for request in self.requests {
            match request {
                Redraw::All => self.table_view.reload_data(),
                Redraw::Row(row) => self.table_view.reload_row(row),
            }
        }
    }
}

impl std::fmt::Debug for PendingRedraws {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRedraws")
            .field("requests", &self.requests)
            .finish()
    }
}

/// The "attach other file" control
pub trait ActionButton {
    fn set_title(&mut self, title: &str);

    fn set_enabled(&mut self, enabled: bool);
}

/// Platform open-file dialog; `None` when the user cancels
pub trait FilePicker: Send + Sync {
    fn pick_file(&self) -> Option<PathBuf>;
}
