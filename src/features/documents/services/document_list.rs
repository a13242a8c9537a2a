use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info, warn};

use crate::features::documents::binding::{
    ActionButton, DocumentRow, FilePicker, PendingRedraws, Redraw, TableDataSource, TableView,
};
use crate::features::documents::models::{Document, DocumentKind};
use crate::shared::constants::{OTHER_BUTTON_TITLE, ROW_DATE_FORMAT};

/// Candidate attachments plus their checkbox state.
///
/// Documents are kept most-recent-first: index 0 is the newest document at the
/// time the list was populated. Documents attached later through the "other"
/// button are appended at the end.
///
/// Redraws go straight to the bound [`TableView`] unless the list is owned by
/// a report session, where they are queued until the session lock is released.
#[derive(Default)]
pub struct DocumentList {
    docs: Vec<Document>,
    selection_state: HashMap<String, bool>,
    table_view: Option<Arc<dyn TableView>>,
    other_picker: Option<Arc<dyn FilePicker>>,
    pending_redraws: Option<Vec<Redraw>>,
}

impl DocumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from `docs`, sorted newest first. Later duplicates of a
    /// filename are dropped so every filename maps to one selection entry.
    pub fn with_documents(mut docs: Vec<Document>) -> Self {
        docs.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

        let mut seen = HashSet::new();
        docs.retain(|doc| seen.insert(doc.filename.clone()));

        Self {
            docs,
            ..Self::default()
        }
    }

    pub fn docs(&self) -> &[Document] {
        &self.docs
    }

    pub fn selection_state(&self) -> &HashMap<String, bool> {
        &self.selection_state
    }

    pub fn is_selected(&self, filename: &str) -> bool {
        self.selection_state.get(filename).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Bind the widget that renders this list
    pub fn set_table_view(&mut self, table_view: Arc<dyn TableView>) {
        self.table_view = Some(table_view);
        self.redraw(Redraw::All);
    }

    /// Select the newest document and clear every other flag
    pub fn select_most_recent_document(&mut self) {
        let Some(most_recent) = self.docs.first() else {
            return;
        };
        let most_recent = most_recent.filename.clone();

        for doc in &self.docs {
            self.selection_state
                .insert(doc.filename.clone(), doc.filename == most_recent);
        }

        debug!("Selected most recent document: {}", most_recent);
        self.redraw(Redraw::All);
    }

    /// Filename to base64 content for every selected document.
    ///
    /// Computed fresh on each call. Unreadable documents are left out.
    pub fn documents_to_upload(&self) -> BTreeMap<String, String> {
        encode_documents(self.docs.iter().filter(|d| self.is_selected(&d.filename)))
    }

    /// Copies of the selected documents, for encoding away from the UI thread
    pub fn selected_documents(&self) -> Vec<Document> {
        self.docs
            .iter()
            .filter(|d| self.is_selected(&d.filename))
            .cloned()
            .collect()
    }

    /// Wire the "attach other file" control to `picker`.
    ///
    /// The host forwards clicks of `button` to [`DocumentList::other_button_clicked`]
    /// (or `FeedbackReporter::other_button_clicked` for an open report window).
    pub fn setup_other_button(&mut self, button: &mut dyn ActionButton, picker: Arc<dyn FilePicker>) {
        button.set_title(OTHER_BUTTON_TITLE);
        button.set_enabled(true);
        self.other_picker = Some(picker);
    }

    /// Picker wired by [`DocumentList::setup_other_button`]
    pub fn other_picker(&self) -> Option<Arc<dyn FilePicker>> {
        self.other_picker.clone()
    }

    /// Click on the "attach other file" control: ask the picker for a file and
    /// attach it. Returns true when a document was attached or re-selected.
    pub fn other_button_clicked(&mut self) -> bool {
        let Some(picker) = self.other_picker.clone() else {
            warn!("Other button clicked before it was set up");
            return false;
        };
        let Some(path) = picker.pick_file() else {
            debug!("File picker cancelled");
            return false;
        };
        self.attach_file(&path)
    }

    /// Append the file at `path` as a selected user document. A file whose
    /// name is already listed is re-selected instead.
    pub fn attach_file(&mut self, path: &Path) -> bool {
        let doc = match Document::from_path(path, DocumentKind::UserDocument) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Cannot attach '{}': {}", path.display(), e);
                return false;
            }
        };

        let filename = doc.filename.clone();
        if self.docs.iter().any(|d| d.filename == filename) {
            debug!("Document '{}' already listed, selecting it", filename);
        } else {
            self.docs.push(doc);
            info!("Attached other document: {}", filename);
        }
        self.selection_state.insert(filename, true);

        self.redraw(Redraw::All);
        true
    }

    /// Queue redraws from now on instead of sending them to the view
    pub(crate) fn defer_redraws(&mut self) {
        self.pending_redraws.get_or_insert_with(Vec::new);
    }

    /// Redraws queued since the last call, collapsed to one full reload when
    /// one was requested. `None` when there is nothing to send.
    pub fn take_redraws(&mut self) -> Option<PendingRedraws> {
        let queued = std::mem::take(self.pending_redraws.as_mut()?);
        let table_view = self.table_view.clone()?;
        if queued.is_empty() {
            return None;
        }

        let requests = if queued.contains(&Redraw::All) {
            vec![Redraw::All]
        } else {
            let mut seen = HashSet::new();
            queued
                .into_iter()
                .filter(|request| seen.insert(*request))
                .collect()
        };
        Some(PendingRedraws::new(table_view, requests))
    }

    fn redraw(&mut self, request: Redraw) {
        if let Some(pending) = &mut self.pending_redraws {
            pending.push(request);
            return;
        }
        if let Some(table_view) = &self.table_view {
            PendingRedraws::new(Arc::clone(table_view), vec![request]).send();
        }
    }
}

/// Base64-encode document contents keyed by filename, skipping unreadable ones
pub fn encode_documents<'a>(docs: impl IntoIterator<Item = &'a Document>) -> BTreeMap<String, String> {
    let mut uploads = BTreeMap::new();

    for doc in docs {
        match doc.read_content() {
            Ok(data) => {
                uploads.insert(doc.filename.clone(), STANDARD.encode(data));
            }
            Err(e) => {
                warn!("Skipping unreadable document '{}': {}", doc.filename, e);
            }
        }
    }

    uploads
}

impl TableDataSource for DocumentList {
    fn row_count(&self) -> usize {
        self.docs.len()
    }

    fn row_at(&self, row: usize) -> Option<DocumentRow> {
        let doc = self.docs.get(row)?;

        Some(DocumentRow {
            filename: doc.filename.clone(),
            modified: doc.modified_at.format(ROW_DATE_FORMAT).to_string(),
            kind: doc.kind,
            selected: self.is_selected(&doc.filename),
        })
    }

    fn toggle_row(&mut self, row: usize) {
        let Some(doc) = self.docs.get(row) else {
            debug!("Ignoring toggle for out-of-range row {}", row);
            return;
        };

        let selected = self.selection_state.entry(doc.filename.clone()).or_insert(false);
        *selected = !*selected;

        self.redraw(Redraw::Row(row));
    }
}

impl std::fmt::Debug for DocumentList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentList")
            .field("docs", &self.docs)
            .field("selection_state", &self.selection_state)
            .field("bound", &self.table_view.is_some())
            .field("other_button", &self.other_picker.is_some())
            .finish()
    }
}
