use std::collections::BTreeMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::features::documents::{DocumentList, TableDataSource};
use crate::features::reporter::models::ReportKind;
use crate::features::reporter::presenter::SessionSummary;

/// State of one open report window.
///
/// Delegate results are frozen in when the session is built, so later
/// delegate changes do not affect a window that is already showing.
#[derive(Debug)]
pub struct ReportSession {
    id: Uuid,
    kind: ReportKind,
    title: String,
    report_text: Option<String>,
    target_url: String,
    custom_parameters: BTreeMap<String, String>,
    preferences: Map<String, Value>,
    documents: DocumentList,
    email: Option<String>,
    last_error: Option<String>,
    submitting: bool,
}

pub(crate) struct SessionParts {
    pub kind: ReportKind,
    pub title: String,
    pub report_text: Option<String>,
    pub target_url: String,
    pub custom_parameters: BTreeMap<String, String>,
    pub preferences: Map<String, Value>,
    pub documents: DocumentList,
    pub email: Option<String>,
}

impl ReportSession {
    pub(crate) fn new(parts: SessionParts) -> Self {
        let mut documents = parts.documents;
        documents.defer_redraws();

        Self {
            id: Uuid::new_v4(),
            kind: parts.kind,
            title: parts.title,
            report_text: parts.report_text,
            target_url: parts.target_url,
            custom_parameters: parts.custom_parameters,
            preferences: parts.preferences,
            documents,
            email: parts.email,
            last_error: None,
            submitting: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn report_text(&self) -> Option<&str> {
        self.report_text.as_deref()
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn custom_parameters(&self) -> &BTreeMap<String, String> {
        &self.custom_parameters
    }

    /// Preference snapshot after anonymization
    pub fn preferences(&self) -> &Map<String, Value> {
        &self.preferences
    }

    pub fn documents(&self) -> &DocumentList {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentList {
        &mut self.documents
    }

    /// Pre-filled contact address
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Error of the last failed submission, shown inside the window
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn begin_submission(&mut self) {
        self.submitting = true;
        self.last_error = None;
    }

    pub(crate) fn fail_submission(&mut self, message: String) {
        self.submitting = false;
        self.last_error = Some(message);
    }

    pub fn summary(&self) -> SessionSummary {
        let rows = (0..self.documents.row_count())
            .filter_map(|row| self.documents.row_at(row))
            .collect();

        SessionSummary {
            session_id: self.id,
            kind: self.kind,
            title: self.title.clone(),
            heading: self.kind.heading().to_string(),
            report_text: self.report_text.clone(),
            email: self.email.clone(),
            rows,
        }
    }
}
