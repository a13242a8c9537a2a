use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::core::error::{ReporterError, Result};
use crate::features::crash_logs::CrashLogSource;
use crate::features::documents::{ActionButton, Document, DocumentKind, FilePicker, TableView};
use crate::features::reporter::dtos::ReportPayload;
use crate::features::reporter::presenter::{ReportPresenter, SessionSummary};
use crate::features::reporter::services::SubmissionOutcome;
use crate::modules::submission::{ReportSubmitter, SubmissionReceipt};

pub fn doc_at(name: &str, modified_at: DateTime<Utc>, data: &[u8]) -> Document {
    Document::in_memory(name, modified_at, DocumentKind::CrashLog, data.to_vec())
}

pub fn set_modified(path: &Path, at: DateTime<Utc>) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::from(at)).unwrap();
}

#[derive(Default)]
pub struct RecordingTableView {
    full_reloads: Mutex<usize>,
    rows: Mutex<Vec<usize>>,
}

impl RecordingTableView {
    pub fn full_reloads(&self) -> usize {
        *self.full_reloads.lock().unwrap()
    }

    pub fn reloaded_rows(&self) -> Vec<usize> {
        self.rows.lock().unwrap().clone()
    }
}

impl TableView for RecordingTableView {
    fn reload_data(&self) {
        *self.full_reloads.lock().unwrap() += 1;
    }

    fn reload_row(&self, row: usize) {
        self.rows.lock().unwrap().push(row);
    }
}

#[derive(Default)]
pub struct RecordingButton {
    pub title: Option<String>,
    pub enabled: bool,
}

impl ActionButton for RecordingButton {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

pub struct StubPicker(pub Option<PathBuf>);

impl FilePicker for StubPicker {
    fn pick_file(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

pub struct RecordingPresenter {
    accept: bool,
    presented: Mutex<Vec<SessionSummary>>,
    finished: Mutex<Vec<(Uuid, SubmissionOutcome)>>,
}

impl RecordingPresenter {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            accept: true,
            presented: Mutex::new(Vec::new()),
            finished: Mutex::new(Vec::new()),
        })
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self {
            accept: false,
            presented: Mutex::new(Vec::new()),
            finished: Mutex::new(Vec::new()),
        })
    }

    pub fn presented(&self) -> Vec<SessionSummary> {
        self.presented.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<(Uuid, SubmissionOutcome)> {
        self.finished.lock().unwrap().clone()
    }
}

impl ReportPresenter for RecordingPresenter {
    fn present(&self, session: &SessionSummary) -> bool {
        self.presented.lock().unwrap().push(session.clone());
        self.accept
    }

    fn submission_finished(&self, session_id: Uuid, outcome: &SubmissionOutcome) {
        self.finished
            .lock()
            .unwrap()
            .push((session_id, outcome.clone()));
    }
}

/// In-memory crash logs filtered by modification time
#[derive(Default)]
pub struct FakeCrashLogSource {
    logs: Mutex<Vec<Document>>,
    fail: bool,
}

impl FakeCrashLogSource {
    pub fn with_logs(logs: Vec<Document>) -> Arc<Self> {
        Arc::new(Self {
            logs: Mutex::new(logs),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            logs: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn push(&self, doc: Document) {
        self.logs.lock().unwrap().push(doc);
    }
}

impl CrashLogSource for FakeCrashLogSource {
    fn crash_logs_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Document>> {
        if self.fail {
            return Err(ReporterError::Internal("scan failed".to_string()));
        }
        let mut logs: Vec<_> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|d| since.map_or(true, |t| d.modified_at > t))
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(logs)
    }
}

/// Records payloads; fails the first `failures` calls, optionally waits on a gate
#[derive(Default)]
pub struct StubSubmitter {
    payloads: Mutex<Vec<(String, ReportPayload)>>,
    failures: Mutex<usize>,
    gate: Option<Arc<Notify>>,
}

impl StubSubmitter {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_times(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures: Mutex::new(failures),
            ..Default::default()
        })
    }

    pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            gate: Some(gate),
            ..Default::default()
        })
    }

    pub fn payloads(&self) -> Vec<(String, ReportPayload)> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSubmitter for StubSubmitter {
    async fn submit(&self, target_url: &str, payload: &ReportPayload) -> Result<SubmissionReceipt> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.payloads
            .lock()
            .unwrap()
            .push((target_url.to_string(), payload.clone()));

        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(ReporterError::ExternalServiceError(
                "connection refused".to_string(),
            ));
        }

        Ok(SubmissionReceipt {
            status: 200,
            message: Some("thanks".to_string()),
        })
    }
}
