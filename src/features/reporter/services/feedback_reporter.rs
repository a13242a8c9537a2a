use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::core::config::Config;
use crate::core::error::{ReporterError, Result};
use crate::features::crash_logs::{crash_report_text, CrashLogSource, DirectoryCrashLogSource};
use crate::features::documents::{
    encode_documents, Document, DocumentList, DocumentSource, StaticDocumentSource,
};
use crate::features::reporter::delegate::{DefaultDelegate, FeedbackReporterDelegate};
use crate::features::reporter::dtos::{sanitize_custom_parameters, ReportForm, ReportPayload};
use crate::features::reporter::models::{ExceptionReport, ReportKind, ReporterStatus};
use crate::features::reporter::presenter::{ReportPresenter, SessionSummary};
use crate::features::reporter::services::session::{ReportSession, SessionParts};
use crate::modules::preferences::{JsonFilePreferenceStore, PreferenceStore};
use crate::modules::submission::{HttpReportSubmitter, ReportSubmitter, SubmissionReceipt};
use crate::shared::constants::{LAST_CRASH_CHECK_KEY, LAST_EMAIL_KEY, REPORTER_KEY_PREFIX};
use crate::shared::system_profile::SystemProfile;

/// Result of [`FeedbackReporter::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The endpoint accepted the report and the window is closed
    Submitted(SubmissionReceipt),
    /// The window stays open showing this message; the user may retry or cancel
    Failed(String),
    /// The window was closed while the upload was running, result ignored
    Discarded,
    /// No report window is open
    NotDisplaying,
    /// An upload for the open window is already running
    AlreadySubmitting,
}

enum ReporterState {
    Idle,
    Preparing,
    Displaying(Box<ReportSession>),
}

/// Entry point for every report flow.
///
/// Only one report window exists at a time: every `report_*` call made while a
/// window is being prepared or shown returns false and leaves it untouched.
pub struct FeedbackReporter {
    config: Config,
    delegate: Arc<dyn FeedbackReporterDelegate>,
    presenter: Arc<dyn ReportPresenter>,
    crash_logs: Arc<dyn CrashLogSource>,
    document_source: Arc<dyn DocumentSource>,
    preferences: Arc<dyn PreferenceStore>,
    submitter: Arc<dyn ReportSubmitter>,
    system_profile: SystemProfile,
    state: Mutex<ReporterState>,
}

impl FeedbackReporter {
    pub fn builder(config: Config, presenter: Arc<dyn ReportPresenter>) -> FeedbackReporterBuilder {
        FeedbackReporterBuilder::new(config, presenter)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> ReporterStatus {
        match &*self.lock_state() {
            ReporterState::Idle => ReporterStatus::Idle,
            ReporterState::Preparing => ReporterStatus::Preparing,
            ReporterState::Displaying(session) => ReporterStatus::Displaying {
                session_id: session.id(),
                kind: session.kind(),
                submitting: session.is_submitting(),
            },
        }
    }

    /// Summary of the open window, if any
    pub fn current_session(&self) -> Option<SessionSummary> {
        match &*self.lock_state() {
            ReporterState::Displaying(session) => Some(session.summary()),
            _ => None,
        }
    }

    /// Run `f` against the open session, e.g. to forward row toggles.
    ///
    /// `f` itself must not call back into the reporter. Table redraws caused
    /// by `f` are sent to the bound view after the session lock is released,
    /// so the view may read rows back through the reporter.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut ReportSession) -> R) -> Option<R> {
        let (result, redraws) = {
            let mut state = self.lock_state();
            let ReporterState::Displaying(session) = &mut *state else {
                return None;
            };
            let result = f(session);
            (result, session.documents_mut().take_redraws())
        };

        if let Some(redraws) = redraws {
            redraws.send();
        }
        Some(result)
    }

    /// Click on the open window's "attach other file" control.
    ///
    /// The picker runs without holding the session lock. Returns true when a
    /// document was attached or re-selected.
    pub fn other_button_clicked(&self) -> bool {
        let Some(picker) = self.with_session(|s| s.documents().other_picker()).flatten() else {
            debug!("Other button clicked without a wired report window");
            return false;
        };
        let Some(path) = picker.pick_file() else {
            debug!("File picker cancelled");
            return false;
        };

        self.with_session(|s| s.documents_mut().attach_file(&path))
            .unwrap_or_else(|| {
                debug!("Report window closed while picking a file");
                false
            })
    }

    /// Show the general feedback window
    pub fn report_feedback(&self) -> bool {
        if !self.try_reserve(ReportKind::Feedback) {
            return false;
        }
        self.open_session(ReportKind::Feedback, None, self.user_documents())
    }

    /// Show the crash window when crash logs appeared since the last check.
    ///
    /// The check time is persisted as soon as the scan completes, before the
    /// user closes the window, so the same logs never prompt twice.
    pub async fn report_if_crash(&self) -> bool {
        if !self.try_reserve(ReportKind::Crash) {
            return false;
        }

        let since = self.preferences.get_timestamp(LAST_CRASH_CHECK_KEY);
        let checked_at = Utc::now();

        let source = Arc::clone(&self.crash_logs);
        let scan = tokio::task::spawn_blocking(move || -> Result<(Vec<Document>, String)> {
            let logs = source.crash_logs_since(since)?;
            let text = crash_report_text(&logs);
            Ok((logs, text))
        })
        .await;

        let (logs, text) = match scan {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                warn!("Crash log scan failed: {}", e);
                self.release();
                return false;
            }
            Err(e) => {
                error!("Crash log scan task failed: {}", e);
                self.release();
                return false;
            }
        };

        if let Err(e) = self.preferences.set_timestamp(LAST_CRASH_CHECK_KEY, checked_at) {
            warn!("Could not persist last crash check time: {}", e);
        }

        if logs.is_empty() {
            debug!("No crash logs since {:?}", since);
            self.release();
            return false;
        }

        info!("Found {} new crash logs", logs.len());

        let mut documents = DocumentList::with_documents(logs);
        documents.select_most_recent_document();
        self.open_session(ReportKind::Crash, Some(text), documents)
    }

    /// Show the crash window with `crash_log_text`, ignoring the last check time
    pub fn report_crash(&self, crash_log_text: &str) -> bool {
        if crash_log_text.trim().is_empty() {
            debug!("Refusing crash report without crash text");
            return false;
        }
        if !self.try_reserve(ReportKind::Crash) {
            return false;
        }
        self.open_session(
            ReportKind::Crash,
            Some(crash_log_text.to_string()),
            self.user_documents(),
        )
    }

    /// Show the exception window for `exception`
    pub fn report_exception(&self, exception: Option<&ExceptionReport>) -> bool {
        let Some(exception) = exception else {
            warn!("Refusing exception report without an exception");
            return false;
        };
        if !self.try_reserve(ReportKind::Exception) {
            return false;
        }
        self.open_session(
            ReportKind::Exception,
            Some(exception.description()),
            self.user_documents(),
        )
    }

    /// Show the support request window
    pub fn report_support_need(&self) -> bool {
        if !self.try_reserve(ReportKind::SupportNeed) {
            return false;
        }
        self.open_session(ReportKind::SupportNeed, None, self.user_documents())
    }

    /// Upload the open report.
    ///
    /// Document contents are read and encoded on the blocking pool, then the
    /// payload is posted. The presenter is told about the outcome unless the
    /// window was closed in the meantime.
    pub async fn submit(&self, form: ReportForm) -> SubmissionOutcome {
        let form = form.normalized();
        let email = form.email.clone();

        let prepared = {
            let mut state = self.lock_state();
            let ReporterState::Displaying(session) = &mut *state else {
                debug!("Submit without an open report window");
                return SubmissionOutcome::NotDisplaying;
            };

            if session.is_submitting() {
                debug!("Submission already running for session {}", session.id());
                return SubmissionOutcome::AlreadySubmitting;
            }

            if let Err(e) = form.validate() {
                let message = ReporterError::Validation(e.to_string()).user_message();
                session.fail_submission(message.clone());
                let outcome = SubmissionOutcome::Failed(message);
                let session_id = session.id();
                drop(state);
                self.presenter.submission_finished(session_id, &outcome);
                return outcome;
            }

            session.begin_submission();
            (
                session.id(),
                session.target_url().to_string(),
                self.build_payload(session, &form, email.clone()),
                session.documents().selected_documents(),
            )
        };
        let (session_id, target_url, payload, selected) = prepared;

        info!(
            "Submitting {} report (session {}, {} documents)",
            payload.report_type,
            session_id,
            selected.len()
        );

        let result = self.deliver(&target_url, payload, selected).await;
        let outcome = self.finish_submission(session_id, email, result);

        if outcome != SubmissionOutcome::Discarded {
            self.presenter.submission_finished(session_id, &outcome);
        }
        outcome
    }

    /// The user closed the window. Any running upload result is discarded.
    pub fn cancel(&self) -> bool {
        let mut state = self.lock_state();
        match &*state {
            ReporterState::Displaying(session) => {
                info!("Report window {} cancelled", session.id());
                *state = ReporterState::Idle;
                true
            }
            _ => false,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ReporterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Idle -> Preparing, false when another window is in progress
    fn try_reserve(&self, kind: ReportKind) -> bool {
        let mut state = self.lock_state();
        if matches!(*state, ReporterState::Idle) {
            *state = ReporterState::Preparing;
            true
        } else {
            debug!("Ignoring {} report request, a report window is already open", kind);
            false
        }
    }

    /// Preparing -> Idle
    fn release(&self) {
        let mut state = self.lock_state();
        if matches!(*state, ReporterState::Preparing) {
            *state = ReporterState::Idle;
        }
    }

    fn user_documents(&self) -> DocumentList {
        match self.document_source.documents() {
            Ok(docs) => DocumentList::with_documents(docs),
            Err(e) => {
                warn!("Could not list documents for attachment: {}", e);
                DocumentList::new()
            }
        }
    }

    /// Preferences offered to the delegate, without the reporter's own keys
    fn user_preferences(&self) -> Map<String, Value> {
        self.preferences
            .snapshot()
            .into_iter()
            .filter(|(key, _)| !key.starts_with(REPORTER_KEY_PREFIX))
            .collect()
    }

    fn build_session(
        &self,
        kind: ReportKind,
        report_text: Option<String>,
        documents: DocumentList,
    ) -> ReportSession {
        let title = self
            .delegate
            .display_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.config.app.name.clone());

        let target_url = self
            .delegate
            .target_url()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.config.submission.target_url.clone());

        let custom_parameters = sanitize_custom_parameters(self.delegate.custom_parameters());
        let preferences = self.delegate.anonymize_preferences(self.user_preferences());
        let email = self.preferences.get_string(LAST_EMAIL_KEY);

        ReportSession::new(SessionParts {
            kind,
            title,
            report_text,
            target_url,
            custom_parameters,
            preferences,
            documents,
            email,
        })
    }

    /// Preparing -> Displaying, then ask the presenter to show the window
    fn open_session(
        &self,
        kind: ReportKind,
        report_text: Option<String>,
        documents: DocumentList,
    ) -> bool {
        let session = self.build_session(kind, report_text, documents);
        let session_id = session.id();
        let summary = session.summary();

        {
            let mut state = self.lock_state();
            if !matches!(*state, ReporterState::Preparing) {
                warn!("Report state changed while preparing {} window", kind);
                return false;
            }
            *state = ReporterState::Displaying(Box::new(session));
        }

        if self.presenter.present(&summary) {
            info!("Displaying {} report window {}", kind, session_id);
            return true;
        }

        warn!("Presenter declined to show {} report window", kind);
        let mut state = self.lock_state();
        if matches!(&*state, ReporterState::Displaying(s) if s.id() == session_id) {
            *state = ReporterState::Idle;
        }
        false
    }

    fn build_payload(
        &self,
        session: &ReportSession,
        form: &ReportForm,
        email: Option<String>,
    ) -> ReportPayload {
        ReportPayload {
            report_type: session.kind(),
            title: session.title().to_string(),
            report_text: session.report_text().map(str::to_string),
            comment: form.comment.clone(),
            email,
            system: self.system_profile.clone(),
            preferences: session.preferences().clone(),
            documents: BTreeMap::new(),
            submitted_at: Utc::now(),
            custom_parameters: session.custom_parameters().clone(),
        }
    }

    async fn deliver(
        &self,
        target_url: &str,
        mut payload: ReportPayload,
        selected: Vec<Document>,
    ) -> Result<SubmissionReceipt> {
        payload.documents = tokio::task::spawn_blocking(move || encode_documents(&selected))
            .await
            .map_err(|e| ReporterError::Internal(format!("Document encoding task failed: {}", e)))?;

        self.submitter.submit(target_url, &payload).await
    }

    fn finish_submission(
        &self,
        session_id: Uuid,
        email: Option<String>,
        result: Result<SubmissionReceipt>,
    ) -> SubmissionOutcome {
        let mut state = self.lock_state();
        if !matches!(&*state, ReporterState::Displaying(s) if s.id() == session_id) {
            info!("Discarding submission result for closed session {}", session_id);
            return SubmissionOutcome::Discarded;
        }

        match result {
            Ok(receipt) => {
                *state = ReporterState::Idle;
                drop(state);

                if let Some(email) = email {
                    if let Err(e) = self.preferences.set(LAST_EMAIL_KEY, Value::String(email)) {
                        warn!("Could not remember e-mail address: {}", e);
                    }
                }

                info!("Report session {} submitted", session_id);
                SubmissionOutcome::Submitted(receipt)
            }
            Err(e) => {
                let message = e.user_message();
                if let ReporterState::Displaying(session) = &mut *state {
                    session.fail_submission(message.clone());
                }
                warn!("Report session {} failed to submit: {}", session_id, e);
                SubmissionOutcome::Failed(message)
            }
        }
    }
}

/// Wires a [`FeedbackReporter`] to its collaborators. Anything not supplied
/// falls back to the implementation derived from the [`Config`].
pub struct FeedbackReporterBuilder {
    config: Config,
    presenter: Arc<dyn ReportPresenter>,
    delegate: Option<Arc<dyn FeedbackReporterDelegate>>,
    crash_logs: Option<Arc<dyn CrashLogSource>>,
    document_source: Option<Arc<dyn DocumentSource>>,
    preferences: Option<Arc<dyn PreferenceStore>>,
    submitter: Option<Arc<dyn ReportSubmitter>>,
}

impl FeedbackReporterBuilder {
    pub fn new(config: Config, presenter: Arc<dyn ReportPresenter>) -> Self {
        Self {
            config,
            presenter,
            delegate: None,
            crash_logs: None,
            document_source: None,
            preferences: None,
            submitter: None,
        }
    }

    pub fn delegate(mut self, delegate: Arc<dyn FeedbackReporterDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn crash_log_source(mut self, source: Arc<dyn CrashLogSource>) -> Self {
        self.crash_logs = Some(source);
        self
    }

    pub fn document_source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.document_source = Some(source);
        self
    }

    pub fn preferences(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = Some(store);
        self
    }

    pub fn submitter(mut self, submitter: Arc<dyn ReportSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn build(self) -> Result<FeedbackReporter> {
        let config = self.config;

        let submitter: Arc<dyn ReportSubmitter> = match self.submitter {
            Some(submitter) => submitter,
            None => Arc::new(HttpReportSubmitter::new(&config.submission)?),
        };

        let crash_logs = self.crash_logs.unwrap_or_else(|| {
            Arc::new(DirectoryCrashLogSource::new(
                &config.crash_logs,
                &config.app.name,
            ))
        });

        let preferences = self
            .preferences
            .unwrap_or_else(|| Arc::new(JsonFilePreferenceStore::open(&config.preferences.path)));

        let document_source = self
            .document_source
            .unwrap_or_else(|| Arc::new(StaticDocumentSource::default()));

        let delegate = self.delegate.unwrap_or_else(|| Arc::new(DefaultDelegate));

        let system_profile = SystemProfile::collect(&config.app);

        info!(
            "Feedback reporter initialized for {} {} (endpoint: {})",
            config.app.name, config.app.version, config.submission.target_url
        );

        Ok(FeedbackReporter {
            config,
            delegate,
            presenter: self.presenter,
            crash_logs,
            document_source,
            preferences,
            submitter,
            system_profile,
            state: Mutex::new(ReporterState::Idle),
        })
    }
}
