use uuid::Uuid;

use crate::features::documents::DocumentRow;
use crate::features::reporter::models::ReportKind;
use crate::features::reporter::services::SubmissionOutcome;

/// Read-only view of a session handed to the host's window code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub kind: ReportKind,
    pub title: String,
    pub heading: String,
    pub report_text: Option<String>,
    pub email: Option<String>,
    pub rows: Vec<DocumentRow>,
}

/// The host's report window.
///
/// Callbacks may arrive from a worker thread; the host is responsible for
/// moving them onto its UI thread. Implementations must not call back into
/// the reporter synchronously from `present`.
pub trait ReportPresenter: Send + Sync {
    /// Show the window. Returning false aborts the report.
    fn present(&self, session: &SessionSummary) -> bool;

    /// A submission for `session_id` finished
    fn submission_finished(&self, _session_id: Uuid, _outcome: &SubmissionOutcome) {}
}
