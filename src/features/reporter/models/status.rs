use uuid::Uuid;

use super::ReportKind;

/// Snapshot of the reporter's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterStatus {
    Idle,
    /// A report window is being prepared (crash scan or session construction)
    Preparing,
    Displaying {
        session_id: Uuid,
        kind: ReportKind,
        submitting: bool,
    },
}

impl ReporterStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, ReporterStatus::Idle)
    }

    pub fn displayed_kind(&self) -> Option<ReportKind> {
        match self {
            ReporterStatus::Displaying { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
