use serde::{Deserialize, Serialize};

/// Which flow opened the report window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Feedback,
    Crash,
    Exception,
    SupportNeed,
}

impl ReportKind {
    /// Window heading shown above the comment field
    pub fn heading(&self) -> &'static str {
        match self {
            ReportKind::Feedback => "Send Feedback",
            ReportKind::Crash => "The application crashed",
            ReportKind::Exception => "The application encountered a problem",
            ReportKind::SupportNeed => "Ask for Support",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Feedback => write!(f, "feedback"),
            ReportKind::Crash => write!(f, "crash"),
            ReportKind::Exception => write!(f, "exception"),
            ReportKind::SupportNeed => write!(f, "support"),
        }
    }
}
