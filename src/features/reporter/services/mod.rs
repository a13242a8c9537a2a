mod feedback_reporter;
mod session;

pub use feedback_reporter::{FeedbackReporter, FeedbackReporterBuilder, SubmissionOutcome};
pub use session::ReportSession;
