pub mod delegate;
pub mod dtos;
pub mod models;
pub mod presenter;
pub mod services;

pub use delegate::{DefaultDelegate, FeedbackReporterDelegate};
pub use dtos::{ReportForm, ReportPayload};
pub use models::{ExceptionReport, ReportKind, ReporterStatus};
pub use presenter::{ReportPresenter, SessionSummary};
pub use services::{FeedbackReporter, FeedbackReporterBuilder, ReportSession, SubmissionOutcome};
