//! Embeddable feedback and crash reporting for desktop applications.
//!
//! The host builds one [`FeedbackReporter`] at startup, wiring in its report
//! window ([`ReportPresenter`]) and optional [`FeedbackReporterDelegate`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use feedback_reporter::{Config, FeedbackReporter, ReportPresenter, SessionSummary};
//!
//! struct Window;
//!
//! impl ReportPresenter for Window {
//!     fn present(&self, session: &SessionSummary) -> bool {
//!         println!("{}: {}", session.title, session.heading);
//!         true
//!     }
//! }
//!
//! # async fn run() -> feedback_reporter::Result<()> {
//! let config = Config::from_env().map_err(feedback_reporter::ReporterError::Config)?;
//! let reporter = FeedbackReporter::builder(config, Arc::new(Window)).build()?;
//!
//! if !reporter.report_if_crash().await {
//!     reporter.report_feedback();
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;

pub use crate::core::config::Config;
pub use crate::core::error::{ReporterError, Result};
pub use crate::core::logging::init_tracing;
pub use crate::features::crash_logs::{CrashLogSource, DirectoryCrashLogSource};
pub use crate::features::documents::{
    ActionButton, Document, DocumentContent, DocumentKind, DocumentList, DocumentRow,
    DocumentSource, FilePicker, PendingRedraws, Redraw, StaticDocumentSource, TableDataSource,
    TableView,
};
pub use crate::features::reporter::{
    DefaultDelegate, ExceptionReport, FeedbackReporter, FeedbackReporterBuilder,
    FeedbackReporterDelegate, ReportForm, ReportKind, ReportPayload, ReportPresenter,
    ReportSession, ReporterStatus, SessionSummary, SubmissionOutcome,
};
pub use crate::modules::preferences::{
    JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore,
};
pub use crate::modules::submission::{HttpReportSubmitter, ReportSubmitter, SubmissionReceipt};
