mod exception;
mod report_kind;
mod status;

pub use exception::ExceptionReport;
pub use report_kind::ReportKind;
pub use status::ReporterStatus;
