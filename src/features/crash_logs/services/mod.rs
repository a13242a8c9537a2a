mod crash_log_source;

pub use crash_log_source::{crash_report_text, CrashLogSource, DirectoryCrashLogSource};
