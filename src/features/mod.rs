pub mod crash_logs;
pub mod documents;
pub mod reporter;
