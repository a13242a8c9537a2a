//! Discovery of crash logs written since the last check.

pub mod services;

pub use services::{crash_report_text, CrashLogSource, DirectoryCrashLogSource};
