/// Built-in submission endpoint, used when neither config nor delegate override it
pub const DEFAULT_TARGET_URL: &str = "https://feedback.example.com/reports";

/// File name of the default JSON preference store
pub const PREFERENCES_FILE_NAME: &str = "feedback-reporter.json";

// =============================================================================
// PREFERENCE KEYS
// =============================================================================

/// Time of the last crash-log scan, stored as RFC 3339
pub const LAST_CRASH_CHECK_KEY: &str = "FRFeedbackReporter.lastCrashCheckDate";

/// E-mail address the user entered in the previous report
pub const LAST_EMAIL_KEY: &str = "FRFeedbackReporter.email";

/// Prefix shared by every key the reporter itself writes
pub const REPORTER_KEY_PREFIX: &str = "FRFeedbackReporter.";

// =============================================================================
// UI TEXT
// =============================================================================

/// Title of the button that attaches an arbitrary file
pub const OTHER_BUTTON_TITLE: &str = "Attach Other File…";

/// Date format for document rows
pub const ROW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Upper bound on the server message kept from a submission response
pub const MAX_SERVER_MESSAGE_CHARS: usize = 512;
