use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::shared::constants::{DEFAULT_TARGET_URL, PREFERENCES_FILE_NAME};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub app: AppConfig,
    pub submission: SubmissionConfig,
    pub crash_logs: CrashLogConfig,
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name shown in the report window title and used to match crash logs
    pub name: String,
    pub version: String,
}

/// Settings for posting reports to the feedback endpoint
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub target_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct CrashLogConfig {
    /// Directory scanned for crash logs
    pub directory: PathBuf,
    /// Accepted file extensions, without the leading dot
    pub extensions: Vec<String>,
    /// Upper bound on crash logs attached to one report
    pub max_logs: usize,
}

#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    /// JSON file backing the preference store
    pub path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        let app = AppConfig::from_env()?;
        let submission = SubmissionConfig::from_env()?;
        let crash_logs = CrashLogConfig::from_env()?;
        let preferences = PreferencesConfig::from_env()?;

        Ok(Config {
            app,
            submission,
            crash_logs,
            preferences,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let name = env::var("FEEDBACK_APP_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(process_name);

        let version = env::var("FEEDBACK_APP_VERSION")
            .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

        Ok(Self { name, version })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: process_name(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl SubmissionConfig {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let target_url =
            env::var("FEEDBACK_TARGET_URL").unwrap_or_else(|_| DEFAULT_TARGET_URL.to_string());

        let request_timeout_secs = env::var("FEEDBACK_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "FEEDBACK_REQUEST_TIMEOUT_SECS must be a valid number".to_string())?;

        let user_agent =
            env::var("FEEDBACK_USER_AGENT").unwrap_or_else(|_| default_user_agent());

        Ok(Self {
            target_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            user_agent,
        })
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            request_timeout: Duration::from_secs(Self::DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

impl CrashLogConfig {
    const DEFAULT_EXTENSIONS: &'static str = "crash,ips,log";
    const DEFAULT_MAX_LOGS: usize = 5;

    pub fn from_env() -> Result<Self, String> {
        let directory = env::var("FEEDBACK_CRASH_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_crash_log_dir());

        let extensions = parse_extensions(
            &env::var("FEEDBACK_CRASH_LOG_EXTENSIONS")
                .unwrap_or_else(|_| Self::DEFAULT_EXTENSIONS.to_string()),
        );
        if extensions.is_empty() {
            return Err("FEEDBACK_CRASH_LOG_EXTENSIONS must name at least one extension".to_string());
        }

        let max_logs = env::var("FEEDBACK_MAX_CRASH_LOGS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LOGS.to_string())
            .parse::<usize>()
            .map_err(|_| "FEEDBACK_MAX_CRASH_LOGS must be a valid number".to_string())?;

        Ok(Self {
            directory,
            extensions,
            max_logs,
        })
    }
}

impl Default for CrashLogConfig {
    fn default() -> Self {
        Self {
            directory: default_crash_log_dir(),
            extensions: parse_extensions(Self::DEFAULT_EXTENSIONS),
            max_logs: Self::DEFAULT_MAX_LOGS,
        }
    }
}

impl PreferencesConfig {
    pub fn from_env() -> Result<Self, String> {
        let path = env::var("FEEDBACK_PREFERENCES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join(PREFERENCES_FILE_NAME));

        Ok(Self { path })
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: env::temp_dir().join(PREFERENCES_FILE_NAME),
        }
    }
}

/// Executable file stem, or a generic name when it cannot be determined
fn process_name() -> String {
    env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().to_string()))
        .unwrap_or_else(|| "Application".to_string())
}

fn default_user_agent() -> String {
    format!("FeedbackReporter/{}", env!("CARGO_PKG_VERSION"))
}

fn default_crash_log_dir() -> PathBuf {
    let home = env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir());

    if cfg!(target_os = "macos") {
        home.join("Library/Logs/DiagnosticReports")
    } else {
        home.join(".local/share/crash-reports")
    }
}

/// Split a comma-separated extension list, dropping dots and blanks
fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
