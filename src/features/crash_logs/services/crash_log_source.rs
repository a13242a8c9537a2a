use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::config::CrashLogConfig;
use crate::core::error::Result;
use crate::features::documents::{Document, DocumentKind};

/// Answers "which crash logs appeared after T"
pub trait CrashLogSource: Send + Sync {
    /// Crash logs modified strictly after `since` (all when `None`),
    /// newest first.
    fn crash_logs_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Document>>;
}

/// Scans one directory for crash logs written by the host application.
///
/// A file qualifies when its name starts with the application name
/// (case-insensitive) and its extension is in the configured list.
#[derive(Debug, Clone)]
pub struct DirectoryCrashLogSource {
    directory: PathBuf,
    app_name: String,
    extensions: Vec<String>,
    max_logs: usize,
}

impl DirectoryCrashLogSource {
    pub fn new(config: &CrashLogConfig, app_name: &str) -> Self {
        Self {
            directory: config.directory.clone(),
            app_name: app_name.to_lowercase(),
            extensions: config.extensions.clone(),
            max_logs: config.max_logs,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn matches(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        if !lower.starts_with(&self.app_name) {
            return false;
        }

        lower
            .rsplit_once('.')
            .is_some_and(|(_, ext)| self.extensions.iter().any(|allowed| allowed == ext))
    }
}

impl CrashLogSource for DirectoryCrashLogSource {
    fn crash_logs_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Document>> {
        if !self.directory.is_dir() {
            debug!(
                "Crash log directory {} does not exist",
                self.directory.display()
            );
            return Ok(Vec::new());
        }

        let mut logs = Vec::new();
        for entry in std::fs::read_dir(&self.directory)?.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            if !self.matches(&filename) {
                continue;
            }

            match Document::from_path(&path, DocumentKind::CrashLog) {
                Ok(doc) if since.map_or(true, |t| doc.modified_at > t) => logs.push(doc),
                Ok(_) => {}
                Err(e) => warn!("Cannot inspect crash log {}: {}", path.display(), e),
            }
        }

        logs.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        logs.truncate(self.max_logs);

        debug!(
            "Found {} crash logs in {} since {:?}",
            logs.len(),
            self.directory.display(),
            since
        );

        Ok(logs)
    }
}

/// Concatenate crash logs into report text, one header line per log
pub fn crash_report_text(logs: &[Document]) -> String {
    let mut text = String::new();

    for doc in logs {
        let body = match doc.read_text() {
            Ok(body) => body,
            Err(e) => {
                warn!("Cannot read crash log '{}': {}", doc.filename, e);
                continue;
            }
        };

        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&format!(
            "--- {} ({}) ---\n",
            doc.filename,
            doc.modified_at.to_rfc3339()
        ));
        text.push_str(body.trim_end());
        text.push('\n');
    }

    text
}
