use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// What a document represents in the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    CrashLog,
    UserDocument,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::CrashLog => write!(f, "Crash Log"),
            DocumentKind::UserDocument => write!(f, "Document"),
        }
    }
}

/// Raw bytes, either already in memory or read from disk on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    Loaded(Vec<u8>),
    OnDisk(PathBuf),
}

/// A candidate attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub modified_at: DateTime<Utc>,
    pub kind: DocumentKind,
    pub content: DocumentContent,
}

impl Document {
    /// Document whose bytes are held in memory
    pub fn in_memory(
        filename: impl Into<String>,
        modified_at: DateTime<Utc>,
        kind: DocumentKind,
        data: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            modified_at,
            kind,
            content: DocumentContent::Loaded(data),
        }
    }

    /// Document read lazily from `path`; filename and modification time come
    /// from the file metadata.
    pub fn from_path(path: &Path, kind: DocumentKind) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let modified_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self {
            filename,
            modified_at,
            kind,
            content: DocumentContent::OnDisk(path.to_path_buf()),
        })
    }

    /// Read the raw content, hitting the filesystem for lazy documents
    pub fn read_content(&self) -> Result<Vec<u8>> {
        match &self.content {
            DocumentContent::Loaded(data) => Ok(data.clone()),
            DocumentContent::OnDisk(path) => Ok(std::fs::read(path)?),
        }
    }

    /// Content as text, replacing invalid UTF-8
    pub fn read_text(&self) -> Result<String> {
        let data = self.read_content()?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}
