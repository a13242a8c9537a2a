use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::features::reporter::models::ReportKind;
use crate::shared::system_profile::SystemProfile;

/// Top-level payload keys; custom parameters may not shadow them
pub const RESERVED_PAYLOAD_KEYS: &[&str] = &[
    "type",
    "title",
    "report_text",
    "comment",
    "email",
    "system",
    "preferences",
    "documents",
    "submitted_at",
];

/// What the user typed into the report window
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ReportForm {
    pub comment: String,

    /// Optional contact address, checked after [`ReportForm::normalized`]
    #[validate(email(message = "Please enter a valid e-mail address"))]
    pub email: Option<String>,
}

impl ReportForm {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Same form with the e-mail trimmed, `None` when blank
    pub fn normalized(mut self) -> Self {
        self.email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        self
    }
}

/// JSON body posted to the feedback endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(rename = "type")]
    pub report_type: ReportKind,
    pub title: String,
    pub report_text: Option<String>,
    pub comment: String,
    pub email: Option<String>,
    pub system: SystemProfile,
    pub preferences: Map<String, Value>,
    /// Filename to base64 content
    pub documents: BTreeMap<String, String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub custom_parameters: BTreeMap<String, String>,
}

/// Drop delegate parameters that collide with payload fields
pub fn sanitize_custom_parameters(params: BTreeMap<String, String>) -> BTreeMap<String, String> {
    params
        .into_iter()
        .filter(|(key, _)| {
            let reserved = RESERVED_PAYLOAD_KEYS.contains(&key.as_str());
            if reserved {
                tracing::warn!("Ignoring custom parameter '{}' (reserved key)", key);
            }
            !reserved
        })
        .collect()
}
