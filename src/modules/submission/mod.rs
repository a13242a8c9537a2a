//! Delivery of finished reports to the feedback endpoint.

mod http_submitter;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::reporter::dtos::ReportPayload;

pub use http_submitter::HttpReportSubmitter;

/// What the endpoint answered to an accepted report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub status: u16,
    /// Response body, trimmed and truncated, when the server sent one
    pub message: Option<String>,
}

#[async_trait]
pub trait ReportSubmitter: Send + Sync {
    async fn submit(&self, target_url: &str, payload: &ReportPayload) -> Result<SubmissionReceipt>;
}
