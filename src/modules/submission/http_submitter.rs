use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::{ReportSubmitter, SubmissionReceipt};
use crate::core::config::SubmissionConfig;
use crate::core::error::{ReporterError, Result};
use crate::features::reporter::dtos::ReportPayload;
use crate::shared::constants::MAX_SERVER_MESSAGE_CHARS;

/// Posts reports as JSON over HTTP(S)
pub struct HttpReportSubmitter {
    client: Client,
}

impl HttpReportSubmitter {
    pub fn new(config: &SubmissionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ReporterError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ReportSubmitter for HttpReportSubmitter {
    async fn submit(&self, target_url: &str, payload: &ReportPayload) -> Result<SubmissionReceipt> {
        debug!(
            "Posting {} report to {} ({} documents)",
            payload.report_type,
            target_url,
            payload.documents.len()
        );

        let response = self
            .client
            .post(target_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                ReporterError::ExternalServiceError(format!("Report request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ReporterError::ExternalServiceError(format!(
                "Report endpoint returned HTTP {} - {}",
                status,
                truncate(&body)
            )));
        }

        info!("Report accepted by {} (HTTP {})", target_url, status);

        let message = Some(truncate(&body)).filter(|m| !m.is_empty());
        Ok(SubmissionReceipt {
            status: status.as_u16(),
            message,
        })
    }
}

fn truncate(body: &str) -> String {
    body.trim().chars().take(MAX_SERVER_MESSAGE_CHARS).collect()
}
