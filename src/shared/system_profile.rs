//! Host description attached to every report.

use serde::{Deserialize, Serialize};

use crate::core::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemProfile {
    pub os: String,
    pub os_family: String,
    pub arch: String,
    pub cpu_count: usize,
    pub app_name: String,
    pub app_version: String,
}

impl SystemProfile {
    pub fn collect(app: &AppConfig) -> Self {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            os: std::env::consts::OS.to_string(),
            os_family: std::env::consts::FAMILY.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_count,
            app_name: app.name.clone(),
            app_version: app.version.clone(),
        }
    }
}
