use crate::app_error::AppError;
use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod logger_test;

const LOG_ROOT: &str = "commander-logs";

/// Writes each run's prompt, raw request/response, and extracted text into
/// a timestamped directory.
pub struct Logger {
    log_dir: PathBuf,
}

impl Logger {
    pub fn new() -> Result<Self, AppError> {
        Self::new_in(Path::new(LOG_ROOT))
    }

    pub fn new_in(root: &Path) -> Result<Self, AppError> {
        let timestamp = Utc::now().format("%Y-%m-%d-%H-%M-%S").to_string();
        let log_dir = root.join(timestamp);
        fs::create_dir_all(&log_dir)?;
        Ok(Self { log_dir })
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log_text(&self, file_name: &str, content: &str) -> Result<(), AppError> {
        fs::write(self.log_dir.join(file_name), content)?;
        Ok(())
    }

    pub fn log_json(&self, file_name: &str, content: &Value) -> Result<(), AppError> {
        let pretty_json = serde_json::to_string_pretty(content)?;
        fs::write(self.log_dir.join(file_name), pretty_json)?;
        Ok(())
    }
}
