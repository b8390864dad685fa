pub mod in_memory;

use crate::core::errors::LedgerError;
use crate::core::models::audit::{AppLog, LogDetails};
use async_trait::async_trait;
use serde_json::Value;

/// Converts a `json!({...})` payload into log details. Anything but a JSON
/// object is rejected.
pub fn into_details(action: &str, details: Value) -> Result<LogDetails, LedgerError> {
    match details {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(LedgerError::LoggingError(format!(
            "Details for {} must be a JSON object, got {}",
            action, other
        ))),
    }
}

#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: LogDetails,
        member_id: Option<&str>,
    ) -> Result<AppLog, LedgerError>;
    /// Entries oldest first, optionally only those attributed to `member_id`.
    async fn get_logs(&self, member_id: Option<&str>) -> Result<Vec<AppLog>, LedgerError>;
}
