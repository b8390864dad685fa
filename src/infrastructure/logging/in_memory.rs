use crate::core::errors::LedgerError;
use crate::core::models::audit::{AppLog, LogDetails};
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Append-only application log kept in process memory.
#[derive(Clone, Default)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: LogDetails,
        member_id: Option<&str>,
    ) -> Result<AppLog, LedgerError> {
        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            member_id: member_id.map(String::from),
            details,
            timestamp: Utc::now(),
        };
        debug!(action, member = member_id.unwrap_or("-"), "App log entry {}", entry.id);

        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn get_logs(&self, member_id: Option<&str>) -> Result<Vec<AppLog>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| member_id.is_none_or(|id| entry.member_id.as_deref() == Some(id)))
            .cloned()
            .collect())
    }
}
