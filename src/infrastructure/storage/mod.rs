use crate::core::errors::LedgerError;
use crate::core::models::{audit::GroupAudit, expense::ExpenseRecord, group::Group};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Full snapshot of a group's records, as delivered to subscribers.
pub type RecordSnapshot = Arc<Vec<ExpenseRecord>>;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_group(&self, group: Group) -> Result<(), LedgerError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError>;
    async fn save_record(&self, record: ExpenseRecord) -> Result<(), LedgerError>;
    /// Appends all records at once; subscribers see a single new snapshot.
    async fn save_records(&self, group_id: &str, records: Vec<ExpenseRecord>) -> Result<(), LedgerError>;
    async fn get_records(&self, group_id: &str) -> Result<Vec<ExpenseRecord>, LedgerError>;
    /// Receiver that is notified with a fresh snapshot whenever the group's records change.
    async fn subscribe_records(&self, group_id: &str) -> Result<watch::Receiver<RecordSnapshot>, LedgerError>;
    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), LedgerError>;
    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, LedgerError>;
}

pub mod in_memory;
