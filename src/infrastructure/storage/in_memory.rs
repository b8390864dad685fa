use crate::core::errors::LedgerError;
use crate::core::models::{audit::GroupAudit, expense::ExpenseRecord, group::Group};
use crate::infrastructure::storage::{RecordSnapshot, Storage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

struct GroupRecords {
    records: Vec<ExpenseRecord>,
    feed: watch::Sender<RecordSnapshot>,
}

impl GroupRecords {
    fn new() -> Self {
        let (feed, _) = watch::channel(Arc::new(Vec::new()));
        GroupRecords {
            records: Vec::new(),
            feed,
        }
    }

    fn publish(&self) {
        self.feed.send_replace(Arc::new(self.records.clone()));
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    groups: Arc<RwLock<HashMap<String, Group>>>,
    records: Arc<RwLock<HashMap<String, GroupRecords>>>,
    group_audits: Arc<RwLock<HashMap<String, Vec<GroupAudit>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn record_group(record: &ExpenseRecord) -> Result<&str, LedgerError> {
    record
        .group_id
        .as_deref()
        .ok_or_else(|| LedgerError::StorageError(format!("Record {} has no group", record.id)))
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_group(&self, group: Group) -> Result<(), LedgerError> {
        self.groups.write().await.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError> {
        Ok(self.groups.read().await.get(group_id).cloned())
    }

    async fn save_record(&self, record: ExpenseRecord) -> Result<(), LedgerError> {
        let group_id = record_group(&record)?.to_string();
        self.save_records(&group_id, vec![record]).await
    }

    async fn save_records(&self, group_id: &str, records: Vec<ExpenseRecord>) -> Result<(), LedgerError> {
        for record in &records {
            if record_group(record)? != group_id {
                return Err(LedgerError::StorageError(format!(
                    "Record {} does not belong to group {}",
                    record.id, group_id
                )));
            }
        }

        let mut all = self.records.write().await;
        let entry = all.entry(group_id.to_string()).or_insert_with(GroupRecords::new);
        entry.records.extend(records);
        entry.publish();
        Ok(())
    }

    async fn get_records(&self, group_id: &str) -> Result<Vec<ExpenseRecord>, LedgerError> {
        Ok(self
            .records
            .read()
            .await
            .get(group_id)
            .map(|entry| entry.records.clone())
            .unwrap_or_default())
    }

    async fn subscribe_records(&self, group_id: &str) -> Result<watch::Receiver<RecordSnapshot>, LedgerError> {
        let mut all = self.records.write().await;
        let entry = all.entry(group_id.to_string()).or_insert_with(GroupRecords::new);
        Ok(entry.feed.subscribe())
    }

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), LedgerError> {
        self.group_audits
            .write()
            .await
            .entry(audit.group_id.clone())
            .or_default()
            .push(audit);
        Ok(())
    }

    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, LedgerError> {
        Ok(self
            .group_audits
            .read()
            .await
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }
}
