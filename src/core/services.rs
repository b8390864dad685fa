use crate::constants::{
    DEFAULT_MAX_AMOUNT, EXPENSE_ADDED, EXPENSES_IMPORTED, GROUP_CREATED, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH,
    MEMBER_ADDED, MEMBER_REMOVED, SETTLEMENT_RECORDED, SUGGESTION_CONFIRMED,
};
use crate::core::errors::{FieldError, LedgerError};
use crate::core::import::parse_expenses;
use crate::core::ledger::compute_group_balances;
use crate::core::matcher::compute_settlements;
use crate::core::models::{
    audit::{AppLog, GroupAudit},
    expense::ExpenseRecord,
    group::Group,
    member::Member,
    settlement::SettlementSuggestion,
};
use crate::core::money::{is_settled, round2};
use crate::core::validation::{validate_amount_input, validate_string_input};
use crate::infrastructure::logging::{LoggingService, into_details};
use crate::infrastructure::storage::{RecordSnapshot, Storage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::io::Read;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// A normal expense as submitted by a caller, before validation.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub payer_id: String,
    pub amount: f64,
    pub participant_ids: Vec<String>,
    pub description: String,
    pub category: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
pub struct MemberBalance {
    pub member_id: String,
    pub name: String,
    pub balance: f64,
}

/// Balances and settlement suggestions for one group, in roster order.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct GroupLedger {
    pub group_id: String,
    pub balances: Vec<MemberBalance>,
    pub settlements: Vec<SettlementSuggestion>,
}

impl GroupLedger {
    /// Recomputes from scratch; no state is carried between calls.
    pub fn compute(group: &Group, records: &[ExpenseRecord]) -> Self {
        let roster = group.roster_ids();
        let balances = compute_group_balances(records, &roster, Some(group.id.as_str()));
        let settlements = compute_settlements(&balances, &group.members, Some(group.id.as_str()));

        GroupLedger {
            group_id: group.id.clone(),
            balances: group
                .members
                .iter()
                .map(|member| MemberBalance {
                    member_id: member.id.clone(),
                    name: member.name.clone(),
                    balance: round2(balances.get(&member.id).copied().unwrap_or(0.0)),
                })
                .collect(),
            settlements,
        }
    }

    /// True when every member is within a cent of zero.
    pub fn is_settled(&self) -> bool {
        self.balances.iter().all(|b| is_settled(b.balance))
    }

    pub fn balance_of(&self, member_id: &str) -> Option<f64> {
        self.balances
            .iter()
            .find(|b| b.member_id == member_id)
            .map(|b| b.balance)
    }
}

pub struct LedgerService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
    max_amount: f64,
}

impl<L: LoggingService, S: Storage> LedgerService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        LedgerService {
            storage,
            logging,
            max_amount: DEFAULT_MAX_AMOUNT,
        }
    }

    pub fn with_max_amount(mut self, max_amount: f64) -> Self {
        self.max_amount = max_amount;
        self
    }

    async fn require_group(&self, group_id: &str) -> Result<Group, LedgerError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))
    }

    fn require_member(group: &Group, member_id: &str) -> Result<(), LedgerError> {
        if group.is_member(member_id) {
            Ok(())
        } else {
            Err(LedgerError::NotGroupMember(member_id.to_string()))
        }
    }

    fn validate_member(member: &Member) -> Result<(), LedgerError> {
        validate_string_input("member_id", &member.id, MAX_NAME_LENGTH)?;
        validate_string_input("member_name", &member.name, MAX_NAME_LENGTH)
    }

    async fn log_and_audit(
        &self,
        group_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        member_id: Option<&str>,
    ) -> Result<(), LedgerError> {
        let details = into_details(action, log_details)?;
        let entry = self.logging.log_action(action, details, member_id).await?;
        if let Some(gid) = group_id {
            self.storage
                .save_group_audit(GroupAudit {
                    id: Uuid::new_v4().to_string(),
                    group_id: gid.to_string(),
                    action: entry.action,
                    member_id: entry.member_id,
                    details: entry.details,
                    timestamp: entry.timestamp,
                })
                .await?;
        }
        Ok(())
    }

    // GROUP DIRECTORY

    pub async fn create_group(&self, name: String, members: Vec<Member>) -> Result<Group, LedgerError> {
        validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        {
            let mut seen = HashSet::new();
            for member in &members {
                Self::validate_member(member)?;
                if !seen.insert(member.id.as_str()) {
                    return Err(LedgerError::AlreadyGroupMember(member.id.clone()));
                }
            }
        }

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            members,
            created_at: Utc::now(),
        };
        self.storage.save_group(group.clone()).await?;
        info!("Created group {} with {} members", group.id, group.members.len());

        self.log_and_audit(
            Some(&group.id),
            GROUP_CREATED,
            json!({
                "group_id": group.id,
                "name": group.name,
                "member_ids": group.members.iter().map(|m| m.id.clone()).collect::<Vec<_>>()
            }),
            None,
        )
        .await?;

        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Group, LedgerError> {
        self.require_group(group_id).await
    }

    pub async fn add_member(&self, group_id: &str, member: Member) -> Result<Group, LedgerError> {
        let mut group = self.require_group(group_id).await?;
        Self::validate_member(&member)?;
        if group.is_member(&member.id) {
            return Err(LedgerError::AlreadyGroupMember(member.id));
        }

        group.members.push(member.clone());
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            MEMBER_ADDED,
            json!({ "group_id": group_id, "member_id": member.id, "name": member.name }),
            Some(member.id.as_str()),
        )
        .await?;
        Ok(group)
    }

    /// Removes a member from the roster. Their records stay in the ledger, but
    /// they no longer receive a balance.
    pub async fn remove_member(&self, group_id: &str, member_id: &str) -> Result<Group, LedgerError> {
        let mut group = self.require_group(group_id).await?;
        Self::require_member(&group, member_id)?;
        if group.members.len() <= 1 {
            return Err(LedgerError::CannotRemoveLastMember);
        }

        group.members.retain(|m| m.id != member_id);
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            MEMBER_REMOVED,
            json!({ "group_id": group_id, "member_id": member_id }),
            Some(member_id),
        )
        .await?;
        Ok(group)
    }

    // INGESTION

    fn build_expense(&self, group: &Group, expense: NewExpense) -> Result<ExpenseRecord, LedgerError> {
        Self::require_member(group, &expense.payer_id)?;
        validate_string_input("description", &expense.description, MAX_DESCRIPTION_LENGTH)?;
        validate_amount_input("amount", expense.amount, self.max_amount)?;
        if let Some(category) = &expense.category {
            validate_string_input("category", category, MAX_NAME_LENGTH)?;
        }
        if expense.participant_ids.is_empty() {
            return Err(LedgerError::EmptyParticipants);
        }

        let mut seen = HashSet::new();
        for participant in &expense.participant_ids {
            Self::require_member(group, participant)?;
            if !seen.insert(participant.as_str()) {
                return Err(LedgerError::InvalidInput(
                    "participant_ids".to_string(),
                    FieldError::new(
                        "participant_ids",
                        "Duplicate Participant",
                        format!("{} is listed more than once", participant),
                    ),
                ));
            }
        }

        Ok(ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            group_id: Some(group.id.clone()),
            payer: expense.payer_id,
            amount: expense.amount,
            participants: expense.participant_ids,
            is_settlement: false,
            description: expense.description,
            category: expense.category,
            timestamp: expense.timestamp.unwrap_or_else(Utc::now),
        })
    }

    pub async fn add_expense(&self, group_id: &str, expense: NewExpense) -> Result<ExpenseRecord, LedgerError> {
        let group = self.require_group(group_id).await?;
        let record = self.build_expense(&group, expense).map_err(|e| {
            warn!("Rejected expense for group {}: {}", group_id, e);
            e
        })?;

        self.storage.save_record(record.clone()).await?;
        debug!("Expense {} recorded in group {}", record.id, group_id);

        self.log_and_audit(
            Some(group_id),
            EXPENSE_ADDED,
            json!({
                "record_id": record.id,
                "group_id": group_id,
                "description": record.description,
                "amount": record.amount,
                "payer_id": record.payer
            }),
            Some(record.payer.as_str()),
        )
        .await?;

        Ok(record)
    }

    /// Records an actual repayment from `from_id` to `to_id`.
    pub async fn record_settlement(
        &self,
        group_id: &str,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> Result<ExpenseRecord, LedgerError> {
        let group = self.require_group(group_id).await?;
        Self::require_member(&group, from_id)?;
        Self::require_member(&group, to_id)?;
        if from_id == to_id {
            return Err(LedgerError::SelfSettlement(from_id.to_string()));
        }
        validate_amount_input("amount", amount, self.max_amount)?;

        let record = ExpenseRecord::settlement(Some(group_id), from_id, to_id, amount);
        self.storage.save_record(record.clone()).await?;
        info!("Settlement {} -> {} of {} recorded in group {}", from_id, to_id, amount, group_id);

        self.log_and_audit(
            Some(group_id),
            SETTLEMENT_RECORDED,
            json!({
                "record_id": record.id,
                "group_id": group_id,
                "from_id": from_id,
                "to_id": to_id,
                "amount": amount
            }),
            Some(from_id),
        )
        .await?;

        Ok(record)
    }

    /// Turns a suggestion into a settlement record: `from` pays `to` the
    /// suggested amount.
    pub async fn confirm_suggestion(&self, suggestion: &SettlementSuggestion) -> Result<ExpenseRecord, LedgerError> {
        let group_id = suggestion.group_id.as_deref().ok_or_else(|| {
            LedgerError::InvalidInput(
                "group_id".to_string(),
                FieldError::new(
                    "group_id",
                    "Missing Group",
                    "Suggestion is not scoped to a group",
                ),
            )
        })?;

        let record = self
            .record_settlement(group_id, &suggestion.from, &suggestion.to, suggestion.amount)
            .await?;
        self.log_and_audit(
            Some(group_id),
            SUGGESTION_CONFIRMED,
            json!({ "suggestion_id": suggestion.id, "record_id": record.id }),
            Some(suggestion.from.as_str()),
        )
        .await?;
        Ok(record)
    }

    /// Imports CSV expense rows paid by `payer_id` and split across the whole
    /// current roster. Nothing is stored unless every row is valid.
    pub async fn import_csv<R: Read>(
        &self,
        group_id: &str,
        payer_id: &str,
        reader: R,
    ) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let rows = parse_expenses(reader)?;
        let group = self.require_group(group_id).await?;
        let participants: Vec<String> = group.members.iter().map(|m| m.id.clone()).collect();

        let records = rows
            .into_iter()
            .map(|row| {
                let line = row.line;
                self.build_expense(
                    &group,
                    NewExpense {
                        payer_id: payer_id.to_string(),
                        amount: row.amount,
                        participant_ids: participants.clone(),
                        description: row.description,
                        category: row.category,
                        timestamp: Some(row.timestamp),
                    },
                )
                .map_err(|e| match e {
                    LedgerError::InvalidInput(_, field) => LedgerError::InvalidImportRow {
                        line,
                        reason: field.description,
                    },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.storage.save_records(group_id, records.clone()).await?;
        info!("Imported {} expenses into group {}", records.len(), group_id);

        self.log_and_audit(
            Some(group_id),
            EXPENSES_IMPORTED,
            json!({ "group_id": group_id, "payer_id": payer_id, "count": records.len() }),
            Some(payer_id),
        )
        .await?;
        Ok(records)
    }

    // LEDGER VIEWS

    /// All records of the group, oldest first.
    pub async fn records(&self, group_id: &str) -> Result<Vec<ExpenseRecord>, LedgerError> {
        self.require_group(group_id).await?;
        let mut records = self.storage.get_records(group_id).await?;
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    pub async fn group_ledger(&self, group_id: &str) -> Result<GroupLedger, LedgerError> {
        let group = self.require_group(group_id).await?;
        let records = self.storage.get_records(group_id).await?;
        debug!("Computing ledger for group {} over {} records", group_id, records.len());
        Ok(GroupLedger::compute(&group, &records))
    }

    /// Follows a group's record feed, recomputing the ledger on every change.
    pub async fn subscribe(&self, group_id: &str) -> Result<LedgerSubscription<'_, L, S>, LedgerError> {
        self.require_group(group_id).await?;
        let receiver = self.storage.subscribe_records(group_id).await?;
        Ok(LedgerSubscription {
            service: self,
            group_id: group_id.to_string(),
            receiver,
        })
    }

    pub async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, LedgerError> {
        self.require_group(group_id).await?;
        self.storage.get_group_audits(group_id).await
    }

    /// Application log across all groups, optionally narrowed to one member.
    pub async fn get_app_logs(&self, member_id: Option<&str>) -> Result<Vec<AppLog>, LedgerError> {
        self.logging.get_logs(member_id).await
    }
}

pub struct LedgerSubscription<'a, L: LoggingService, S: Storage> {
    service: &'a LedgerService<L, S>,
    group_id: String,
    receiver: watch::Receiver<RecordSnapshot>,
}

impl<L: LoggingService, S: Storage> LedgerSubscription<'_, L, S> {
    /// Waits for the next record snapshot and returns the ledger computed from
    /// it against the group's current roster.
    pub async fn next(&mut self) -> Result<GroupLedger, LedgerError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| LedgerError::SubscriptionClosed(self.group_id.clone()))?;
        let snapshot = self.receiver.borrow_and_update().clone();
        let group = self.service.require_group(&self.group_id).await?;
        Ok(GroupLedger::compute(&group, &snapshot))
    }
}
