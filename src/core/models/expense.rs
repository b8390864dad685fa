use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// How a record participates in the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// A shared cost split evenly across `participants`.
    Expense,
    /// A repayment from `payer` to the single member in `participants`.
    Settlement,
}

/// An entry in a group's ledger: either money a member advanced on behalf of
/// others, or an actual repayment between two members.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExpenseRecord {
    pub id: String,
    pub group_id: Option<String>,
    pub payer: String,
    pub amount: f64,
    pub participants: Vec<String>,
    #[serde(default)]
    pub is_settlement: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub timestamp: DateTime<Utc>,
}

impl ExpenseRecord {
    pub fn expense(group_id: Option<&str>, payer: &str, amount: f64, participants: &[&str]) -> Self {
        ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.map(String::from),
            payer: payer.to_string(),
            amount,
            participants: participants.iter().map(|p| p.to_string()).collect(),
            is_settlement: false,
            description: String::new(),
            category: None,
            timestamp: Utc::now(),
        }
    }

    pub fn settlement(group_id: Option<&str>, from: &str, to: &str, amount: f64) -> Self {
        ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.map(String::from),
            payer: from.to_string(),
            amount,
            participants: vec![to.to_string()],
            is_settlement: true,
            description: format!("Settlement from {} to {}", from, to),
            category: None,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        if self.is_settlement {
            RecordKind::Settlement
        } else {
            RecordKind::Expense
        }
    }

    /// The repayment recipient, if this is a well-formed settlement.
    pub fn recipient(&self) -> Option<&str> {
        match (self.kind(), self.participants.as_slice()) {
            (RecordKind::Settlement, [to]) => Some(to.as_str()),
            _ => None,
        }
    }
}
