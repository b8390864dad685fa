use super::expense::ExpenseRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A computed, not-yet-confirmed payment from a debtor to a creditor.
///
/// `id` is unique within one matcher run only; recomputing the same balances
/// yields new ids, so it must not be used for deduplication.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SettlementSuggestion {
    pub id: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub group_id: Option<String>,
}

impl SettlementSuggestion {
    /// The settlement record that confirming this suggestion appends to the ledger.
    pub fn to_record(&self) -> ExpenseRecord {
        ExpenseRecord::settlement(self.group_id.as_deref(), &self.from, &self.to, self.amount)
    }
}
