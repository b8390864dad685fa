use crate::constants::SETTLE_EPSILON;
use crate::core::ledger::Balances;
use crate::core::models::member::Member;
use crate::core::models::settlement::SettlementSuggestion;
use crate::core::money::{is_creditor, is_debtor, round2};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Suggests payments that bring every roster member's balance to zero.
///
/// Greedy matching: each debtor, in roster order, pays creditors in roster
/// order until one side is within a cent of zero. The result is valid and
/// deterministic in order, but not the minimum possible number of payments.
pub fn compute_settlements(
    balances: &Balances,
    roster: &[Member],
    group_id: Option<&str>,
) -> Vec<SettlementSuggestion> {
    compute_settlements_at(balances, roster, group_id, Utc::now())
}

/// [`compute_settlements`] with an explicit generation time, which is folded
/// into every suggestion id.
pub fn compute_settlements_at(
    balances: &Balances,
    roster: &[Member],
    group_id: Option<&str>,
    generated_at: DateTime<Utc>,
) -> Vec<SettlementSuggestion> {
    let balance_of = |member: &Member| balances.get(&member.id).copied().unwrap_or(0.0);
    let creditors: Vec<&Member> = roster.iter().filter(|m| is_creditor(balance_of(m))).collect();
    let debtors: Vec<&Member> = roster.iter().filter(|m| is_debtor(balance_of(m))).collect();

    let mut remaining = balances.clone();
    let stamp = generated_at
        .timestamp_nanos_opt()
        .unwrap_or_else(|| generated_at.timestamp_micros());
    let scope = group_id.unwrap_or("global");
    let mut suggestions = Vec::new();

    for debtor in &debtors {
        for creditor in &creditors {
            let debt = remaining.get(&debtor.id).copied().unwrap_or(0.0);
            if !is_debtor(debt) {
                break;
            }
            let credit = remaining.get(&creditor.id).copied().unwrap_or(0.0);
            if !is_creditor(credit) {
                continue;
            }

            let transfer = debt.abs().min(credit);
            if transfer <= SETTLE_EPSILON {
                continue;
            }

            suggestions.push(SettlementSuggestion {
                id: format!("{}:{}:{}:{}", debtor.id, creditor.id, scope, stamp),
                from: debtor.id.clone(),
                to: creditor.id.clone(),
                amount: round2(transfer),
                group_id: group_id.map(String::from),
            });

            if let Some(balance) = remaining.get_mut(&debtor.id) {
                *balance += transfer;
            }
            if let Some(balance) = remaining.get_mut(&creditor.id) {
                *balance -= transfer;
            }
        }
    }

    debug!(
        creditors = creditors.len(),
        debtors = debtors.len(),
        suggestions = suggestions.len(),
        "Computed settlement suggestions"
    );
    suggestions
}
