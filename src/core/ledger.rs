use crate::core::models::expense::{ExpenseRecord, RecordKind};
use std::collections::HashMap;
use tracing::debug;

/// Signed net position per member: positive is owed money, negative owes money.
pub type Balances = HashMap<String, f64>;

/// Folds `records` into a net balance for every member of `roster`.
///
/// Members that appear in records but not in the roster get no entry. A normal
/// expense credits the payer the full amount and debits each participant an
/// equal share; the payer only carries a share when listed as a participant. A
/// settlement credits the payer and debits its single recipient; malformed
/// settlements (not exactly one participant) still credit the payer.
///
/// The result is independent of record order and nothing is rounded here.
pub fn compute_balances<S: AsRef<str>>(records: &[ExpenseRecord], roster: &[S]) -> Balances {
    fold_records(records.iter(), roster)
}

/// Same as [`compute_balances`], restricted to records carrying `group_id`.
/// `None` selects the records that belong to no group.
pub fn compute_group_balances<S: AsRef<str>>(
    records: &[ExpenseRecord],
    roster: &[S],
    group_id: Option<&str>,
) -> Balances {
    fold_records(
        records.iter().filter(|record| record.group_id.as_deref() == group_id),
        roster,
    )
}

fn fold_records<'r, S: AsRef<str>>(records: impl Iterator<Item = &'r ExpenseRecord>, roster: &[S]) -> Balances {
    let mut deltas: HashMap<&str, Vec<f64>> = roster.iter().map(|id| (id.as_ref(), Vec::new())).collect();
    let mut folded = 0usize;

    for record in records {
        folded += 1;
        push_delta(&mut deltas, &record.payer, record.amount);

        match record.kind() {
            RecordKind::Expense => {
                let share = share_of(record);
                for participant in &record.participants {
                    push_delta(&mut deltas, participant, -share);
                }
            }
            RecordKind::Settlement => match record.recipient() {
                Some(recipient) => push_delta(&mut deltas, recipient, -record.amount),
                None => debug!(
                    record_id = %record.id,
                    participants = record.participants.len(),
                    "Settlement without a single recipient, skipping debit"
                ),
            },
        }
    }

    let balances: Balances = deltas
        .into_iter()
        .map(|(member, mut entries)| {
            // Summing in a canonical order keeps the float result identical
            // for any permutation of the input records.
            entries.sort_by(f64::total_cmp);
            (member.to_string(), entries.into_iter().sum())
        })
        .collect();

    debug!(records = folded, members = balances.len(), "Computed balances");
    balances
}

/// Per-participant share of a normal expense; zero when nobody shares it.
pub fn share_of(record: &ExpenseRecord) -> f64 {
    if record.participants.is_empty() {
        0.0
    } else {
        record.amount / record.participants.len() as f64
    }
}

fn push_delta(deltas: &mut HashMap<&str, Vec<f64>>, member: &str, amount: f64) {
    if let Some(entries) = deltas.get_mut(member) {
        entries.push(amount);
    }
}
