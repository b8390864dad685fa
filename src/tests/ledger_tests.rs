use crate::core::ledger::{compute_balances, compute_group_balances};
use crate::core::models::expense::ExpenseRecord;
use crate::tests::assert_close;

const ROSTER: [&str; 3] = ["U1", "U2", "U3"];

fn scenario_a() -> Vec<ExpenseRecord> {
    vec![ExpenseRecord::expense(Some("g1"), "U1", 90.0, &["U2", "U3"])]
}

#[test]
fn payer_outside_participants_is_credited_in_full() {
    let balances = compute_balances(&scenario_a(), &ROSTER);

    assert_eq!(balances.len(), 3);
    assert_close(balances["U1"], 90.0);
    assert_close(balances["U2"], -45.0);
    assert_close(balances["U3"], -45.0);
}

#[test]
fn payer_inside_participants_pays_own_share() {
    let records = vec![ExpenseRecord::expense(None, "U1", 100.0, &["U1", "U2"])];
    let balances = compute_balances(&records, &["U1", "U2"]);

    assert_close(balances["U1"], 50.0);
    assert_close(balances["U2"], -50.0);
}

#[test]
fn settlement_moves_both_parties_toward_zero() {
    let mut records = scenario_a();
    records.push(ExpenseRecord::settlement(Some("g1"), "U2", "U1", 45.0));
    let balances = compute_balances(&records, &ROSTER);

    assert_close(balances["U2"], 0.0);
    assert_close(balances["U1"], 45.0);
    assert_close(balances["U3"], -45.0);
}

#[test]
fn members_outside_roster_get_no_entry() {
    let records = vec![ExpenseRecord::expense(None, "ghost", 60.0, &["U1", "ghost"])];
    let balances = compute_balances(&records, &["U1", "U2"]);

    assert_eq!(balances.len(), 2);
    assert!(!balances.contains_key("ghost"));
    assert_close(balances["U1"], -30.0);
    assert_close(balances["U2"], 0.0);
}

#[test]
fn empty_participants_only_credit_the_payer() {
    let records = vec![ExpenseRecord::expense(None, "U1", 20.0, &[])];
    let balances = compute_balances(&records, &ROSTER);

    assert_close(balances["U1"], 20.0);
    assert_close(balances["U2"], 0.0);
    assert_close(balances["U3"], 0.0);
}

#[test]
fn malformed_settlement_skips_debit_side() {
    let mut record = ExpenseRecord::settlement(None, "U2", "U1", 10.0);
    record.participants.push("U3".to_string());
    let balances = compute_balances(&[record], &ROSTER);

    assert_close(balances["U2"], 10.0);
    assert_close(balances["U1"], 0.0);
    assert_close(balances["U3"], 0.0);
}

#[test]
fn empty_roster_yields_empty_mapping() {
    let roster: [&str; 0] = [];
    assert!(compute_balances(&scenario_a(), &roster).is_empty());
}

#[test]
fn group_scope_filters_records() {
    let records = vec![
        ExpenseRecord::expense(Some("g1"), "U1", 30.0, &["U1", "U2", "U3"]),
        ExpenseRecord::expense(Some("g2"), "U2", 50.0, &["U1"]),
        ExpenseRecord::expense(None, "U3", 10.0, &["U1"]),
    ];

    let g1 = compute_group_balances(&records, &ROSTER, Some("g1"));
    assert_close(g1["U1"], 20.0);
    assert_close(g1["U2"], -10.0);
    assert_close(g1["U3"], -10.0);

    let global = compute_group_balances(&records, &ROSTER, None);
    assert_close(global["U1"], -10.0);
    assert_close(global["U3"], 10.0);
    assert_close(global["U2"], 0.0);
}

#[test]
fn recomputing_is_idempotent() {
    let records = vec![
        ExpenseRecord::expense(None, "U1", 100.0, &["U1", "U2", "U3"]),
        ExpenseRecord::expense(None, "U2", 17.35, &["U3"]),
        ExpenseRecord::settlement(None, "U3", "U1", 12.5),
    ];
    assert_eq!(compute_balances(&records, &ROSTER), compute_balances(&records, &ROSTER));
}

#[test]
fn uneven_split_is_not_rounded_during_accumulation() {
    let records = vec![ExpenseRecord::expense(None, "U1", 100.0, &["U1", "U2", "U3"])];
    let balances = compute_balances(&records, &ROSTER);

    assert_close(balances["U2"], -100.0 / 3.0);
    assert_close(balances.values().sum::<f64>(), 0.0);
}
