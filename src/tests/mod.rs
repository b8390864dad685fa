mod ledger_tests;
mod service_tests;

use crate::core::models::member::Member;
use crate::core::services::{LedgerService, NewExpense};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub fn create_test_service() -> LedgerService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    LedgerService::new(storage, logging)
}

pub fn roster(ids: &[&str]) -> Vec<Member> {
    ids.iter().map(|id| Member::new(*id, format!("Member {}", id))).collect()
}

pub fn expense(payer: &str, amount: f64, participants: &[&str]) -> NewExpense {
    NewExpense {
        payer_id: payer.to_string(),
        amount,
        participant_ids: participants.iter().map(|p| p.to_string()).collect(),
        description: "Dinner".to_string(),
        category: Some("food".to_string()),
        timestamp: None,
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
