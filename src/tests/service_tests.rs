use crate::constants::{EXPENSE_ADDED, GROUP_CREATED, SETTLEMENT_RECORDED, SUGGESTION_CONFIRMED};
use crate::core::errors::LedgerError;
use crate::core::models::member::Member;
use crate::infrastructure::logging::into_details;
use crate::tests::{assert_close, create_test_service, expense, roster};
use std::time::Duration;

#[tokio::test]
async fn test_expense_then_ledger() {
    let service = create_test_service();
    let group = service
        .create_group("Trip".to_string(), roster(&["U1", "U2", "U3"]))
        .await
        .unwrap();

    service.add_expense(&group.id, expense("U1", 90.0, &["U2", "U3"])).await.unwrap();

    let ledger = service.group_ledger(&group.id).await.unwrap();
    let ids: Vec<&str> = ledger.balances.iter().map(|b| b.member_id.as_str()).collect();
    assert_eq!(ids, vec!["U1", "U2", "U3"]);
    assert_close(ledger.balance_of("U1").unwrap(), 90.0);
    assert_close(ledger.balance_of("U2").unwrap(), -45.0);
    assert_eq!(ledger.settlements.len(), 2);
    assert_eq!(ledger.settlements[0].from, "U2");
    assert_eq!(ledger.settlements[1].from, "U3");
    assert!(
        ledger
            .settlements
            .iter()
            .all(|s| s.to == "U1" && s.amount == 45.0 && s.group_id.as_deref() == Some(group.id.as_str()))
    );
}

#[tokio::test]
async fn test_confirming_all_suggestions_settles_group() {
    let service = create_test_service();
    let group = service
        .create_group("Flat".to_string(), roster(&["A", "B", "C"]))
        .await
        .unwrap();
    service.add_expense(&group.id, expense("A", 100.0, &["A", "B", "C"])).await.unwrap();
    service.add_expense(&group.id, expense("B", 45.5, &["A", "C"])).await.unwrap();

    let ledger = service.group_ledger(&group.id).await.unwrap();
    assert!(!ledger.settlements.is_empty());
    for suggestion in &ledger.settlements {
        let record = service.confirm_suggestion(suggestion).await.unwrap();
        assert!(record.is_settlement);
        assert_eq!(record.payer, suggestion.from);
        assert_eq!(record.participants, vec![suggestion.to.clone()]);
        assert_eq!(record.amount, suggestion.amount);
    }

    let settled = service.group_ledger(&group.id).await.unwrap();
    assert!(settled.settlements.is_empty());
    assert!(settled.is_settled());

    let audits = service.get_group_audits(&group.id).await.unwrap();
    let confirmations = audits.iter().filter(|a| a.action == SUGGESTION_CONFIRMED).count();
    assert_eq!(confirmations, ledger.settlements.len());
}

#[tokio::test]
async fn test_manual_settlement_reduces_balances() {
    let service = create_test_service();
    let group = service
        .create_group("Trip".to_string(), roster(&["U1", "U2", "U3"]))
        .await
        .unwrap();
    service.add_expense(&group.id, expense("U1", 90.0, &["U2", "U3"])).await.unwrap();

    service.record_settlement(&group.id, "U2", "U1", 45.0).await.unwrap();

    let ledger = service.group_ledger(&group.id).await.unwrap();
    assert_close(ledger.balance_of("U2").unwrap(), 0.0);
    assert_close(ledger.balance_of("U1").unwrap(), 45.0);
    assert_eq!(ledger.settlements.len(), 1);
    assert_eq!(ledger.settlements[0].from, "U3");
}

#[tokio::test]
async fn test_invalid_expenses_are_rejected() {
    let service = create_test_service();
    let group = service
        .create_group("Trip".to_string(), roster(&["U1", "U2"]))
        .await
        .unwrap();

    let result = service.add_expense(&group.id, expense("U1", 10.0, &[])).await;
    assert!(matches!(result, Err(LedgerError::EmptyParticipants)));

    let result = service.add_expense(&group.id, expense("U1", 10.0, &["U9"])).await;
    assert!(matches!(result, Err(LedgerError::NotGroupMember(id)) if id == "U9"));

    let result = service.add_expense(&group.id, expense("U9", 10.0, &["U1"])).await;
    assert!(matches!(result, Err(LedgerError::NotGroupMember(id)) if id == "U9"));

    let result = service.add_expense(&group.id, expense("U1", -3.0, &["U2"])).await;
    assert!(matches!(result, Err(LedgerError::InvalidInput(field, _)) if field == "amount"));

    let result = service.add_expense(&group.id, expense("U1", 10.0, &["U2", "U2"])).await;
    assert!(matches!(result, Err(LedgerError::InvalidInput(field, _)) if field == "participant_ids"));

    let result = service.add_expense("missing", expense("U1", 10.0, &["U2"])).await;
    assert!(matches!(result, Err(LedgerError::GroupNotFound(_))));

    assert!(service.records(&group.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_settlements_are_rejected() {
    let service = create_test_service();
    let group = service
        .create_group("Trip".to_string(), roster(&["U1", "U2"]))
        .await
        .unwrap();

    let result = service.record_settlement(&group.id, "U1", "U1", 5.0).await;
    assert!(matches!(result, Err(LedgerError::SelfSettlement(_))));

    let result = service.record_settlement(&group.id, "U1", "U7", 5.0).await;
    assert!(matches!(result, Err(LedgerError::NotGroupMember(_))));

    let result = service.record_settlement(&group.id, "U1", "U2", 0.0).await;
    assert!(matches!(result, Err(LedgerError::InvalidInput(..))));

    let mut suggestion = crate::SettlementSuggestion {
        id: "x".to_string(),
        from: "U1".to_string(),
        to: "U2".to_string(),
        amount: 5.0,
        group_id: None,
    };
    let result = service.confirm_suggestion(&suggestion).await;
    assert!(matches!(result, Err(LedgerError::InvalidInput(field, _)) if field == "group_id"));

    suggestion.group_id = Some(group.id.clone());
    assert!(service.confirm_suggestion(&suggestion).await.is_ok());
}

#[tokio::test]
async fn test_group_directory() {
    let service = create_test_service();

    let result = service
        .create_group("Dupes".to_string(), vec![Member::new("A", "Ann"), Member::new("A", "Again")])
        .await;
    assert!(matches!(result, Err(LedgerError::AlreadyGroupMember(_))));

    let result = service.create_group("  ".to_string(), roster(&["A"])).await;
    assert!(matches!(result, Err(LedgerError::InvalidInput(..))));

    let group = service.create_group("Solo".to_string(), roster(&["A"])).await.unwrap();
    let result = service.remove_member(&group.id, "A").await;
    assert!(matches!(result, Err(LedgerError::CannotRemoveLastMember)));

    let group = service.add_member(&group.id, Member::new("B", "Bea")).await.unwrap();
    assert_eq!(group.members.len(), 2);
    let result = service.add_member(&group.id, Member::new("B", "Bea")).await;
    assert!(matches!(result, Err(LedgerError::AlreadyGroupMember(_))));

    let result = service.remove_member(&group.id, "Z").await;
    assert!(matches!(result, Err(LedgerError::NotGroupMember(_))));
}

#[tokio::test]
async fn test_removed_member_drops_out_of_ledger() {
    let service = create_test_service();
    let group = service
        .create_group("Trip".to_string(), roster(&["U1", "U2", "U3"]))
        .await
        .unwrap();
    service.add_expense(&group.id, expense("U1", 90.0, &["U2", "U3"])).await.unwrap();

    service.remove_member(&group.id, "U3").await.unwrap();

    let ledger = service.group_ledger(&group.id).await.unwrap();
    assert_eq!(ledger.balances.len(), 2);
    assert_eq!(ledger.balance_of("U3"), None);
    assert_eq!(ledger.settlements.len(), 1);
    assert_eq!(ledger.settlements[0].from, "U2");
    assert_eq!(ledger.settlements[0].amount, 45.0);
}

#[tokio::test]
async fn test_import_csv() {
    let service = create_test_service();
    let group = service
        .create_group("House".to_string(), roster(&["A", "B"]))
        .await
        .unwrap();
    let data = "date,description,category,amount\n\
                2024-03-02,Electricity,utilities,80\n\
                2024-03-01,Groceries,food,42.50\n";

    let imported = service.import_csv(&group.id, "A", data.as_bytes()).await.unwrap();
    assert_eq!(imported.len(), 2);
    assert!(imported.iter().all(|r| r.participants == vec!["A", "B"] && !r.is_settlement));

    let records = service.records(&group.id).await.unwrap();
    assert_eq!(records[0].description, "Groceries");
    assert_eq!(records[1].description, "Electricity");

    let ledger = service.group_ledger(&group.id).await.unwrap();
    assert_close(ledger.balance_of("A").unwrap(), 61.25);
    assert_close(ledger.balance_of("B").unwrap(), -61.25);
}

#[tokio::test]
async fn test_import_is_all_or_nothing() {
    let service = create_test_service();
    let group = service
        .create_group("House".to_string(), roster(&["A", "B"]))
        .await
        .unwrap();
    let data = "date,description,category,amount\n\
                2024-03-01,Groceries,food,42.50\n\
                2024-03-02,Refund,food,-10\n";

    let result = service.import_csv(&group.id, "A", data.as_bytes()).await;
    assert!(matches!(result, Err(LedgerError::InvalidImportRow { line: 3, .. })));
    assert!(service.records(&group.id).await.unwrap().is_empty());

    let result = service.import_csv(&group.id, "Z", data.as_bytes()).await;
    assert!(matches!(result, Err(LedgerError::NotGroupMember(_))));
}

#[tokio::test]
async fn test_subscription_recomputes_on_each_change() {
    let service = create_test_service();
    let group = service
        .create_group("Trip".to_string(), roster(&["U1", "U2"]))
        .await
        .unwrap();
    let mut subscription = service.subscribe(&group.id).await.unwrap();

    service.add_expense(&group.id, expense("U1", 50.0, &["U1", "U2"])).await.unwrap();
    let ledger = tokio::time::timeout(Duration::from_secs(1), subscription.next())
        .await
        .expect("no snapshot delivered")
        .unwrap();
    assert_close(ledger.balance_of("U2").unwrap(), -25.0);
    assert_eq!(ledger.settlements.len(), 1);

    service.record_settlement(&group.id, "U2", "U1", 25.0).await.unwrap();
    let ledger = tokio::time::timeout(Duration::from_secs(1), subscription.next())
        .await
        .expect("no snapshot delivered")
        .unwrap();
    assert_close(ledger.balance_of("U2").unwrap(), 0.0);
    assert!(ledger.settlements.is_empty());
    assert!(ledger.is_settled());

    assert!(matches!(service.subscribe("missing").await, Err(LedgerError::GroupNotFound(_))));
}

#[tokio::test]
async fn test_actions_are_logged_and_audited() {
    let service = create_test_service();
    let group = service
        .create_group("Trip".to_string(), roster(&["U1", "U2"]))
        .await
        .unwrap();
    service.add_expense(&group.id, expense("U1", 20.0, &["U2"])).await.unwrap();
    service.record_settlement(&group.id, "U2", "U1", 20.0).await.unwrap();

    let actions: Vec<String> = service
        .get_group_audits(&group.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.action)
        .collect();
    assert_eq!(actions, vec![GROUP_CREATED, EXPENSE_ADDED, SETTLEMENT_RECORDED]);

    let logs = service.get_app_logs(None).await.unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[1].member_id.as_deref(), Some("U1"));
    assert_eq!(logs[1].details["amount"], serde_json::json!(20.0));

    let audits = service.get_group_audits(&group.id).await.unwrap();
    assert_eq!(audits[1].details, logs[1].details);
    assert_eq!(audits[1].timestamp, logs[1].timestamp);

    let from_u2 = service.get_app_logs(Some("U2")).await.unwrap();
    assert_eq!(from_u2.len(), 1);
    assert_eq!(from_u2[0].action, SETTLEMENT_RECORDED);
    assert!(service.get_app_logs(Some("U9")).await.unwrap().is_empty());
}

#[test]
fn test_log_details_must_be_an_object() {
    let details = into_details(EXPENSE_ADDED, serde_json::json!({ "amount": 12.5 })).unwrap();
    assert_eq!(details["amount"], serde_json::json!(12.5));

    let result = into_details(EXPENSE_ADDED, serde_json::json!([1, 2]));
    assert!(matches!(result, Err(LedgerError::LoggingError(_))));
}
