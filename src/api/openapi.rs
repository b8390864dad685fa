use utoipa::OpenApi;

use crate::{
    api::models::{
        AddExpenseRequest, AddMemberRequest, CreateGroupRequest, ErrorResponse, RecordSettlementRequest,
        RemoveMemberRequest,
    },
    core::{
        models::{
            audit::{AppLog, GroupAudit},
            expense::ExpenseRecord,
            group::Group,
            member::Member,
            settlement::SettlementSuggestion,
        },
        services::{GroupLedger, MemberBalance},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_group,
        super::handlers::get_group,
        super::handlers::add_member,
        super::handlers::remove_member,
        super::handlers::add_expense,
        super::handlers::record_settlement,
        super::handlers::confirm_suggestion,
        super::handlers::get_group_ledger,
        super::handlers::get_records,
        super::handlers::import_expenses,
        super::handlers::get_group_audits,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateGroupRequest,
        AddMemberRequest,
        RemoveMemberRequest,
        AddExpenseRequest,
        RecordSettlementRequest,
        ErrorResponse,
        Member,
        Group,
        ExpenseRecord,
        SettlementSuggestion,
        MemberBalance,
        GroupLedger,
        AppLog,
        GroupAudit
    )),
    info(
        title = "Tabsplit API",
        description = "Shared expense ledger with balance and settlement suggestions",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
