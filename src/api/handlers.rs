use crate::{
    api::models::*,
    core::{
        models::{
            audit::{AppLog, GroupAudit},
            expense::ExpenseRecord,
            group::Group,
            member::Member,
            settlement::SettlementSuggestion,
        },
        services::{GroupLedger, LedgerService},
    },
    infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

pub type SharedService = Arc<LedgerService<InMemoryLogging, InMemoryStorage>>;

// Define API routes
pub fn api_routes(service: SharedService) -> Router {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group))
        .route("/groups/{group_id}/members", post(add_member))
        .route("/groups/{group_id}/members/remove", post(remove_member))
        .route("/groups/{group_id}/expenses", post(add_expense))
        .route("/groups/{group_id}/settlements", post(record_settlement))
        .route("/groups/{group_id}/settlements/confirm", post(confirm_suggestion))
        .route("/groups/{group_id}/ledger", get(get_group_ledger))
        .route("/groups/{group_id}/records", get(get_records))
        .route("/groups/{group_id}/import", post(import_expenses))
        .route("/groups/{group_id}/audits", get(get_group_audits))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 409, description = "Duplicate member", body = ErrorResponse)
    )
)]
pub async fn create_group(
    State(service): State<SharedService>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service.create_group(req.name, req.members).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group found", body = Group),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_group(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(service.get_group(&group_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members",
    params(("group_id" = String, Path, description = "Group id")),
    request_body = AddMemberRequest,
    responses(
        (status = 200, description = "Member added", body = Group),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse)
    )
)]
pub async fn add_member(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service.add_member(&group_id, Member::new(req.id, req.name)).await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members/remove",
    params(("group_id" = String, Path, description = "Group id")),
    request_body = RemoveMemberRequest,
    responses(
        (status = 200, description = "Member removed", body = Group),
        (status = 400, description = "Last member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn remove_member(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
    Json(req): Json<RemoveMemberRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service.remove_member(&group_id, &req.member_id).await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/expenses",
    params(("group_id" = String, Path, description = "Group id")),
    request_body = AddExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = ExpenseRecord),
        (status = 400, description = "Invalid expense", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn add_expense(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseRecord>), ApiError> {
    let record = service.add_expense(&group_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/settlements",
    params(("group_id" = String, Path, description = "Group id")),
    request_body = RecordSettlementRequest,
    responses(
        (status = 201, description = "Settlement recorded", body = ExpenseRecord),
        (status = 400, description = "Invalid settlement", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn record_settlement(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
    Json(req): Json<RecordSettlementRequest>,
) -> Result<(StatusCode, Json<ExpenseRecord>), ApiError> {
    let record = service
        .record_settlement(&group_id, &req.from_id, &req.to_id, req.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/settlements/confirm",
    params(("group_id" = String, Path, description = "Group id")),
    request_body = SettlementSuggestion,
    responses(
        (status = 201, description = "Suggestion applied as a settlement", body = ExpenseRecord),
        (status = 400, description = "Invalid suggestion", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn confirm_suggestion(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
    Json(mut suggestion): Json<SettlementSuggestion>,
) -> Result<(StatusCode, Json<ExpenseRecord>), ApiError> {
    suggestion.group_id = Some(group_id);
    let record = service.confirm_suggestion(&suggestion).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/ledger",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Balances and suggested settlements", body = GroupLedger),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_group_ledger(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupLedger>, ApiError> {
    Ok(Json(service.group_ledger(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/records",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Records, oldest first", body = Vec<ExpenseRecord>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_records(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<ExpenseRecord>>, ApiError> {
    Ok(Json(service.records(&group_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/import",
    params(("group_id" = String, Path, description = "Group id"), ImportQuery),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 201, description = "Rows imported", body = Vec<ExpenseRecord>),
        (status = 400, description = "Invalid row", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn import_expenses(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> Result<(StatusCode, Json<Vec<ExpenseRecord>>), ApiError> {
    let records = service
        .import_csv(&group_id, &query.payer_id, body.as_bytes())
        .await?;
    Ok((StatusCode::CREATED, Json(records)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/audits",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group audit trail", body = Vec<GroupAudit>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_group_audits(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<GroupAudit>>, ApiError> {
    Ok(Json(service.get_group_audits(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogQuery),
    responses((status = 200, description = "Application logs", body = Vec<AppLog>))
)]
pub async fn get_app_logs(
    State(service): State<SharedService>,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs(query.member_id.as_deref()).await?))
}
