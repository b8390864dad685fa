use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::LedgerError;
use crate::core::models::member::Member;
use crate::core::services::NewExpense;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub members: Vec<Member>,
}

#[derive(Deserialize, ToSchema)]
pub struct AddMemberRequest {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RemoveMemberRequest {
    pub member_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddExpenseRequest {
    pub payer_id: String,
    pub amount: f64,
    pub participant_ids: Vec<String>,
    pub description: String,
    pub category: Option<String>,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<AddExpenseRequest> for NewExpense {
    fn from(req: AddExpenseRequest) -> Self {
        NewExpense {
            payer_id: req.payer_id,
            amount: req.amount,
            participant_ids: req.participant_ids,
            description: req.description,
            category: req.category,
            timestamp: req.timestamp,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct RecordSettlementRequest {
    pub from_id: String,
    pub to_id: String,
    pub amount: f64,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImportQuery {
    /// Member who paid for every imported row.
    pub payer_id: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogQuery {
    /// Only entries attributed to this member.
    pub member_id: Option<String>,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            LedgerError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::AlreadyGroupMember(_) => StatusCode::CONFLICT,
            LedgerError::NotGroupMember(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::CannotRemoveLastMember
            | LedgerError::InvalidInput(..)
            | LedgerError::EmptyParticipants
            | LedgerError::SelfSettlement(_)
            | LedgerError::InvalidImportRow { .. } => StatusCode::BAD_REQUEST,
            LedgerError::StorageError(_) | LedgerError::LoggingError(_) | LedgerError::SubscriptionClosed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let error = match &self.0 {
            LedgerError::InvalidInput(field, detail) => {
                format!("Invalid input for {}: {}", field, detail.description)
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
