use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Errors raised by the ingestion and service layers. The ledger and matcher
/// themselves never fail.
#[derive(Error, Debug, Serialize)]
pub enum LedgerError {
    #[error("Group {0} not found")]
    GroupNotFound(String),
    #[error("Member {0} is already a group member")]
    AlreadyGroupMember(String),
    #[error("Member {0} is not a group member")]
    NotGroupMember(String),
    #[error("Cannot remove last group member")]
    CannotRemoveLastMember,
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Expense must be shared by at least one member")]
    EmptyParticipants,
    #[error("Cannot record a settlement from {0} to themselves")]
    SelfSettlement(String),
    #[error("Invalid import row at line {line}: {reason}")]
    InvalidImportRow { line: u64, reason: String },
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("Record feed for group {0} closed")]
    SubscriptionClosed(String),
}
