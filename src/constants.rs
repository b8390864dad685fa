/// Balances and transfers within this distance of zero count as settled.
pub const SETTLE_EPSILON: f64 = 0.01;

pub const DEFAULT_MAX_AMOUNT: f64 = 1_000_000.0;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

// Audit actions
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const MEMBER_ADDED: &str = "MEMBER_ADDED";
pub const MEMBER_REMOVED: &str = "MEMBER_REMOVED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const EXPENSES_IMPORTED: &str = "EXPENSES_IMPORTED";
pub const SETTLEMENT_RECORDED: &str = "SETTLEMENT_RECORDED";
pub const SUGGESTION_CONFIRMED: &str = "SUGGESTION_CONFIRMED";
