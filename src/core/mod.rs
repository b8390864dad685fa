pub mod errors;
pub mod import;
pub mod ledger;
pub mod matcher;
pub mod models;
pub mod money;
pub mod services;
pub mod validation;
