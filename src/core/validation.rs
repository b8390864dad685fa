use crate::core::errors::{FieldError, LedgerError};

pub fn validate_string_input(field: &str, value: &str, max_length: usize) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidInput(
            field.to_string(),
            FieldError::new(field, format!("Invalid {}", field), format!("{} cannot be empty", field)),
        ));
    }
    if value.chars().count() > max_length {
        return Err(LedgerError::InvalidInput(
            field.to_string(),
            FieldError::new(
                field,
                format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ),
        ));
    }
    if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
        return Err(LedgerError::InvalidInput(
            field.to_string(),
            FieldError::new(
                field,
                format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ),
        ));
    }
    Ok(())
}

pub fn validate_amount_input(field: &str, amount: f64, max_amount: f64) -> Result<(), LedgerError> {
    let reject = |title: &str, description: String| {
        Err(LedgerError::InvalidInput(
            field.to_string(),
            FieldError::new(field, title, description),
        ))
    };

    if !amount.is_finite() {
        return reject("Invalid Amount", "Amount must be a finite number".to_string());
    }
    if amount <= 0.0 {
        return reject("Invalid Amount", "Amount must be greater than 0".to_string());
    }
    if amount > max_amount {
        return reject("Amount Too Large", format!("Amount cannot exceed {}", max_amount));
    }
    let cents = amount * 100.0;
    if (cents - cents.round()).abs() > 1e-6 {
        return reject(
            "Invalid Amount",
            "Amount cannot have more than 2 decimal places".to_string(),
        );
    }
    Ok(())
}
