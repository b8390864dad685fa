use crate::constants::SETTLE_EPSILON;

/// Rounds to cents. Only applied at presentation or suggestion boundaries,
/// never while balances accumulate.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn is_creditor(balance: f64) -> bool {
    balance > SETTLE_EPSILON
}

pub fn is_debtor(balance: f64) -> bool {
    balance < -SETTLE_EPSILON
}

pub fn is_settled(balance: f64) -> bool {
    !is_creditor(balance) && !is_debtor(balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero_to_cents() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(-12.346), -12.35);
        assert_eq!(round2(45.0), 45.0);
    }

    #[test]
    fn sub_cent_balances_are_settled() {
        assert!(is_settled(0.009));
        assert!(is_settled(-0.01));
        assert!(is_creditor(0.011));
        assert!(is_debtor(-0.02));
    }
}
