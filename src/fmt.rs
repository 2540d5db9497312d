use crate::models::TransactionType;

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let groups: Vec<String> = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect())
        .collect();
    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}${}.{dec_part}", groups.join(","))
}

/// Amount as it affects the balance: outcomes are shown negative.
pub fn signed_money(kind: TransactionType, value: f64) -> String {
    match kind {
        TransactionType::Income => money(value),
        TransactionType::Outcome => money(-value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
        assert_eq!(money(999.999), "$1,000.00");
    }

    #[test]
    fn test_signed_money() {
        assert_eq!(signed_money(TransactionType::Income, 5000.0), "$5,000.00");
        assert_eq!(signed_money(TransactionType::Outcome, 1200.0), "-$1,200.00");
    }
}
