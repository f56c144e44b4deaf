//! Money helpers. Amounts are whole pesos (CLP has no minor unit in practice).

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Negative amount: {0}")]
    Negative(i64),
}

/// Render an amount the way the shop prints prices: `$` plus the integer with
/// `.` as thousands separator (`3500` → `$3.500`).
pub fn format_price(amount: i64) -> Result<String, MoneyError> {
    if amount < 0 {
        return Err(MoneyError::Negative(amount));
    }

    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    Ok(format!("${}", grouped))
}
