use std::str::FromStr;

use rust_decimal::Decimal;

/// Money is represented as an arbitrary-precision decimal to avoid
/// floating-point precision issues. Persisted in its canonical string form.
pub type Amount = Decimal;

/// Parse a stored decimal string back into an amount.
/// Example: "50.00" -> 50.00, "0" -> 0
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    Decimal::from_str(input.trim()).map_err(|_| ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl std::fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
