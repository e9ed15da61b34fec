use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

/// Store-assigned row identity. Zero until the account has been persisted.
pub type AccountId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// External identity, generated at creation time and immutable.
    pub account_number: String,
    pub forename: String,
    pub surname: String,
    /// Unique across all accounts; a second registration is rejected.
    pub ssn: String,
    /// Authentication credential, opaque to the ledger logic.
    pub pin: String,
    /// Never negative after a committed operation.
    pub current_balance: Amount,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance and a fresh account number.
    /// The id is assigned by the repository on insert.
    pub fn new(
        forename: impl Into<String>,
        surname: impl Into<String>,
        ssn: impl Into<String>,
        pin: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            account_number: Uuid::new_v4().to_string(),
            forename: forename.into(),
            surname: surname.into(),
            ssn: ssn.into(),
            pin: pin.into(),
            current_balance: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Whether the balance covers a debit of the given amount.
    pub fn can_cover(&self, amount: Amount) -> bool {
        amount <= self.current_balance
    }
}
