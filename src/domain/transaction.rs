use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, Amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Funds paid in through the normal deposit entry point
    Deposit,
    /// Funds paid out through the normal withdrawal entry point
    Withdrawal,
    /// Externally-originated posting that debits the account
    Debit,
    /// Externally-originated posting that credits the account
    Check,
}

impl TransactionType {
    /// Stable integer code for each kind.
    pub fn code(&self) -> i32 {
        match self {
            TransactionType::Deposit => 1,
            TransactionType::Withdrawal => 2,
            TransactionType::Debit => 3,
            TransactionType::Check => 4,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Debit => "Debit",
            TransactionType::Check => "Check",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Debit => "debit",
            TransactionType::Check => "check",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(TransactionType::Deposit),
            "withdrawal" => Some(TransactionType::Withdrawal),
            "debit" => Some(TransactionType::Debit),
            "check" => Some(TransactionType::Check),
            _ => None,
        }
    }

    /// Returns true if this kind increases the account balance.
    /// Deposit and Check credit; Withdrawal and Debit debit.
    pub fn is_credit(&self) -> bool {
        matches!(self, TransactionType::Deposit | TransactionType::Check)
    }

    /// Returns true if this kind may be posted by an external service.
    pub fn is_external(&self) -> bool {
        matches!(self, TransactionType::Debit | TransactionType::Check)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single committed money movement against one account.
/// Transactions are immutable; they are only ever deleted as a cascade of
/// account closure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// External identity, generated at creation time.
    pub transaction_id: String,
    /// Owning account (store-assigned id).
    pub account_id: AccountId,
    /// Always non-negative; the kind determines the balance direction.
    pub amount: Amount,
    pub kind: TransactionType,
    /// Moment of posting.
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Build a transaction dated now with a freshly generated id.
    pub fn new(account_id: AccountId, amount: Amount, kind: TransactionType) -> Self {
        Self {
            transaction_id: Uuid::new_v4().to_string(),
            account_id,
            amount,
            kind,
            date: Utc::now(),
        }
    }
}
