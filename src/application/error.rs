use thiserror::Error;

use crate::domain::Amount;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("An account is already registered for ssn: {0}")]
    DuplicateIdentity(String),

    #[error(
        "Insufficient funds in account {account_number}: balance {balance}, required {required}"
    )]
    InsufficientFunds {
        account_number: String,
        balance: Amount,
        required: Amount,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
