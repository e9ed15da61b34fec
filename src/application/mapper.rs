//! Hand-written conversions between wire records and persisted entities.
//! Pure functions with no side effects, so they can be tested in isolation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Account, AccountId, Amount, Transaction, TransactionType};

/// Request record for opening a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub forename: String,
    pub surname: String,
    pub ssn: String,
    pub pin: String,
}

/// Wire view of an account, including up to its five most recent
/// transactions, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub account_number: String,
    pub forename: String,
    pub surname: String,
    pub pin: String,
    pub ssn: String,
    pub current_balance: Amount,
    pub last_five_transactions: Vec<TransactionView>,
}

/// Wire view of a single transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    pub transaction_id: String,
    pub amount: Amount,
    pub kind: TransactionType,
    pub date: DateTime<Utc>,
}

/// Build a fresh account entity from a creation request.
/// Balance starts at zero; the account number is generated here and the id
/// is assigned on insert.
pub fn account_from_request(request: CreateAccountRequest) -> Account {
    Account::new(request.forename, request.surname, request.ssn, request.pin)
}

/// Assemble the wire view of an account and its recent transactions.
pub fn account_view(account: Account, transactions: &[Transaction]) -> AccountView {
    AccountView {
        id: account.id,
        account_number: account.account_number,
        forename: account.forename,
        surname: account.surname,
        pin: account.pin,
        ssn: account.ssn,
        current_balance: account.current_balance,
        last_five_transactions: transactions.iter().map(transaction_view).collect(),
    }
}

pub fn transaction_view(transaction: &Transaction) -> TransactionView {
    TransactionView {
        transaction_id: transaction.transaction_id.clone(),
        amount: transaction.amount,
        kind: transaction.kind,
        date: transaction.date,
    }
}
