use anyhow::Context;
use rust_decimal::Decimal;

use crate::domain::{Account, Amount, Transaction, TransactionType};
use crate::storage::Repository;

use super::AppError;
use super::mapper::{self, AccountView, CreateAccountRequest};

/// The ledger service: sole mutator of account and transaction state.
///
/// Every operation runs inside one database transaction. Business-rule
/// violations are detected before any write and abort the whole operation,
/// so nothing is ever partially committed; dropping the uncommitted
/// transaction handle on an early return rolls back.
pub struct BankingService {
    repo: Repository,
}

impl BankingService {
    /// Create a new banking service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Open a new account with a zero balance and a freshly generated
    /// account number. The holder's ssn must not already be registered.
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<AccountView, AppError> {
        let mut tx = self.repo.begin().await?;

        if self.repo.find_by_ssn(&mut tx, &request.ssn).await?.is_some() {
            return Err(AppError::DuplicateIdentity(request.ssn));
        }

        let mut account = mapper::account_from_request(request);
        account.id = self.repo.insert_account(&mut tx, &account).await?;

        tx.commit().await.context("Failed to commit transaction")?;

        log::debug!(
            "Created account {} (id {})",
            account.account_number,
            account.id
        );
        Ok(mapper::account_view(account, &[]))
    }

    /// Close an account, removing it together with all of its transactions.
    /// Closing an unknown account is an error rather than a silent no-op.
    pub async fn close_account(&self, account_number: &str) -> Result<(), AppError> {
        let mut tx = self.repo.begin().await?;

        let account = self.find_account(&mut tx, account_number).await?;

        // Owned transactions go first, then the account row.
        let removed = self.repo.delete_all_by_account(&mut tx, account.id).await?;
        self.repo
            .delete_by_account_number(&mut tx, account_number)
            .await?;

        tx.commit().await.context("Failed to commit transaction")?;

        log::debug!("Closed account {account_number}, removed {removed} transactions");
        Ok(())
    }

    /// Pay funds into an account.
    pub async fn deposit_funds(
        &self,
        account_number: &str,
        amount: Amount,
    ) -> Result<(), AppError> {
        self.post_transaction(account_number, amount, TransactionType::Deposit)
            .await?;
        Ok(())
    }

    /// Pay funds out of an account. Fails with InsufficientFunds when the
    /// amount exceeds the current balance, leaving the account untouched.
    pub async fn withdraw_funds(
        &self,
        account_number: &str,
        amount: Amount,
    ) -> Result<(), AppError> {
        self.post_transaction(account_number, amount, TransactionType::Withdrawal)
            .await?;
        Ok(())
    }

    /// Read the current balance of an account.
    pub async fn get_current_balance(&self, account_number: &str) -> Result<Amount, AppError> {
        let mut tx = self.repo.begin().await?;
        let account = self.find_account(&mut tx, account_number).await?;
        Ok(account.current_balance)
    }

    /// Read an account together with up to its five most recent
    /// transactions, newest first.
    pub async fn get_account_overview(
        &self,
        account_number: &str,
    ) -> Result<AccountView, AppError> {
        let mut tx = self.repo.begin().await?;
        let account = self.find_account(&mut tx, account_number).await?;
        let recent = self
            .repo
            .find_top5_by_account_date_desc(&mut tx, account.id)
            .await?;
        Ok(mapper::account_view(account, &recent))
    }

    /// Post an externally-originated transaction. Only Debit and Check are
    /// accepted: a Check credits the balance like a deposit, a Debit debits
    /// it under the same insufficient-funds rule as a withdrawal. Returns
    /// the generated transaction id.
    pub async fn post_external_transaction(
        &self,
        account_number: &str,
        amount: Amount,
        kind: TransactionType,
    ) -> Result<String, AppError> {
        if !kind.is_external() {
            return Err(AppError::InvalidArgument(format!(
                "external transactions must be Debit or Check, got {kind}"
            )));
        }
        self.post_transaction(account_number, amount, kind).await
    }

    /// Shared money-movement path for all four transaction kinds: adjust the
    /// balance, record exactly one transaction, commit both atomically.
    async fn post_transaction(
        &self,
        account_number: &str,
        amount: Amount,
        kind: TransactionType,
    ) -> Result<String, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidArgument(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let mut tx = self.repo.begin().await?;

        let mut account = self.find_account(&mut tx, account_number).await?;

        if kind.is_credit() {
            account.current_balance += amount;
        } else {
            if !account.can_cover(amount) {
                log::warn!(
                    "Refused {kind} of {amount} against account {account_number}: insufficient funds"
                );
                return Err(AppError::InsufficientFunds {
                    account_number: account_number.to_string(),
                    balance: account.current_balance,
                    required: amount,
                });
            }
            account.current_balance -= amount;
        }

        let transaction = Transaction::new(account.id, amount, kind);
        self.repo.insert_transaction(&mut tx, &transaction).await?;
        self.repo.update_balance(&mut tx, &account).await?;

        tx.commit().await.context("Failed to commit transaction")?;

        log::debug!(
            "Posted {kind} of {amount} to account {account_number} (transaction {})",
            transaction.transaction_id
        );
        Ok(transaction.transaction_id)
    }

    /// Look up an account inside the current transaction, treating absence
    /// as AccountNotFound.
    async fn find_account(
        &self,
        conn: &mut sqlx::SqliteConnection,
        account_number: &str,
    ) -> Result<Account, AppError> {
        self.repo
            .find_by_account_number(conn, account_number)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(account_number.to_string()))
    }
}
