use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool};

use crate::domain::{Account, AccountId, Transaction, TransactionType, parse_amount};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying accounts and transactions.
///
/// The pool is capped at a single connection: SQLite allows one writer at a
/// time, and funneling every transaction through one connection serializes
/// concurrent operations instead of surfacing busy errors mid-transaction.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Begin a database transaction. SQLite transactions are serializable;
    /// dropping the handle without committing rolls back.
    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin transaction")
    }

    // ========================
    // Account operations
    // ========================

    /// Insert a new account and return its store-assigned id.
    pub async fn insert_account(
        &self,
        conn: &mut SqliteConnection,
        account: &Account,
    ) -> Result<AccountId> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (account_number, forename, surname, ssn, pin, current_balance, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.account_number)
        .bind(&account.forename)
        .bind(&account.surname)
        .bind(&account.ssn)
        .bind(&account.pin)
        .bind(account.current_balance.to_string())
        .bind(account.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .context("Failed to insert account")?;

        Ok(result.last_insert_rowid())
    }

    /// Get an account by its account number.
    pub async fn find_by_account_number(
        &self,
        conn: &mut SqliteConnection,
        account_number: &str,
    ) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_number, forename, surname, ssn, pin, current_balance, created_at
            FROM accounts
            WHERE account_number = ?
            "#,
        )
        .bind(account_number)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch account by number")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// Get an account by the holder's ssn.
    pub async fn find_by_ssn(
        &self,
        conn: &mut SqliteConnection,
        ssn: &str,
    ) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_number, forename, surname, ssn, pin, current_balance, created_at
            FROM accounts
            WHERE ssn = ?
            "#,
        )
        .bind(ssn)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch account by ssn")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// Persist a new balance for an account.
    pub async fn update_balance(
        &self,
        conn: &mut SqliteConnection,
        account: &Account,
    ) -> Result<()> {
        sqlx::query("UPDATE accounts SET current_balance = ? WHERE id = ?")
            .bind(account.current_balance.to_string())
            .bind(account.id)
            .execute(&mut *conn)
            .await
            .context("Failed to update balance")?;
        Ok(())
    }

    /// Delete an account by its account number. Returns the number of rows
    /// removed (zero when no such account exists).
    pub async fn delete_by_account_number(
        &self,
        conn: &mut SqliteConnection,
        account_number: &str,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM accounts WHERE account_number = ?")
            .bind(account_number)
            .execute(&mut *conn)
            .await
            .context("Failed to delete account")?;
        Ok(result.rows_affected())
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let balance_str: String = row.get("current_balance");
        let created_at_str: String = row.get("created_at");

        Ok(Account {
            id: row.get("id"),
            account_number: row.get("account_number"),
            forename: row.get("forename"),
            surname: row.get("surname"),
            ssn: row.get("ssn"),
            pin: row.get("pin"),
            current_balance: parse_amount(&balance_str)
                .map_err(|_| anyhow::anyhow!("Invalid balance: {}", balance_str))?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// Insert a new transaction record.
    pub async fn insert_transaction(
        &self,
        conn: &mut SqliteConnection,
        transaction: &Transaction,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (transaction_id, account_id, amount, kind, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.transaction_id)
        .bind(transaction.account_id)
        .bind(transaction.amount.to_string())
        .bind(transaction.kind.as_str())
        .bind(transaction.date.to_rfc3339())
        .execute(&mut *conn)
        .await
        .context("Failed to insert transaction")?;
        Ok(())
    }

    /// Delete every transaction owned by an account.
    pub async fn delete_all_by_account(
        &self,
        conn: &mut SqliteConnection,
        account_id: AccountId,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM transactions WHERE account_id = ?")
            .bind(account_id)
            .execute(&mut *conn)
            .await
            .context("Failed to delete transactions")?;
        Ok(result.rows_affected())
    }

    /// Fetch the five most recent transactions for an account, newest first.
    /// Ties on date break on transaction id, descending, so the order is
    /// deterministic.
    pub async fn find_top5_by_account_date_desc(
        &self,
        conn: &mut SqliteConnection,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT transaction_id, account_id, amount, kind, date
            FROM transactions
            WHERE account_id = ?
            ORDER BY date DESC, transaction_id DESC
            LIMIT 5
            "#,
        )
        .bind(account_id)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to fetch recent transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Count transactions owned by an account.
    pub async fn count_by_account(
        &self,
        conn: &mut SqliteConnection,
        account_id: AccountId,
    ) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM transactions WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(&mut *conn)
            .await
            .context("Failed to count transactions")?;
        Ok(row.get("count"))
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let amount_str: String = row.get("amount");
        let kind_str: String = row.get("kind");
        let date_str: String = row.get("date");

        Ok(Transaction {
            transaction_id: row.get("transaction_id"),
            account_id: row.get("account_id"),
            amount: parse_amount(&amount_str)
                .map_err(|_| anyhow::anyhow!("Invalid amount: {}", amount_str))?,
            kind: TransactionType::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            date: DateTime::parse_from_rfc3339(&date_str)
                .context("Invalid transaction date")?
                .with_timezone(&Utc),
        })
    }
}
