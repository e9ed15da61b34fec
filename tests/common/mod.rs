// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bankcore::application::{BankingService, CreateAccountRequest};
use bankcore::domain::{Amount, parse_amount};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(BankingService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = BankingService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a decimal amount string
pub fn amount(s: &str) -> Amount {
    parse_amount(s).unwrap()
}

/// Helper to build an account creation request for the given holder
pub fn account_request(forename: &str, ssn: &str) -> CreateAccountRequest {
    CreateAccountRequest {
        forename: forename.to_string(),
        surname: "Holder".to_string(),
        ssn: ssn.to_string(),
        pin: "0000".to_string(),
    }
}

/// Open an account and return its generated account number
pub async fn open_account(service: &BankingService, forename: &str, ssn: &str) -> Result<String> {
    let view = service.create_account(account_request(forename, ssn)).await?;
    Ok(view.account_number)
}
