mod common;

use anyhow::Result;
use bankcore::application::AppError;
use bankcore::domain::TransactionType;
use chrono::Utc;
use common::{amount, open_account, test_service};

#[tokio::test]
async fn test_deposit_increases_balance_and_records_transaction() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let number = open_account(&service, "Ada", "900-11-2233").await?;

    let before = Utc::now();
    service.deposit_funds(&number, amount("50")).await?;

    assert_eq!(service.get_current_balance(&number).await?, amount("50"));

    let overview = service.get_account_overview(&number).await?;
    assert_eq!(overview.last_five_transactions.len(), 1);
    let recorded = &overview.last_five_transactions[0];
    assert_eq!(recorded.kind, TransactionType::Deposit);
    assert_eq!(recorded.amount, amount("50"));
    assert!(recorded.date >= before);

    Ok(())
}

#[tokio::test]
async fn test_withdraw_decreases_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let number = open_account(&service, "Ada", "900-11-2233").await?;

    service.deposit_funds(&number, amount("100")).await?;
    service.withdraw_funds(&number, amount("37.50")).await?;

    assert_eq!(service.get_current_balance(&number).await?, amount("62.50"));

    let overview = service.get_account_overview(&number).await?;
    assert_eq!(overview.last_five_transactions.len(), 2);
    assert_eq!(
        overview.last_five_transactions[0].kind,
        TransactionType::Withdrawal
    );

    Ok(())
}

#[tokio::test]
async fn test_balance_is_sum_of_committed_movements() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let number = open_account(&service, "Ada", "900-11-2233").await?;

    service.deposit_funds(&number, amount("100")).await?;
    service.withdraw_funds(&number, amount("30")).await?;
    service.deposit_funds(&number, amount("7.25")).await?;
    service
        .post_external_transaction(&number, amount("2.25"), TransactionType::Debit)
        .await?;

    assert_eq!(service.get_current_balance(&number).await?, amount("75.00"));

    Ok(())
}

#[tokio::test]
async fn test_insufficient_funds_leaves_state_unchanged() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let number = open_account(&service, "Ada", "900-11-2233").await?;

    service.deposit_funds(&number, amount("30")).await?;

    let err = service
        .withdraw_funds(&number, amount("50"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientFunds { .. }));

    // Neither the balance nor the transaction set changed
    assert_eq!(service.get_current_balance(&number).await?, amount("30"));
    let overview = service.get_account_overview(&number).await?;
    assert_eq!(overview.last_five_transactions.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_withdraw_up_to_exact_balance_succeeds() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let number = open_account(&service, "Ada", "900-11-2233").await?;

    service.deposit_funds(&number, amount("30")).await?;
    service.withdraw_funds(&number, amount("30")).await?;

    assert_eq!(service.get_current_balance(&number).await?, amount("0"));

    Ok(())
}

#[tokio::test]
async fn test_non_positive_amounts_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let number = open_account(&service, "Ada", "900-11-2233").await?;

    let err = service
        .deposit_funds(&number, amount("-5"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let err = service
        .withdraw_funds(&number, amount("0"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    assert_eq!(service.get_current_balance(&number).await?, amount("0"));
    let overview = service.get_account_overview(&number).await?;
    assert!(overview.last_five_transactions.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_movements_on_unknown_account_are_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .deposit_funds("no-such-account", amount("10"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(_)));

    let err = service
        .withdraw_funds("no-such-account", amount("10"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(_)));

    Ok(())
}
