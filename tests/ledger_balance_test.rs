mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use moneta_core::accounts::{AccountError, AccountServiceTrait, NewAccount};
use moneta_core::categories::{CategoryServiceTrait, NewCategory};
use moneta_core::errors::Error;
use moneta_core::ledger::{
    LedgerError, LedgerServiceTrait, NewTransaction, NewTransfer, TransactionType,
    TransactionUpdate,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_account(name: &str, currency: &str, balance: rust_decimal::Decimal) -> NewAccount {
    NewAccount {
        id: None,
        name: name.to_string(),
        currency: currency.to_string(),
        balance: Some(balance),
    }
}

fn new_expense(account: &str, amount: rust_decimal::Decimal) -> NewTransaction {
    NewTransaction {
        id: None,
        account_name: account.to_string(),
        amount,
        currency: "USD".to_string(),
        category_name: "Food".to_string(),
        txn_type: TransactionType::Expense,
        txn_date: date(2024, 3, 4),
        comment: None,
        related_debt_id: None,
    }
}

#[tokio::test]
async fn expense_and_income_round_trip_the_balance() {
    let core = common::setup();
    let wallet = core
        .accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();
    core.categories
        .create_category(NewCategory {
            id: None,
            name: "Food".to_string(),
        })
        .await
        .unwrap();

    let expense = core
        .ledger
        .add_transaction(new_expense("Wallet", dec!(50)))
        .await
        .unwrap();
    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(450)
    );

    core.ledger.delete_transaction(&expense.id).await.unwrap();
    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(500)
    );

    let mut income = new_expense("Wallet", dec!(200));
    income.txn_type = TransactionType::Income;
    let income = core.ledger.add_transaction(income).await.unwrap();
    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(700)
    );

    core.ledger.delete_transaction(&income.id).await.unwrap();
    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(500)
    );
}

#[tokio::test]
async fn updating_a_transaction_reverses_the_old_effect() {
    let core = common::setup();
    let wallet = core
        .accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();
    core.categories
        .create_category(NewCategory {
            id: None,
            name: "Food".to_string(),
        })
        .await
        .unwrap();

    let expense = core
        .ledger
        .add_transaction(new_expense("Wallet", dec!(50)))
        .await
        .unwrap();

    core.ledger
        .update_transaction(TransactionUpdate {
            id: expense.id.clone(),
            account_name: "Wallet".to_string(),
            amount: dec!(80),
            currency: "USD".to_string(),
            category_name: "Food".to_string(),
            txn_type: TransactionType::Expense,
            txn_date: date(2024, 3, 4),
            comment: None,
            related_debt_id: None,
        })
        .await
        .unwrap();

    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(420)
    );
}

#[tokio::test]
async fn transfer_and_delete_are_exact_inverses() {
    let core = common::setup();
    let wallet = core
        .accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();
    let bank = core
        .accounts
        .create_account(new_account("Bank", "USD", dec!(100)))
        .await
        .unwrap();

    let transfer = core
        .ledger
        .add_transfer(NewTransfer {
            id: None,
            source_account: "Wallet".to_string(),
            destination_account: "Bank".to_string(),
            amount: dec!(200),
            currency: "USD".to_string(),
            txn_date: date(2024, 3, 4),
            comment: None,
            destination_amount: None,
            destination_currency: None,
        })
        .await
        .unwrap();

    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(300)
    );
    assert_eq!(core.accounts.get_account(&bank.id).unwrap().balance, dec!(300));

    core.ledger.delete_transfer(&transfer.id).await.unwrap();
    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(500)
    );
    assert_eq!(core.accounts.get_account(&bank.id).unwrap().balance, dec!(100));
}

#[tokio::test]
async fn missing_category_is_rejected_without_balance_effect() {
    let core = common::setup();
    let wallet = core
        .accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();

    let result = core
        .ledger
        .add_transaction(new_expense("Wallet", dec!(50)))
        .await;

    assert!(matches!(
        result,
        Err(Error::Ledger(LedgerError::CategoryNotFound(_)))
    ));
    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(500)
    );
    assert!(core.ledger.list_transactions().unwrap().is_empty());
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let core = common::setup();
    let result = core
        .ledger
        .add_transaction(new_expense("Wallet", dec!(-5)))
        .await;
    assert!(matches!(
        result,
        Err(Error::Ledger(LedgerError::InvalidAmount(_)))
    ));
}

#[tokio::test]
async fn referenced_account_cannot_be_deleted() {
    let core = common::setup();
    let wallet = core
        .accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();
    core.categories
        .create_category(NewCategory {
            id: None,
            name: "Food".to_string(),
        })
        .await
        .unwrap();
    core.ledger
        .add_transaction(new_expense("Wallet", dec!(50)))
        .await
        .unwrap();

    let result = core.accounts.delete_account(&wallet.id).await;
    assert!(matches!(
        result,
        Err(Error::Account(AccountError::HasDependents(_)))
    ));
}

#[tokio::test]
async fn cross_currency_transfer_requires_explicit_destination_amount() {
    let core = common::setup();
    let wallet = core
        .accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();
    let bank = core
        .accounts
        .create_account(new_account("Euro Bank", "EUR", dec!(100)))
        .await
        .unwrap();

    let implicit = core
        .ledger
        .add_transfer(NewTransfer {
            id: None,
            source_account: "Wallet".to_string(),
            destination_account: "Euro Bank".to_string(),
            amount: dec!(100),
            currency: "USD".to_string(),
            txn_date: date(2024, 3, 4),
            comment: None,
            destination_amount: None,
            destination_currency: None,
        })
        .await;
    assert!(matches!(
        implicit,
        Err(Error::Ledger(LedgerError::CurrencyMismatch { .. }))
    ));

    core.ledger
        .add_transfer(NewTransfer {
            id: None,
            source_account: "Wallet".to_string(),
            destination_account: "Euro Bank".to_string(),
            amount: dec!(100),
            currency: "USD".to_string(),
            txn_date: date(2024, 3, 4),
            comment: None,
            destination_amount: Some(dec!(90)),
            destination_currency: Some("EUR".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(400)
    );
    assert_eq!(core.accounts.get_account(&bank.id).unwrap().balance, dec!(190));
}

#[tokio::test]
async fn deleting_a_cross_currency_transfer_restores_both_balances() {
    let core = common::setup();
    let wallet = core
        .accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();
    let bank = core
        .accounts
        .create_account(new_account("Euro Bank", "EUR", dec!(100)))
        .await
        .unwrap();

    let transfer = core
        .ledger
        .add_transfer(NewTransfer {
            id: None,
            source_account: "Wallet".to_string(),
            destination_account: "Euro Bank".to_string(),
            amount: dec!(100),
            currency: "USD".to_string(),
            txn_date: date(2024, 3, 4),
            comment: None,
            destination_amount: Some(dec!(90)),
            destination_currency: Some("EUR".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(transfer.credited_amount(), dec!(90));

    // Reversal must undo the destination amount, not the debited amount.
    core.ledger.delete_transfer(&transfer.id).await.unwrap();
    assert_eq!(
        core.accounts.get_account(&wallet.id).unwrap().balance,
        dec!(500)
    );
    assert_eq!(core.accounts.get_account(&bank.id).unwrap().balance, dec!(100));
}

#[tokio::test]
async fn renaming_an_account_patches_referencing_rows() {
    let core = common::setup();
    let wallet = core
        .accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();
    core.accounts
        .create_account(new_account("Bank", "USD", dec!(100)))
        .await
        .unwrap();
    core.categories
        .create_category(NewCategory {
            id: None,
            name: "Food".to_string(),
        })
        .await
        .unwrap();

    core.ledger
        .add_transaction(new_expense("Wallet", dec!(50)))
        .await
        .unwrap();
    core.ledger
        .add_transfer(NewTransfer {
            id: None,
            source_account: "Wallet".to_string(),
            destination_account: "Bank".to_string(),
            amount: dec!(10),
            currency: "USD".to_string(),
            txn_date: date(2024, 3, 4),
            comment: None,
            destination_amount: None,
            destination_currency: None,
        })
        .await
        .unwrap();

    let renamed = core.ledger.rename_account(&wallet.id, "Cash").await.unwrap();
    assert_eq!(renamed.name, "Cash");
    assert_eq!(renamed.balance, dec!(440));

    let transactions = core.ledger.list_transactions().unwrap();
    assert!(transactions.iter().all(|t| t.account_name == "Cash"));
    let transfers = core.ledger.list_transfers().unwrap();
    assert!(transfers.iter().all(|t| t.source_account == "Cash"));
}

#[tokio::test]
async fn read_models_reemit_after_commits() {
    let core = common::setup();
    core.accounts
        .create_account(new_account("Wallet", "USD", dec!(500)))
        .await
        .unwrap();
    core.categories
        .create_category(NewCategory {
            id: None,
            name: "Food".to_string(),
        })
        .await
        .unwrap();

    core.ledger
        .add_transaction(new_expense("Wallet", dec!(50)))
        .await
        .unwrap();

    let transactions = core.ledger.subscribe_transactions();
    assert_eq!(transactions.borrow().len(), 1);
    let accounts = core.ledger.subscribe_accounts();
    assert_eq!(accounts.borrow()[0].balance, dec!(450));
}
