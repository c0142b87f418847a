mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use moneta_core::accounts::{AccountServiceTrait, NewAccount};
use moneta_core::categories::{CategoryServiceTrait, NewCategory};
use moneta_core::commands::CommandOutcome;
use moneta_core::ledger::{LedgerServiceTrait, TransactionType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_accounts(core: &common::TestCore) {
    for name in ["Wallet", "Bank"] {
        core.accounts
            .create_account(NewAccount {
                id: None,
                name: name.to_string(),
                currency: "USD".to_string(),
                balance: Some(dec!(500)),
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn spoken_transfer_commits_and_moves_balances() {
    let core = common::setup();
    seed_accounts(&core).await;

    let outcome = core
        .interpreter
        .interpret_at("transfer from Wallet to Bank 100", date(2024, 3, 4))
        .await
        .unwrap();

    assert!(matches!(outcome, CommandOutcome::Committed { .. }));

    let transfers = core.ledger.list_transfers().unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].source_account, "Wallet");
    assert_eq!(transfers[0].destination_account, "Bank");
    assert_eq!(transfers[0].amount, dec!(100.00));
    assert_eq!(transfers[0].currency, "USD");

    let accounts = core.accounts.get_all_accounts().unwrap();
    let wallet = accounts.iter().find(|a| a.name == "Wallet").unwrap();
    let bank = accounts.iter().find(|a| a.name == "Bank").unwrap();
    assert_eq!(wallet.balance, dec!(400));
    assert_eq!(bank.balance, dec!(600));
}

#[tokio::test]
async fn spoken_expense_matches_entities_case_insensitively() {
    let core = common::setup();
    seed_accounts(&core).await;
    core.categories
        .create_category(NewCategory {
            id: None,
            name: "Food".to_string(),
        })
        .await
        .unwrap();

    let outcome = core
        .interpreter
        .interpret_at("expense from wallet 50 category food", date(2024, 3, 4))
        .await
        .unwrap();

    assert!(matches!(outcome, CommandOutcome::Committed { .. }));

    let transactions = core.ledger.list_transactions().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].account_name, "Wallet");
    assert_eq!(transactions[0].category_name, "Food");
    assert_eq!(transactions[0].amount, dec!(50.00));
    assert_eq!(transactions[0].txn_type, TransactionType::Expense);
}

#[tokio::test]
async fn empty_store_requests_disambiguation_instead_of_waiting() {
    let core = common::setup();

    let outcome = core
        .interpreter
        .interpret_at("transfer from Wallet to Bank 100", date(2024, 3, 4))
        .await
        .unwrap();

    match outcome {
        CommandOutcome::DisambiguationRequested(payload) => {
            assert_eq!(payload.unresolved.len(), 2);
        }
        other => panic!("expected disambiguation, got {:?}", other),
    }
    assert!(core.ledger.list_transfers().unwrap().is_empty());
}

#[tokio::test]
async fn spoken_date_sets_the_transaction_date() {
    let core = common::setup();
    seed_accounts(&core).await;
    core.categories
        .create_category(NewCategory {
            id: None,
            name: "Food".to_string(),
        })
        .await
        .unwrap();

    let outcome = core
        .interpreter
        .interpret_at(
            "expense from Wallet 12 category food June 5",
            date(2024, 3, 4),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, CommandOutcome::Committed { .. }));
    let transactions = core.ledger.list_transactions().unwrap();
    assert_eq!(transactions[0].txn_date, date(2024, 6, 5));
    assert_eq!(transactions[0].amount, dec!(12));
}
