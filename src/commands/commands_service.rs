use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::sync::Arc;

use crate::accounts::Account;
use crate::categories::Category;
use crate::commands::amount::parse_spoken_amount;
use crate::commands::commands_model::{
    CommandOutcome, DisambiguationPayload, EntityKind, ParsedCommand, ParsedTransaction,
    ParsedTransfer, UnresolvedEntity,
};
use crate::commands::spoken_date::strip_trailing_date;
use crate::constants::MONEY_SCALE;
use crate::errors::Result;
use crate::ledger::{
    EntityLookupTrait, LedgerServiceTrait, NewTransaction, NewTransfer, TransactionType,
};

lazy_static! {
    static ref TRANSFER_RE: Regex =
        Regex::new(r"(?i)^\s*transfer\s+from\s+(.+?)\s+to\s+(.+?)\s+([0-9][0-9.,]*)\s*$")
            .expect("transfer grammar");
    static ref EXPENSE_RE: Regex =
        Regex::new(r"(?i)^\s*expense\s+from\s+(.+?)\s+([0-9][0-9.,]*)\s+category\s+(.+?)\s*$")
            .expect("expense grammar");
    static ref INCOME_RE: Regex =
        Regex::new(r"(?i)^\s*income\s+to\s+(.+?)\s+([0-9][0-9.,]*)\s+category\s+(.+?)\s*$")
            .expect("income grammar");
}

const GUIDANCE: &str = "Say 'expense from <account> <amount> category <category>', \
'income to <account> <amount> category <category>', or \
'transfer from <account> to <account> <amount>'. A date like 'June 5' may follow.";

/// Interprets one free-form utterance at a time against a live snapshot of
/// accounts and categories, committing through the ledger service when every
/// referenced entity resolves.
pub struct CommandInterpreter {
    ledger: Arc<dyn LedgerServiceTrait>,
    lookup: Arc<dyn EntityLookupTrait>,
}

impl CommandInterpreter {
    pub fn new(ledger: Arc<dyn LedgerServiceTrait>, lookup: Arc<dyn EntityLookupTrait>) -> Self {
        Self { ledger, lookup }
    }

    pub async fn interpret(&self, text: &str) -> Result<CommandOutcome> {
        self.interpret_at(text, Utc::now().date_naive()).await
    }

    /// Interpretation with an explicit reference date for relative phrases.
    pub async fn interpret_at(&self, text: &str, today: NaiveDate) -> Result<CommandOutcome> {
        // The date phrase is stripped before amount extraction so a
        // day-of-month digit is never misread as the amount.
        let (stripped, spoken) = strip_trailing_date(text, today);
        let date = spoken.unwrap_or(today);

        if let Some(caps) = TRANSFER_RE.captures(&stripped) {
            return self
                .interpret_transfer(&caps[1], &caps[2], &caps[3], date)
                .await;
        }
        if let Some(caps) = EXPENSE_RE.captures(&stripped) {
            return self
                .interpret_transaction(TransactionType::Expense, &caps[1], &caps[3], &caps[2], date)
                .await;
        }
        if let Some(caps) = INCOME_RE.captures(&stripped) {
            return self
                .interpret_transaction(TransactionType::Income, &caps[1], &caps[3], &caps[2], date)
                .await;
        }

        debug!("No grammar matched: '{}'", text);
        Ok(CommandOutcome::Unrecognized {
            guidance: GUIDANCE.to_string(),
        })
    }

    async fn interpret_transfer(
        &self,
        raw_source: &str,
        raw_destination: &str,
        raw_amount: &str,
        date: NaiveDate,
    ) -> Result<CommandOutcome> {
        let amount = match parse_spoken_amount(raw_amount) {
            Ok(a) => a.round_dp(MONEY_SCALE),
            Err(e) => {
                return Ok(CommandOutcome::Unrecognized {
                    guidance: e.to_string(),
                })
            }
        };
        let source_name = capitalize_first(raw_source.trim());
        let destination_name = capitalize_first(raw_destination.trim());

        // Single point-in-time read; empty collections fail fast into
        // disambiguation instead of waiting for entities to appear.
        let accounts = self.lookup.current_accounts()?;
        let source = find_account(&accounts, &source_name);
        let destination = find_account(&accounts, &destination_name);

        let mut unresolved = Vec::new();
        if source.is_none() {
            unresolved.push(UnresolvedEntity {
                kind: EntityKind::Account,
                name: source_name.clone(),
            });
        }
        if destination.is_none() {
            unresolved.push(UnresolvedEntity {
                kind: EntityKind::Account,
                name: destination_name.clone(),
            });
        }

        let (source, destination) = match (source, destination) {
            (Some(s), Some(d)) => (s, d),
            _ => {
                return Ok(CommandOutcome::DisambiguationRequested(
                    DisambiguationPayload {
                        command: ParsedCommand::Transfer(ParsedTransfer {
                            source_account: source_name,
                            destination_account: destination_name,
                            amount,
                            date,
                        }),
                        unresolved,
                    },
                ))
            }
        };

        let transfer = self
            .ledger
            .add_transfer(NewTransfer {
                id: None,
                source_account: source.name.clone(),
                destination_account: destination.name.clone(),
                amount,
                currency: source.currency.clone(),
                txn_date: date,
                comment: None,
                destination_amount: None,
                destination_currency: None,
            })
            .await?;

        Ok(CommandOutcome::Committed {
            summary: format!(
                "Transferred {} {} from {} to {} on {}",
                transfer.amount,
                transfer.currency,
                transfer.source_account,
                transfer.destination_account,
                transfer.txn_date
            ),
        })
    }

    async fn interpret_transaction(
        &self,
        txn_type: TransactionType,
        raw_account: &str,
        raw_category: &str,
        raw_amount: &str,
        date: NaiveDate,
    ) -> Result<CommandOutcome> {
        let amount = match parse_spoken_amount(raw_amount) {
            Ok(a) => a.round_dp(MONEY_SCALE),
            Err(e) => {
                return Ok(CommandOutcome::Unrecognized {
                    guidance: e.to_string(),
                })
            }
        };
        let account_name = capitalize_first(raw_account.trim());
        let category_name = capitalize_first(raw_category.trim());

        let accounts = self.lookup.current_accounts()?;
        let categories = self.lookup.current_categories()?;
        let account = find_account(&accounts, &account_name);
        let category = find_category(&categories, &category_name);

        let mut unresolved = Vec::new();
        if account.is_none() {
            unresolved.push(UnresolvedEntity {
                kind: EntityKind::Account,
                name: account_name.clone(),
            });
        }
        if category.is_none() {
            unresolved.push(UnresolvedEntity {
                kind: EntityKind::Category,
                name: category_name.clone(),
            });
        }

        let (account, category) = match (account, category) {
            (Some(a), Some(c)) => (a, c),
            _ => {
                return Ok(CommandOutcome::DisambiguationRequested(
                    DisambiguationPayload {
                        command: ParsedCommand::Transaction(ParsedTransaction {
                            txn_type,
                            account_name,
                            category_name,
                            amount,
                            date,
                        }),
                        unresolved,
                    },
                ))
            }
        };

        let transaction = self
            .ledger
            .add_transaction(NewTransaction {
                id: None,
                account_name: account.name.clone(),
                amount,
                currency: account.currency.clone(),
                category_name: category.name.clone(),
                txn_type,
                txn_date: date,
                comment: None,
                related_debt_id: None,
            })
            .await?;

        let verb = match txn_type {
            TransactionType::Expense => "expense of",
            TransactionType::Income => "income of",
        };
        Ok(CommandOutcome::Committed {
            summary: format!(
                "Recorded {} {} {} on {} ({}) on {}",
                verb,
                transaction.amount,
                transaction.currency,
                transaction.account_name,
                transaction.category_name,
                transaction.txn_date
            ),
        })
    }
}

fn find_account<'a>(accounts: &'a [Account], name: &str) -> Option<&'a Account> {
    accounts.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}

fn find_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::ledger::{
        LedgerError, Transaction, TransactionUpdate, Transfer, TransferUpdate,
    };
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;
    use tokio::sync::watch;
    use uuid::Uuid;

    struct FakeLookup {
        accounts: Vec<Account>,
        categories: Vec<Category>,
    }

    impl EntityLookupTrait for FakeLookup {
        fn current_accounts(&self) -> Result<Vec<Account>> {
            Ok(self.accounts.clone())
        }

        fn current_categories(&self) -> Result<Vec<Category>> {
            Ok(self.categories.clone())
        }
    }

    #[derive(Default)]
    struct RecordingLedger {
        transactions: Mutex<Vec<NewTransaction>>,
        transfers: Mutex<Vec<NewTransfer>>,
    }

    #[async_trait]
    impl LedgerServiceTrait for RecordingLedger {
        async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
            new_transaction.validate()?;
            let txn = Transaction {
                id: Uuid::new_v4().to_string(),
                account_name: new_transaction.account_name.clone(),
                amount: new_transaction.amount,
                currency: new_transaction.currency.clone(),
                category_name: new_transaction.category_name.clone(),
                txn_type: new_transaction.txn_type,
                txn_date: new_transaction.txn_date,
                comment: new_transaction.comment.clone(),
                related_debt_id: new_transaction.related_debt_id.clone(),
                original_default_currency_code: None,
                amount_in_original_default: None,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            };
            self.transactions.lock().unwrap().push(new_transaction);
            Ok(txn)
        }

        async fn update_transaction(&self, _update: TransactionUpdate) -> Result<Transaction> {
            unimplemented!()
        }

        async fn delete_transaction(&self, _transaction_id: &str) -> Result<()> {
            unimplemented!()
        }

        async fn add_transfer(&self, new_transfer: NewTransfer) -> Result<Transfer> {
            new_transfer.validate()?;
            if new_transfer
                .source_account
                .eq_ignore_ascii_case(&new_transfer.destination_account)
            {
                return Err(Error::Ledger(LedgerError::SameAccountTransfer(
                    new_transfer.source_account,
                )));
            }
            let transfer = Transfer {
                id: Uuid::new_v4().to_string(),
                source_account: new_transfer.source_account.clone(),
                destination_account: new_transfer.destination_account.clone(),
                amount: new_transfer.amount,
                currency: new_transfer.currency.clone(),
                txn_date: new_transfer.txn_date,
                comment: new_transfer.comment.clone(),
                destination_amount: new_transfer.destination_amount,
                destination_currency: new_transfer.destination_currency.clone(),
                original_default_currency_code: None,
                amount_in_original_default: None,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            };
            self.transfers.lock().unwrap().push(new_transfer);
            Ok(transfer)
        }

        async fn update_transfer(&self, _update: TransferUpdate) -> Result<Transfer> {
            unimplemented!()
        }

        async fn delete_transfer(&self, _transfer_id: &str) -> Result<()> {
            unimplemented!()
        }

        async fn rename_account(&self, _account_id: &str, _new_name: &str) -> Result<Account> {
            unimplemented!()
        }

        async fn rename_category(&self, _category_id: &str, _new_name: &str) -> Result<Category> {
            unimplemented!()
        }

        fn get_transaction(&self, _transaction_id: &str) -> Result<Transaction> {
            unimplemented!()
        }

        fn list_transactions(&self) -> Result<Vec<Transaction>> {
            Ok(Vec::new())
        }

        fn get_transfer(&self, _transfer_id: &str) -> Result<Transfer> {
            unimplemented!()
        }

        fn list_transfers(&self) -> Result<Vec<Transfer>> {
            Ok(Vec::new())
        }

        fn subscribe_accounts(&self) -> watch::Receiver<Vec<Account>> {
            watch::channel(Vec::new()).1
        }

        fn subscribe_transactions(&self) -> watch::Receiver<Vec<Transaction>> {
            watch::channel(Vec::new()).1
        }

        fn subscribe_transfers(&self) -> watch::Receiver<Vec<Transfer>> {
            watch::channel(Vec::new()).1
        }
    }

    fn account(name: &str, currency: &str) -> Account {
        Account {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            currency: currency.to_string(),
            ..Default::default()
        }
    }

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn interpreter(
        accounts: Vec<Account>,
        categories: Vec<Category>,
    ) -> (CommandInterpreter, Arc<RecordingLedger>) {
        let ledger = Arc::new(RecordingLedger::default());
        let lookup = Arc::new(FakeLookup {
            accounts,
            categories,
        });
        (CommandInterpreter::new(ledger.clone(), lookup), ledger)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[tokio::test]
    async fn transfer_between_existing_accounts_commits() {
        let (interpreter, ledger) = interpreter(
            vec![account("Wallet", "USD"), account("Bank", "USD")],
            vec![],
        );

        let outcome = interpreter
            .interpret_at("transfer from Wallet to Bank 100", today())
            .await
            .unwrap();

        assert!(matches!(outcome, CommandOutcome::Committed { .. }));
        let transfers = ledger.transfers.lock().unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].source_account, "Wallet");
        assert_eq!(transfers[0].destination_account, "Bank");
        assert_eq!(transfers[0].amount, dec!(100.00));
        assert_eq!(transfers[0].currency, "USD");
    }

    #[tokio::test]
    async fn expense_resolves_entities_case_insensitively() {
        let (interpreter, ledger) = interpreter(
            vec![account("Wallet", "USD")],
            vec![category("Food")],
        );

        let outcome = interpreter
            .interpret_at("expense from wallet 50 category food", today())
            .await
            .unwrap();

        assert!(matches!(outcome, CommandOutcome::Committed { .. }));
        let transactions = ledger.transactions.lock().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].account_name, "Wallet");
        assert_eq!(transactions[0].category_name, "Food");
        assert_eq!(transactions[0].amount, dec!(50.00));
        assert_eq!(transactions[0].txn_type, TransactionType::Expense);
    }

    #[tokio::test]
    async fn unknown_accounts_request_disambiguation_immediately() {
        let (interpreter, ledger) = interpreter(vec![], vec![]);

        let outcome = interpreter
            .interpret_at("transfer from Wallet to Bank 100", today())
            .await
            .unwrap();

        match outcome {
            CommandOutcome::DisambiguationRequested(payload) => {
                assert_eq!(payload.unresolved.len(), 2);
                assert!(payload
                    .unresolved
                    .iter()
                    .all(|u| u.kind == EntityKind::Account));
                match payload.command {
                    ParsedCommand::Transfer(parsed) => {
                        assert_eq!(parsed.source_account, "Wallet");
                        assert_eq!(parsed.destination_account, "Bank");
                        assert_eq!(parsed.amount, dec!(100.00));
                    }
                    other => panic!("expected a transfer, got {:?}", other),
                }
            }
            other => panic!("expected disambiguation, got {:?}", other),
        }
        assert!(ledger.transfers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn trailing_date_is_used_for_the_commit() {
        let (interpreter, ledger) = interpreter(
            vec![account("Wallet", "USD")],
            vec![category("Food")],
        );

        let outcome = interpreter
            .interpret_at("expense from Wallet 12 category food June 5", today())
            .await
            .unwrap();

        assert!(matches!(outcome, CommandOutcome::Committed { .. }));
        let transactions = ledger.transactions.lock().unwrap();
        assert_eq!(transactions[0].amount, dec!(12));
        assert_eq!(
            transactions[0].txn_date,
            NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
        );
    }

    #[tokio::test]
    async fn income_grammar_commits_income() {
        let (interpreter, ledger) = interpreter(
            vec![account("Bank", "EUR")],
            vec![category("Salary")],
        );

        let outcome = interpreter
            .interpret_at("income to Bank 1,234.56 category salary", today())
            .await
            .unwrap();

        assert!(matches!(outcome, CommandOutcome::Committed { .. }));
        let transactions = ledger.transactions.lock().unwrap();
        assert_eq!(transactions[0].txn_type, TransactionType::Income);
        assert_eq!(transactions[0].amount, dec!(1234.56));
    }

    #[tokio::test]
    async fn unmatched_text_returns_guidance() {
        let (interpreter, _) = interpreter(vec![], vec![]);

        let outcome = interpreter
            .interpret_at("pay the rent somehow", today())
            .await
            .unwrap();

        assert!(matches!(outcome, CommandOutcome::Unrecognized { .. }));
    }

    #[tokio::test]
    async fn same_account_transfer_surfaces_typed_error() {
        let (interpreter, _) = interpreter(vec![account("Wallet", "USD")], vec![]);

        let result = interpreter
            .interpret_at("transfer from Wallet to wallet 10", today())
            .await;

        assert!(matches!(
            result,
            Err(Error::Ledger(LedgerError::SameAccountTransfer(_)))
        ));
    }
}
