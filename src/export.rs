//! Flat tabular rows for report formatters
//!
//! Every field of the engine's output is rendered as a text cell. How rows
//! are written out (CSV, spreadsheet, screen) is up to the caller.

use bigdecimal::BigDecimal;

use crate::ledger::book::{LedgerAccount, LedgerBook};
use crate::ledger::replay::BalanceReplay;
use crate::types::MovementType;

/// One exported row
pub type Row = Vec<String>;

pub const LEDGER_COLUMNS: [&str; 6] = ["date", "description", "kind", "debit", "credit", "balance"];
pub const REPLAY_COLUMNS: [&str; 5] = ["date", "record_id", "type", "change", "balance_after"];

fn amount(value: &BigDecimal) -> String {
    value.to_string()
}

fn movement(movement_type: MovementType) -> &'static str {
    match movement_type {
        MovementType::Income => "income",
        MovementType::Expense => "expense",
        MovementType::Transfer => "transfer",
    }
}

/// Rows for one ledger: a header line naming the account, the column line,
/// the opening line, one line per entry and a closing line with period totals
pub fn ledger_rows(account: &LedgerAccount) -> Vec<Row> {
    let mut rows = Vec::with_capacity(account.entries.len() + 4);
    rows.push(vec![
        account.code.clone(),
        account.name.clone(),
        account.type_label().to_string(),
        String::new(),
        String::new(),
        String::new(),
    ]);
    rows.push(LEDGER_COLUMNS.iter().map(|c| c.to_string()).collect());
    rows.push(vec![
        String::new(),
        "Opening balance".to_string(),
        String::new(),
        String::new(),
        String::new(),
        amount(&account.opening_balance),
    ]);
    for entry in &account.entries {
        rows.push(vec![
            entry.date.format("%Y-%m-%d").to_string(),
            entry.description.clone(),
            entry.kind.clone(),
            amount(&entry.debit),
            amount(&entry.credit),
            amount(&entry.balance),
        ]);
    }
    rows.push(vec![
        String::new(),
        "Closing balance".to_string(),
        String::new(),
        amount(&account.total_debits),
        amount(&account.total_credits),
        amount(&account.closing_balance),
    ]);
    rows
}

/// Rows for every ledger of a book; an invalid period yields no rows
pub fn book_rows(book: &LedgerBook) -> Vec<Row> {
    book.accounts().iter().flat_map(ledger_rows).collect()
}

/// Column line followed by one row per replayed record
pub fn replay_rows(replay: &BalanceReplay) -> Vec<Row> {
    let mut rows = Vec::with_capacity(replay.snapshots.len() + 1);
    rows.push(REPLAY_COLUMNS.iter().map(|c| c.to_string()).collect());
    for snapshot in &replay.snapshots {
        rows.push(vec![
            snapshot.date.format("%Y-%m-%d").to_string(),
            snapshot.record_id.clone(),
            movement(snapshot.movement_type).to_string(),
            amount(&snapshot.change),
            amount(&snapshot.balance_after),
        ]);
    }
    rows
}
