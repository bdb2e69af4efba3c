//! Account classifier: turns one cash-movement record into ledger postings

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::ledger::account::{Chart, LedgerKey};
use crate::types::*;

/// Why a posting exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingRole {
    /// Principal leg of the record
    Principal,
    /// Auxiliary leg carrying the record's fee
    Fee,
}

/// A single debit or credit applied to one ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Ledger being affected
    pub key: LedgerKey,
    /// Normal-balance kind of that ledger
    pub kind: CategoryKind,
    /// Debit or credit
    pub entry_type: EntryType,
    /// Amount of the posting
    pub amount: BigDecimal,
    pub role: PostingRole,
}

impl Posting {
    fn new(
        (key, kind): (LedgerKey, CategoryKind),
        entry_type: EntryType,
        amount: BigDecimal,
        role: PostingRole,
    ) -> Self {
        Self {
            key,
            kind,
            entry_type,
            amount,
            role,
        }
    }

    /// Debit amount, zero for a credit posting
    pub fn debit(&self) -> BigDecimal {
        match self.entry_type {
            EntryType::Debit => self.amount.clone(),
            EntryType::Credit => BigDecimal::from(0),
        }
    }

    /// Credit amount, zero for a debit posting
    pub fn credit(&self) -> BigDecimal {
        match self.entry_type {
            EntryType::Credit => self.amount.clone(),
            EntryType::Debit => BigDecimal::from(0),
        }
    }

    /// Signed movement of the target ledger's balance
    pub fn balance_change(&self) -> BigDecimal {
        self.kind.signed_amount(self.entry_type, &self.amount)
    }
}

/// All postings generated by one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPostings {
    pub record_id: String,
    pub postings: Vec<Posting>,
}

impl RecordPostings {
    /// Calculate total debits
    pub fn total_debits(&self) -> BigDecimal {
        self.postings
            .iter()
            .filter(|p| p.entry_type == EntryType::Debit)
            .map(|p| &p.amount)
            .sum()
    }

    /// Calculate total credits
    pub fn total_credits(&self) -> BigDecimal {
        self.postings
            .iter()
            .filter(|p| p.entry_type == EntryType::Credit)
            .map(|p| &p.amount)
            .sum()
    }

    /// Check if the record's postings are balanced (debits = credits)
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}

/// Map a record to its postings.
///
/// Income debits cash and credits its category. Expense debits its category
/// and credits cash with principal plus fee. Transfer credits the source with
/// principal plus fee and debits the destination. Any fee is debited to the
/// shared fees ledger as its own posting.
pub fn classify(record: &CashMovementRecord, chart: &Chart<'_>) -> RecordPostings {
    let movement_type = record.movement_type();
    let fee = record.effective_fee();
    let mut postings = Vec::with_capacity(3);

    match &record.movement {
        Movement::Income {
            category_id,
            account_id,
        } => {
            postings.push(Posting::new(
                chart.resolve_cash_account(account_id),
                EntryType::Debit,
                record.amount.clone(),
                PostingRole::Principal,
            ));
            postings.push(Posting::new(
                chart.resolve_category(category_id.as_deref(), movement_type),
                EntryType::Credit,
                record.amount.clone(),
                PostingRole::Principal,
            ));
        }
        Movement::Expense {
            category_id,
            account_id,
        } => {
            postings.push(Posting::new(
                chart.resolve_category(category_id.as_deref(), movement_type),
                EntryType::Debit,
                record.amount.clone(),
                PostingRole::Principal,
            ));
            postings.push(Posting::new(
                chart.resolve_cash_account(account_id),
                EntryType::Credit,
                record.gross_outflow(),
                PostingRole::Principal,
            ));
        }
        Movement::Transfer {
            from_account_id,
            to_account_id,
        } => {
            postings.push(Posting::new(
                chart.resolve_cash_account(from_account_id),
                EntryType::Credit,
                record.gross_outflow(),
                PostingRole::Principal,
            ));
            postings.push(Posting::new(
                chart.resolve_cash_account(to_account_id),
                EntryType::Debit,
                record.amount.clone(),
                PostingRole::Principal,
            ));
        }
    }

    if let Some(fee) = fee {
        postings.push(Posting::new(
            (LedgerKey::Fees, CategoryKind::Expense),
            EntryType::Debit,
            fee.clone(),
            PostingRole::Fee,
        ));
    }

    tracing::trace!(
        record_id = %record.id,
        postings = postings.len(),
        "classified record"
    );

    RecordPostings {
        record_id: record.id.clone(),
        postings,
    }
}
