//! Core types and data structures for the cash book

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Normal-balance classification of a ledger, following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Assets - cash, bank, petty cash and card accounts
    Asset,
    /// Liabilities - what the business owes
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Revenue - money earned by the business
    Revenue,
    /// Cost - direct costs of goods or services sold
    Cost,
    /// Expenses - costs incurred running the business
    Expense,
}

impl CategoryKind {
    /// Returns the side on which a ledger of this kind increases.
    /// Assets, costs and expenses are debit-normal;
    /// liabilities, equity and revenue are credit-normal.
    pub fn normal_balance(&self) -> EntryType {
        match self {
            CategoryKind::Asset | CategoryKind::Cost | CategoryKind::Expense => EntryType::Debit,
            CategoryKind::Liability | CategoryKind::Equity | CategoryKind::Revenue => {
                EntryType::Credit
            }
        }
    }

    /// Signed movement of a balance for the given debit and credit amounts
    pub fn balance_change(&self, debit: &BigDecimal, credit: &BigDecimal) -> BigDecimal {
        match self.normal_balance() {
            EntryType::Debit => debit - credit,
            EntryType::Credit => credit - debit,
        }
    }

    /// Signed movement of a balance for a single posting
    pub fn signed_amount(&self, entry_type: EntryType, amount: &BigDecimal) -> BigDecimal {
        if self.normal_balance() == entry_type {
            amount.clone()
        } else {
            -amount.clone()
        }
    }

    /// Lower-case label used in tabular output
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKind::Asset => "asset",
            CategoryKind::Liability => "liability",
            CategoryKind::Equity => "equity",
            CategoryKind::Revenue => "revenue",
            CategoryKind::Cost => "cost",
            CategoryKind::Expense => "expense",
        }
    }
}

/// Types of postings in double-entry bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Debit - increases assets and expenses
    Debit,
    /// Credit - increases revenue, liabilities and equity
    Credit,
}

impl EntryType {
    pub fn opposite(&self) -> EntryType {
        match self {
            EntryType::Debit => EntryType::Credit,
            EntryType::Credit => EntryType::Debit,
        }
    }
}

/// The three kinds of cash movement the cash book records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Income,
    Expense,
    Transfer,
}

impl MovementType {
    /// Normal-balance kind of the synthetic bucket that receives records of
    /// this type when they carry no (or an unknown) category.
    ///
    /// Uncategorized income is revenue-normal, like categorized income.
    /// Transfers never touch a category and have no bucket.
    pub fn uncategorized_kind(&self) -> Option<CategoryKind> {
        match self {
            MovementType::Income => Some(CategoryKind::Revenue),
            MovementType::Expense => Some(CategoryKind::Expense),
            MovementType::Transfer => None,
        }
    }
}

/// Kind of cash account. Every kind is asset-normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashAccountKind {
    Cash,
    Bank,
    PettyCash,
    CreditCard,
}

/// Revenue or expense category that income and expense records are booked against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCategory {
    /// Stable identifier referenced by records
    pub id: String,
    /// Chart-of-accounts code, used for display ordering
    pub code: String,
    /// Human-readable category name
    pub name: String,
    /// Declared normal-balance kind
    pub kind: CategoryKind,
}

impl AccountCategory {
    pub fn new(id: String, code: String, name: String, kind: CategoryKind) -> Self {
        Self {
            id,
            code,
            name,
            kind,
        }
    }
}

/// A cash, bank, petty cash or credit card account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashAccount {
    /// Unique identifier for the account
    pub id: String,
    /// Human-readable account name
    pub name: String,
    /// Kind of account
    pub kind: CashAccountKind,
    /// Balance when the account was created
    pub opening_balance: BigDecimal,
    /// Balance maintained incrementally by the record store as records are
    /// created and deleted. Only reconciliation reads it.
    pub current_balance: BigDecimal,
}

impl CashAccount {
    /// Create a new account whose current balance equals its opening balance
    pub fn new(id: String, name: String, kind: CashAccountKind, opening_balance: BigDecimal) -> Self {
        Self {
            id,
            name,
            kind,
            current_balance: opening_balance.clone(),
            opening_balance,
        }
    }

    /// Update the current balance by one posting. Cash accounts are asset-normal.
    pub fn apply_posting(&mut self, entry_type: EntryType, amount: &BigDecimal) {
        self.current_balance += CategoryKind::Asset.signed_amount(entry_type, amount);
    }
}

/// Which ledgers a record touches, by reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Movement {
    /// Money received into a cash account
    Income {
        category_id: Option<String>,
        account_id: String,
    },
    /// Money paid out of a cash account
    Expense {
        category_id: Option<String>,
        account_id: String,
    },
    /// Money moved between two cash accounts
    Transfer {
        from_account_id: String,
        to_account_id: String,
    },
}

impl Movement {
    pub fn movement_type(&self) -> MovementType {
        match self {
            Movement::Income { .. } => MovementType::Income,
            Movement::Expense { .. } => MovementType::Expense,
            Movement::Transfer { .. } => MovementType::Transfer,
        }
    }
}

/// A single raw cash-movement record as supplied by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashMovementRecord {
    /// Unique identifier for the record
    pub id: String,
    /// Calendar day the movement happened
    pub date: NaiveDate,
    /// Type of movement and the accounts it references
    pub movement: Movement,
    /// Principal amount, never negative
    pub amount: BigDecimal,
    /// Optional charge paid on top of the principal (expense and transfer only)
    pub fee: Option<BigDecimal>,
    /// Free-text description
    pub description: String,
    /// When the record was created
    pub created_at: NaiveDateTime,
    /// Monotonically increasing ingestion number, breaks same-day ties
    pub sequence: u64,
}

impl CashMovementRecord {
    pub fn movement_type(&self) -> MovementType {
        self.movement.movement_type()
    }

    /// The fee that actually moves money: present, non-zero and on a record
    /// type that carries fees.
    pub fn effective_fee(&self) -> Option<&BigDecimal> {
        match self.movement_type() {
            MovementType::Income => None,
            MovementType::Expense | MovementType::Transfer => self
                .fee
                .as_ref()
                .filter(|fee| **fee != BigDecimal::from(0)),
        }
    }

    /// Amount leaving the paying cash account: principal plus fee
    pub fn gross_outflow(&self) -> BigDecimal {
        match self.effective_fee() {
            Some(fee) => &self.amount + fee,
            None => self.amount.clone(),
        }
    }

    /// Total chronological order: date, then ingestion sequence, then id
    pub fn sort_key(&self) -> (NaiveDate, u64, &str) {
        (self.date, self.sequence, self.id.as_str())
    }
}

/// Sort records into their chronological replay order
pub fn chronological<'a>(records: &'a [CashMovementRecord]) -> Vec<&'a CashMovementRecord> {
    let mut ordered: Vec<&CashMovementRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    ordered
}

/// Errors that can occur at the record store and configuration boundaries
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Record not found: {0}")]
    RecordNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(movement: Movement, fee: Option<i64>) -> CashMovementRecord {
        CashMovementRecord {
            id: "r1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            movement,
            amount: BigDecimal::from(100),
            fee: fee.map(BigDecimal::from),
            description: "test".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            sequence: 1,
        }
    }

    #[test]
    fn test_normal_balance_sides() {
        assert_eq!(CategoryKind::Asset.normal_balance(), EntryType::Debit);
        assert_eq!(CategoryKind::Cost.normal_balance(), EntryType::Debit);
        assert_eq!(CategoryKind::Expense.normal_balance(), EntryType::Debit);
        assert_eq!(CategoryKind::Revenue.normal_balance(), EntryType::Credit);
        assert_eq!(CategoryKind::Liability.normal_balance(), EntryType::Credit);
        assert_eq!(CategoryKind::Equity.normal_balance(), EntryType::Credit);
    }

    #[test]
    fn test_balance_change_follows_normal_side() {
        let debit = BigDecimal::from(30);
        let credit = BigDecimal::from(10);
        assert_eq!(
            CategoryKind::Asset.balance_change(&debit, &credit),
            BigDecimal::from(20)
        );
        assert_eq!(
            CategoryKind::Revenue.balance_change(&debit, &credit),
            BigDecimal::from(-20)
        );
    }

    #[test]
    fn test_uncategorized_kind_mapping() {
        assert_eq!(
            MovementType::Income.uncategorized_kind(),
            Some(CategoryKind::Revenue)
        );
        assert_eq!(
            MovementType::Expense.uncategorized_kind(),
            Some(CategoryKind::Expense)
        );
        assert_eq!(MovementType::Transfer.uncategorized_kind(), None);
    }

    #[test]
    fn test_effective_fee_ignores_income_and_zero() {
        let income = record(
            Movement::Income {
                category_id: None,
                account_id: "cash".to_string(),
            },
            Some(5),
        );
        assert!(income.effective_fee().is_none());
        assert_eq!(income.gross_outflow(), BigDecimal::from(100));

        let zero_fee = record(
            Movement::Expense {
                category_id: None,
                account_id: "cash".to_string(),
            },
            Some(0),
        );
        assert!(zero_fee.effective_fee().is_none());

        let transfer = record(
            Movement::Transfer {
                from_account_id: "a".to_string(),
                to_account_id: "b".to_string(),
            },
            Some(3),
        );
        assert_eq!(transfer.gross_outflow(), BigDecimal::from(103));
    }

    #[test]
    fn test_cash_account_apply_posting() {
        let mut account = CashAccount::new(
            "cash".to_string(),
            "Cash".to_string(),
            CashAccountKind::Cash,
            BigDecimal::from(50),
        );
        account.apply_posting(EntryType::Debit, &BigDecimal::from(20));
        account.apply_posting(EntryType::Credit, &BigDecimal::from(5));
        assert_eq!(account.current_balance, BigDecimal::from(65));
        assert_eq!(account.opening_balance, BigDecimal::from(50));
    }

    #[test]
    fn test_identical_cash_accounts_compare_equal() {
        let build = || {
            CashAccount::new(
                "bank".to_string(),
                "Bank".to_string(),
                CashAccountKind::Bank,
                BigDecimal::from(700),
            )
        };
        assert_eq!(build(), build());
    }
}
