//! In-memory record source for testing and development

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{parse_record_date, DefaultRecordValidator};

/// A record as entered by a user, before the store assigns its identity
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    /// Calendar day as `YYYY-MM-DD`; missing or malformed dates are rejected
    pub date: Option<String>,
    pub movement: Movement,
    pub amount: BigDecimal,
    pub fee: Option<BigDecimal>,
    pub description: String,
}

impl RecordDraft {
    pub fn new(date: &str, movement: Movement, amount: BigDecimal) -> Self {
        Self {
            date: Some(date.to_string()),
            movement,
            amount,
            fee: None,
            description: String::new(),
        }
    }

    pub fn with_fee(mut self, fee: BigDecimal) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Default)]
struct Inner {
    accounts: BTreeMap<String, CashAccount>,
    categories: BTreeMap<String, AccountCategory>,
    records: Vec<CashMovementRecord>,
    next_sequence: u64,
}

/// In-memory record store.
///
/// Assigns ids, creation timestamps and ingestion sequence numbers, and
/// keeps every cash account's current balance up to date as records are
/// added and deleted.
#[derive(Clone)]
pub struct MemoryRecordSource {
    inner: Arc<RwLock<Inner>>,
    validator: Arc<dyn RecordValidator>,
}

impl std::fmt::Debug for MemoryRecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRecordSource").finish_non_exhaustive()
    }
}

impl MemoryRecordSource {
    /// Create a new memory record source instance
    pub fn new() -> Self {
        Self::with_validator(Arc::new(DefaultRecordValidator))
    }

    /// Create a record source with a custom validator
    pub fn with_validator(validator: Arc<dyn RecordValidator>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            validator,
        }
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Storage("record store lock poisoned".to_string()))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Storage("record store lock poisoned".to_string()))
    }

    /// Declare a cash account
    pub fn add_cash_account(&self, account: CashAccount) -> LedgerResult<()> {
        let mut inner = self.write()?;
        if inner.accounts.contains_key(&account.id) {
            return Err(LedgerError::Validation(format!(
                "Account with ID '{}' already exists",
                account.id
            )));
        }
        inner.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    /// Declare a category
    pub fn add_category(&self, category: AccountCategory) -> LedgerResult<()> {
        let mut inner = self.write()?;
        if inner.categories.contains_key(&category.id) {
            return Err(LedgerError::Validation(format!(
                "Category with ID '{}' already exists",
                category.id
            )));
        }
        inner.categories.insert(category.id.clone(), category);
        Ok(())
    }

    /// Validate a draft, store it as a record and update account balances
    pub fn add_record(&self, draft: RecordDraft) -> LedgerResult<CashMovementRecord> {
        let date = parse_record_date(draft.date.as_deref())?;
        let mut inner = self.write()?;

        check_references(&inner, &draft.movement)?;

        let sequence = inner.next_sequence + 1;
        let record = CashMovementRecord {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            movement: draft.movement,
            amount: draft.amount,
            fee: draft.fee,
            description: draft.description,
            created_at: chrono::Utc::now().naive_utc(),
            sequence,
        };
        self.validator.validate_record(&record)?;

        inner.next_sequence = sequence;

        apply_record(&mut inner.accounts, &record, false);
        inner.records.push(record.clone());
        tracing::debug!(record_id = %record.id, sequence = record.sequence, "stored record");
        Ok(record)
    }

    /// Delete a record and reverse its effect on account balances
    pub fn delete_record(&self, record_id: &str) -> LedgerResult<CashMovementRecord> {
        let mut inner = self.write()?;
        let position = inner
            .records
            .iter()
            .position(|record| record.id == record_id)
            .ok_or_else(|| LedgerError::RecordNotFound(record_id.to_string()))?;
        let record = inner.records.remove(position);
        apply_record(&mut inner.accounts, &record, true);
        Ok(record)
    }

    /// Change a stored current balance without a record, as an out-of-band
    /// edit would
    pub fn adjust_current_balance(&self, account_id: &str, delta: &BigDecimal) -> LedgerResult<()> {
        let mut inner = self.write()?;
        let account = inner
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))?;
        account.current_balance += delta;
        Ok(())
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        *self.write()? = Inner::default();
        Ok(())
    }
}

impl Default for MemoryRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

fn check_references(inner: &Inner, movement: &Movement) -> LedgerResult<()> {
    let require_account = |id: &str| {
        if inner.accounts.contains_key(id) {
            Ok(())
        } else {
            Err(LedgerError::AccountNotFound(id.to_string()))
        }
    };
    let require_category = |id: Option<&String>| match id {
        Some(id) if !inner.categories.contains_key(id) => Err(LedgerError::Validation(format!(
            "Category '{id}' does not exist"
        ))),
        _ => Ok(()),
    };

    match movement {
        Movement::Income {
            category_id,
            account_id,
        }
        | Movement::Expense {
            category_id,
            account_id,
        } => {
            require_account(account_id.as_str())?;
            require_category(category_id.as_ref())
        }
        Movement::Transfer {
            from_account_id,
            to_account_id,
        } => {
            require_account(from_account_id.as_str())?;
            require_account(to_account_id.as_str())
        }
    }
}

/// Apply (or reverse) a record's cash-account postings to stored balances
fn apply_record(
    accounts: &mut BTreeMap<String, CashAccount>,
    record: &CashMovementRecord,
    reverse: bool,
) {
    let mut post = |account_id: &str, entry_type: EntryType, amount: &BigDecimal| {
        let entry_type = if reverse {
            entry_type.opposite()
        } else {
            entry_type
        };
        if let Some(account) = accounts.get_mut(account_id) {
            account.apply_posting(entry_type, amount);
        }
    };

    match &record.movement {
        Movement::Income { account_id, .. } => {
            post(account_id.as_str(), EntryType::Debit, &record.amount);
        }
        Movement::Expense { account_id, .. } => {
            post(account_id.as_str(), EntryType::Credit, &record.gross_outflow());
        }
        Movement::Transfer {
            from_account_id,
            to_account_id,
        } => {
            post(from_account_id.as_str(), EntryType::Credit, &record.gross_outflow());
            post(to_account_id.as_str(), EntryType::Debit, &record.amount);
        }
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn list_records(&self) -> LedgerResult<Vec<CashMovementRecord>> {
        Ok(self.read()?.records.clone())
    }

    async fn get_record(&self, record_id: &str) -> LedgerResult<Option<CashMovementRecord>> {
        Ok(self
            .read()?
            .records
            .iter()
            .find(|record| record.id == record_id)
            .cloned())
    }

    async fn list_cash_accounts(&self) -> LedgerResult<Vec<CashAccount>> {
        Ok(self.read()?.accounts.values().cloned().collect())
    }

    async fn list_categories(&self) -> LedgerResult<Vec<AccountCategory>> {
        Ok(self.read()?.categories.values().cloned().collect())
    }
}
