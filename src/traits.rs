//! Traits for the record store boundary and extensibility

use async_trait::async_trait;

use crate::types::*;

/// Source of the records and definitions the engine reconstructs from
///
/// This trait allows the engine to work with any record store
/// (PostgreSQL, SQLite, a sync service, in-memory, etc.). The engine only
/// reads; creating and editing records is the store's own business.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// All cash-movement records, in any order
    async fn list_records(&self) -> LedgerResult<Vec<CashMovementRecord>>;

    /// Get a record by ID
    async fn get_record(&self, record_id: &str) -> LedgerResult<Option<CashMovementRecord>>;

    /// All declared cash accounts, with their current balances
    async fn list_cash_accounts(&self) -> LedgerResult<Vec<CashAccount>>;

    /// All declared revenue/expense categories
    async fn list_categories(&self) -> LedgerResult<Vec<AccountCategory>>;
}

/// Trait for implementing custom record validation rules at ingestion
pub trait RecordValidator: Send + Sync {
    /// Validate a record before it is stored
    fn validate_record(&self, record: &CashMovementRecord) -> LedgerResult<()>;
}
