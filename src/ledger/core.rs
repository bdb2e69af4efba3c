//! Main ledger orchestrator that feeds record-store snapshots to the engine

use crate::config::LedgerConfig;
use crate::ledger::book::{build_with_config, LedgerBook, Period};
use crate::ledger::replay::{replay, BalanceReplay};
use crate::reconciliation::{reconcile, ReconciliationReport};
use crate::traits::*;
use crate::types::*;

/// Everything the engine reads, captured at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSnapshot {
    pub records: Vec<CashMovementRecord>,
    pub accounts: Vec<CashAccount>,
    pub categories: Vec<AccountCategory>,
}

/// Ledger front end over a record source.
///
/// Every call takes a fresh snapshot and recomputes from scratch; nothing
/// derived is cached or written back.
pub struct Ledger<S: RecordSource> {
    source: S,
    config: LedgerConfig,
}

impl<S: RecordSource> Ledger<S> {
    /// Create a new ledger over the given record source
    pub fn new(source: S) -> Self {
        Self::with_config(source, LedgerConfig::default())
    }

    /// Create a new ledger with a custom configuration
    pub fn with_config(source: S, config: LedgerConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Read records and definitions from the source
    pub async fn snapshot(&self) -> LedgerResult<RecordSnapshot> {
        Ok(RecordSnapshot {
            records: self.source.list_records().await?,
            accounts: self.source.list_cash_accounts().await?,
            categories: self.source.list_categories().await?,
        })
    }

    /// General ledger for an inclusive period
    pub async fn general_ledger(&self, period: Period) -> LedgerResult<LedgerBook> {
        let snapshot = self.snapshot().await?;
        Ok(build_with_config(
            &snapshot.records,
            &snapshot.accounts,
            &snapshot.categories,
            period,
            &self.config,
        ))
    }

    /// Combined cash balance after every record in the full history
    pub async fn balance_replay(&self) -> LedgerResult<BalanceReplay> {
        let snapshot = self.snapshot().await?;
        Ok(replay(&snapshot.records, &snapshot.accounts))
    }

    /// Check the source's stored balances against the replayed history
    pub async fn reconcile(&self) -> LedgerResult<ReconciliationReport> {
        let snapshot = self.snapshot().await?;
        Ok(reconcile(
            &snapshot.records,
            &snapshot.accounts,
            &snapshot.categories,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::account::LedgerKey;
    use crate::utils::memory_storage::{MemoryRecordSource, RecordDraft};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_ledger_basic_operations() {
        let source = MemoryRecordSource::new();
        source
            .add_cash_account(CashAccount::new(
                "cash".to_string(),
                "Cash".to_string(),
                CashAccountKind::Cash,
                BigDecimal::from(50000),
            ))
            .unwrap();
        source
            .add_category(AccountCategory::new(
                "sales".to_string(),
                "4000".to_string(),
                "Sales".to_string(),
                CategoryKind::Revenue,
            ))
            .unwrap();
        let sale = source
            .add_record(
                RecordDraft::new(
                    "2024-01-15",
                    Movement::Income {
                        category_id: Some("sales".to_string()),
                        account_id: "cash".to_string(),
                    },
                    BigDecimal::from(80000),
                )
                .with_description("Sale of goods"),
            )
            .unwrap();

        let ledger = Ledger::new(source);
        let period = Period::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let book = ledger.general_ledger(period).await.unwrap();
        let general = book.ledger().unwrap();

        let cash = general
            .account(&LedgerKey::CashAccount("cash".to_string()))
            .unwrap();
        assert_eq!(cash.closing_balance, BigDecimal::from(130000));
        assert_eq!(cash.entries[0].description, "Sale of goods");

        let replayed = ledger.balance_replay().await.unwrap();
        assert_eq!(
            replayed.balance_after(&sale.id),
            Some(&BigDecimal::from(130000))
        );

        assert!(ledger.reconcile().await.unwrap().is_reconciled());
    }
}
