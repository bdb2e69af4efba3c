//! Reconciliation of replayed history against stored account balances
//!
//! Record stores keep each cash account's current balance up to date
//! incrementally. Replaying the full history must land on the same numbers;
//! any difference points at a record that was deleted or edited without the
//! matching balance adjustment.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::LedgerConfig;
use crate::ledger::account::{Chart, LedgerKey};
use crate::ledger::classifier::classify;
use crate::ledger::replay::replay;
use crate::types::*;

/// Reconstructed against stored balance for one cash account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountReconciliation {
    pub account_id: String,
    pub name: String,
    /// Opening balance plus every posting in the full history
    pub reconstructed_balance: BigDecimal,
    /// Balance as maintained by the record store
    pub stored_balance: BigDecimal,
    /// `stored_balance - reconstructed_balance`
    pub difference: BigDecimal,
}

impl AccountReconciliation {
    pub fn is_matched(&self) -> bool {
        self.difference == BigDecimal::from(0)
    }
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Final combined balance of the global replay
    pub replayed_total: BigDecimal,
    /// Sum of the stored current balances
    pub stored_total: BigDecimal,
    pub accounts: Vec<AccountReconciliation>,
    pub issues: Vec<String>,
}

impl ReconciliationReport {
    pub fn is_reconciled(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Compare the replayed history with the stored current balances
pub fn reconcile(
    records: &[CashMovementRecord],
    accounts: &[CashAccount],
    categories: &[AccountCategory],
) -> ReconciliationReport {
    let config = LedgerConfig::default();
    let chart = Chart::new(accounts, categories, &config);
    let replayed = replay(records, accounts);

    let mut reconstructed: BTreeMap<&str, BigDecimal> = accounts
        .iter()
        .map(|account| (account.id.as_str(), account.opening_balance.clone()))
        .collect();
    for record in records {
        for posting in classify(record, &chart).postings {
            if let LedgerKey::CashAccount(id) = &posting.key {
                if let Some(balance) = reconstructed.get_mut(id.as_str()) {
                    *balance += posting.balance_change();
                }
            }
        }
    }

    let stored_total: BigDecimal = accounts.iter().map(|a| &a.current_balance).sum();
    let mut issues = Vec::new();

    if replayed.final_balance != stored_total {
        issues.push(format!(
            "Combined balance does not reconcile: replayed = {}, stored = {}",
            replayed.final_balance, stored_total
        ));
    }

    let mut results = Vec::with_capacity(accounts.len());
    for account in accounts {
        let reconstructed_balance = reconstructed
            .get(account.id.as_str())
            .cloned()
            .unwrap_or_else(|| account.opening_balance.clone());
        let difference = &account.current_balance - &reconstructed_balance;
        let result = AccountReconciliation {
            account_id: account.id.clone(),
            name: account.name.clone(),
            reconstructed_balance,
            stored_balance: account.current_balance.clone(),
            difference,
        };
        if !result.is_matched() {
            issues.push(format!(
                "Account '{}' does not reconcile: reconstructed = {}, stored = {}",
                result.account_id, result.reconstructed_balance, result.stored_balance
            ));
        }
        results.push(result);
    }

    if issues.is_empty() {
        tracing::debug!(total = %stored_total, "balances reconcile");
    } else {
        tracing::warn!(issues = issues.len(), "balances do not reconcile");
    }

    ReconciliationReport {
        replayed_total: replayed.final_balance,
        stored_total,
        accounts: results,
        issues,
    }
}
