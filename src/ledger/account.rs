//! Chart of accounts: resolves record references to ledger buckets

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::LedgerConfig;
use crate::types::*;

/// Identity of one ledger in the general ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "bucket", content = "id", rename_all = "snake_case")]
pub enum LedgerKey {
    /// A declared cash account
    CashAccount(String),
    /// A declared revenue/expense category
    Category(String),
    /// Shared expense ledger for fees
    Fees,
    /// Income without a known category
    UncategorizedIncome,
    /// Expense without a known category
    UncategorizedExpense,
    /// Postings against a cash account that is not declared
    UnclassifiedCash,
}

/// Display group of a ledger. Cash accounts are listed before categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSection {
    CashAccounts,
    Categories,
}

/// Display information for a ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDescriptor {
    pub code: String,
    pub name: String,
    pub kind: CategoryKind,
    pub section: LedgerSection,
}

/// Read-only index over the declared cash accounts and categories
pub struct Chart<'a> {
    accounts: &'a [CashAccount],
    accounts_by_id: HashMap<&'a str, &'a CashAccount>,
    categories_by_id: HashMap<&'a str, &'a AccountCategory>,
    config: &'a LedgerConfig,
}

impl<'a> Chart<'a> {
    /// Index the given definitions. A duplicated id resolves to the last definition.
    pub fn new(
        accounts: &'a [CashAccount],
        categories: &'a [AccountCategory],
        config: &'a LedgerConfig,
    ) -> Self {
        Self {
            accounts,
            accounts_by_id: accounts.iter().map(|a| (a.id.as_str(), a)).collect(),
            categories_by_id: categories.iter().map(|c| (c.id.as_str(), c)).collect(),
            config,
        }
    }

    pub fn config(&self) -> &'a LedgerConfig {
        self.config
    }

    /// Declared cash accounts in declaration order
    pub fn cash_accounts(&self) -> &'a [CashAccount] {
        self.accounts
    }

    pub fn cash_account(&self, account_id: &str) -> Option<&'a CashAccount> {
        self.accounts_by_id.get(account_id).copied()
    }

    pub fn category(&self, category_id: &str) -> Option<&'a AccountCategory> {
        self.categories_by_id.get(category_id).copied()
    }

    /// Resolve a cash-account reference, routing unknown ids to the unclassified bucket
    pub fn resolve_cash_account(&self, account_id: &str) -> (LedgerKey, CategoryKind) {
        if self.accounts_by_id.contains_key(account_id) {
            (
                LedgerKey::CashAccount(account_id.to_string()),
                CategoryKind::Asset,
            )
        } else {
            tracing::warn!(account_id, "unknown cash account, routing to unclassified cash");
            (LedgerKey::UnclassifiedCash, CategoryKind::Asset)
        }
    }

    /// Resolve the category side of an income or expense record.
    ///
    /// Missing and unknown categories land in the uncategorized bucket of
    /// the record's own type.
    pub fn resolve_category(
        &self,
        category_id: Option<&str>,
        movement_type: MovementType,
    ) -> (LedgerKey, CategoryKind) {
        if let Some(category) = category_id.and_then(|id| self.category(id)) {
            return (LedgerKey::Category(category.id.clone()), category.kind);
        }
        if let Some(id) = category_id {
            tracing::warn!(category_id = id, "unknown category, routing to uncategorized");
        }
        let key = match movement_type {
            MovementType::Income => LedgerKey::UncategorizedIncome,
            _ => LedgerKey::UncategorizedExpense,
        };
        (key, uncategorized_kind(movement_type))
    }

    /// Opening balance a ledger carries before any record is applied
    pub fn initial_balance(&self, key: &LedgerKey) -> BigDecimal {
        match key {
            LedgerKey::CashAccount(id) => self
                .cash_account(id)
                .map(|account| account.opening_balance.clone())
                .unwrap_or_else(|| BigDecimal::from(0)),
            _ => BigDecimal::from(0),
        }
    }

    /// Code, name, kind and section for a ledger key
    pub fn describe(&self, key: &LedgerKey) -> LedgerDescriptor {
        let synthetic = |ledger: &crate::config::SyntheticLedger, kind, section| LedgerDescriptor {
            code: ledger.code.clone(),
            name: ledger.name.clone(),
            kind,
            section,
        };
        match key {
            LedgerKey::CashAccount(id) => LedgerDescriptor {
                code: id.clone(),
                name: self
                    .cash_account(id)
                    .map(|account| account.name.clone())
                    .unwrap_or_else(|| id.clone()),
                kind: CategoryKind::Asset,
                section: LedgerSection::CashAccounts,
            },
            LedgerKey::Category(id) => match self.category(id) {
                Some(category) => LedgerDescriptor {
                    code: category.code.clone(),
                    name: category.name.clone(),
                    kind: category.kind,
                    section: LedgerSection::Categories,
                },
                None => LedgerDescriptor {
                    code: id.clone(),
                    name: id.clone(),
                    kind: CategoryKind::Expense,
                    section: LedgerSection::Categories,
                },
            },
            LedgerKey::Fees => synthetic(
                &self.config.fees,
                CategoryKind::Expense,
                LedgerSection::Categories,
            ),
            LedgerKey::UncategorizedIncome => synthetic(
                &self.config.uncategorized_income,
                uncategorized_kind(MovementType::Income),
                LedgerSection::Categories,
            ),
            LedgerKey::UncategorizedExpense => synthetic(
                &self.config.uncategorized_expense,
                uncategorized_kind(MovementType::Expense),
                LedgerSection::Categories,
            ),
            LedgerKey::UnclassifiedCash => synthetic(
                &self.config.unclassified_cash,
                CategoryKind::Asset,
                LedgerSection::CashAccounts,
            ),
        }
    }
}

// Transfers never reach a category; they share the expense bucket's kind.
fn uncategorized_kind(movement_type: MovementType) -> CategoryKind {
    movement_type
        .uncategorized_kind()
        .unwrap_or(CategoryKind::Expense)
}
