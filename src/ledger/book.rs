//! Ledger account builder: reconstructs the general ledger for a period

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::LedgerConfig;
use crate::ledger::account::{Chart, LedgerKey, LedgerSection};
use crate::ledger::classifier::{classify, Posting, PostingRole};
use crate::types::*;

/// Inclusive range of calendar days a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Where a date falls relative to a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodPlacement {
    /// Folded into opening balances
    BeforeStart,
    /// Shown as a ledger entry
    Within,
    /// Belongs to a later period and is ignored
    AfterEnd,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.placement(date) == PeriodPlacement::Within
    }

    pub fn placement(&self, date: NaiveDate) -> PeriodPlacement {
        if date < self.start {
            PeriodPlacement::BeforeStart
        } else if date > self.end {
            PeriodPlacement::AfterEnd
        } else {
            PeriodPlacement::Within
        }
    }
}

/// One visible line of a ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    /// Record that produced this line
    pub record_id: String,
    pub description: String,
    /// Movement label such as "receipt", "payment", "transfer" or "fee"
    pub kind: String,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    /// Ledger balance immediately after this line
    pub balance: BigDecimal,
}

/// Chronological account book for one cash account or category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub key: LedgerKey,
    pub code: String,
    pub name: String,
    pub kind: CategoryKind,
    pub section: LedgerSection,
    pub opening_balance: BigDecimal,
    pub entries: Vec<LedgerEntry>,
    pub closing_balance: BigDecimal,
    pub total_debits: BigDecimal,
    pub total_credits: BigDecimal,
}

impl LedgerAccount {
    /// Signed sum of the period's entries under this ledger's normal-balance rule
    pub fn period_change(&self) -> BigDecimal {
        self.kind
            .balance_change(&self.total_debits, &self.total_credits)
    }

    pub fn type_label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Every ledger touched in or before a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralLedger {
    pub period: Period,
    /// Cash accounts first, then categories, each ordered by code
    pub accounts: Vec<LedgerAccount>,
}

impl GeneralLedger {
    pub fn account(&self, key: &LedgerKey) -> Option<&LedgerAccount> {
        self.accounts.iter().find(|account| &account.key == key)
    }

    pub fn account_by_code(&self, code: &str) -> Option<&LedgerAccount> {
        self.accounts.iter().find(|account| account.code == code)
    }
}

/// Outcome of a general-ledger request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LedgerBook {
    Built(GeneralLedger),
    /// The period's start lies after its end; nothing was computed
    InvalidPeriod { period: Period },
}

impl LedgerBook {
    pub fn is_valid(&self) -> bool {
        matches!(self, LedgerBook::Built(_))
    }

    /// Ledgers of a built book; empty for an invalid period
    pub fn accounts(&self) -> &[LedgerAccount] {
        match self {
            LedgerBook::Built(ledger) => &ledger.accounts,
            LedgerBook::InvalidPeriod { .. } => &[],
        }
    }

    pub fn ledger(&self) -> Option<&GeneralLedger> {
        match self {
            LedgerBook::Built(ledger) => Some(ledger),
            LedgerBook::InvalidPeriod { .. } => None,
        }
    }

    pub fn into_ledger(self) -> Option<GeneralLedger> {
        match self {
            LedgerBook::Built(ledger) => Some(ledger),
            LedgerBook::InvalidPeriod { .. } => None,
        }
    }
}

type EntryOrder = (NaiveDate, u64, String, usize);

struct PendingEntry {
    order: EntryOrder,
    description: String,
    kind: String,
    posting: Posting,
}

struct Accumulator {
    opening: BigDecimal,
    pending: Vec<PendingEntry>,
}

fn movement_label(config: &LedgerConfig, movement_type: MovementType, role: PostingRole) -> String {
    let labels = &config.labels;
    match (role, movement_type) {
        (PostingRole::Fee, _) => labels.fee.clone(),
        (PostingRole::Principal, MovementType::Income) => labels.receipt.clone(),
        (PostingRole::Principal, MovementType::Expense) => labels.payment.clone(),
        (PostingRole::Principal, MovementType::Transfer) => labels.transfer.clone(),
    }
}

/// Build the general ledger for `period` with the default configuration
pub fn build(
    records: &[CashMovementRecord],
    accounts: &[CashAccount],
    categories: &[AccountCategory],
    period: Period,
) -> LedgerBook {
    build_with_config(records, accounts, categories, period, &LedgerConfig::default())
}

/// Build the general ledger for `period`.
///
/// Postings dated before the period fold into opening balances, postings
/// inside it become entries, and later postings are ignored. Every declared
/// cash account is present; other ledgers appear once touched.
pub fn build_with_config(
    records: &[CashMovementRecord],
    accounts: &[CashAccount],
    categories: &[AccountCategory],
    period: Period,
    config: &LedgerConfig,
) -> LedgerBook {
    if !period.is_valid() {
        tracing::warn!(start = %period.start, end = %period.end, "invalid ledger period");
        return LedgerBook::InvalidPeriod { period };
    }

    let chart = Chart::new(accounts, categories, config);
    let mut ledgers: BTreeMap<LedgerKey, Accumulator> = BTreeMap::new();

    // Opening balances come from the chart so a duplicated id uses its last definition
    for account in chart.cash_accounts() {
        let key = LedgerKey::CashAccount(account.id.clone());
        let opening = chart.initial_balance(&key);
        ledgers.entry(key).or_insert_with(|| Accumulator {
            opening,
            pending: Vec::new(),
        });
    }

    let mut folded = 0usize;
    let mut visible = 0usize;
    for record in records {
        let placement = period.placement(record.date);
        if placement == PeriodPlacement::AfterEnd {
            continue;
        }

        let movement_type = record.movement_type();
        for (index, posting) in classify(record, &chart).postings.into_iter().enumerate() {
            let ledger = ledgers
                .entry(posting.key.clone())
                .or_insert_with(|| Accumulator {
                    opening: chart.initial_balance(&posting.key),
                    pending: Vec::new(),
                });

            if placement == PeriodPlacement::BeforeStart {
                ledger.opening += posting.balance_change();
                folded += 1;
            } else {
                ledger.pending.push(PendingEntry {
                    order: (record.date, record.sequence, record.id.clone(), index),
                    description: record.description.clone(),
                    kind: movement_label(config, movement_type, posting.role),
                    posting,
                });
                visible += 1;
            }
        }
    }

    let mut result: Vec<LedgerAccount> = ledgers
        .into_iter()
        .map(|(key, accumulator)| resolve_ledger(&chart, key, accumulator))
        .collect();
    result.sort_by(|a, b| (a.section, &a.code, &a.key).cmp(&(b.section, &b.code, &b.key)));

    tracing::debug!(
        start = %period.start,
        end = %period.end,
        ledgers = result.len(),
        folded,
        visible,
        "built general ledger"
    );

    LedgerBook::Built(GeneralLedger {
        period,
        accounts: result,
    })
}

/// Sort a ledger's pending entries and walk them into running balances
fn resolve_ledger(chart: &Chart<'_>, key: LedgerKey, accumulator: Accumulator) -> LedgerAccount {
    let descriptor = chart.describe(&key);
    let Accumulator { opening, mut pending } = accumulator;
    pending.sort_by(|a, b| a.order.cmp(&b.order));

    let mut balance = opening.clone();
    let mut total_debits = BigDecimal::from(0);
    let mut total_credits = BigDecimal::from(0);
    let mut entries = Vec::with_capacity(pending.len());

    for item in pending {
        let debit = item.posting.debit();
        let credit = item.posting.credit();
        balance += descriptor.kind.balance_change(&debit, &credit);
        total_debits += &debit;
        total_credits += &credit;
        let (date, _, record_id, _) = item.order;
        entries.push(LedgerEntry {
            date,
            record_id,
            description: item.description,
            kind: item.kind,
            debit,
            credit,
            balance: balance.clone(),
        });
    }

    LedgerAccount {
        key,
        code: descriptor.code,
        name: descriptor.name,
        kind: descriptor.kind,
        section: descriptor.section,
        opening_balance: opening,
        entries,
        closing_balance: balance,
        total_debits,
        total_credits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transaction::patterns;

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn january() -> Period {
        Period::new(day(1, 1), day(1, 31))
    }

    fn cash(opening: i64) -> CashAccount {
        CashAccount::new(
            "cash".to_string(),
            "Cash".to_string(),
            CashAccountKind::Cash,
            BigDecimal::from(opening),
        )
    }

    fn sales() -> AccountCategory {
        AccountCategory::new(
            "sales".to_string(),
            "4000".to_string(),
            "Sales".to_string(),
            CategoryKind::Revenue,
        )
    }

    #[test]
    fn test_period_placement() {
        let period = january();
        assert_eq!(
            period.placement(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            PeriodPlacement::BeforeStart
        );
        assert_eq!(period.placement(day(1, 1)), PeriodPlacement::Within);
        assert_eq!(period.placement(day(1, 31)), PeriodPlacement::Within);
        assert_eq!(period.placement(day(2, 1)), PeriodPlacement::AfterEnd);
    }

    #[test]
    fn test_invalid_period_is_explicit() {
        let book = build(&[], &[cash(10)], &[], Period::new(day(2, 1), day(1, 1)));
        assert!(!book.is_valid());
        assert!(book.accounts().is_empty());
        assert!(matches!(book, LedgerBook::InvalidPeriod { .. }));
    }

    #[test]
    fn test_empty_record_set_keeps_opening_balances() {
        let book = build(&[], &[cash(500)], &[sales()], january());
        let accounts = book.accounts();
        assert_eq!(accounts.len(), 1);
        assert!(accounts[0].entries.is_empty());
        assert_eq!(accounts[0].opening_balance, BigDecimal::from(500));
        assert_eq!(accounts[0].closing_balance, BigDecimal::from(500));

        let nothing = build(&[], &[], &[], january());
        assert!(nothing.is_valid());
        assert!(nothing.accounts().is_empty());
    }

    #[test]
    fn test_same_day_entries_follow_sequence() {
        let mut first = patterns::income("b", day(1, 5), "cash", Some("sales"), BigDecimal::from(10));
        first.sequence = 1;
        let mut second = patterns::income("a", day(1, 5), "cash", Some("sales"), BigDecimal::from(20));
        second.sequence = 2;

        let book = build(&[second, first], &[cash(0)], &[sales()], january());
        let ledger = book.ledger().unwrap();
        let cash_ledger = ledger
            .account(&LedgerKey::CashAccount("cash".to_string()))
            .unwrap();
        let ids: Vec<&str> = cash_ledger
            .entries
            .iter()
            .map(|e| e.record_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(cash_ledger.entries[0].balance, BigDecimal::from(10));
        assert_eq!(cash_ledger.entries[1].balance, BigDecimal::from(30));
    }

    #[test]
    fn test_entry_labels_and_totals() {
        let records = vec![
            patterns::income("i1", day(1, 2), "cash", Some("sales"), BigDecimal::from(100)),
            patterns::expense(
                "e1",
                day(1, 3),
                "cash",
                None,
                BigDecimal::from(40),
                Some(BigDecimal::from(1)),
            ),
        ];
        let book = build(&records, &[cash(0)], &[sales()], january());
        let ledger = book.ledger().unwrap();

        let cash_ledger = ledger.account_by_code("cash").unwrap();
        assert_eq!(cash_ledger.entries[0].kind, "receipt");
        assert_eq!(cash_ledger.entries[1].kind, "payment");
        assert_eq!(cash_ledger.total_debits, BigDecimal::from(100));
        assert_eq!(cash_ledger.total_credits, BigDecimal::from(41));
        assert_eq!(cash_ledger.closing_balance, BigDecimal::from(59));

        let fees = ledger.account(&LedgerKey::Fees).unwrap();
        assert_eq!(fees.entries[0].kind, "fee");
        assert_eq!(fees.closing_balance, BigDecimal::from(1));
    }

    #[test]
    fn test_display_order_puts_cash_accounts_first() {
        let records = vec![patterns::expense(
            "e1",
            day(1, 3),
            "cash",
            None,
            BigDecimal::from(40),
            Some(BigDecimal::from(1)),
        )];
        let bank = CashAccount::new(
            "bank".to_string(),
            "Bank".to_string(),
            CashAccountKind::Bank,
            BigDecimal::from(0),
        );
        let book = build(&records, &[cash(100), bank], &[sales()], january());
        let codes: Vec<&str> = book.accounts().iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["bank", "cash", "fees", "uncategorized-expense"]);
    }

    #[test]
    fn test_duplicate_cash_account_uses_last_definition() {
        let records = vec![patterns::income("i1", day(1, 2), "cash", None, BigDecimal::from(10))];
        let book = build(&records, &[cash(100), cash(250)], &[], january());
        let ledger = book.ledger().unwrap();
        let cash_ledgers: Vec<&LedgerAccount> = ledger
            .accounts
            .iter()
            .filter(|a| a.section == LedgerSection::CashAccounts)
            .collect();

        assert_eq!(cash_ledgers.len(), 1);
        assert_eq!(cash_ledgers[0].opening_balance, BigDecimal::from(250));
        assert_eq!(cash_ledgers[0].closing_balance, BigDecimal::from(260));
    }
}
