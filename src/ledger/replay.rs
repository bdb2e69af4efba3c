//! Global balance replay: combined cash position after every record

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

/// Combined balance across all cash accounts right after one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalBalanceSnapshot {
    pub record_id: String,
    pub date: NaiveDate,
    pub movement_type: MovementType,
    /// Signed effect of the record on the combined balance
    pub change: BigDecimal,
    pub balance_after: BigDecimal,
}

/// Result of replaying the full record history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReplay {
    /// Sum of all cash accounts' opening balances
    pub starting_balance: BigDecimal,
    /// One snapshot per record, in chronological order
    pub snapshots: Vec<GlobalBalanceSnapshot>,
    /// Balance after the last record (the starting balance if there are none)
    pub final_balance: BigDecimal,
    /// Record id to balance-after index, built once during the replay
    balances: BTreeMap<String, BigDecimal>,
}

impl BalanceReplay {
    /// Combined balance immediately after the given record
    pub fn balance_after(&self, record_id: &str) -> Option<&BigDecimal> {
        self.balances.get(record_id)
    }

    /// Record id to balance-after map
    pub fn by_record(&self) -> &BTreeMap<String, BigDecimal> {
        &self.balances
    }
}

/// Effect of one record on the combined cash position.
///
/// Transfers only move money between cash accounts, so the combined
/// position changes by their fee alone.
pub fn combined_change(record: &CashMovementRecord) -> BigDecimal {
    match record.movement_type() {
        MovementType::Income => record.amount.clone(),
        MovementType::Expense => -record.gross_outflow(),
        MovementType::Transfer => match record.effective_fee() {
            Some(fee) => -fee.clone(),
            None => BigDecimal::from(0),
        },
    }
}

/// Replay every record in chronological order, starting from the sum of the
/// cash accounts' opening balances. Not bounded by any period.
pub fn replay(records: &[CashMovementRecord], accounts: &[CashAccount]) -> BalanceReplay {
    let starting_balance: BigDecimal = accounts.iter().map(|a| &a.opening_balance).sum();
    let mut total = starting_balance.clone();
    let mut snapshots = Vec::with_capacity(records.len());
    let mut balances = BTreeMap::new();

    for record in chronological(records) {
        let change = combined_change(record);
        total += &change;
        balances.insert(record.id.clone(), total.clone());
        snapshots.push(GlobalBalanceSnapshot {
            record_id: record.id.clone(),
            date: record.date,
            movement_type: record.movement_type(),
            change,
            balance_after: total.clone(),
        });
    }

    tracing::debug!(
        records = snapshots.len(),
        starting = %starting_balance,
        final_balance = %total,
        "replayed combined balance"
    );

    BalanceReplay {
        starting_balance,
        snapshots,
        final_balance: total,
        balances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transaction::patterns;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn account(id: &str, opening: i64) -> CashAccount {
        CashAccount::new(
            id.to_string(),
            id.to_string(),
            CashAccountKind::Bank,
            BigDecimal::from(opening),
        )
    }

    #[test]
    fn test_replay_applies_movement_rules_in_date_order() {
        let records = vec![
            patterns::expense("e1", day(3), "a", None, BigDecimal::from(30), Some(BigDecimal::from(2))),
            patterns::income("i1", day(1), "a", None, BigDecimal::from(100)),
            patterns::transfer("t1", day(2), "a", "b", BigDecimal::from(50), Some(BigDecimal::from(1))),
        ];
        let result = replay(&records, &[account("a", 10), account("b", 5)]);

        assert_eq!(result.starting_balance, BigDecimal::from(15));
        let order: Vec<&str> = result.snapshots.iter().map(|s| s.record_id.as_str()).collect();
        assert_eq!(order, vec!["i1", "t1", "e1"]);
        assert_eq!(result.balance_after("i1"), Some(&BigDecimal::from(115)));
        assert_eq!(result.balance_after("t1"), Some(&BigDecimal::from(114)));
        assert_eq!(result.balance_after("e1"), Some(&BigDecimal::from(82)));
        assert_eq!(result.final_balance, BigDecimal::from(82));
    }

    #[test]
    fn test_transfer_without_fee_keeps_combined_balance() {
        let records = vec![patterns::transfer("t1", day(1), "a", "b", BigDecimal::from(20000), None)];
        let result = replay(&records, &[account("a", 500000), account("b", 50000)]);
        assert_eq!(result.snapshots[0].change, BigDecimal::from(0));
        assert_eq!(result.final_balance, result.starting_balance);
    }

    #[test]
    fn test_same_day_ties_use_sequence() {
        let mut late = patterns::income("a-late", day(1), "a", None, BigDecimal::from(1));
        late.sequence = 9;
        let mut early = patterns::expense("z-early", day(1), "a", None, BigDecimal::from(1), None);
        early.sequence = 3;
        let result = replay(&[late, early], &[account("a", 0)]);
        let map = result.by_record();
        assert_eq!(map["z-early"], BigDecimal::from(-1));
        assert_eq!(map["a-late"], BigDecimal::from(0));
    }

    #[test]
    fn test_empty_history() {
        let result = replay(&[], &[account("a", 7)]);
        assert!(result.snapshots.is_empty());
        assert_eq!(result.final_balance, BigDecimal::from(7));
    }

    #[test]
    fn test_record_index_matches_snapshots() {
        let records = vec![
            patterns::income("i1", day(1), "a", None, BigDecimal::from(100)),
            patterns::expense("e1", day(2), "a", None, BigDecimal::from(30), Some(BigDecimal::from(2))),
        ];
        let result = replay(&records, &[account("a", 0)]);

        assert_eq!(result.by_record().len(), result.snapshots.len());
        for snapshot in &result.snapshots {
            assert_eq!(result.balance_after(&snapshot.record_id), Some(&snapshot.balance_after));
        }
        assert!(std::ptr::eq(result.by_record(), result.by_record()));
        assert_eq!(result.balance_after("missing"), None);
    }
}
