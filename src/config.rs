//! Engine configuration: names of the synthetic ledgers and movement labels

use serde::{Deserialize, Serialize};

use crate::types::LedgerResult;

/// Code and display name of a ledger the engine creates on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyntheticLedger {
    pub code: String,
    pub name: String,
}

impl SyntheticLedger {
    fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// Labels printed in the kind column of ledger entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementLabels {
    pub receipt: String,
    pub payment: String,
    pub transfer: String,
    pub fee: String,
}

impl Default for MovementLabels {
    fn default() -> Self {
        Self {
            receipt: "receipt".into(),
            payment: "payment".into(),
            transfer: "transfer".into(),
            fee: "fee".into(),
        }
    }
}

/// Configuration for ledger reconstruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Shared expense ledger receiving every fee posting
    pub fees: SyntheticLedger,
    /// Revenue bucket for income without a known category
    pub uncategorized_income: SyntheticLedger,
    /// Expense bucket for expenses without a known category
    pub uncategorized_expense: SyntheticLedger,
    /// Asset bucket for postings against an unknown cash account
    pub unclassified_cash: SyntheticLedger,
    pub labels: MovementLabels,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fees: SyntheticLedger::new("fees", "Fees"),
            uncategorized_income: SyntheticLedger::new(
                "uncategorized-income",
                "Uncategorized income",
            ),
            uncategorized_expense: SyntheticLedger::new(
                "uncategorized-expense",
                "Uncategorized expense",
            ),
            unclassified_cash: SyntheticLedger::new("unclassified-cash", "Unclassified cash"),
            labels: MovementLabels::default(),
        }
    }
}

impl LedgerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> LedgerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerError;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            LedgerConfig::from_json_str(r#"{"fees": {"code": "bank-fees", "name": "Bank fees"}}"#)
                .unwrap();
        assert_eq!(config.fees.code, "bank-fees");
        assert_eq!(config.fees.name, "Bank fees");
        assert_eq!(config.uncategorized_income.name, "Uncategorized income");
        assert_eq!(config.labels.receipt, "receipt");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = LedgerConfig::from_json_str(r#"{"colour": "blue"}"#).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(
            LedgerConfig::from_json_str("{}").unwrap(),
            LedgerConfig::default()
        );
    }
}
