//! Construction of cash-movement records

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::traits::RecordValidator;
use crate::types::*;
use crate::utils::validation::DefaultRecordValidator;

/// Builder for cash-movement records
#[derive(Debug)]
pub struct RecordBuilder {
    record: CashMovementRecord,
}

impl RecordBuilder {
    /// Start a record. The creation timestamp defaults to midnight of `date`
    /// and the sequence to zero.
    pub fn new(id: String, date: NaiveDate, movement: Movement, amount: BigDecimal) -> Self {
        Self {
            record: CashMovementRecord {
                id,
                date,
                movement,
                amount,
                fee: None,
                description: String::new(),
                created_at: NaiveDateTime::new(date, NaiveTime::MIN),
                sequence: 0,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.record.description = description.into();
        self
    }

    pub fn fee(mut self, fee: BigDecimal) -> Self {
        self.record.fee = Some(fee);
        self
    }

    pub fn sequence(mut self, sequence: u64) -> Self {
        self.record.sequence = sequence;
        self
    }

    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.record.created_at = created_at;
        self
    }

    /// Build the record after running the default validation rules
    pub fn build(self) -> LedgerResult<CashMovementRecord> {
        DefaultRecordValidator.validate_record(&self.record)?;
        Ok(self.record)
    }

    /// Build the record as-is. The engine accepts any record, so this is
    /// what tests and importers of legacy data use.
    pub fn build_unchecked(self) -> CashMovementRecord {
        self.record
    }
}

/// Common record shapes
pub mod patterns {
    use super::*;

    /// Money received into `account_id`, booked against `category_id`
    pub fn income(
        id: &str,
        date: NaiveDate,
        account_id: &str,
        category_id: Option<&str>,
        amount: BigDecimal,
    ) -> CashMovementRecord {
        RecordBuilder::new(
            id.to_string(),
            date,
            Movement::Income {
                category_id: category_id.map(str::to_string),
                account_id: account_id.to_string(),
            },
            amount,
        )
        .description(format!("Income {id}"))
        .build_unchecked()
    }

    /// Money paid out of `account_id`, booked against `category_id`
    pub fn expense(
        id: &str,
        date: NaiveDate,
        account_id: &str,
        category_id: Option<&str>,
        amount: BigDecimal,
        fee: Option<BigDecimal>,
    ) -> CashMovementRecord {
        let builder = RecordBuilder::new(
            id.to_string(),
            date,
            Movement::Expense {
                category_id: category_id.map(str::to_string),
                account_id: account_id.to_string(),
            },
            amount,
        )
        .description(format!("Expense {id}"));
        match fee {
            Some(fee) => builder.fee(fee).build_unchecked(),
            None => builder.build_unchecked(),
        }
    }

    /// Money moved from one cash account to another
    pub fn transfer(
        id: &str,
        date: NaiveDate,
        from_account_id: &str,
        to_account_id: &str,
        amount: BigDecimal,
        fee: Option<BigDecimal>,
    ) -> CashMovementRecord {
        let builder = RecordBuilder::new(
            id.to_string(),
            date,
            Movement::Transfer {
                from_account_id: from_account_id.to_string(),
                to_account_id: to_account_id.to_string(),
            },
            amount,
        )
        .description(format!("Transfer {id}"));
        match fee {
            Some(fee) => builder.fee(fee).build_unchecked(),
            None => builder.build_unchecked(),
        }
    }
}
