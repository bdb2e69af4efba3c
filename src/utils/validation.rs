//! Validation utilities applied by record stores before records reach the engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::traits::*;
use crate::types::*;

const MAX_DESCRIPTION_LEN: usize = 500;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal, field: &str) -> LedgerResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(LedgerError::Validation(format!(
            "{field} cannot be negative"
        )))
    } else {
        Ok(())
    }
}

/// Validate that a referenced id is present
pub fn validate_reference(id: &str, field: &str) -> LedgerResult<()> {
    if id.trim().is_empty() {
        return Err(LedgerError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Validate that a record description is valid
pub fn validate_description(description: &str) -> LedgerResult<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(LedgerError::Validation(format!(
            "Record description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Parse a record date. Missing or malformed dates are rejected so that no
/// record with an undefined position in time reaches the engine.
pub fn parse_record_date(value: Option<&str>) -> LedgerResult<NaiveDate> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LedgerError::Validation("Record date is required".to_string()))?;
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|err| {
        LedgerError::Validation(format!("Record date '{value}' is not a valid date: {err}"))
    })
}

/// Default record validator
pub struct DefaultRecordValidator;

impl RecordValidator for DefaultRecordValidator {
    fn validate_record(&self, record: &CashMovementRecord) -> LedgerResult<()> {
        validate_reference(&record.id, "Record ID")?;
        validate_non_negative_amount(&record.amount, "Amount")?;
        if let Some(fee) = &record.fee {
            validate_non_negative_amount(fee, "Fee")?;
        }
        validate_description(&record.description)?;

        match &record.movement {
            Movement::Income { account_id, .. } => {
                validate_reference(account_id, "Cash account")?;
                let has_fee = record
                    .fee
                    .as_ref()
                    .is_some_and(|fee| *fee != BigDecimal::from(0));
                if has_fee {
                    return Err(LedgerError::Validation(
                        "Income records cannot carry a fee".to_string(),
                    ));
                }
            }
            Movement::Expense { account_id, .. } => {
                validate_reference(account_id, "Cash account")?;
            }
            Movement::Transfer {
                from_account_id,
                to_account_id,
            } => {
                validate_reference(from_account_id, "Source account")?;
                validate_reference(to_account_id, "Destination account")?;
                if from_account_id == to_account_id {
                    return Err(LedgerError::Validation(format!(
                        "Transfer source and destination are both '{from_account_id}'"
                    )));
                }
            }
        }

        Ok(())
    }
}
