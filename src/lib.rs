//! # Cashbook Ledger
//!
//! Balance and general-ledger reconstruction for small-business cash books.
//!
//! ## Features
//!
//! - **Account classification**: income, expense and transfer records become
//!   balanced debit/credit postings, with fees as their own posting
//! - **Period ledgers**: one chronological book per cash account and category,
//!   with opening balance, running balances and closing balance
//! - **Balance replay**: combined cash position after every record
//! - **Reconciliation**: replayed history against stored account balances
//! - **Storage abstraction**: records come from any [`RecordSource`]
//!
//! Every output is recomputed from the records handed in; nothing derived is
//! stored.
//!
//! ## Quick Start
//!
//! ```rust
//! use cashbook_ledger::{build, patterns, CashAccount, CashAccountKind, Period};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let accounts = vec![CashAccount::new(
//!     "cash".to_string(),
//!     "Cash".to_string(),
//!     CashAccountKind::Cash,
//!     BigDecimal::from(100),
//! )];
//! let records = vec![patterns::income("r1", date, "cash", None, BigDecimal::from(40))];
//!
//! let book = build(&records, &accounts, &[], Period::new(date, date));
//! assert_eq!(book.accounts()[0].closing_balance, BigDecimal::from(140));
//! ```

pub mod config;
pub mod export;
pub mod ledger;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;

// Re-export record patterns for convenience
pub use ledger::transaction::patterns;
