//! Ledger module: classification, period ledgers and balance replay

pub mod account;
pub mod book;
pub mod classifier;
pub mod core;
pub mod replay;
pub mod transaction;

pub use account::*;
pub use book::*;
pub use classifier::*;
pub use self::core::*;
pub use replay::*;
pub use transaction::*;
