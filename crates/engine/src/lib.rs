pub use accounts::{Account, AccountType};
pub use commands::{InternalTransferCmd, TransactionListFilter, TransactionSort};
pub use error::EngineError;
pub use ops::{AccountSummary, DEFAULT_MAX_TRANSFER_MINOR, Engine, EngineBuilder};
pub use transactions::{Transaction, TransactionKind, TransactionStatus};
pub use transfers::{Transfer, TransferStatus, TransferType};

mod accounts;
mod commands;
mod error;
mod ops;
pub mod reference;
mod transactions;
mod transfers;

type ResultEngine<T> = Result<T, EngineError>;
