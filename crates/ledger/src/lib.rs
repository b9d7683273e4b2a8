//! Core of the simulated retail-banking experience: the account
//! ledger, the funds-transfer engine, card controls, and the credit
//! simulation calculator.
//!
//! The crate owns no UI. Collaborating surfaces read the [`User`]
//! snapshot through a [`LedgerStore`], ask the [`TransferEngine`] or
//! the card control functions for a new snapshot, persist it, and
//! re-render. Every mutation replaces the whole record.

pub use cards::{Card, CardKind, CardLimits, Limit, reveal_pin, set_limits, set_lock};
pub use credit::{Amortization, LoanProject, compute_amortization};
pub use error::LedgerError;
pub use money::Money;
pub use store::{JsonFileBackend, LedgerStore, MemoryBackend, SnapshotBackend};
pub use transactions::{Transaction, TransactionKind, TransferDetails};
pub use transfer::{Beneficiary, PendingTransfer, TransferEngine, TransferKind, TransferOutcome};
pub use user::{Account, Accounts, User, default_user};

mod cards;
mod credit;
mod error;
mod money;
mod store;
mod transactions;
mod transfer;
mod user;

pub type LedgerResult<T> = Result<T, LedgerError>;
