//! Behaviour that a database backend must expose in order to act as a store for the payment gateway.
//!
//! * [`ReconciliationDatabase`] covers the submission lifecycle: intake, the cascading matcher, and the
//!   compare-and-set transition from `pending` to a terminal status.
//! * [`WalletLedger`] owns per-user balances and the append-only transaction log, with the submission-id
//!   idempotency guarantee that prevents a reconciled payment from ever being credited twice.
mod reconciliation;
mod wallet_ledger;

pub use reconciliation::{MatchOptions, ReconciliationDatabase, ReconciliationError};
pub use wallet_ledger::{CreditReference, LedgerError, WalletLedger};
