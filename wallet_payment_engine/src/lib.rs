//! Wallet Payment Engine
//!
//! The Wallet Payment Engine reconciles user-submitted mobile wallet payment claims against the stream of carrier
//! SMS confirmations, and maintains the internal wallet ledger that matched payments credit into. This library
//! contains the core logic; it knows nothing about HTTP.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public API provided by the engine. The exception is the data
//!    types used in the database. These are defined in the [`mod@db_types`] module and are public.
//! 2. The engine public API ([`mod@wpe_api`]). This provides the public-facing functionality: lodging
//!    submissions, reconciling them against SMS payment records, and managing user wallets. Specific backends
//!    need to implement the traits in [`mod@traits`] in order to act as a backend for the Wallet Payment Server.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted when certain
//! actions occur, for example when a submission is matched and the wallet credited. A simple actor framework is
//! used so that you can easily hook into these events and perform custom actions, such as notifying the user.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;
mod wpe_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::{db, SqliteDatabase};
pub use traits::{CreditReference, LedgerError, MatchOptions, ReconciliationDatabase, ReconciliationError, WalletLedger};
pub use wpe_api::{
    reconciliation_api::ReconciliationApi,
    submission_objects,
    wallet_api::WalletApi,
};
