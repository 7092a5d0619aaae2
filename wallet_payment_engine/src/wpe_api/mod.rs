//! # Wallet payment engine public API
//!
//! The `wpe_api` module exposes the programmatic API for the wallet payment engine. The API is modular, so that
//! clients can pick and choose the functionality they want: a deployment could serve submissions and wallet
//! queries from different machines, each constructed over its own backend instance.
//!
//! * [`reconciliation_api`] drives the submission lifecycle: intake, the eager intake-time match, and the lazy
//!   re-match performed on every status poll.
//! * [`wallet_api`] exposes the wallet ledger: balances, idempotent credits, resets, and the transaction log.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits the API
//! requires.
//!
//! ```rust,ignore
//! use wallet_payment_engine::{ReconciliationApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements ReconciliationDatabase
//! let api = ReconciliationApi::new(db, producers, MatchOptions::default());
//! let result = api.submit_payment(submission).await?;
//! ```

pub mod reconciliation_api;
pub mod submission_objects;
pub mod wallet_api;
