use thiserror::Error;
use wpg_common::Rupees;

use crate::db_types::{UserWallet, WalletTransaction};

/// Metadata attached to a ledger credit.
#[derive(Debug, Clone, Default)]
pub struct CreditReference {
    /// Free-text description recorded against the transaction row
    pub reference: String,
    /// The idempotency key. When present, at most one transaction row will ever exist for this submission,
    /// no matter how many times the credit is attempted.
    pub submission_id: Option<i64>,
}

impl CreditReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self { reference: reference.into(), submission_id: None }
    }

    pub fn for_submission(reference: impl Into<String>, submission_id: i64) -> Self {
        Self { reference: reference.into(), submission_id: Some(submission_id) }
    }
}

/// The wallet ledger contract.
///
/// The balance column is a cached projection of the transaction log. Implementations must only ever move the
/// balance inside the same unit of work that appends the corresponding log entry, and must enforce uniqueness of
/// the submission id among transaction rows *in the store itself*, so that two racing credits for the same
/// submission cannot both land.
#[allow(async_fn_in_trait)]
pub trait WalletLedger {
    /// Upserts a zero-balance wallet row for the user if none exists. Idempotent; safe to call unconditionally.
    async fn ensure_wallet(&self, user_id: i64) -> Result<(), LedgerError>;

    /// Credits the user's wallet.
    ///
    /// Returns `Ok(false)` without touching any state when the amount is not strictly positive. Otherwise, in one
    /// atomic unit of work, appends a transaction row and moves the cached balance by the same amount. When
    /// `reference.submission_id` is set and a transaction row already carries that submission id, the call is an
    /// idempotent replay: nothing is written and `Ok(true)` is returned.
    async fn credit_user(&self, user_id: i64, amount: Rupees, reference: CreditReference) -> Result<bool, LedgerError>;

    /// Forces the user's balance to zero, creating the wallet if needed. The transaction history is left intact.
    /// Administrative/testing utility; not part of steady-state reconciliation.
    async fn reset_wallet(&self, user_id: i64) -> Result<UserWallet, LedgerError>;

    /// The user's current balance, or zero if no wallet row exists.
    async fn balance(&self, user_id: i64) -> Result<Rupees, LedgerError>;

    /// The user's transaction log, most recent first.
    async fn transactions_for_user(&self, user_id: i64) -> Result<Vec<WalletTransaction>, LedgerError>;
}

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The wallet for user {0} does not exist")]
    WalletNotFound(i64),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}
