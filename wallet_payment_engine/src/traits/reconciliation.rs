use chrono::Duration;
use thiserror::Error;

use crate::{
    db_types::{NewSmsPayment, NewSubmission, SmsPayment, Submission},
    traits::{LedgerError, WalletLedger},
};

/// Tuning knobs for the matching cascade.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// The trailing window, ending at evaluation time, within which an amount-only match is accepted.
    pub amount_window: Duration,
    /// When true, the amount+window stage skips incoming records that have already been consumed by another
    /// matched submission. The TID-keyed stages are unaffected.
    pub exclusive_amount_match: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { amount_window: Duration::hours(6), exclusive_amount_match: true }
    }
}

/// The highest level of behaviour for backends supporting the payment gateway.
///
/// This covers:
/// * Persisting manual payment submissions as they are lodged.
/// * Running the matching cascade against the incoming SMS record set.
/// * The forward-only submission state machine, guarded by a compare-and-set in the store.
/// * Appending incoming SMS records on behalf of the (external) ingestion pipeline.
#[allow(async_fn_in_trait)]
pub trait ReconciliationDatabase: Clone + WalletLedger {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Persists a new submission with `pending` status. The TID is stored trimmed.
    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, ReconciliationError>;

    async fn fetch_submission(&self, id: i64) -> Result<Option<Submission>, ReconciliationError>;

    /// The most recently lodged submission for the given TID, if any.
    async fn fetch_submission_by_tid(&self, tid: &str) -> Result<Option<Submission>, ReconciliationError>;

    async fn submissions_for_user(&self, user_id: i64) -> Result<Vec<Submission>, ReconciliationError>;

    /// The eager intake-time check: stage 1 of the cascade only (exact parsed-TID equality). On a hit the wallet
    /// is credited first, under the submission-id idempotency key, and only then is the submission moved to
    /// `matched` with a compare-and-set. Returns the submission as it stands after the attempt.
    async fn try_exact_match(&self, submission: &Submission) -> Result<Submission, ReconciliationError>;

    /// The full three-stage cascade: exact parsed-TID match, then TID-in-raw-text containment, then amount within
    /// the trailing window (only when the submission claims an amount). Stages run in order and the first hit
    /// wins; within a stage the most recently created record is preferred.
    ///
    /// The credit-then-mark discipline is the same as [`Self::try_exact_match`]: a crash after the credit but
    /// before the mark leaves the submission pending and retryable, and the idempotency key makes the retry safe.
    /// A concurrent caller that wins the compare-and-set race simply leaves this one observing the winner's row.
    ///
    /// A miss leaves the submission pending with no side effect.
    async fn reconcile_submission(
        &self,
        submission: &Submission,
        options: &MatchOptions,
    ) -> Result<Submission, ReconciliationError>;

    /// Manual administrative rejection. Only a pending submission can be rejected; the transition is guarded by
    /// the same compare-and-set as matching, so it can never claw back a matched submission.
    async fn reject_submission(&self, id: i64) -> Result<Submission, ReconciliationError>;

    /// Appends an incoming SMS payment record. This is the ingestion collaborator's (and the test fixtures')
    /// entry point; the reconciliation core itself only ever reads these rows.
    async fn insert_sms_payment(&self, sms: NewSmsPayment) -> Result<SmsPayment, ReconciliationError>;

    /// Looks up a single SMS payment record, typically the one a matched submission points at via
    /// `matched_sms_id`.
    async fn fetch_sms_payment(&self, id: i64) -> Result<Option<SmsPayment>, ReconciliationError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), ReconciliationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No submission exists for TID {0}")]
    SubmissionNotFoundForTid(String),
    #[error("The requested submission (internal id {0}) does not exist")]
    SubmissionIdNotFound(i64),
    #[error("Cannot insert SMS payment record, a record with content hash {0} already exists")]
    DuplicateSmsPayment(String),
    #[error("Invalid submission: {0}")]
    ValidationError(String),
    #[error("The submission is in a terminal state and cannot be modified")]
    SubmissionIsTerminal,
    #[error("The wallet credit was refused for submission {0}; the match has not been persisted")]
    CreditRefused(i64),
    #[error("{0}")]
    LedgerError(#[from] LedgerError),
}

impl From<sqlx::Error> for ReconciliationError {
    fn from(e: sqlx::Error) -> Self {
        ReconciliationError::DatabaseError(e.to_string())
    }
}
