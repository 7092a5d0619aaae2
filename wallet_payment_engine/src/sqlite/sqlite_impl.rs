//! `SqliteDatabase` is a concrete implementation of a wallet payment gateway backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::Utc;
use log::*;
use sqlx::SqlitePool;
use wpg_common::Rupees;

use super::db::{new_pool, sms_records, submissions, wallets};
use crate::{
    db_types::{NewSmsPayment, NewSubmission, SmsPayment, Submission, UserWallet, WalletTransaction},
    traits::{
        CreditReference,
        LedgerError,
        MatchOptions,
        ReconciliationDatabase,
        ReconciliationError,
        WalletLedger,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl ReconciliationDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        let submission = submissions::insert_submission(submission, &mut conn).await?;
        Ok(submission)
    }

    async fn fetch_submission(&self, id: i64) -> Result<Option<Submission>, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        let submission = submissions::fetch_submission(id, &mut conn).await?;
        Ok(submission)
    }

    async fn fetch_submission_by_tid(&self, tid: &str) -> Result<Option<Submission>, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        let submission = submissions::fetch_latest_for_tid(tid, &mut conn).await?;
        Ok(submission)
    }

    async fn submissions_for_user(&self, user_id: i64) -> Result<Vec<Submission>, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        let submissions = submissions::fetch_for_user(user_id, &mut conn).await?;
        Ok(submissions)
    }

    async fn try_exact_match(&self, submission: &Submission) -> Result<Submission, ReconciliationError> {
        if !submissions::is_reconcilable(submission) {
            return Ok(submission.clone());
        }
        let candidate = {
            let mut conn = self.pool.acquire().await?;
            sms_records::exact_tid_match(submission.tid.trim(), &mut conn).await?
        };
        match candidate {
            Some(sms_id) => {
                debug!("🔍️ Eager exact match: submission {} hit SMS record {sms_id}", submission.id);
                self.settle_match(submission, sms_id).await
            },
            None => {
                trace!("🔍️ Eager exact match missed for submission {}; left pending", submission.id);
                Ok(submission.clone())
            },
        }
    }

    async fn reconcile_submission(
        &self,
        submission: &Submission,
        options: &MatchOptions,
    ) -> Result<Submission, ReconciliationError> {
        if !submissions::is_reconcilable(submission) {
            trace!("🔍️ Submission {} is already {}. Nothing to reconcile", submission.id, submission.status);
            return Ok(submission.clone());
        }
        let id = submission.id;
        let tid = submission.tid.trim();
        let candidate = {
            let mut conn = self.pool.acquire().await?;
            let mut candidate = sms_records::exact_tid_match(tid, &mut conn).await?;
            if candidate.is_some() {
                debug!("🔍️ Submission {id} (TID {tid}) matched at stage 1: exact TID");
            }
            if candidate.is_none() {
                candidate = sms_records::fuzzy_text_match(tid, &mut conn).await?;
                if candidate.is_some() {
                    debug!("🔍️ Submission {id} (TID {tid}) matched at stage 2: raw-text containment");
                }
            }
            if candidate.is_none() {
                if let Some(amount) = submission.amount {
                    let now = Utc::now();
                    let window_start = now - options.amount_window;
                    candidate = sms_records::amount_window_match(
                        amount,
                        window_start,
                        now,
                        options.exclusive_amount_match,
                        &mut conn,
                    )
                    .await?;
                    if candidate.is_some() {
                        debug!("🔍️ Submission {id} (TID {tid}) matched at stage 3: amount {amount} in window");
                    }
                }
            }
            candidate
        };
        match candidate {
            Some(sms_id) => self.settle_match(submission, sms_id).await,
            None => {
                trace!("🔍️ No stage of the cascade matched submission {id} (TID {tid}); left pending");
                Ok(submission.clone())
            },
        }
    }

    async fn reject_submission(&self, id: i64) -> Result<Submission, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        match submissions::mark_rejected(id, &mut conn).await? {
            Some(submission) => {
                info!("📨️ Submission {id} rejected by administrative action");
                Ok(submission)
            },
            None => match submissions::fetch_submission(id, &mut conn).await? {
                Some(_) => Err(ReconciliationError::SubmissionIsTerminal),
                None => Err(ReconciliationError::SubmissionIdNotFound(id)),
            },
        }
    }

    async fn insert_sms_payment(&self, sms: NewSmsPayment) -> Result<SmsPayment, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        let record = sms_records::insert_sms_payment(sms, &mut conn).await?;
        debug!("📱️ SMS payment record {} ingested from device [{}]", record.id, record.device_id);
        Ok(record)
    }

    async fn fetch_sms_payment(&self, id: i64) -> Result<Option<SmsPayment>, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        let record = sms_records::fetch_sms_payment(id, &mut conn).await?;
        Ok(record)
    }

    async fn close(&mut self) -> Result<(), ReconciliationError> {
        self.pool.close().await;
        Ok(())
    }
}

impl WalletLedger for SqliteDatabase {
    async fn ensure_wallet(&self, user_id: i64) -> Result<(), LedgerError> {
        let mut conn = self.pool.acquire().await?;
        wallets::ensure_wallet(user_id, &mut conn).await
    }

    /// Credits the user's wallet in a single atomic transaction.
    ///
    /// The transaction-log append and the cached-balance update either both commit or both roll back. When a
    /// submission id is supplied, the insert rides on the UNIQUE constraint over `wallet_transactions
    /// .submission_id`: a replay (or a racing duplicate) inserts nothing, the balance is left alone, and the call
    /// reports success, since the credit it asked for has already been applied.
    async fn credit_user(&self, user_id: i64, amount: Rupees, reference: CreditReference) -> Result<bool, LedgerError> {
        if !amount.is_positive() {
            warn!("💰️ Refusing to credit user {user_id} with a non-positive amount ({amount})");
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        wallets::ensure_wallet(user_id, &mut tx).await?;
        match reference.submission_id {
            Some(submission_id) => {
                let inserted =
                    wallets::insert_transaction_if_absent(user_id, amount, &reference.reference, submission_id, &mut tx)
                        .await?;
                if !inserted {
                    tx.commit().await?;
                    debug!("💰️ Credit for submission {submission_id} has already been applied. Idempotent replay.");
                    return Ok(true);
                }
            },
            None => wallets::insert_transaction(user_id, amount, &reference.reference, &mut tx).await?,
        }
        wallets::adjust_balance(user_id, amount, &mut tx).await?;
        tx.commit().await?;
        debug!("💰️ Credited {amount} to user {user_id} [{}]", reference.reference);
        Ok(true)
    }

    async fn reset_wallet(&self, user_id: i64) -> Result<UserWallet, LedgerError> {
        let mut tx = self.pool.begin().await?;
        wallets::ensure_wallet(user_id, &mut tx).await?;
        let wallet = wallets::reset_balance(user_id, &mut tx).await?;
        tx.commit().await?;
        Ok(wallet)
    }

    async fn balance(&self, user_id: i64) -> Result<Rupees, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let balance = wallets::balance(user_id, &mut conn).await?;
        Ok(balance)
    }

    async fn transactions_for_user(&self, user_id: i64) -> Result<Vec<WalletTransaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        wallets::transactions_for_user(user_id, &mut conn).await
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Settles a found match: credit first, mark second.
    ///
    /// The credit runs in its own atomic unit of work, keyed by the submission id. Only once it reports success
    /// (or already-applied) is the submission moved to `matched`. A crash between the two steps leaves the
    /// submission pending and retryable; the idempotency key guarantees the retry cannot credit a second time.
    async fn settle_match(&self, submission: &Submission, sms_id: i64) -> Result<Submission, ReconciliationError> {
        // Only the claimed amount is ever credited. A submission lodged without one still settles as matched,
        // but the ledger is left alone.
        if let Some(amount) = submission.amount {
            let reference =
                CreditReference::for_submission(format!("{} payment {}", submission.wallet, submission.tid), submission.id);
            let applied = self.credit_user(submission.user_id, amount, reference).await?;
            if !applied {
                error!(
                    "💰️ The ledger refused to credit user {} for submission {}. The match against SMS record \
                     {sms_id} will not be persisted and the submission stays pending.",
                    submission.user_id, submission.id
                );
                return Err(ReconciliationError::CreditRefused(submission.id));
            }
        }
        let mut conn = self.pool.acquire().await?;
        match submissions::mark_matched(submission.id, sms_id, &mut conn).await? {
            Some(updated) => Ok(updated),
            None => {
                // Someone else won the CAS race (or an admin rejected the row in the meantime). Our candidate is
                // discarded; report whatever the store now holds.
                debug!("📨️ Submission {} was settled concurrently; discarding candidate {sms_id}", submission.id);
                let current = submissions::fetch_submission(submission.id, &mut conn)
                    .await?
                    .ok_or(ReconciliationError::SubmissionIdNotFound(submission.id))?;
                Ok(current)
            },
        }
    }
}
