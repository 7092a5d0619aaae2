use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewSubmission, Submission, SubmissionStatus},
    events::{EventProducers, SubmissionMatchedEvent, SubmissionRejectedEvent},
    helpers::normalize_msisdn,
    traits::{MatchOptions, ReconciliationDatabase, ReconciliationError},
    wpe_api::submission_objects::{SubmissionReceipt, SubmissionStatusResult},
};

/// `ReconciliationApi` is the primary API for the submission lifecycle: intake of claimed payments, the eager
/// intake-time match, and the lazy full-cascade re-match performed on every status poll.
pub struct ReconciliationApi<B> {
    db: B,
    producers: EventProducers,
    options: MatchOptions,
}

impl<B> Debug for ReconciliationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi")
    }
}

impl<B> ReconciliationApi<B> {
    pub fn new(db: B, producers: EventProducers, options: MatchOptions) -> Self {
        Self { db, producers, options }
    }
}

impl<B> ReconciliationApi<B>
where B: ReconciliationDatabase
{
    /// Lodge a new manual payment submission.
    ///
    /// The claimed TID is required and stored trimmed; the claimed amount, when present, must be strictly
    /// positive, since it is what the wallet will eventually be credited with. The sender phone number is
    /// normalized to canonical carrier form and stored, but matching never depends on it.
    ///
    /// After the row is persisted, a single exact-TID lookup runs eagerly (stage 1 only, not the full cascade).
    /// On a hit the wallet is credited and the submission returns as `matched`; otherwise it stays `pending` and
    /// will be re-matched on each status poll.
    pub async fn submit_payment(&self, mut submission: NewSubmission) -> Result<SubmissionReceipt, ReconciliationError> {
        if submission.tid.trim().is_empty() {
            return Err(ReconciliationError::ValidationError("A transaction id (tid) is required".to_string()));
        }
        if let Some(amount) = submission.amount {
            if !amount.is_positive() {
                return Err(ReconciliationError::ValidationError(format!(
                    "The claimed amount must be strictly positive, not {amount}"
                )));
            }
        }
        submission.msisdn = normalize_msisdn(submission.msisdn.as_deref());
        let pending = self.db.insert_submission(submission).await?;
        let settled = self.db.try_exact_match(&pending).await?;
        if settled.status == SubmissionStatus::Matched {
            info!("🔄️ Submission {} (TID {}) matched eagerly at intake", settled.id, settled.tid);
            self.call_submission_matched_hook(&settled).await;
        } else {
            debug!("🔄️ Submission {} (TID {}) lodged as pending", settled.id, settled.tid);
        }
        Ok(SubmissionReceipt { submission_id: settled.id, status: settled.status })
    }

    /// Report the state of the most recent submission for the given TID.
    ///
    /// A still-pending submission is first run through the full three-stage cascade, so a submission lodged
    /// before its SMS arrived gets reconciled lazily on the next poll rather than needing a background sweep.
    /// A matched or rejected submission is reported as-is; its status never regresses.
    pub async fn status_for_tid(&self, tid: &str) -> Result<SubmissionStatusResult, ReconciliationError> {
        let submission = self
            .db
            .fetch_submission_by_tid(tid)
            .await?
            .ok_or_else(|| ReconciliationError::SubmissionNotFoundForTid(tid.trim().to_string()))?;
        let submission = if submission.status == SubmissionStatus::Pending {
            let was_pending_id = submission.id;
            let settled = self.db.reconcile_submission(&submission, &self.options).await?;
            if settled.status == SubmissionStatus::Matched {
                info!("🔄️ Submission {was_pending_id} (TID {}) reconciled lazily on status poll", settled.tid);
                self.call_submission_matched_hook(&settled).await;
            }
            settled
        } else {
            submission
        };
        Ok(SubmissionStatusResult {
            id: submission.id,
            status: submission.status,
            matched_sms_id: submission.matched_sms_id,
        })
    }

    /// Administrative rejection of a pending submission. Not part of the reconciliation path.
    pub async fn reject_submission(&self, id: i64) -> Result<Submission, ReconciliationError> {
        let submission = self.db.reject_submission(id).await?;
        self.call_submission_rejected_hook(&submission).await;
        Ok(submission)
    }

    pub async fn submissions_for_user(&self, user_id: i64) -> Result<Vec<Submission>, ReconciliationError> {
        self.db.submissions_for_user(user_id).await
    }

    async fn call_submission_matched_hook(&self, submission: &Submission) {
        for emitter in &self.producers.submission_matched_producer {
            debug!("🔄️📬️ Notifying submission-matched hook subscribers");
            let event = SubmissionMatchedEvent::new(submission.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_submission_rejected_hook(&self, submission: &Submission) {
        for emitter in &self.producers.submission_rejected_producer {
            debug!("🔄️📬️ Notifying submission-rejected hook subscribers");
            let event = SubmissionRejectedEvent::new(submission.clone());
            emitter.publish_event(event).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
