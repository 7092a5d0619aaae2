use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewSubmission, Submission, SubmissionStatus},
    traits::ReconciliationError,
};

/// Inserts a new submission row with `pending` status. The TID is trimmed before it is stored, since users
/// routinely paste receipts with surrounding whitespace.
pub async fn insert_submission(
    submission: NewSubmission,
    conn: &mut SqliteConnection,
) -> Result<Submission, ReconciliationError> {
    let tid = submission.tid.trim().to_string();
    let wallet = submission.wallet.to_string();
    let row: Submission = sqlx::query_as(
        r#"
            INSERT INTO payment_submissions (user_id, order_id, wallet, tid, amount, msisdn)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(submission.user_id)
    .bind(submission.order_id)
    .bind(wallet)
    .bind(tid)
    .bind(submission.amount)
    .bind(submission.msisdn)
    .fetch_one(conn)
    .await?;
    debug!("📨️ Submission [{}] lodged with id {} for user {}", row.tid, row.id, row.user_id);
    Ok(row)
}

pub async fn fetch_submission(id: i64, conn: &mut SqliteConnection) -> Result<Option<Submission>, sqlx::Error> {
    let submission =
        sqlx::query_as("SELECT * FROM payment_submissions WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(submission)
}

/// Returns the most recently lodged submission for the given TID. Users occasionally resubmit the same receipt;
/// status queries always act on the latest attempt.
pub async fn fetch_latest_for_tid(tid: &str, conn: &mut SqliteConnection) -> Result<Option<Submission>, sqlx::Error> {
    let submission = sqlx::query_as(
        "SELECT * FROM payment_submissions WHERE tid = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(tid.trim())
    .fetch_optional(conn)
    .await?;
    Ok(submission)
}

pub async fn fetch_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Submission>, sqlx::Error> {
    let submissions =
        sqlx::query_as("SELECT * FROM payment_submissions WHERE user_id = $1 ORDER BY created_at ASC, id ASC")
            .bind(user_id)
            .fetch_all(conn)
            .await?;
    Ok(submissions)
}

/// The compare-and-set transition from `pending` to `matched`.
///
/// The `status = 'pending'` guard is what keeps the state machine forward-only under concurrent reconciliation:
/// of two racing callers, exactly one update finds a pending row. The loser receives `None` and must discard its
/// own candidate in favour of whatever the winner persisted.
pub async fn mark_matched(
    id: i64,
    sms_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Submission>, ReconciliationError> {
    let updated: Option<Submission> = sqlx::query_as(
        r#"
            UPDATE payment_submissions
            SET status = 'matched', matched_sms_id = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status = 'pending'
            RETURNING *;
        "#,
    )
    .bind(sms_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    if let Some(s) = &updated {
        debug!("📨️ Submission {id} matched against SMS record {sms_id} (TID {})", s.tid);
    }
    Ok(updated)
}

/// Administrative rejection, guarded by the same CAS as [`mark_matched`] so a matched submission can never be
/// clawed back to `rejected`.
pub async fn mark_rejected(id: i64, conn: &mut SqliteConnection) -> Result<Option<Submission>, ReconciliationError> {
    let updated = sqlx::query_as(
        r#"
            UPDATE payment_submissions
            SET status = 'rejected', updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'pending'
            RETURNING *;
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(updated)
}

/// True when the submission is still eligible for reconciliation.
pub fn is_reconcilable(submission: &Submission) -> bool {
    submission.status == SubmissionStatus::Pending
}
