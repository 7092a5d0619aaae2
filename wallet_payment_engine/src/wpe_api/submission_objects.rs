use serde::{Deserialize, Serialize};

use crate::db_types::SubmissionStatus;

/// The outcome of lodging a new submission: either it matched eagerly at intake time, or it is pending and will
/// be re-matched lazily on each status poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: i64,
    pub status: SubmissionStatus,
}

/// The current state of the most recent submission for a TID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionStatusResult {
    pub id: i64,
    pub status: SubmissionStatus,
    pub matched_sms_id: Option<i64>,
}
