use serde::{Deserialize, Serialize};

use crate::db_types::Submission;

/// Emitted after a submission has been reconciled and the wallet credit has settled. Subscribers typically fan
/// this out to customer notifications or order fulfilment; none of that is required for reconciliation
/// correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionMatchedEvent {
    pub submission: Submission,
}

impl SubmissionMatchedEvent {
    pub fn new(submission: Submission) -> Self {
        Self { submission }
    }
}

/// Emitted when an administrator rejects a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRejectedEvent {
    pub submission: Submission,
}

impl SubmissionRejectedEvent {
    pub fn new(submission: Submission) -> Self {
        Self { submission }
    }
}
