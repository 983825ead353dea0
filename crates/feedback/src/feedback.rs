use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use bookswap_core::{FeedbackId, RecordStatus, UserId};

/// A feedback message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub msg: String,
    pub user_id: UserId,
    pub created_at: NaiveDateTime,
    /// Open until an administrator resolves it.
    pub status: RecordStatus,
}

impl Feedback {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}


/// Admin listing row, joined with the submitter's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackView {
    pub id: FeedbackId,
    pub msg: String,
    pub user_email: String,
    pub created_at: NaiveDateTime,
    pub status: RecordStatus,
}
