use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use bookswap_core::{BookCode, BookId, RecordStatus, SubscriptionId, UserId};

/// A return-notification subscription record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub book_id: BookId,
    pub user_id: UserId,
    pub created_at: NaiveDateTime,
    /// Open while the subscriber still wants the alert; `Closed(at)` after
    /// unsubscribe.
    pub status: RecordStatus,
}

impl Subscription {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}


/// Denormalized open-subscription row for display and for the caller's
/// notification dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub book_id: BookId,
    pub code: BookCode,
    pub title: String,
    pub author: String,
    pub public_year: i64,
    pub user_id: UserId,
    pub user_email: String,
    pub since: NaiveDateTime,
}
