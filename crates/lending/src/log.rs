//! Book activity log read model.
//!
//! No physical log table exists; entries are reconstructed from loan take and
//! return timestamps, so the log is always consistent with the ledger.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use bookswap_core::{BookCode, BookId, UserId};

/// Kind of a logged book event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookEventKind {
    Take,
    Return,
}

impl BookEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Take => "take",
            Self::Return => "return",
        }
    }
}

/// One reconstructed (book, user, event, timestamp) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLogEntry {
    pub book_id: BookId,
    pub code: BookCode,
    pub title: String,
    pub author: String,
    pub public_year: i64,
    pub user_id: UserId,
    pub user_email: String,
    pub event: BookEventKind,
    pub at: NaiveDateTime,
}
