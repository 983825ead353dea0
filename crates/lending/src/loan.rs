use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use bookswap_core::{BookCode, BookId, LoanId, RecordStatus, UserId};

/// A loan record: one check-out (and eventual check-in) of one book.
///
/// Invariants enforced by the store:
/// - at most one open loan per book at any instant;
/// - at most one open loan per user at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub book_id: BookId,
    pub user_id: UserId,
    pub taken_at: NaiveDateTime,
    /// Open while the book is out; `Closed(at)` once returned.
    pub returned: RecordStatus,
    pub created_at: NaiveDateTime,
    /// Soft-delete marker; open for live records.
    pub deleted: RecordStatus,
}

impl Loan {
    /// Whether the book is currently out under this loan.
    pub fn is_open(&self) -> bool {
        self.returned.is_open() && self.deleted.is_open()
    }
}

/// Scope selector for open-loan listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakenScope {
    /// The user's own open loans (personal view).
    Own(UserId),
    /// All open loans system-wide, each annotated with whether `viewer`
    /// already subscribes to the book.
    All { viewer: UserId },
}

/// Denormalized open-loan row for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanView {
    pub book_id: BookId,
    pub code: BookCode,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub public_year: i64,
    pub user_id: UserId,
    pub user_email: String,
    pub taken_at: NaiveDateTime,
    /// Present only for [`TakenScope::All`] listings.
    pub viewer_subscribed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn loan(returned: RecordStatus, deleted: RecordStatus) -> Loan {
        Loan {
            id: LoanId::from_i64(1),
            book_id: BookId::from_i64(2),
            user_id: UserId::from_i64(3),
            taken_at: at(9),
            returned,
            created_at: at(9),
            deleted,
        }
    }

    #[test]
    fn open_loan_requires_open_return_and_no_soft_delete() {
        assert!(loan(RecordStatus::Open, RecordStatus::Open).is_open());
        assert!(!loan(RecordStatus::Closed(at(17)), RecordStatus::Open).is_open());
        assert!(!loan(RecordStatus::Open, RecordStatus::Closed(at(18))).is_open());
    }
}
