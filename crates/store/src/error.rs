//! Engine error taxonomy.
//!
//! Business-rule violations are typed rejections the caller turns into
//! user-facing messaging; [`StoreError::Persistence`] is a storage-layer
//! failure surfaced for generic "try again" handling. Nothing here is ever
//! used as control flow inside the engine and no operation retries itself.

use thiserror::Error;

use bookswap_core::{BookCode, DomainError};

/// Result type for engine operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No active book carries this display code.
    #[error("no active book with code {0}")]
    UnknownBookCode(BookCode),

    /// The book is already out on an open loan.
    #[error("book {0} is already out on loan")]
    AlreadyTaken(BookCode),

    /// The user already holds an open loan (one book system-wide).
    #[error("user already holds an open loan")]
    UserHasOpenLoan,

    /// No open loan on this book belongs to this user.
    #[error("no open loan on book {0} for this user")]
    NoActiveLoanForUser(BookCode),

    /// Duplicate open subscription, book on the shelf, or book held by the
    /// would-be subscriber.
    #[error("already subscribed, or the book is not open for subscription")]
    AlreadySubscribedOrIneligible,

    /// No open subscription for this (book, user) pair.
    #[error("no open subscription for this user on this book")]
    NotSubscribed,

    /// Feedback id unknown or the message is already closed.
    #[error("feedback is unknown or already closed")]
    FeedbackNotOpen,

    /// The account exists but has been deactivated.
    #[error("user account is deactivated")]
    UserInactive,

    /// Deterministic domain failure (validation, malformed code).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage-layer failure: connectivity, or a constraint violation outside
    /// the modeled business rules. The operation committed nothing.
    #[error("storage failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether this is a typed business rejection (as opposed to a storage or
    /// validation failure).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Domain(_) | Self::Persistence(_))
    }
}
