//! Loan ledger: atomic check-out and check-in.
//!
//! The exclusivity invariants (one open loan per book, one open loan per
//! user) are enforced by the conditional statements themselves, never by a
//! separate read followed by a write. When a conditional write affects zero
//! rows the operation is rejected; a follow-up read is used only to choose
//! the error variant and carries no correctness weight.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use bookswap_core::{BookCode, BookId, LoanId, UserId};
use bookswap_lending::{LoanView, TakenScope};

use crate::catalog::resolve_active_code;
use crate::error::{StoreError, StoreResult};

/// Records check-out/check-in events and answers open-loan queries.
#[derive(Debug, Clone)]
pub struct LoanLedger {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct LoanRow {
    book_id: i64,
    code: String,
    title: String,
    author: String,
    genre: String,
    public_year: i64,
    user_id: i64,
    user_email: String,
    dt_take: NaiveDateTime,
    viewer_subscribed: Option<bool>,
}

impl LoanRow {
    fn into_view(self) -> StoreResult<LoanView> {
        Ok(LoanView {
            book_id: BookId::from_i64(self.book_id),
            code: self.code.parse::<BookCode>()?,
            title: self.title,
            author: self.author,
            genre: self.genre,
            public_year: self.public_year,
            user_id: UserId::from_i64(self.user_id),
            user_email: self.user_email,
            taken_at: self.dt_take,
            viewer_subscribed: self.viewer_subscribed,
        })
    }
}

impl LoanLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check a book out to a user.
    ///
    /// One conditional insert: succeeds only if no loan is currently open for
    /// this book, none is open for this user, and the book is still active.
    /// Two concurrent callers racing for the same book (or the same user
    /// racing for two books) therefore cannot both succeed.
    pub async fn take_book(&self, code: &BookCode, user_id: UserId) -> StoreResult<LoanId> {
        let book_id = resolve_active_code(&self.pool, code)
            .await?
            .ok_or_else(|| StoreError::UnknownBookCode(code.clone()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO loans (book_id, user_id, dt_take)
            SELECT ?1, ?2, datetime('now')
            WHERE NOT EXISTS (
                SELECT 1 FROM loans
                WHERE (book_id = ?1 OR user_id = ?2)
                  AND dt_take <= datetime('now')
                  AND dt_return > datetime('now')
            )
            AND EXISTS (
                SELECT 1 FROM books WHERE id = ?1 AND is_active = 1
            )
            "#,
        )
        .bind(book_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let reason = self.diagnose_rejected_take(code, user_id).await?;
            tracing::debug!(code = %code, user_id = %user_id, %reason, "take rejected");
            return Err(reason);
        }

        let loan_id = LoanId::from_i64(result.last_insert_rowid());
        tracing::info!(code = %code, user_id = %user_id, loan_id = %loan_id, "book taken");
        Ok(loan_id)
    }

    /// Check a book back in.
    ///
    /// One conditional update closing the unique open loan matching this book
    /// and this user. Zero matched rows means nobody has it out, or somebody
    /// else does.
    pub async fn return_book(&self, code: &BookCode, user_id: UserId) -> StoreResult<u64> {
        let book_id = resolve_active_code(&self.pool, code)
            .await?
            .ok_or_else(|| StoreError::UnknownBookCode(code.clone()))?;

        let result = sqlx::query(
            r#"
            UPDATE loans
            SET dt_return = datetime('now')
            WHERE book_id = ?1
              AND user_id = ?2
              AND dt_take <= datetime('now')
              AND dt_return > datetime('now')
              AND dt_delete > datetime('now')
            "#,
        )
        .bind(book_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        let closed = result.rows_affected();
        if closed == 0 {
            tracing::debug!(code = %code, user_id = %user_id, "return rejected");
            return Err(StoreError::NoActiveLoanForUser(code.clone()));
        }

        tracing::info!(code = %code, user_id = %user_id, closed, "book returned");
        Ok(closed)
    }

    /// Open loans, either the user's own or all of them annotated with the
    /// viewer's subscription state.
    pub async fn list_taken(&self, scope: TakenScope) -> StoreResult<Vec<LoanView>> {
        let rows = match scope {
            TakenScope::Own(user_id) => {
                sqlx::query_as::<_, LoanRow>(
                    r#"
                    SELECT b.id AS book_id, b.code, b.title, b.author,
                           g.name AS genre, b.public_year,
                           u.id AS user_id, u.email AS user_email, l.dt_take,
                           NULL AS viewer_subscribed
                    FROM loans l
                    JOIN books b ON b.id = l.book_id
                    JOIN genres g ON g.id = b.genre_id
                    JOIN users u ON u.id = l.user_id
                    WHERE l.user_id = ?1
                      AND l.dt_take <= datetime('now')
                      AND l.dt_return > datetime('now')
                      AND l.dt_delete > datetime('now')
                    ORDER BY l.dt_take DESC, l.id DESC
                    "#,
                )
                .bind(user_id.as_i64())
                .fetch_all(&self.pool)
                .await?
            }
            TakenScope::All { viewer } => {
                sqlx::query_as::<_, LoanRow>(
                    r#"
                    SELECT b.id AS book_id, b.code, b.title, b.author,
                           g.name AS genre, b.public_year,
                           u.id AS user_id, u.email AS user_email, l.dt_take,
                           EXISTS (
                               SELECT 1 FROM subscriptions s
                               WHERE s.book_id = l.book_id
                                 AND s.user_id = ?1
                                 AND s.dt_new <= datetime('now')
                                 AND s.dt_delete > datetime('now')
                           ) AS viewer_subscribed
                    FROM loans l
                    JOIN books b ON b.id = l.book_id
                    JOIN genres g ON g.id = b.genre_id
                    JOIN users u ON u.id = l.user_id
                    WHERE l.dt_take <= datetime('now')
                      AND l.dt_return > datetime('now')
                      AND l.dt_delete > datetime('now')
                    ORDER BY l.dt_take DESC, l.id DESC
                    "#,
                )
                .bind(viewer.as_i64())
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(LoanRow::into_view).collect()
    }

    /// Pick the rejection variant after a zero-row conditional insert.
    ///
    /// Advisory only: by the time this reads, the atomic write has already
    /// failed, so a stale answer can at worst mislabel the rejection.
    async fn diagnose_rejected_take(
        &self,
        code: &BookCode,
        user_id: UserId,
    ) -> StoreResult<StoreError> {
        let user_busy = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT 1 FROM loans
            WHERE user_id = ?1
              AND dt_take <= datetime('now')
              AND dt_return > datetime('now')
            LIMIT 1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(if user_busy.is_some() {
            StoreError::UserHasOpenLoan
        } else {
            StoreError::AlreadyTaken(code.clone())
        })
    }
}
