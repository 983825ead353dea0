//! Subscription registry: return-notification bookkeeping.
//!
//! A subscription may only be opened while the book is out on loan to
//! somebody other than the subscriber, and only one open subscription per
//! (book, user) pair may exist. Both rules sit inside the conditional insert.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use bookswap_core::{BookCode, BookId, UserId};
use bookswap_subscriptions::SubscriptionView;

use crate::error::{StoreError, StoreResult};

/// Records standing requests to be notified when a book comes back.
#[derive(Debug, Clone)]
pub struct SubscriptionRegistry {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    book_id: i64,
    code: String,
    title: String,
    author: String,
    public_year: i64,
    user_id: i64,
    user_email: String,
    dt_new: NaiveDateTime,
}

impl SubscriptionRow {
    fn into_view(self) -> StoreResult<SubscriptionView> {
        Ok(SubscriptionView {
            book_id: BookId::from_i64(self.book_id),
            code: self.code.parse::<BookCode>()?,
            title: self.title,
            author: self.author,
            public_year: self.public_year,
            user_id: UserId::from_i64(self.user_id),
            user_email: self.user_email,
            since: self.dt_new,
        })
    }
}

impl SubscriptionRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a subscription for (book, user).
    ///
    /// One conditional insert: no open subscription for the pair yet, the
    /// book currently out on an open loan held by a different user, and the
    /// book still active.
    pub async fn subscribe(&self, book_id: BookId, user_id: UserId) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscriptions (book_id, user_id)
            SELECT ?1, ?2
            WHERE NOT EXISTS (
                SELECT 1 FROM subscriptions
                WHERE book_id = ?1 AND user_id = ?2
                  AND dt_new <= datetime('now')
                  AND dt_delete > datetime('now')
            )
            AND EXISTS (
                SELECT 1 FROM loans
                WHERE book_id = ?1 AND user_id <> ?2
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

        let opened = result.rows_affected();
        if opened == 0 {
            tracing::debug!(book_id = %book_id, user_id = %user_id, "subscribe rejected");
            return Err(StoreError::AlreadySubscribedOrIneligible);
        }

        tracing::info!(book_id = %book_id, user_id = %user_id, "subscription opened");
        Ok(opened)
    }

    /// Close the open subscription for (book, user).
    pub async fn unsubscribe(&self, book_id: BookId, user_id: UserId) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET dt_delete = datetime('now')
            WHERE book_id = ?1
              AND user_id = ?2
              AND dt_new <= datetime('now')
              AND dt_delete > datetime('now')
            "#,
        )
        .bind(book_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        let closed = result.rows_affected();
        if closed == 0 {
            tracing::debug!(book_id = %book_id, user_id = %user_id, "unsubscribe rejected");
            return Err(StoreError::NotSubscribed);
        }

        tracing::info!(book_id = %book_id, user_id = %user_id, "subscription closed");
        Ok(closed)
    }

    /// Open subscriptions joined for display, scoped to one user or global
    /// (administrative view). Also the feed for the caller's return-alert
    /// dispatch.
    pub async fn list_open(&self, user_id: Option<UserId>) -> StoreResult<Vec<SubscriptionView>> {
        const BASE: &str = r#"
            SELECT b.id AS book_id, b.code, b.title, b.author, b.public_year,
                   u.id AS user_id, u.email AS user_email, s.dt_new
            FROM subscriptions s
            JOIN books b ON b.id = s.book_id
            JOIN users u ON u.id = s.user_id
            WHERE s.dt_new <= datetime('now')
              AND s.dt_delete > datetime('now')
        "#;

        let rows = match user_id {
            Some(user_id) => {
                let sql = format!("{BASE} AND s.user_id = ?1 ORDER BY s.dt_new DESC, s.id DESC");
                sqlx::query_as::<_, SubscriptionRow>(&sql)
                    .bind(user_id.as_i64())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{BASE} ORDER BY s.dt_new DESC, s.id DESC");
                sqlx::query_as::<_, SubscriptionRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(SubscriptionRow::into_view).collect()
    }
}
