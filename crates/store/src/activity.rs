//! Activity log read model.
//!
//! There is no physical log table: take and return events are reconstructed
//! from loan timestamps, which keeps the log trivially consistent with the
//! ledger it audits.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use bookswap_core::{BookCode, BookId, DomainError, UserId};
use bookswap_lending::{BookEventKind, BookLogEntry};

use crate::error::StoreResult;

/// Chronological (book, user, event, timestamp) stream derived from loans.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct LogRow {
    book_id: i64,
    code: String,
    title: String,
    author: String,
    public_year: i64,
    user_id: i64,
    user_email: String,
    event: String,
    dt_event: NaiveDateTime,
}

impl LogRow {
    fn into_entry(self) -> StoreResult<BookLogEntry> {
        let event = match self.event.as_str() {
            "take" => BookEventKind::Take,
            "return" => BookEventKind::Return,
            other => {
                return Err(DomainError::validation(format!(
                    "unknown book event kind: {other}"
                ))
                .into());
            }
        };

        Ok(BookLogEntry {
            book_id: BookId::from_i64(self.book_id),
            code: self.code.parse::<BookCode>()?,
            title: self.title,
            author: self.author,
            public_year: self.public_year,
            user_id: UserId::from_i64(self.user_id),
            user_email: self.user_email,
            event,
            at: self.dt_event,
        })
    }
}

const LOG_EVENTS: &str = r#"
    SELECT b.id AS book_id, b.code, b.title, b.author, b.public_year,
           u.id AS user_id, u.email AS user_email,
           'take' AS event, l.dt_take AS dt_event
    FROM loans l
    JOIN books b ON b.id = l.book_id
    JOIN users u ON u.id = l.user_id
    WHERE l.dt_delete > datetime('now')
    UNION ALL
    SELECT b.id, b.code, b.title, b.author, b.public_year,
           u.id, u.email,
           'return', l.dt_return
    FROM loans l
    JOIN books b ON b.id = l.book_id
    JOIN users u ON u.id = l.user_id
    WHERE l.dt_return <= datetime('now')
      AND l.dt_delete > datetime('now')
"#;

impl ActivityLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Take/return event tuples, newest first, optionally scoped to one user.
    ///
    /// Same-instant take and return of one book order return-first, matching
    /// the only sequence that can produce equal timestamps.
    pub async fn list_book_log(&self, user_id: Option<UserId>) -> StoreResult<Vec<BookLogEntry>> {
        let rows = match user_id {
            Some(user_id) => {
                let sql = format!(
                    "SELECT * FROM ({LOG_EVENTS}) WHERE user_id = ?1 \
                     ORDER BY dt_event DESC, event ASC"
                );
                sqlx::query_as::<_, LogRow>(&sql)
                    .bind(user_id.as_i64())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT * FROM ({LOG_EVENTS}) ORDER BY dt_event DESC, event ASC"
                );
                sqlx::query_as::<_, LogRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(LogRow::into_entry).collect()
    }
}
