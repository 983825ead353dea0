//! Feedback desk: user messages and their administrative closure.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use bookswap_core::{DomainError, FeedbackId, RecordStatus, UserId};
use bookswap_feedback::FeedbackView;

use crate::error::{StoreError, StoreResult};

/// Stores feedback submissions; administrators close them.
#[derive(Debug, Clone)]
pub struct FeedbackDesk {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct FeedbackRow {
    id: i64,
    msg: String,
    user_email: String,
    dt_new: NaiveDateTime,
    dt_delete: NaiveDateTime,
}

impl From<FeedbackRow> for FeedbackView {
    fn from(row: FeedbackRow) -> Self {
        FeedbackView {
            id: FeedbackId::from_i64(row.id),
            msg: row.msg,
            user_email: row.user_email,
            created_at: row.dt_new,
            status: RecordStatus::from_closed_at(row.dt_delete),
        }
    }
}

impl FeedbackDesk {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Submit a feedback message.
    pub async fn submit(&self, msg: &str, user_id: UserId) -> StoreResult<FeedbackId> {
        let msg = msg.trim();
        if msg.is_empty() {
            return Err(DomainError::validation("feedback message cannot be empty").into());
        }

        let result = sqlx::query("INSERT INTO feedbacks (msg, user_id) VALUES (?1, ?2)")
            .bind(msg)
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;

        let id = FeedbackId::from_i64(result.last_insert_rowid());
        tracing::info!(feedback_id = %id, user_id = %user_id, "feedback submitted");
        Ok(id)
    }

    /// Close a still-open feedback message (administrator action).
    pub async fn close(&self, id: FeedbackId) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE feedbacks
            SET dt_delete = datetime('now')
            WHERE id = ?1
              AND dt_new <= datetime('now')
              AND dt_delete > datetime('now')
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        let closed = result.rows_affected();
        if closed == 0 {
            return Err(StoreError::FeedbackNotOpen);
        }

        tracing::info!(feedback_id = %id, "feedback closed");
        Ok(closed)
    }

    /// All feedback, newest first, joined with the submitter's address
    /// (administrative view).
    pub async fn list_all(&self) -> StoreResult<Vec<FeedbackView>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT f.id, f.msg, u.email AS user_email, f.dt_new, f.dt_delete
            FROM feedbacks f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.dt_new DESC, f.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedbackView::from).collect())
    }
}
