//! Schema bootstrap.
//!
//! Five relations plus genre reference data. Open records are encoded with a
//! far-future closure timestamp so "currently open" is a plain range predicate
//! usable inside a single conditional statement. Partial unique indexes back
//! the exclusivity invariants as a backstop behind the conditional writes: if
//! a future bug sneaks past the `WHERE NOT EXISTS` guard it becomes a
//! constraint error, not a corrupted ledger.

use sqlx::SqlitePool;

use crate::error::StoreResult;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    email      TEXT NOT NULL COLLATE NOCASE,
    is_admin   INTEGER NOT NULL DEFAULT 0,
    is_active  INTEGER NOT NULL DEFAULT 1,
    dt_new     TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email
    ON users(email COLLATE NOCASE);

CREATE TABLE IF NOT EXISTS genres (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE,
    is_active  INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS books (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    code         TEXT,
    title        TEXT NOT NULL,
    author       TEXT NOT NULL,
    genre_id     INTEGER NOT NULL REFERENCES genres(id),
    public_year  INTEGER NOT NULL,
    owner_id     INTEGER NOT NULL REFERENCES users(id),
    is_active    INTEGER NOT NULL DEFAULT 1,
    dt_new       TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_books_active_code
    ON books(code) WHERE is_active = 1;

CREATE TABLE IF NOT EXISTS loans (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id    INTEGER NOT NULL REFERENCES books(id),
    user_id    INTEGER NOT NULL REFERENCES users(id),
    dt_take    TEXT NOT NULL DEFAULT (datetime('now')),
    dt_return  TEXT NOT NULL DEFAULT '9999-12-31 23:59:59',
    dt_new     TEXT NOT NULL DEFAULT (datetime('now')),
    dt_delete  TEXT NOT NULL DEFAULT '9999-12-31 23:59:59'
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_loans_one_open_per_book
    ON loans(book_id) WHERE dt_return = '9999-12-31 23:59:59';
CREATE UNIQUE INDEX IF NOT EXISTS idx_loans_one_open_per_user
    ON loans(user_id) WHERE dt_return = '9999-12-31 23:59:59';

CREATE TABLE IF NOT EXISTS subscriptions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id    INTEGER NOT NULL REFERENCES books(id),
    user_id    INTEGER NOT NULL REFERENCES users(id),
    dt_new     TEXT NOT NULL DEFAULT (datetime('now')),
    dt_delete  TEXT NOT NULL DEFAULT '9999-12-31 23:59:59'
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_subscriptions_one_open
    ON subscriptions(book_id, user_id) WHERE dt_delete = '9999-12-31 23:59:59';

CREATE TABLE IF NOT EXISTS feedbacks (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    msg        TEXT NOT NULL,
    user_id    INTEGER NOT NULL REFERENCES users(id),
    dt_new     TEXT NOT NULL DEFAULT (datetime('now')),
    dt_delete  TEXT NOT NULL DEFAULT '9999-12-31 23:59:59'
);
"#;

/// Create tables and indexes if they do not exist yet. Idempotent.
pub async fn ensure_schema(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
