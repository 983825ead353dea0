//! `bookswap-store` — the Lending & Reservation Engine.
//!
//! Every state-changing operation is a **single atomic conditional write**:
//! the invariant's own `WHERE`/`NOT EXISTS` condition guards the mutation
//! inside one statement, so two concurrent callers can never both succeed in
//! taking the same book (or the same user taking two books). Serialization is
//! pushed down to the store's transaction manager; the engine holds no locks
//! and caches no entity state across calls.
//!
//! Time comparisons use the store's own `datetime('now')` so the precondition
//! and the mutation observe one clock.

pub mod activity;
pub mod catalog;
pub mod error;
pub mod feedback;
pub mod lending;
pub mod schema;
pub mod subscriptions;
pub mod users;

pub use activity::ActivityLog;
pub use catalog::CatalogStore;
pub use error::{StoreError, StoreResult};
pub use feedback::FeedbackDesk;
pub use lending::LoanLedger;
pub use schema::ensure_schema;
pub use subscriptions::SubscriptionRegistry;
pub use users::UserDirectory;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Open a connection pool for the given SQLite URL (e.g. `sqlite://books.db`
/// or `sqlite::memory:`), creating the database file if missing.
///
/// SQLite allows a single writer at a time, so the pool holds one connection;
/// this also keeps `sqlite::memory:` pointing at one database.
pub async fn connect(url: &str) -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) mod testutil;
