//! Shared fixtures for the in-crate test suites.

use sqlx::SqlitePool;

use bookswap_catalog::NewBook;
use bookswap_core::{BookCode, BookId, GenreId, UserId};

use crate::{
    ActivityLog, CatalogStore, FeedbackDesk, LoanLedger, SubscriptionRegistry, UserDirectory,
};

/// Fresh in-memory database with the schema applied.
pub(crate) async fn mem_pool() -> anyhow::Result<SqlitePool> {
    bookswap_observability::init();
    let pool = crate::connect("sqlite::memory:").await?;
    crate::ensure_schema(&pool).await?;
    Ok(pool)
}

/// All engine components over one in-memory database, plus a seeded genre.
pub(crate) struct Context {
    pub pool: SqlitePool,
    pub directory: UserDirectory,
    pub catalog: CatalogStore,
    pub ledger: LoanLedger,
    pub subscriptions: SubscriptionRegistry,
    pub activity: ActivityLog,
    pub feedback: FeedbackDesk,
    pub genre_id: GenreId,
}

impl Context {
    pub async fn new() -> anyhow::Result<Self> {
        let pool = mem_pool().await?;
        let catalog = CatalogStore::new(pool.clone());
        let genre_id = catalog.add_genre("fiction").await?;

        Ok(Self {
            directory: UserDirectory::new(pool.clone()),
            ledger: LoanLedger::new(pool.clone()),
            subscriptions: SubscriptionRegistry::new(pool.clone()),
            activity: ActivityLog::new(pool.clone()),
            feedback: FeedbackDesk::new(pool.clone()),
            catalog,
            genre_id,
            pool,
        })
    }

    pub async fn user(&self, email: &str) -> anyhow::Result<UserId> {
        Ok(self.directory.resolve_or_register(email).await?.user_id)
    }

    pub async fn book(&self, owner: UserId, title: &str) -> anyhow::Result<(BookId, BookCode)> {
        let new_book = NewBook::new(title, "Anonymous", self.genre_id, 1980, owner)?;
        let code = self.catalog.register_book(&new_book).await?;
        let id = self
            .catalog
            .resolve_code(&code)
            .await?
            .expect("freshly registered code resolves");
        Ok((id, code))
    }
}
