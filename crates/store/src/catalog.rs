//! Catalog store: book registration and lookup.
//!
//! Code assignment and lookup always filter on the active flag, so a
//! deactivated book's code never resolves and stale operations against
//! retired entries are impossible.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use bookswap_catalog::{BookView, Genre, NewBook};
use bookswap_core::{BookCode, BookId, GenreId, Lifecycle};

use crate::error::StoreResult;

/// Registry of physical books.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    code: String,
    title: String,
    author: String,
    genre: String,
    public_year: i64,
    owner_email: String,
    dt_new: NaiveDateTime,
}

impl BookRow {
    fn into_view(self) -> StoreResult<BookView> {
        Ok(BookView {
            id: BookId::from_i64(self.id),
            code: self.code.parse::<BookCode>()?,
            title: self.title,
            author: self.author,
            genre: self.genre,
            public_year: self.public_year,
            owner_email: self.owner_email,
            added_at: self.dt_new,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GenreRow {
    id: i64,
    name: String,
    is_active: i64,
}

impl From<GenreRow> for Genre {
    fn from(row: GenreRow) -> Self {
        Genre {
            id: GenreId::from_i64(row.id),
            name: row.name,
            lifecycle: Lifecycle::from_flag(row.is_active),
        }
    }
}

impl CatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new book and assign its display code.
    ///
    /// Insert and code assignment run in one transaction; the code is the
    /// zero-padded row id, which keeps it unique among active books.
    pub async fn register_book(&self, book: &NewBook) -> StoreResult<BookCode> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO books (title, author, genre_id, public_year, owner_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.genre_id.as_i64())
        .bind(book.public_year)
        .bind(book.owner_id.as_i64())
        .execute(&mut *tx)
        .await?;

        let book_id = result.last_insert_rowid();
        let code = BookCode::from_row_id(book_id);

        sqlx::query("UPDATE books SET code = ?1 WHERE id = ?2")
            .bind(code.as_str())
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(book_id, code = %code, "book registered");
        Ok(code)
    }

    /// Resolve a display code to the id of an *active* book.
    pub async fn resolve_code(&self, code: &BookCode) -> StoreResult<Option<BookId>> {
        resolve_active_code(&self.pool, code).await
    }

    /// Inverse lookup, active books only.
    pub async fn resolve_id(&self, book_id: BookId) -> StoreResult<Option<BookCode>> {
        let code = sqlx::query_scalar::<_, String>(
            "SELECT code FROM books WHERE id = ?1 AND is_active = 1",
        )
        .bind(book_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match code {
            Some(code) => Ok(Some(code.parse::<BookCode>()?)),
            None => Ok(None),
        }
    }

    /// Denormalized view of one book, for display.
    pub async fn get_book(&self, book_id: BookId) -> StoreResult<Option<BookView>> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT b.id, b.code, b.title, b.author, g.name AS genre,
                   b.public_year, u.email AS owner_email, b.dt_new
            FROM books b
            JOIN genres g ON g.id = b.genre_id
            JOIN users u ON u.id = b.owner_id
            WHERE b.id = ?1 AND b.is_active = 1
            "#,
        )
        .bind(book_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(BookRow::into_view).transpose()
    }

    /// Active books with no currently-open loan, in catalog insertion order.
    pub async fn list_available(&self) -> StoreResult<Vec<BookView>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT b.id, b.code, b.title, b.author, g.name AS genre,
                   b.public_year, u.email AS owner_email, b.dt_new
            FROM books b
            JOIN genres g ON g.id = b.genre_id
            JOIN users u ON u.id = b.owner_id
            WHERE b.is_active = 1
              AND NOT EXISTS (
                  SELECT 1 FROM loans l
                  WHERE l.book_id = b.id
                    AND l.dt_take <= datetime('now')
                    AND l.dt_return > datetime('now')
              )
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookRow::into_view).collect()
    }

    /// Genre reference data, active entries only.
    pub async fn list_genres(&self) -> StoreResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, GenreRow>(
            "SELECT id, name, is_active FROM genres WHERE is_active = 1 ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Genre::from).collect())
    }

    /// Add a genre reference entry.
    pub async fn add_genre(&self, name: &str) -> StoreResult<GenreId> {
        let result = sqlx::query("INSERT INTO genres (name) VALUES (?1)")
            .bind(name.trim())
            .execute(&self.pool)
            .await?;

        Ok(GenreId::from_i64(result.last_insert_rowid()))
    }
}

/// Shared code-to-id resolution for all engine operations keyed by code.
pub(crate) async fn resolve_active_code(
    pool: &SqlitePool,
    code: &BookCode,
) -> StoreResult<Option<BookId>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM books WHERE code = ?1 AND is_active = 1")
        .bind(code.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(id.map(BookId::from_i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[tokio::test]
    async fn registration_assigns_resolvable_zero_padded_code() -> anyhow::Result<()> {
        let ctx = testutil::Context::new().await?;
        let owner = ctx.user("owner@example.org").await?;

        let code = ctx
            .catalog
            .register_book(&NewBook::new("Dune", "Frank Herbert", ctx.genre_id, 1965, owner)?)
            .await?;

        assert_eq!(code.as_str().len(), 5);
        let id = ctx.catalog.resolve_code(&code).await?.expect("code resolves");
        assert_eq!(ctx.catalog.resolve_id(id).await?, Some(code));
        Ok(())
    }

    #[tokio::test]
    async fn deactivated_book_code_does_not_resolve() -> anyhow::Result<()> {
        let ctx = testutil::Context::new().await?;
        let owner = ctx.user("owner@example.org").await?;
        let (book_id, code) = ctx.book(owner, "Solaris").await?;

        sqlx::query("UPDATE books SET is_active = 0 WHERE id = ?1")
            .bind(book_id.as_i64())
            .execute(&ctx.pool)
            .await?;

        assert!(ctx.catalog.resolve_code(&code).await?.is_none());
        assert!(ctx.catalog.resolve_id(book_id).await?.is_none());
        assert!(ctx.catalog.get_book(book_id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_book_joins_genre_and_owner() -> anyhow::Result<()> {
        let ctx = testutil::Context::new().await?;
        let owner = ctx.user("owner@example.org").await?;
        let (book_id, code) = ctx.book(owner, "Solaris").await?;

        let view = ctx.catalog.get_book(book_id).await?.expect("book exists");
        assert_eq!(view.code, code);
        assert_eq!(view.title, "Solaris");
        assert_eq!(view.genre, "fiction");
        assert_eq!(view.owner_email, "owner@example.org");
        Ok(())
    }

    #[tokio::test]
    async fn list_available_skips_taken_books_and_orders_by_insertion() -> anyhow::Result<()> {
        let ctx = testutil::Context::new().await?;
        let owner = ctx.user("owner@example.org").await?;
        let reader = ctx.user("reader@example.org").await?;
        let (_, code_a) = ctx.book(owner, "A Book").await?;
        let (_, code_b) = ctx.book(owner, "B Book").await?;

        ctx.ledger.take_book(&code_a, reader).await?;

        let available = ctx.catalog.list_available().await?;
        let codes: Vec<_> = available.iter().map(|b| b.code.clone()).collect();
        assert_eq!(codes, vec![code_b]);
        Ok(())
    }

    #[tokio::test]
    async fn genres_list_only_active_entries() -> anyhow::Result<()> {
        let ctx = testutil::Context::new().await?;
        let retired = ctx.catalog.add_genre("phrenology").await?;
        sqlx::query("UPDATE genres SET is_active = 0 WHERE id = ?1")
            .bind(retired.as_i64())
            .execute(&ctx.pool)
            .await?;

        let genres = ctx.catalog.list_genres().await?;
        assert!(genres.iter().all(|g| g.lifecycle.is_active()));
        assert!(genres.iter().any(|g| g.name == "fiction"));
        assert!(!genres.iter().any(|g| g.name == "phrenology"));
        Ok(())
    }
}
