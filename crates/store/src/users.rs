//! User directory.
//!
//! Accounts are created on first successful authentication and only ever
//! soft-deactivated. Addresses compare case-insensitively; the canonical
//! stored form is lowercase.

use async_trait::async_trait;
use sqlx::SqlitePool;

use bookswap_core::{DomainError, Identity, IdentityResolver, UserId};

use crate::error::{StoreError, StoreResult};

/// Maps contact addresses to user identities, registering on first sight.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: i64,
    is_admin: i64,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            user_id: UserId::from_i64(row.id),
            is_admin: row.is_admin != 0,
        }
    }
}

impl UserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up an active user by address, creating the account if no user
    /// (active or not) carries this address yet.
    ///
    /// The insert is conditional on the address not existing, so two racing
    /// first logins produce exactly one account. A deactivated account is
    /// neither resurrected nor resolved.
    pub async fn resolve_or_register(&self, email: &str) -> StoreResult<Identity> {
        let email = canonical_email(email)?;

        sqlx::query(
            r#"
            INSERT INTO users (email)
            SELECT ?1
            WHERE NOT EXISTS (SELECT 1 FROM users WHERE email = ?1)
            "#,
        )
        .bind(&email)
        .execute(&self.pool)
        .await?;

        match self.lookup_active(&email).await? {
            Some(identity) => {
                tracing::debug!(user_id = %identity.user_id, "resolved user");
                Ok(identity)
            }
            None => Err(StoreError::UserInactive),
        }
    }

    /// Look up an active user by address without registering.
    pub async fn get(&self, email: &str) -> StoreResult<Option<Identity>> {
        let email = canonical_email(email)?;
        self.lookup_active(&email).await
    }

    async fn lookup_active(&self, email: &str) -> StoreResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, is_admin FROM users WHERE email = ?1 AND is_active = 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Identity::from))
    }
}

#[async_trait]
impl IdentityResolver for UserDirectory {
    type Error = StoreError;

    async fn resolve(&self, email: &str) -> Result<Option<Identity>, Self::Error> {
        self.get(email).await
    }
}

fn canonical_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation(format!(
            "not a contact address: {email:?}"
        )));
    }
    Ok(email)
}
