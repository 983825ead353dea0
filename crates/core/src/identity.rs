//! Identity resolution seam.
//!
//! The engine never authenticates anyone. The caller resolves an
//! authenticated contact address to an [`Identity`] through this trait and
//! passes user ids into every operation.

use async_trait::async_trait;

use crate::id::UserId;

/// Resolved actor identity: user id plus administrator flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub is_admin: bool,
}

/// Maps an authenticated contact address to an identity.
///
/// Lookup only; registration policy (e.g. create-on-first-login) belongs to
/// the implementation behind this seam.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve an email address to an active user, if one exists.
    ///
    /// Addresses compare case-insensitively.
    async fn resolve(&self, email: &str) -> Result<Option<Identity>, Self::Error>;
}
