//! `bookswap-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod code;
pub mod error;
pub mod id;
pub mod identity;
pub mod status;

pub use code::BookCode;
pub use error::{DomainError, DomainResult};
pub use id::{BookId, FeedbackId, GenreId, LoanId, SubscriptionId, UserId};
pub use identity::{Identity, IdentityResolver};
pub use status::{Lifecycle, RecordStatus};
