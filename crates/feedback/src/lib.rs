//! `bookswap-feedback` — user feedback domain types.
//!
//! Feedback messages are submitted by users and closed by an administrator;
//! like loans and subscriptions they are soft-closed, never deleted.

pub mod feedback;

pub use feedback::{Feedback, FeedbackView};
