//! `bookswap-subscriptions` — return-notification subscription domain types.
//!
//! A subscription is a standing request to be told when a specific book next
//! becomes available. One open subscription per (book, user) pair; eligibility
//! (book out to somebody else) is enforced by the store's conditional insert.

pub mod subscription;

pub use subscription::{Subscription, SubscriptionView};
