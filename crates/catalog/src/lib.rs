//! `bookswap-catalog` — book registry domain types.
//!
//! Books enter the catalog through [`NewBook`] registration and are handed to
//! users by their display code. Lookup always filters on the active flag: a
//! deactivated book's code must not resolve.

pub mod book;
pub mod genre;

pub use book::{Book, BookView, NewBook};
pub use genre::Genre;
