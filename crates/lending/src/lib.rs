//! `bookswap-lending` — loan ledger domain types.
//!
//! A loan ("form") records one check-out/check-in cycle of a book. The
//! exclusivity invariants live in the store's atomic conditional writes; this
//! crate holds the entity model, query selectors and the book-log read model.

pub mod loan;
pub mod log;

pub use loan::{Loan, LoanView, TakenScope};
pub use log::{BookEventKind, BookLogEntry};
