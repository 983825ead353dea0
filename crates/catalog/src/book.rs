use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use bookswap_core::{BookCode, BookId, DomainError, DomainResult, GenreId, Lifecycle, UserId};

/// Earliest publication year the catalog accepts.
const MIN_PUBLIC_YEAR: i64 = 1000;
/// Latest publication year the catalog accepts.
const MAX_PUBLIC_YEAR: i64 = 9999;

/// A registered catalog book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub code: BookCode,
    pub title: String,
    pub author: String,
    pub genre_id: GenreId,
    pub public_year: i64,
    pub owner_id: UserId,
    pub lifecycle: Lifecycle,
    pub added_at: NaiveDateTime,
}

impl Book {
    /// Whether the book may participate in loans and subscriptions.
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }
}

/// Validated registration command for a new book.
///
/// The display code is not part of the command; the store assigns it at
/// insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre_id: GenreId,
    pub public_year: i64,
    pub owner_id: UserId,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre_id: GenreId,
        public_year: i64,
        owner_id: UserId,
    ) -> DomainResult<Self> {
        let title = title.into().trim().to_string();
        let author = author.into().trim().to_string();

        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if author.is_empty() {
            return Err(DomainError::validation("author cannot be empty"));
        }
        if !(MIN_PUBLIC_YEAR..=MAX_PUBLIC_YEAR).contains(&public_year) {
            return Err(DomainError::validation(format!(
                "publication year out of range: {public_year}"
            )));
        }

        Ok(Self {
            title,
            author,
            genre_id,
            public_year,
            owner_id,
        })
    }
}

/// Denormalized book view for display (genre joined by name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookView {
    pub id: BookId,
    pub code: BookCode,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub public_year: i64,
    pub owner_email: String,
    pub added_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre() -> GenreId {
        GenreId::from_i64(1)
    }

    fn owner() -> UserId {
        UserId::from_i64(7)
    }

    #[test]
    fn new_book_trims_text_fields() {
        let book = NewBook::new("  Dune ", " Frank Herbert  ", genre(), 1965, owner()).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
    }

    #[test]
    fn new_book_rejects_blank_title_or_author() {
        let err = NewBook::new("   ", "Somebody", genre(), 1990, owner()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = NewBook::new("Title", "", genre(), 1990, owner()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn lifecycle_gates_participation() {
        use chrono::NaiveDate;

        let book = Book {
            id: BookId::from_i64(1),
            code: BookCode::from_row_id(1),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre_id: genre(),
            public_year: 1965,
            owner_id: owner(),
            lifecycle: Lifecycle::Active,
            added_at: NaiveDate::from_ymd_opt(2024, 5, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        };
        assert!(book.is_active());

        let retired = Book {
            lifecycle: Lifecycle::Inactive,
            ..book
        };
        assert!(!retired.is_active());
    }

    #[test]
    fn new_book_rejects_implausible_year() {
        let err = NewBook::new("Title", "Author", genre(), 10_000, owner()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = NewBook::new("Title", "Author", genre(), 999, owner()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
