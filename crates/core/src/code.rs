//! Display code value object.
//!
//! A [`BookCode`] is the short numeric string physically written on a book.
//! It is the public handle users type when taking or returning a book and is
//! distinct from the internal [`crate::BookId`].

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Number of digits in a canonical display code.
pub const CODE_WIDTH: usize = 5;

/// Display code of a catalog book (value object, compared by value).
///
/// Canonical form is a zero-padded numeric string, e.g. `"00042"`. Parsing
/// accepts unpadded user input (`"42"`) and normalizes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookCode(String);

impl BookCode {
    /// Derive the code assigned to a freshly inserted book row.
    ///
    /// Codes are a zero-padded rendering of the row id, which keeps them
    /// unique among active books without a separate sequence.
    pub fn from_row_id(id: i64) -> Self {
        Self(format!("{id:0width$}", width = CODE_WIDTH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for BookCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BookCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("book code cannot be empty"));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "book code must be numeric, got {trimmed:?}"
            )));
        }
        // Reject values that cannot have been assigned (zero, or beyond any
        // possible row id).
        let value: i64 = trimmed
            .parse()
            .map_err(|_| DomainError::validation(format!("book code out of range: {trimmed:?}")))?;
        if value == 0 {
            return Err(DomainError::validation("book code cannot be zero"));
        }
        Ok(Self(format!("{value:0width$}", width = CODE_WIDTH)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonical_code_is_zero_padded() {
        assert_eq!(BookCode::from_row_id(42).as_str(), "00042");
        assert_eq!(BookCode::from_row_id(100_000).as_str(), "100000");
    }

    #[test]
    fn parsing_normalizes_unpadded_input() {
        let code: BookCode = "42".parse().unwrap();
        assert_eq!(code, BookCode::from_row_id(42));
        let code: BookCode = "  00042 ".parse().unwrap();
        assert_eq!(code.as_str(), "00042");
    }

    #[test]
    fn parsing_rejects_garbage() {
        assert!("".parse::<BookCode>().is_err());
        assert!("   ".parse::<BookCode>().is_err());
        assert!("12a4".parse::<BookCode>().is_err());
        assert!("-5".parse::<BookCode>().is_err());
        assert!("0".parse::<BookCode>().is_err());
        assert!("00000".parse::<BookCode>().is_err());
    }

    proptest! {
        #[test]
        fn roundtrips_through_display(id in 1i64..=99_999) {
            let code = BookCode::from_row_id(id);
            let reparsed: BookCode = code.to_string().parse().unwrap();
            prop_assert_eq!(code, reparsed);
        }

        #[test]
        fn parse_never_panics(s in "\\PC*") {
            let _ = s.parse::<BookCode>();
        }
    }
}
