//! Record lifecycle and open/closed status.
//!
//! The store encodes "still open" as a far-future sentinel timestamp rather
//! than a NULL, so that open-ness can be expressed as a plain range predicate
//! inside a single conditional statement. That encoding must not leak past the
//! row mappers: application code sees a tagged [`RecordStatus`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Sentinel timestamp meaning "not yet closed", as stored.
pub const OPEN_SENTINEL_TEXT: &str = "9999-12-31 23:59:59";

/// The sentinel as a typed timestamp.
pub fn open_sentinel() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Open/closed status of a loan, subscription or feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "at")]
pub enum RecordStatus {
    Open,
    Closed(NaiveDateTime),
}

impl RecordStatus {
    /// Map a stored closure timestamp (possibly the sentinel) to a status.
    pub fn from_closed_at(closed_at: NaiveDateTime) -> Self {
        if closed_at >= open_sentinel() {
            Self::Open
        } else {
            Self::Closed(closed_at)
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn closed_at(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Open => None,
            Self::Closed(at) => Some(*at),
        }
    }
}

/// Active/inactive lifecycle of a book or user.
///
/// An enum rather than a bool so a third state can be added without a schema
/// of `true`/`false` call sites to untangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Inactive,
}

impl Lifecycle {
    /// Map the stored 1/0 flag.
    pub fn from_flag(flag: i64) -> Self {
        if flag != 0 { Self::Active } else { Self::Inactive }
    }

    pub fn as_flag(&self) -> i64 {
        match self {
            Self::Active => 1,
            Self::Inactive => 0,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn sentinel_maps_to_open() {
        assert_eq!(RecordStatus::from_closed_at(open_sentinel()), RecordStatus::Open);
        assert!(RecordStatus::from_closed_at(open_sentinel()).is_open());
    }

    #[test]
    fn concrete_timestamp_maps_to_closed() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let status = RecordStatus::from_closed_at(at);
        assert!(!status.is_open());
        assert_eq!(status.closed_at(), Some(at));
    }

    #[test]
    fn sentinel_text_parses_to_sentinel() {
        let parsed =
            NaiveDateTime::parse_from_str(OPEN_SENTINEL_TEXT, "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(parsed, open_sentinel());
    }

    #[test]
    fn lifecycle_flag_roundtrip() {
        assert_eq!(Lifecycle::from_flag(1), Lifecycle::Active);
        assert_eq!(Lifecycle::from_flag(0), Lifecycle::Inactive);
        assert_eq!(Lifecycle::Active.as_flag(), 1);
        assert_eq!(Lifecycle::Inactive.as_flag(), 0);
        assert!(Lifecycle::Active.is_active());
        assert!(!Lifecycle::Inactive.is_active());
    }
}
