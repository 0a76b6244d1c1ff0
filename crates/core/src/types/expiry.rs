//! Credit-card expiry month.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use thiserror::Error;

/// Errors that can occur when parsing a [`CardExpiry`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryError {
    /// Month or year was left blank.
    #[error("expiry month and year are required")]
    Empty,
    /// Month or year is not a number, or the month is outside 1-12.
    #[error("expiry month and year must form a valid date")]
    Malformed,
}

/// A card expiry year-month.
///
/// Ordering compares year first, then month. The stored instant is the last
/// second of the last day of the month in UTC, which is what gets persisted
/// on the customer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardExpiry {
    year: i32,
    month: u32,
    ends_at: DateTime<Utc>,
}

impl CardExpiry {
    /// Create an expiry from a year and a month (1-12).
    ///
    /// Returns `None` if the pair does not name a calendar month.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if year < 1 {
            return None;
        }

        let ends_at = NaiveDate::from_ymd_opt(year, month, 1)?
            .checked_add_months(Months::new(1))?
            .pred_opt()?
            .and_hms_opt(23, 59, 59)?
            .and_utc();

        Some(Self {
            year,
            month,
            ends_at,
        })
    }

    /// Parse the raw month and year strings from a checkout form.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ExpiryError::Empty`] if either part is blank and
    /// [`ExpiryError::Malformed`] if they do not form a valid year-month.
    pub fn parse(month: &str, year: &str) -> Result<Self, ExpiryError> {
        let (month, year) = (month.trim(), year.trim());
        if month.is_empty() || year.is_empty() {
            return Err(ExpiryError::Empty);
        }

        let month = month.parse::<u32>().map_err(|_| ExpiryError::Malformed)?;
        let year = year.parse::<i32>().map_err(|_| ExpiryError::Malformed)?;

        Self::new(year, month).ok_or(ExpiryError::Malformed)
    }

    /// Expiry year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Expiry month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Last second of the expiry month, UTC.
    #[must_use]
    pub const fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Whether the card has expired as of `today`.
    ///
    /// A card is still valid during its expiry month.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        let expiry = CardExpiry::parse("12", "2099").unwrap();
        assert_eq!(expiry.year(), 2099);
        assert_eq!(expiry.month(), 12);
    }

    #[test]
    fn test_parse_trims_and_accepts_leading_zero() {
        let expiry = CardExpiry::parse(" 03 ", "2030").unwrap();
        assert_eq!(expiry.month(), 3);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(CardExpiry::parse("", "2030"), Err(ExpiryError::Empty));
        assert_eq!(CardExpiry::parse("4", "  "), Err(ExpiryError::Empty));
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(CardExpiry::parse("13", "2030"), Err(ExpiryError::Malformed));
        assert_eq!(CardExpiry::parse("0", "2030"), Err(ExpiryError::Malformed));
        assert_eq!(CardExpiry::parse("ab", "2030"), Err(ExpiryError::Malformed));
        assert_eq!(CardExpiry::parse("5", "20x0"), Err(ExpiryError::Malformed));
        assert_eq!(CardExpiry::parse("5", "-1"), Err(ExpiryError::Malformed));
    }

    #[test]
    fn test_ends_at_is_last_second_of_month() {
        let expiry = CardExpiry::new(2024, 2).unwrap();
        assert_eq!(
            expiry.ends_at(),
            date(2024, 2, 29).and_hms_opt(23, 59, 59).unwrap().and_utc()
        );

        let december = CardExpiry::new(2099, 12).unwrap();
        assert_eq!(
            december.ends_at(),
            date(2099, 12, 31).and_hms_opt(23, 59, 59).unwrap().and_utc()
        );
    }

    #[test]
    fn test_expired_only_before_current_month() {
        let today = date(2026, 10, 19);
        assert!(CardExpiry::new(2026, 9).unwrap().is_expired_on(today));
        assert!(CardExpiry::new(2025, 12).unwrap().is_expired_on(today));
        assert!(!CardExpiry::new(2026, 10).unwrap().is_expired_on(today));
        assert!(!CardExpiry::new(2027, 1).unwrap().is_expired_on(today));
    }

    #[test]
    fn test_ordering() {
        assert!(CardExpiry::new(2026, 12).unwrap() < CardExpiry::new(2027, 1).unwrap());
        assert!(CardExpiry::new(2026, 9).unwrap() < CardExpiry::new(2026, 10).unwrap());
    }
}
