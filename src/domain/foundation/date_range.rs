//! Half-open time interval used by reporting queries.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::errors::ValidationError;

/// Date format accepted by the reporting endpoints.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A half-open UTC interval `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range, rejecting `from > to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::invalid_format(
                "from",
                "'from' date cannot be after 'to' date",
            ));
        }
        Ok(Self { from, to })
    }

    /// Builds the range covering whole calendar days `from..=to`.
    ///
    /// The upper bound is midnight after `to`, so invoices created on the
    /// `to` day are included.
    pub fn from_days(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::invalid_format(
                "from",
                "'from' date cannot be after 'to' date",
            ));
        }
        let start = start_of_day(from);
        let end = start_of_day(to) + Duration::days(1);
        Self::new(start, end)
    }

    /// Parses two `YYYY-MM-DD` strings into a whole-day range.
    pub fn parse_days(from: &str, to: &str) -> Result<Self, ValidationError> {
        let from = parse_report_date("from", from)?;
        let to = parse_report_date("to", to)?;
        Self::from_days(from, to)
    }

    /// Inclusive lower bound.
    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    /// Exclusive upper bound.
    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// Whether `at` lies in `[from, to)`.
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.from && *at < self.to
    }
}

/// Parses a single `YYYY-MM-DD` report date.
pub fn parse_report_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    NaiveDate::parse_from_str(value.trim(), REPORT_DATE_FORMAT).map_err(|_| {
        ValidationError::invalid_format(
            field,
            format!("'{}' date is invalid, must be YYYY-MM-DD", field),
        )
    })
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
