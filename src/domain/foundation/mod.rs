//! Foundation module - Shared domain primitives.
//!
//! Contains value objects and error types that form the vocabulary of the
//! billing sync domain.

mod country;
mod date_range;
mod errors;

pub use country::Country;
pub use date_range::{parse_report_date, DateRange, REPORT_DATE_FORMAT};
pub use errors::{DomainError, ErrorCode, ValidationError};
