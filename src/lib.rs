//! PSP Sync - payment provider billing mirror
//!
//! Keeps a PostgreSQL copy of the provider's customers and invoices for the
//! DK, SE and NO accounts. Records arrive through per-country webhooks and
//! an optional startup backfill, and are exposed through authenticated
//! date-range invoice reports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
