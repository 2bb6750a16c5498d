//! Frisbii billing provider adapter.
//!
//! Implements the `BillingProvider` port against the provider's REST API:
//! - Customer and invoice fetches by key
//! - Paginated customer and invoice listings
//! - Webhook signature verification
//!
//! # Security
//!
//! - API keys are held as `secrecy::SecretString`, one per country account
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison

mod client;
mod mapper;
mod mock_provider;
mod signature;
mod wire_types;

pub use client::{FrisbiiClient, FrisbiiConfig, ProviderCredentials, DEFAULT_API_BASE_URL};
pub use mapper::{map_customer, map_invoice, map_states};
pub use mock_provider::{MethodCall, MockBillingProvider};
pub use signature::{compute_signature, verify_signature, SignatureError};
pub use wire_types::{
    CustomerResponse, ErrorResponse, InvoiceResponse, ListResponse, TransactionResponse,
};
