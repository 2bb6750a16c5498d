//! HTTP middleware for axum.
//!
//! - `basic_auth` - Basic authentication for the reporting endpoints

pub mod basic_auth;

pub use basic_auth::{
    basic_auth_middleware, BasicAuthCredentials, BasicAuthState, BASIC_AUTH_CHALLENGE,
};
