//! # bdollar-common
//!
//! Common types shared by the Binary Dollar token server, client, and console.
//!
//! This crate provides:
//! - The API token record and its masked display form
//! - Request/response envelopes for every HTTP operation
//!
//! ## Example
//!
//! ```
//! use bdollar_common::{ApiToken, mask_secret};
//!
//! let token = ApiToken::new(
//!     uuid::Uuid::new_v4(),
//!     "bd_0123456789abcdef0123456789abcdef",
//!     "CI Token",
//! );
//!
//! assert!(token.is_active);
//! assert_eq!(token.masked().token, mask_secret(&token.token));
//! assert_eq!(token.masked().token, "bd_01234...cdef");
//! ```

/// API token records and secret masking.
pub mod token;

/// Request and response envelopes exchanged over HTTP.
pub mod protocol;

pub use protocol::{
    ConnectResponse, CreateTokenRequest, CreateTokenResponse, DataSource, ErrorResponse,
    ListTokensResponse, RevokeTokenRequest, RevokeTokenResponse, ServiceHealth, StatusResponse,
};
pub use token::{ApiToken, TOKEN_PREFIX, mask_secret};
