//! Wagerbook Authentication Layer
//!
//! Stateless role-based authorization for the Wagerbook record-keeping
//! service:
//!
//! - **Token issuance**: HS256-signed, time-limited bearer tokens carrying a
//!   role and a permission set
//! - **Verification**: signature, structure, issuer/audience and expiry
//! - **Gate**: permission intersection and role membership checks
//!
//! Issuance performs no identity check: any caller may request a token for
//! any role. There is no revocation; a token lives until it expires.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Authorization Flow                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  POST /token → TokenAuthority::issue → signed token          │
//! │                                                              │
//! │  Request → bearer_token → TokenAuthority::verify → Claims    │
//! │                                      │                       │
//! │                                      ▼                       │
//! │                     Claims::authorize(perms, roles)          │
//! │                                      │                       │
//! │                                      ▼                       │
//! │                                   Handler                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod types;

pub use config::TokenConfig;
pub use error::{AuthError, AuthResult, ErrorResponse};
pub use jwt::TokenAuthority;
pub use middleware::{auth_error_response, bearer_token};
pub use types::*;
