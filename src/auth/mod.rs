//! Authentication module for the catalog server
//!
//! Registration, credential verification and token issuance.

pub mod handlers;
mod password;
mod service;
mod token;

pub use password::SecretHasher;
pub use service::{AuthService, Principal};
pub use token::{Claims, TokenIssuer, TOKEN_TTL_MINUTES};
