//! Persistence for credentials and products.
//!
//! Services depend on the traits in [`store`]; [`operations`] binds them to
//! Postgres and [`memory`] keeps everything in process.

pub mod memory;
pub mod models;
pub mod operations;
pub mod store;

pub use memory::{InMemoryCredentialStore, InMemoryProductStore};
pub use models::{Credential, CredentialRef, Product};
pub use operations::DbOperations;
pub use store::{CredentialStore, ProductStore};
