//! Persistence capabilities consumed by the services.
//!
//! Absence is `Ok(None)`, never an error. Uniqueness of credential
//! identifiers is the store's responsibility: `insert` must fail with
//! [`DatabaseError::Duplicate`] when the identifier is already taken, even if
//! a concurrent caller committed it a moment earlier.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Credential, CredentialRef, Product};
use crate::error::DatabaseError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Credential>, DatabaseError>;

    async fn insert(&self, credential: &Credential) -> Result<CredentialRef, DatabaseError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All-or-nothing: either every product is stored or none is.
    async fn insert_many(&self, products: &[Product]) -> Result<Vec<Uuid>, DatabaseError>;

    async fn find_all(&self) -> Result<Vec<Product>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DatabaseError>;

    /// Returns the stored product after the update, or `None` if `id` is unknown.
    async fn update(&self, id: Uuid, product: Product) -> Result<Option<Product>, DatabaseError>;

    /// Returns whether a product was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}
