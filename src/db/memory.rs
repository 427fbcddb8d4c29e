use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{Credential, CredentialRef, Product};
use crate::db::store::{CredentialStore, ProductStore};
use crate::error::DatabaseError;

/// Process-local credential store keyed by identifier.
///
/// The existence check and the insert happen under one write lock, which is
/// the in-memory equivalent of a unique index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    credentials: Arc<RwLock<HashMap<String, Credential>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Credential>, DatabaseError> {
        Ok(self.credentials.read().await.get(identifier).cloned())
    }

    async fn insert(&self, credential: &Credential) -> Result<CredentialRef, DatabaseError> {
        let mut credentials = self.credentials.write().await;
        if credentials.contains_key(&credential.identifier) {
            return Err(DatabaseError::Duplicate);
        }
        credentials.insert(credential.identifier.clone(), credential.clone());
        Ok(CredentialRef { id: credential.id })
    }
}

/// Process-local product store. Listing order is insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert_many(&self, products: &[Product]) -> Result<Vec<Uuid>, DatabaseError> {
        let mut stored = self.products.write().await;
        if products
            .iter()
            .any(|p| stored.iter().any(|existing| existing.id == p.id))
        {
            return Err(DatabaseError::Duplicate);
        }
        stored.extend(products.iter().cloned());
        Ok(products.iter().map(|p| p.id).collect())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DatabaseError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DatabaseError> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, product: Product) -> Result<Option<Product>, DatabaseError> {
        let mut stored = self.products.write().await;
        Ok(stored.iter_mut().find(|p| p.id == id).map(|existing| {
            existing.apply(product);
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut stored = self.products.write().await;
        let before = stored.len();
        stored.retain(|p| p.id != id);
        Ok(stored.len() != before)
    }
}
