use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored user credential. Only the hashed secret is ever kept.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Credential {
    pub id: Uuid,
    #[sqlx(rename = "username")]
    pub identifier: String,
    #[sqlx(rename = "password")]
    pub secret_hash: String,
}

impl Credential {
    pub fn new(identifier: String, secret_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier,
            secret_hash,
        }
    }
}

/// Opaque handle to a committed credential; carries no secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRef {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    #[serde(rename = "_id", default)]
    pub id: Uuid,
    pub product_name: String,
    pub price: i32,
    pub currency: String,
    #[serde(default)]
    pub discount: i32,
    pub vendor: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessories: Vec<String>,
    #[serde(default)]
    pub is_essential: bool,
}

impl Product {
    /// Copy every mutable field from `update`, keeping this product's id.
    pub fn apply(&mut self, update: Product) {
        self.product_name = update.product_name;
        self.price = update.price;
        self.currency = update.currency;
        self.discount = update.discount;
        self.vendor = update.vendor;
        self.accessories = update.accessories;
        self.is_essential = update.is_essential;
    }
}
