use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::db::models::{Credential, CredentialRef, Product};
use crate::db::store::{CredentialStore, ProductStore};
use crate::error::DatabaseError;

const PRODUCT_COLUMNS: &str =
    "id, product_name, price, currency, discount, vendor, accessories, is_essential";

/// Postgres binding for the credential and product stores.
///
/// Every statement runs under `query_timeout`; a slow database surfaces as
/// [`DatabaseError::Timeout`] instead of holding the request open.
#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self { pool, query_timeout }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Ok(Self::new(Arc::new(pool), config.query_timeout()))
    }

    /// Apply pending migrations, including the unique key on `users.username`.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(DatabaseError::from),
            Err(_) => Err(DatabaseError::Timeout(self.query_timeout)),
        }
    }

    async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, DatabaseError> {
        self.bounded(self.pool.as_ref().begin()).await
    }
}

#[async_trait]
impl CredentialStore for DbOperations {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Credential>, DatabaseError> {
        self.bounded(
            sqlx::query_as::<_, Credential>(
                "SELECT id, username, password FROM users WHERE username = $1",
            )
            .bind(identifier)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn insert(&self, credential: &Credential) -> Result<CredentialRef, DatabaseError> {
        let id: Uuid = self
            .bounded(
                sqlx::query_scalar("INSERT INTO users (id, username, password) VALUES ($1, $2, $3) RETURNING id")
                    .bind(credential.id)
                    .bind(&credential.identifier)
                    .bind(&credential.secret_hash)
                    .fetch_one(self.pool.as_ref()),
            )
            .await?;

        Ok(CredentialRef { id })
    }
}

#[async_trait]
impl ProductStore for DbOperations {
    async fn insert_many(&self, products: &[Product]) -> Result<Vec<Uuid>, DatabaseError> {
        let mut transaction = self.begin_transaction().await?;
        let mut ids: Vec<Uuid> = Vec::with_capacity(products.len());

        for product in products {
            let result: Result<Uuid, DatabaseError> = self
                .bounded(
                    sqlx::query_scalar(
                        r#"
                        INSERT INTO products (id, product_name, price, currency, discount, vendor, accessories, is_essential)
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                        RETURNING id
                        "#,
                    )
                    .bind(product.id)
                    .bind(&product.product_name)
                    .bind(product.price)
                    .bind(&product.currency)
                    .bind(product.discount)
                    .bind(&product.vendor)
                    .bind(&product.accessories)
                    .bind(product.is_essential)
                    .fetch_one(&mut *transaction),
                )
                .await;

            match result {
                Ok(id) => ids.push(id),
                Err(e) => {
                    // Dropping the transaction rolls it back as well; this
                    // just makes it happen before the error is returned.
                    let _ = transaction.rollback().await;
                    return Err(e);
                }
            }
        }

        self.bounded(transaction.commit()).await?;
        Ok(ids)
    }

    async fn find_all(&self) -> Result<Vec<Product>, DatabaseError> {
        self.bounded(
            sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products ORDER BY created_at",
                PRODUCT_COLUMNS
            ))
            .fetch_all(self.pool.as_ref()),
        )
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DatabaseError> {
        self.bounded(
            sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products WHERE id = $1",
                PRODUCT_COLUMNS
            ))
            .bind(id)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn update(&self, id: Uuid, product: Product) -> Result<Option<Product>, DatabaseError> {
        self.bounded(
            sqlx::query_as::<_, Product>(&format!(
                r#"
                UPDATE products
                SET product_name = $2, price = $3, currency = $4, discount = $5,
                    vendor = $6, accessories = $7, is_essential = $8
                WHERE id = $1
                RETURNING {}
                "#,
                PRODUCT_COLUMNS
            ))
            .bind(id)
            .bind(&product.product_name)
            .bind(product.price)
            .bind(&product.currency)
            .bind(product.discount)
            .bind(&product.vendor)
            .bind(&product.accessories)
            .bind(product.is_essential)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM products WHERE id = $1")
                    .bind(id)
                    .execute(self.pool.as_ref()),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
