use actix_web::{web, HttpResponse};
use tracing::{error, info};
use uuid::Uuid;

use crate::db::models::Product;
use crate::error::{AppError, DatabaseError};
use crate::AppState;

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::ValidationError(format!("invalid product id: {}", raw)))
}

pub async fn create_products(
    req: web::Json<Vec<Product>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut products = req.into_inner();
    for product in &products {
        if let Err(e) = super::validate(product) {
            error!("Unable to validate product {}: {}", product.product_name, e);
            return Err(e);
        }
    }
    for product in &mut products {
        product.id = Uuid::new_v4();
    }

    let ids = state.products.insert_many(&products).await.map_err(|e| {
        error!("Unable to insert products: {}", e);
        AppError::from(e)
    })?;

    info!("Created {} products", ids.len());
    Ok(HttpResponse::Created().json(ids))
}

pub async fn get_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = state.products.find_all().await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn get_product(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    match state.products.find_by_id(id).await? {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => {
            error!("Unable to find product {}", id);
            Err(DatabaseError::NotFound.into())
        }
    }
}

pub async fn put_product(
    path: web::Path<String>,
    req: web::Json<Product>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let product = req.into_inner();
    super::validate(&product)?;

    match state.products.update(id, product).await? {
        Some(updated) => {
            info!("Updated product {}", id);
            Ok(HttpResponse::Ok().json(updated))
        }
        None => {
            error!("Unable to update missing product {}", id);
            Err(DatabaseError::NotFound.into())
        }
    }
}

pub async fn delete_product(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    if !state.products.delete(id).await? {
        error!("Unable to delete missing product {}", id);
        return Err(DatabaseError::NotFound.into());
    }

    info!("Deleted product {}", id);
    Ok(HttpResponse::Ok().json(serde_json::Value::Null))
}
