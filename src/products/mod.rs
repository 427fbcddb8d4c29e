//! Product catalog: validation rules and HTTP handlers.

pub mod handlers;

use crate::db::models::Product;
use crate::error::AppError;
use crate::validation;

pub const MAX_NAME_LENGTH: usize = 10;
pub const MAX_PRICE: i32 = 2000;
pub const MAX_CURRENCY_LENGTH: usize = 3;
pub const MAX_VENDOR_LENGTH: usize = 100;

pub fn validate(product: &Product) -> Result<(), AppError> {
    validation::require("product_name", &product.product_name, MAX_NAME_LENGTH)?;
    if product.price <= 0 || product.price > MAX_PRICE {
        return Err(AppError::ValidationError(format!(
            "price must be between 1 and {}",
            MAX_PRICE
        )));
    }
    validation::require("currency", &product.currency, MAX_CURRENCY_LENGTH)?;
    validation::require("vendor", &product.vendor, MAX_VENDOR_LENGTH)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pencil() -> Product {
        Product {
            id: Uuid::nil(),
            product_name: "Pencil".into(),
            price: 10,
            currency: "nzd".into(),
            discount: 2,
            vendor: "test".into(),
            accessories: vec!["test".into()],
            is_essential: false,
        }
    }

    #[test]
    fn test_valid_product() {
        assert!(validate(&pencil()).is_ok());
    }

    #[test]
    fn test_field_limits() {
        let mut p = pencil();
        p.product_name = "Mechanical Pencil".into();
        assert!(validate(&p).is_err());

        let mut p = pencil();
        p.price = 0;
        assert!(validate(&p).is_err());
        p.price = MAX_PRICE;
        assert!(validate(&p).is_ok());
        p.price = MAX_PRICE + 1;
        assert!(validate(&p).is_err());

        let mut p = pencil();
        p.currency = "nzdd".into();
        assert!(validate(&p).is_err());

        let mut p = pencil();
        p.vendor.clear();
        assert!(validate(&p).is_err());
    }

    #[test]
    fn test_wire_format() {
        let p: Product = serde_json::from_str(
            r#"{"product_name":"Pencil","price":10,"currency":"nzd","vendor":"test"}"#,
        )
        .unwrap();
        assert_eq!(p.id, Uuid::nil());
        assert_eq!(p.discount, 0);
        assert!(p.accessories.is_empty());
        assert!(!p.is_essential);

        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("accessories").is_none());
    }
}
