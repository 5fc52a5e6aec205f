use serde::Deserialize;

use crate::error::{Error, Result};

/// Request body for creating a car. Status is never client-supplied.
#[derive(Debug, Deserialize)]
pub struct CreateCarRequest {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: String,
    pub price: f64,
    pub img_url: Option<String>,
}

/// Full replacement of a car's descriptive fields.
#[derive(Debug, Deserialize)]
pub struct UpdateCarRequest {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: String,
    pub price: f64,
    pub img_url: Option<String>,
}

/// Partial update; only the allow-listed fields are accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchCarRequest {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub fuel_type: Option<String>,
    pub price: Option<f64>,
    pub img_url: Option<String>,
}

impl PatchCarRequest {
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.fuel_type.is_none()
            && self.price.is_none()
            && self.img_url.is_none()
    }
}

pub fn validate_car_fields(brand: &str, model: &str, fuel_type: &str, price: f64) -> Result<()> {
    if brand.trim().is_empty() || model.trim().is_empty() || fuel_type.trim().is_empty() {
        return Err(Error::Validation(
            "brand, model and fuel_type must not be empty".into(),
        ));
    }
    if price <= 0.0 {
        return Err(Error::Validation("price must be positive".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_brand_and_nonpositive_price() {
        assert!(validate_car_fields("", "Corolla", "petrol", 35.0).is_err());
        assert!(validate_car_fields("Toyota", "Corolla", "petrol", 0.0).is_err());
        assert!(validate_car_fields("Toyota", "Corolla", "petrol", -5.0).is_err());
        assert!(validate_car_fields("Toyota", "Corolla", "petrol", 35.0).is_ok());
    }

    #[test]
    fn patch_refuses_unknown_fields() {
        // status is not on the allow-list and must be rejected outright
        let res = serde_json::from_str::<PatchCarRequest>(r#"{"status": "available"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn patch_detects_empty_bodies() {
        let patch: PatchCarRequest = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        let patch: PatchCarRequest = serde_json::from_str(r#"{"price": 42.5}"#).unwrap();
        assert!(!patch.is_empty());
    }
}
