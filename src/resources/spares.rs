//! Spare parts catalog

use crate::{define_payload, define_resource, resource_mutations};
use serde::Serialize;
use validator::Validate;

define_payload!(
    /// A spare part held in the catalog
    pub struct Spare {
        id: i64 => [integer],
        part_no: String => [string],
        description: String => [string],
        maker: Option<String> => [nullable string],
        model: Option<String> => [nullable string],
        unit: String => [string],
        stock_quantity: i64 => [integer],
        unit_price: Option<f64> => [nullable float],
    }
);
define_resource!(Spare, family = "spare");
resource_mutations!(Spare, family = "spare");

/// Input for adding a spare part
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewSpare {
    #[validate(length(min = 1, message = "part number must not be empty"))]
    pub part_no: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[validate(length(min = 1, message = "unit must not be empty"))]
    pub unit: String,
    #[validate(range(min = 0, message = "stock quantity must not be negative"))]
    pub stock_quantity: i64,
    #[validate(range(min = 0.0, message = "unit price must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

/// Input for updating a spare part; `id` becomes the path parameter
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateSpare {
    #[validate(range(min = 1, message = "id must be positive"))]
    pub id: i64,
    #[validate(length(min = 1, message = "part number must not be empty"))]
    pub part_no: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[validate(length(min = 1, message = "unit must not be empty"))]
    pub unit: String,
    #[validate(range(min = 0, message = "stock quantity must not be negative"))]
    pub stock_quantity: i64,
    #[validate(range(min = 0.0, message = "unit price must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::Payload;
    use serde_json::json;

    #[test]
    fn test_spare_schema() {
        let payload = json!({
            "id": 501,
            "part_no": "KX-180-SEAL",
            "description": "Crankshaft seal, 180mm",
            "maker": "Kyushu Diesel",
            "model": null,
            "unit": "pcs",
            "stock_quantity": 14,
            "unit_price": 86.50,
        });
        assert!(Spare::schema().validate(&payload).is_ok());

        // integer quantity must not come back as a decimal
        let mut drifted = payload.clone();
        drifted["stock_quantity"] = json!(14.5);
        let issues = Spare::schema().validate(&drifted).unwrap_err();
        assert_eq!(issues[0].path, "stock_quantity");
        assert_eq!(issues[0].expected, "integer");
    }

    #[test]
    fn test_new_spare_rejects_negative_stock() {
        let input = NewSpare {
            part_no: "KX-180-SEAL".to_string(),
            description: "Crankshaft seal".to_string(),
            maker: None,
            model: None,
            unit: "pcs".to_string(),
            stock_quantity: -2,
            unit_price: Some(86.5),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("stock_quantity"));
    }
}
