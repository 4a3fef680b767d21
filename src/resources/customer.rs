//! Customer master data: customers, their banks, contacts and addresses

use super::refs::{CurrencyRef, CustomerRef};
use crate::{define_payload, define_resource, resource_mutations};
use serde::Serialize;
use validator::Validate;

define_payload!(
    /// A customer organization
    pub struct Customer {
        id: i64 => [integer],
        name: String => [string],
        email: Option<String> => [nullable string],
        phone: Option<String> => [nullable string],
        address: Option<String> => [nullable string],
        created_at: Option<String> => [optional datetime],
    }
);
define_resource!(Customer, family = "customer");
resource_mutations!(Customer, family = "customer");

define_payload!(
    /// A saved beneficiary bank account
    pub struct Bank {
        id: i64 => [integer],
        beneficiary_name: String => [string],
        bank_name: String => [string],
        account_no: String => [string],
        iban: Option<String> => [nullable string],
        swift_code: Option<String> => [nullable string],
        currency: Option<CurrencyRef> => [optional object CurrencyRef],
        customer: Option<CustomerRef> => [optional object CustomerRef],
    }
);
define_resource!(Bank, family = "bank");
resource_mutations!(Bank, family = "bank");

define_payload!(
    /// A contact person at a customer
    pub struct Contact {
        id: i64 => [integer],
        name: String => [string],
        designation: Option<String> => [nullable string],
        email: Option<String> => [nullable string],
        phone: Option<String> => [nullable string],
        customer: Option<CustomerRef> => [optional object CustomerRef],
    }
);
define_resource!(Contact, family = "contact");
resource_mutations!(Contact, family = "contact");

define_payload!(
    /// A registered delivery address
    pub struct ShippingAddress {
        id: i64 => [integer],
        label: String => [string],
        address_line: String => [string],
        city: String => [string],
        country: String => [string],
        postal_code: Option<String> => [nullable string],
        customer: Option<CustomerRef> => [optional object CustomerRef],
    }
);
define_resource!(ShippingAddress, family = "shipping-address");
resource_mutations!(ShippingAddress, family = "shipping-address");

// =============================================================================
// Mutation inputs
// =============================================================================

/// Input for creating a customer
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewCustomer {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Input for updating a customer; `id` becomes the path parameter
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateCustomer {
    #[validate(range(min = 1, message = "id must be positive"))]
    pub id: i64,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Input for registering a bank account
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewBank {
    #[validate(length(min = 1, message = "beneficiary name must not be empty"))]
    pub beneficiary_name: String,
    #[validate(length(min = 1, message = "bank name must not be empty"))]
    pub bank_name: String,
    #[validate(length(min = 1, message = "account number must not be empty"))]
    pub account_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<i64>,
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i64,
}

/// Input for updating a bank account; `id` becomes the path parameter
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateBank {
    #[validate(range(min = 1, message = "id must be positive"))]
    pub id: i64,
    #[validate(length(min = 1, message = "beneficiary name must not be empty"))]
    pub beneficiary_name: String,
    #[validate(length(min = 1, message = "bank name must not be empty"))]
    pub bank_name: String,
    #[validate(length(min = 1, message = "account number must not be empty"))]
    pub account_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<i64>,
}

/// Input for adding a contact person
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewContact {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i64,
}

/// Input for registering a delivery address
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewShippingAddress {
    #[validate(length(min = 1, message = "label must not be empty"))]
    pub label: String,
    #[validate(length(min = 1, message = "address line must not be empty"))]
    pub address_line: String,
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: String,
    #[validate(length(min = 1, message = "country must not be empty"))]
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::{Payload, Resource};
    use serde_json::json;

    fn bank_payload() -> serde_json::Value {
        json!({
            "id": 12,
            "beneficiary_name": "Nordship Marine Oy",
            "bank_name": "Harbor Trust",
            "account_no": "440012765",
            "iban": "FI2112345600000785",
            "swift_code": null,
            "currency": { "id": 2, "code": "EUR" },
            "customer": { "id": 7, "name": "Nordship Marine" },
        })
    }

    #[test]
    fn test_bank_schema_accepts_backend_shape() {
        assert!(Bank::schema().validate(&bank_payload()).is_ok());
        let bank: Bank = serde_json::from_value(bank_payload()).unwrap();
        assert_eq!(bank.currency.unwrap().code, "EUR");
        assert!(bank.swift_code.is_none());
    }

    #[test]
    fn test_bank_schema_reports_nested_paths() {
        let mut payload = bank_payload();
        payload["currency"] = json!({ "id": 2, "code": 978 });
        payload["beneficiary_name"] = json!(null);

        let issues = Bank::schema().validate(&payload).unwrap_err();
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"currency.code"));
        assert!(paths.contains(&"beneficiary_name"));
    }

    #[test]
    fn test_contact_family_routes_through_manager_endpoints() {
        // The endpoint names stay regular even though the backend path is not
        assert_eq!(Contact::resource_name(), "contact");
        assert_eq!(Contact::list_endpoint(), "contact-index");
    }

    #[test]
    fn test_new_bank_validation() {
        let input = NewBank {
            beneficiary_name: String::new(),
            bank_name: "Harbor Trust".to_string(),
            account_no: "440012765".to_string(),
            iban: None,
            swift_code: None,
            currency_id: None,
            customer_id: 0,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("beneficiary_name"));
        assert!(errors.field_errors().contains_key("customer_id"));
    }

    #[test]
    fn test_inputs_omit_unset_fields_on_the_wire() {
        let input = NewCustomer {
            name: "Nordship Marine".to_string(),
            email: None,
            phone: None,
            address: None,
        };
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body, json!({ "name": "Nordship Marine" }));
    }
}
