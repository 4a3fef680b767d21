//! Invoicing

use super::refs::{CurrencyRef, CustomerRef};
use crate::{define_payload, define_resource, resource_mutations};
use serde::Serialize;
use validator::Validate;

define_payload!(
    /// An issued invoice
    pub struct Invoice {
        id: i64 => [integer],
        invoice_no: String => [string],
        invoice_date: String => [date],
        amount: f64 => [float],
        currency: Option<CurrencyRef> => [optional object CurrencyRef],
        status: String => [string],
        customer: Option<CustomerRef> => [optional object CustomerRef],
        due_date: Option<String> => [nullable date],
    }
);
define_resource!(Invoice, family = "invoice");
resource_mutations!(Invoice, family = "invoice");

/// Input for issuing an invoice
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewInvoice {
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i64,
    /// `YYYY-MM-DD`
    #[validate(length(min = 1, message = "invoice date must not be empty"))]
    pub invoice_date: String,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<i64>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Input for correcting an invoice; `id` becomes the path parameter
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateInvoice {
    #[validate(range(min = 1, message = "id must be positive"))]
    pub id: i64,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::Payload;
    use serde_json::json;

    #[test]
    fn test_invoice_schema_dates_and_amounts() {
        let payload = json!({
            "id": 88,
            "invoice_no": "INV-2025-0088",
            "invoice_date": "2025-09-14",
            "amount": 12890.00,
            "currency": { "id": 1, "code": "USD" },
            "status": "unpaid",
            "customer": { "id": 7, "name": "Nordship Marine" },
            "due_date": null,
        });
        assert!(Invoice::schema().validate(&payload).is_ok());

        // an integer amount is still a number
        let mut whole = payload.clone();
        whole["amount"] = json!(12890);
        assert!(Invoice::schema().validate(&whole).is_ok());

        let mut drifted = payload.clone();
        drifted["invoice_date"] = json!("14.09.2025");
        assert!(Invoice::schema().validate(&drifted).is_err());
    }
}
