//! Procurement paperwork: RFQs, transfer forms and logistic requests

use super::refs::{CustomerRef, PortRef, PriorityRef, UserRef};
use crate::{define_payload, define_resource, resource_mutations};
use serde::Serialize;
use validator::Validate;

define_payload!(
    /// A purchase request-for-quotation
    pub struct Prfq {
        id: i64 => [integer],
        reference_no: String => [string],
        status: String => [string],
        priority: Option<PriorityRef> => [optional object PriorityRef],
        customer: Option<CustomerRef> => [optional object CustomerRef],
        raised_by: Option<UserRef> => [optional object UserRef],
        required_by: Option<String> => [nullable date],
        spare_ids: Vec<i64> => [array of integer],
    }
);
define_resource!(Prfq, family = "prfq");
resource_mutations!(Prfq, family = "prfq");

define_payload!(
    /// A spares transfer form
    pub struct Stf {
        id: i64 => [integer],
        reference_no: String => [string],
        status: String => [string],
        customer: Option<CustomerRef> => [optional object CustomerRef],
        raised_by: Option<UserRef> => [optional object UserRef],
        remarks: Option<String> => [nullable string],
        created_at: Option<String> => [optional datetime],
    }
);
define_resource!(Stf, family = "stf");
resource_mutations!(Stf, family = "stf");

define_payload!(
    /// A request to move cargo between two ports
    pub struct LogisticRequest {
        id: i64 => [integer],
        reference_no: String => [string],
        status: String => [string],
        origin_port: Option<PortRef> => [optional object PortRef],
        destination_port: Option<PortRef> => [optional object PortRef],
        weight_kg: Option<f64> => [nullable float],
        customer: Option<CustomerRef> => [optional object CustomerRef],
    }
);
define_resource!(LogisticRequest, family = "logistic-request");
resource_mutations!(LogisticRequest, family = "logistic-request");

// =============================================================================
// Mutation inputs
// =============================================================================

/// Input for raising an RFQ
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewPrfq {
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<i64>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_by: Option<String>,
    #[validate(length(min = 1, message = "at least one spare is required"))]
    pub spare_ids: Vec<i64>,
}

/// Input for raising a transfer form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewStf {
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[validate(length(min = 1, message = "at least one spare is required"))]
    pub spare_ids: Vec<i64>,
}

/// Input for raising a logistic request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewLogisticRequest {
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i64,
    #[validate(range(min = 1, message = "origin_port_id must be positive"))]
    pub origin_port_id: i64,
    #[validate(range(min = 1, message = "destination_port_id must be positive"))]
    pub destination_port_id: i64,
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}
