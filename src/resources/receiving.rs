//! Goods receiving: receipt notes and stock inspections

use super::refs::{GrnRef, UserRef};
use crate::{define_payload, define_resource, resource_mutations};
use serde::Serialize;
use validator::Validate;

define_payload!(
    /// A goods receipt note
    pub struct Grn {
        id: i64 => [integer],
        grn_no: String => [string],
        received_on: String => [date],
        spare_ids: Vec<i64> => [array of integer],
        status: String => [string],
    }
);
define_resource!(Grn, family = "grn");
resource_mutations!(Grn, family = "grn");

define_payload!(
    /// An inspection performed on received stock
    pub struct StockInspection {
        id: i64 => [integer],
        grn: Option<GrnRef> => [optional object GrnRef],
        inspected_at: String => [datetime],
        passed: bool => [boolean],
        inspector: Option<UserRef> => [optional object UserRef],
        remarks: Option<String> => [nullable string],
    }
);
define_resource!(StockInspection, family = "stock-inspection");
resource_mutations!(StockInspection, family = "stock-inspection");

/// Input for booking received goods
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewGrn {
    /// `YYYY-MM-DD`
    #[validate(length(min = 1, message = "received date must not be empty"))]
    pub received_on: String,
    #[validate(length(min = 1, message = "at least one spare is required"))]
    pub spare_ids: Vec<i64>,
}

/// Input for recording an inspection
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewStockInspection {
    #[validate(range(min = 1, message = "grn_id must be positive"))]
    pub grn_id: i64,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
