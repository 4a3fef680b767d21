//! Embedded reference objects
//!
//! Backends embed related records as small `{id, name}`-shaped objects
//! rather than bare foreign keys. These refs implement [`Payload`] only:
//! they have a validated shape but no endpoints of their own.
//!
//! [`Payload`]: crate::core::resource::Payload

use crate::define_payload;

define_payload!(
    /// Customer a record belongs to
    pub struct CustomerRef {
        id: i64 => [integer],
        name: String => [string],
    }
);

define_payload!(
    /// Back-office user, e.g. the raiser of a requisition
    pub struct UserRef {
        id: i64 => [integer],
        name: String => [string],
    }
);

define_payload!(
    /// Priority level attached to procurement paperwork
    pub struct PriorityRef {
        id: i64 => [integer],
        name: String => [string],
    }
);

define_payload!(
    /// Sea or air port, with its UN/LOCODE-style short code
    pub struct PortRef {
        id: i64 => [integer],
        name: String => [string],
        code: String => [string],
    }
);

define_payload!(
    /// Trading currency
    pub struct CurrencyRef {
        id: i64 => [integer],
        code: String => [string],
    }
);

define_payload!(
    /// Goods receipt note a downstream record refers back to
    pub struct GrnRef {
        id: i64 => [integer],
        grn_no: String => [string],
    }
);
