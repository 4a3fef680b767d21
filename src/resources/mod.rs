//! Resource catalog
//!
//! One module per backend domain, each declaring its payloads through
//! [`crate::define_payload!`] and wiring them to endpoints with
//! [`crate::define_resource!`] / [`crate::resource_mutations!`]. The
//! endpoint names declared here match the standard catalog in
//! [`crate::config::ApiConfig::default_config`].

pub mod customer;
pub mod invoice;
pub mod macros;
pub mod procurement;
pub mod receiving;
pub mod refs;
pub mod spares;

pub use customer::{
    Bank, Contact, Customer, NewBank, NewContact, NewCustomer, NewShippingAddress,
    ShippingAddress, UpdateBank, UpdateCustomer,
};
pub use invoice::{Invoice, NewInvoice, UpdateInvoice};
pub use procurement::{LogisticRequest, NewLogisticRequest, NewPrfq, NewStf, Prfq, Stf};
pub use receiving::{Grn, NewGrn, NewStockInspection, StockInspection};
pub use refs::{CurrencyRef, CustomerRef, GrnRef, PortRef, PriorityRef, UserRef};
pub use spares::{NewSpare, Spare, UpdateSpare};
