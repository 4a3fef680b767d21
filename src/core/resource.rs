//! Resource traits
//!
//! [`Payload`] binds a deserializable model to its declared [`Schema`];
//! [`Resource`] extends it with the endpoint names a fetchable resource
//! needs. Embedded reference objects (a `CustomerRef` inside a bank record,
//! say) implement only `Payload`: they have a shape but no routes of their
//! own.
//!
//! Both traits are normally implemented through [`crate::define_payload!`]
//! and [`crate::define_resource!`], which generate the struct and its schema
//! from a single declaration so the two cannot drift apart.

use crate::core::schema::Schema;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A JSON object with a declared schema
pub trait Payload: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// The schema this payload is validated against
    fn schema() -> &'static Schema;
}

/// A fetchable backend resource
///
/// `resource_name` keys the read cache and groups every endpoint of the
/// family for invalidation; the endpoint names are looked up in the
/// client's endpoint map at request time.
pub trait Resource: Payload {
    /// Stable family name, e.g. `"bank"`
    fn resource_name() -> &'static str;

    /// Endpoint name for the paginated list, e.g. `"bank-index"`
    fn list_endpoint() -> &'static str;

    /// Endpoint name for the single-record read, e.g. `"bank-detail"`
    fn detail_endpoint() -> &'static str;
}

/// A resource that can also be created and updated
///
/// Implemented through [`crate::resource_mutations!`]; read-only families
/// (log feeds, computed views) simply skip it.
pub trait MutableResource: Resource {
    /// Endpoint name for creation, e.g. `"bank-create"`
    fn create_endpoint() -> &'static str;

    /// Endpoint name for updates, e.g. `"bank-update"`
    fn update_endpoint() -> &'static str;
}
